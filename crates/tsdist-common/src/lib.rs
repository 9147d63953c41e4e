//! Common types shared by every tsdist crate.
//!
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, diagnostic codes)
//! - Source spans (`Span`)
//! - Line/column conversion (`LineMap`, `Position`)
//! - Module kinds of a compilation target (`ModuleKind`)

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation};

pub mod module_kind;
pub use module_kind::ModuleKind;

pub mod position;
pub use position::{LineMap, Position};

pub mod span;
pub use span::Span;
