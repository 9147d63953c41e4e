//! Syntax tree for TypeScript modules as seen by tsdist's emit-time hooks.
//!
//! The tree is owned by the front end. tsdist receives `&mut SourceFile`
//! after the front end has produced code or declaration output trees and
//! rewrites it in place through [`visit::VisitMut`].
//!
//! - `ast`: node definitions
//! - `visit`: mutable visitor with `walk_*` defaults
//! - `checker`: the symbol oracle a front end exposes to transforms
//! - `factory`: constructors for synthesized nodes

pub mod ast;
pub mod checker;
pub mod factory;
pub mod visit;

pub use ast::*;
pub use checker::{Checker, Declaration, DeclarationKind, SymbolId};
pub use visit::VisitMut;
