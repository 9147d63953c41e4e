//! Post-processing of emitted declaration files.
//!
//! - [`DeclarationWrapper`] turns star-imported per-file declarations into
//!   namespace-wrapped default exports so a declaration bundler can merge
//!   them, and restores the original bytes afterwards.
//! - [`DeclarationFormat`] renders one merged declaration file into the
//!   public export shape of a library.

pub mod error;
pub mod format;
pub mod wrapper;

pub use error::DtsError;
pub use format::{DeclarationFormat, render, resolve};
pub use wrapper::{DeclarationWrapper, WrapPlan, WrapTransaction};
