//! Multi-target compilation and declaration bundling for tsdist.
//!
//! [`CompileOrchestrator`] compiles one project once per module format,
//! attaching the `tsdist-transforms` hooks to every emit. [`build`] runs
//! every target, then bundles the modern target's declarations through a
//! [`DeclarationBundler`] and rewrites the merged file into the library's
//! public declaration format.

pub mod ast_front_end;
pub mod bundler;
pub mod config;
pub mod discovery;
pub mod error;
pub mod host;
pub mod orchestrator;
pub mod pipeline;
pub mod pure_class;
pub mod reporter;
pub mod tracing_config;
pub mod tsconfig;
pub mod watch;

pub use ast_front_end::AstFrontEnd;
pub use bundler::{CommandBundler, DeclarationBundler};
pub use config::{BuildConfig, CompilationTarget, DeclarationBundleConfig, find_project_root};
pub use error::BuildError;
pub use host::{EmitResult, FrontEnd, FsWriter, Program, WriteFile};
pub use orchestrator::{CompileOrchestrator, TargetOutcome, TargetStatus, filter_diagnostics};
pub use pipeline::{BuildReport, build};
pub use pure_class::{PureClassWriter, mark_pure_classes};
pub use reporter::Reporter;
pub use tsconfig::{ParsedCommandLine, ResolvedCompilerOptions, parse_command_line};
pub use watch::TargetWatcher;
