//! Boundary between the orchestrator and a type-checking front end.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tsdist_ast::Checker;
use tsdist_common::Diagnostic;
use tsdist_transforms::{CustomTransformers, ModuleResolver};

use crate::tsconfig::ParsedCommandLine;

/// Sink for emitted files.
pub trait WriteFile {
    fn write_file(&mut self, path: &Path, contents: &str) -> std::io::Result<()>;
}

/// Writes to disk, creating parent directories.
#[derive(Debug, Default)]
pub struct FsWriter {
    written: Vec<PathBuf>,
}

impl FsWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl WriteFile for FsWriter {
    fn write_file(&mut self, path: &Path, contents: &str) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        self.written.push(path.to_path_buf());
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct EmitResult {
    pub emit_skipped: bool,
    pub diagnostics: Vec<Diagnostic>,
    pub emitted_files: Vec<PathBuf>,
}

/// One type-checked compilation.
pub trait Program {
    fn root_file_names(&self) -> &[PathBuf];

    /// Symbol oracle for transforms.
    fn checker(&self) -> &dyn Checker;

    /// Syntactic, semantic and resolution diagnostics.
    fn pre_emit_diagnostics(&self) -> Vec<Diagnostic>;

    /// Emit every output file, running `transformers` on each tree after it
    /// is produced and before it is printed.
    fn emit(
        &self,
        writer: &mut dyn WriteFile,
        transformers: &mut CustomTransformers<'_>,
    ) -> EmitResult;
}

/// Creates programs. Shared across concurrently compiled targets.
pub trait FrontEnd: Send + Sync {
    fn create_program(
        &self,
        command_line: &ParsedCommandLine,
        resolver: &dyn ModuleResolver,
    ) -> Result<Box<dyn Program>>;
}
