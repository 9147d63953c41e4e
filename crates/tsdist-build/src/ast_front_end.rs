//! Front end over source trees a host has already parsed.
//!
//! Binding comes from `tsdist-binder`, printing from `tsdist-emitter`. Every
//! module specifier is checked against the resolver handed to
//! [`FrontEnd::create_program`]; failures become TS2307 diagnostics.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use tsdist_ast::visit::{VisitMut, walk_call_expr, walk_import_type};
use tsdist_ast::*;
use tsdist_binder::{BoundProgram, bind_program};
use tsdist_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message};
use tsdist_common::{Diagnostic, Span};
use tsdist_emitter::{print_code, print_declarations};
use tsdist_transforms::{CustomTransformers, ModuleResolver, OutputKind};

use crate::host::{EmitResult, FrontEnd, Program, WriteFile};
use crate::tsconfig::{ParsedCommandLine, ResolvedCompilerOptions};

pub struct AstFrontEnd {
    files: Vec<SourceFile>,
}

impl AstFrontEnd {
    /// `files` are named by their absolute source paths.
    pub fn new(files: Vec<SourceFile>) -> Self {
        AstFrontEnd { files }
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }
}

impl FrontEnd for AstFrontEnd {
    fn create_program(
        &self,
        command_line: &ParsedCommandLine,
        resolver: &dyn ModuleResolver,
    ) -> Result<Box<dyn Program>> {
        let files = self.files.clone();
        let bound = bind_program(&files);
        let diagnostics = resolution_diagnostics(&files, resolver);
        let root_file_names: Vec<PathBuf> = files
            .iter()
            .map(|file| PathBuf::from(&file.file_name))
            .collect();
        let root_dir = match &command_line.options.root_dir {
            Some(root_dir) => root_dir.clone(),
            None => common_source_dir(&files)
                .unwrap_or_else(|| command_line.config_dir().to_path_buf()),
        };
        debug!(
            config = %command_line.config_path.display(),
            files = files.len(),
            diagnostics = diagnostics.len(),
            "created program"
        );
        Ok(Box::new(AstProgram {
            files,
            bound,
            diagnostics,
            options: command_line.options.clone(),
            root_dir,
            root_file_names,
        }))
    }
}

struct AstProgram {
    files: Vec<SourceFile>,
    bound: BoundProgram,
    diagnostics: Vec<Diagnostic>,
    options: ResolvedCompilerOptions,
    root_dir: PathBuf,
    root_file_names: Vec<PathBuf>,
}

impl AstProgram {
    fn output_path(&self, source: &Path, out_dir: Option<&Path>, extension: &str) -> PathBuf {
        let relative = source
            .strip_prefix(&self.root_dir)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| source.file_name().map(PathBuf::from).unwrap_or_default());
        let base = out_dir.unwrap_or(&self.root_dir);
        let mut name = base.join(relative).with_extension("").into_os_string();
        name.push(extension);
        PathBuf::from(name)
    }

    fn write(
        &self,
        writer: &mut dyn WriteFile,
        path: PathBuf,
        contents: &str,
        result: &mut EmitResult,
    ) {
        match writer.write_file(&path, contents) {
            Ok(()) => {
                trace!(path = %path.display(), "wrote output");
                result.emitted_files.push(path);
            }
            Err(err) => {
                let message = format_message(
                    diagnostic_messages::COULD_NOT_WRITE_FILE,
                    &[&path.display().to_string(), &err.to_string()],
                );
                result.diagnostics.push(Diagnostic::global(
                    message,
                    diagnostic_codes::COULD_NOT_WRITE_FILE,
                ));
            }
        }
    }
}

impl Program for AstProgram {
    fn root_file_names(&self) -> &[PathBuf] {
        &self.root_file_names
    }

    fn checker(&self) -> &dyn Checker {
        &self.bound
    }

    fn pre_emit_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.clone()
    }

    fn emit(
        &self,
        writer: &mut dyn WriteFile,
        transformers: &mut CustomTransformers<'_>,
    ) -> EmitResult {
        let mut result = EmitResult::default();
        if self.options.no_emit
            || (self.options.no_emit_on_error && self.diagnostics.iter().any(Diagnostic::is_error))
        {
            result.emit_skipped = true;
            return result;
        }

        let out_dir = self.options.out_dir.as_deref();
        let declaration_dir = self.options.declaration_dir.as_deref().or(out_dir);
        for file in self.files.iter().filter(|file| !file.is_declaration_file) {
            let source = Path::new(&file.file_name);

            let mut code = file.clone();
            transformers.apply(OutputKind::Code, &mut code);
            let path = self.output_path(source, out_dir, self.options.code_extension);
            self.write(writer, path, &print_code(&code), &mut result);

            if self.options.emit_declarations {
                let mut declarations = file.clone();
                transformers.apply(OutputKind::Declarations, &mut declarations);
                let path = self.output_path(source, declaration_dir, ".d.ts");
                self.write(writer, path, &print_declarations(&declarations), &mut result);
            }
        }
        result.emit_skipped = !result.diagnostics.is_empty() && result.emitted_files.is_empty();
        debug!(
            files = result.emitted_files.len(),
            skipped = result.emit_skipped,
            "emitted program"
        );
        result
    }
}

fn resolution_diagnostics(files: &[SourceFile], resolver: &dyn ModuleResolver) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for file in files {
        let mut collector = SpecifierCollector::default();
        collector.visit_source_file(&mut file.clone());
        let containing_file = Path::new(&file.file_name);
        for (specifier, span) in collector.specifiers {
            if let Err(failure) = resolver.resolve_module(&specifier, containing_file) {
                trace!(%specifier, file = %file.file_name, "unresolved module");
                diagnostics.push(failure.to_diagnostic(span));
            }
        }
    }
    diagnostics
}

#[derive(Default)]
struct SpecifierCollector {
    specifiers: Vec<(String, Span)>,
}

impl SpecifierCollector {
    fn push(&mut self, lit: &StrLit) {
        self.specifiers.push((lit.value.clone(), lit.span));
    }
}

impl VisitMut for SpecifierCollector {
    fn visit_import_decl(&mut self, import: &mut ImportDecl) {
        self.push(&import.specifier);
    }

    fn visit_import_equals(&mut self, import: &mut ImportEqualsDecl) {
        if let ModuleReference::External(specifier) = &import.reference {
            self.push(specifier);
        }
    }

    fn visit_export_named(&mut self, export: &mut ExportNamed) {
        if let Some(source) = &export.source {
            self.push(source);
        }
    }

    fn visit_export_all(&mut self, export: &mut ExportAll) {
        self.push(&export.source);
    }

    fn visit_call_expr(&mut self, call: &mut CallExpr) {
        if let Some(specifier) = call.module_specifier_mut() {
            self.push(specifier);
        }
        walk_call_expr(self, call);
    }

    fn visit_import_type(&mut self, import: &mut ImportType) {
        self.push(&import.argument);
        walk_import_type(self, import);
    }
}

/// Longest directory containing every non-declaration source file.
fn common_source_dir(files: &[SourceFile]) -> Option<PathBuf> {
    let mut dirs = files
        .iter()
        .filter(|file| !file.is_declaration_file)
        .filter_map(|file| Path::new(&file.file_name).parent());
    let mut common = dirs.next()?.to_path_buf();
    for dir in dirs {
        while !dir.starts_with(&common) {
            if !common.pop() {
                return None;
            }
        }
    }
    Some(common)
}
