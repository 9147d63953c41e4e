//! One type-checked compilation per module-format target.

use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use tsdist_common::Diagnostic;
use tsdist_transforms::{
    NodeModuleResolver, ResolutionFallback, TransformOptions, create_transformers,
};
use walkdir::WalkDir;

use crate::config::{BuildConfig, CompilationTarget};
use crate::error::BuildError;
use crate::host::{FrontEnd, FsWriter};
use crate::pure_class::PureClassWriter;
use crate::tsconfig::{ParsedCommandLine, find_config_file, parse_command_line};

#[derive(Debug)]
pub enum TargetStatus {
    Succeeded,
    Failed(BuildError),
    Skipped(BuildError),
}

#[derive(Debug)]
pub struct TargetOutcome {
    pub target: String,
    pub status: TargetStatus,
    /// Diagnostics left after dropping ignored codes.
    pub diagnostics: Vec<Diagnostic>,
    pub emitted_files: Vec<PathBuf>,
}

impl TargetOutcome {
    pub(crate) fn new(target: &CompilationTarget, status: TargetStatus) -> Self {
        TargetOutcome {
            target: target.name.clone(),
            status,
            diagnostics: Vec::new(),
            emitted_files: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, TargetStatus::Succeeded)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, TargetStatus::Failed(_))
    }
}

/// Compiles targets against one project root through a shared front end.
pub struct CompileOrchestrator {
    root: PathBuf,
    front_end: Arc<dyn FrontEnd>,
    external_api_declaration_dir: Option<PathBuf>,
    copy_external_api: bool,
}

impl CompileOrchestrator {
    pub fn new(root: impl Into<PathBuf>, front_end: Arc<dyn FrontEnd>) -> Self {
        CompileOrchestrator {
            root: root.into(),
            front_end,
            external_api_declaration_dir: None,
            copy_external_api: true,
        }
    }

    pub fn from_config(config: &BuildConfig, front_end: Arc<dyn FrontEnd>) -> Self {
        CompileOrchestrator::new(config.root.clone(), front_end)
            .with_external_api_declaration_dir(config.external_api_declaration_dir.clone())
    }

    pub fn with_external_api_declaration_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.external_api_declaration_dir = dir;
        self
    }

    /// Watch builds leave the external API directory alone.
    pub(crate) fn without_external_api_copy(mut self) -> Self {
        self.copy_external_api = false;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Compile every target concurrently. A failing target never cancels
    /// the others; outcomes come back in target order.
    pub async fn run(self: &Arc<Self>, targets: &[CompilationTarget]) -> Vec<TargetOutcome> {
        let tasks = targets.iter().cloned().map(|target| {
            let orchestrator = Arc::clone(self);
            tokio::task::spawn_blocking(move || orchestrator.compile(&target))
        });
        let joined = join_all(tasks).await;
        joined
            .into_iter()
            .zip(targets)
            .map(|(result, target)| match result {
                Ok(outcome) => outcome,
                Err(err) => TargetOutcome::new(
                    target,
                    TargetStatus::Failed(BuildError::FrontEnd(anyhow::anyhow!(
                        "compilation task for '{}' did not finish: {err}",
                        target.name
                    ))),
                ),
            })
            .collect()
    }

    /// Compile one target on the current thread.
    #[instrument(level = "info", skip_all, fields(target = %target.name))]
    pub fn compile(&self, target: &CompilationTarget) -> TargetOutcome {
        let Some(config_path) = self.locate_config(target) else {
            let path = self.root.join(&target.config_path);
            info!(config = %path.display(), "tsconfig not found, skipping target");
            return TargetOutcome::new(
                target,
                TargetStatus::Skipped(BuildError::ConfigNotFound { path }),
            );
        };

        let command_line = match self.command_line(&config_path, target) {
            Ok(command_line) => command_line,
            Err(err) => return TargetOutcome::new(target, TargetStatus::Failed(err)),
        };
        let transform_options = self.transform_options(target);

        let resolver = ResolutionFallback::new(NodeModuleResolver::new());
        let program = match self.front_end.create_program(&command_line, &resolver) {
            Ok(program) => program,
            Err(err) => {
                return TargetOutcome::new(target, TargetStatus::Failed(BuildError::FrontEnd(err)));
            }
        };

        let mut transformers =
            create_transformers(&transform_options, target.module_kind, program.checker());
        let mut writer = PureClassWriter::new(FsWriter::new());
        let mut diagnostics = program.pre_emit_diagnostics();
        let emit = program.emit(&mut writer, &mut transformers);
        diagnostics.extend(emit.diagnostics);
        let reported = filter_diagnostics(diagnostics, &transform_options);

        let mut outcome = TargetOutcome::new(target, TargetStatus::Succeeded);
        outcome.diagnostics = reported;
        outcome.emitted_files = emit.emitted_files;

        if emit.emit_skipped && !command_line.options.no_emit {
            warn!(diagnostics = outcome.diagnostics.len(), "emit skipped");
            outcome.status = TargetStatus::Failed(BuildError::EmitSkipped {
                target: target.name.clone(),
            });
            return outcome;
        }

        if self.copy_external_api
            && let Err(err) = self.copy_external_api_declarations(target)
        {
            outcome.status = TargetStatus::Failed(err);
            return outcome;
        }

        info!(
            files = outcome.emitted_files.len(),
            diagnostics = outcome.diagnostics.len(),
            "compiled target"
        );
        outcome
    }

    /// The target's tsconfig, looked up from its directory upwards.
    fn locate_config(&self, target: &CompilationTarget) -> Option<PathBuf> {
        let expected = self.root.join(&target.config_path);
        let file_name = expected.file_name()?.to_str()?;
        let start_dir = expected.parent().unwrap_or(&self.root);
        let found = find_config_file(start_dir, file_name)?;
        if found != expected {
            debug!(config = %found.display(), "using tsconfig from an ancestor directory");
        }
        Some(found)
    }

    /// tsconfig options with `module` and `outDir` taken from the target.
    pub(crate) fn command_line(
        &self,
        config_path: &Path,
        target: &CompilationTarget,
    ) -> Result<ParsedCommandLine, BuildError> {
        let mut command_line = parse_command_line(config_path).map_err(BuildError::Config)?;
        let out_dir = self.root.join(&target.output_directory);
        let options = &mut command_line.options;
        options.module = target.module_kind;
        options.out_dir = Some(out_dir.clone());
        options.code_extension = target
            .transform_options
            .module_suffix
            .extension(target.module_kind)
            .unwrap_or(".js");
        // Earlier output under the new outDir must not be compiled.
        command_line
            .file_names
            .retain(|file| !file.starts_with(&out_dir));
        debug!(
            module = %target.module_kind,
            out_dir = %out_dir.display(),
            files = command_line.file_names.len(),
            "resolved target command line"
        );
        Ok(command_line)
    }

    /// Target options with the runtime helper path made absolute.
    pub(crate) fn transform_options(&self, target: &CompilationTarget) -> TransformOptions {
        let mut options = target.transform_options.clone();
        if let Some(local) = &options.runtime_helper_local_path
            && local.is_relative()
        {
            options.runtime_helper_local_path = Some(self.root.join(local));
        }
        options
    }

    fn copy_external_api_declarations(&self, target: &CompilationTarget) -> Result<(), BuildError> {
        let Some(dir) = &self.external_api_declaration_dir else {
            return Ok(());
        };
        let source = self.root.join(dir);
        if !source.is_dir() {
            return Ok(());
        }
        let Some(name) = source.file_name() else {
            return Ok(());
        };
        let destination = self.root.join(&target.output_directory).join(name);
        copy_dir(&source, &destination)?;
        debug!(
            from = %source.display(),
            to = %destination.display(),
            "copied external API declarations"
        );
        Ok(())
    }
}

/// Drop diagnostics whose code the target ignores.
pub fn filter_diagnostics(
    diagnostics: Vec<Diagnostic>,
    options: &TransformOptions,
) -> Vec<Diagnostic> {
    diagnostics
        .into_iter()
        .filter(|diagnostic| !options.is_ignored(diagnostic.code))
        .collect()
}

fn copy_dir(source: &Path, destination: &Path) -> Result<(), BuildError> {
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(source).to_path_buf();
            BuildError::io(path, err.into())
        })?;
        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let target = destination.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|err| BuildError::io(&target, err))?;
        } else {
            std::fs::copy(entry.path(), &target).map_err(|err| BuildError::io(&target, err))?;
        }
    }
    Ok(())
}
