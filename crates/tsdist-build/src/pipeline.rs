//! Full build: compile every target, then bundle and format declarations.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use tsdist_dts::{DeclarationWrapper, WrapTransaction};

use crate::bundler::DeclarationBundler;
use crate::config::{BuildConfig, DeclarationBundleConfig};
use crate::error::BuildError;
use crate::host::FrontEnd;
use crate::orchestrator::{CompileOrchestrator, TargetOutcome, TargetStatus};
use crate::reporter::Reporter;

#[derive(Debug)]
pub struct BuildReport {
    pub outcomes: Vec<TargetOutcome>,
    /// Merged declaration file, when bundling ran.
    pub declarations: Option<Result<PathBuf, BuildError>>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        !self.outcomes.iter().any(TargetOutcome::is_failure)
            && !matches!(self.declarations, Some(Err(_)))
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }

    /// Diagnostics and failures of every step, one entry per line.
    pub fn render(&self, reporter: &mut Reporter) -> String {
        let mut lines = Vec::new();
        for outcome in &self.outcomes {
            if !outcome.diagnostics.is_empty() {
                lines.push(reporter.render(&outcome.diagnostics));
            }
            match &outcome.status {
                TargetStatus::Succeeded => {}
                TargetStatus::Failed(err) => lines.push(format!("[{}] {err}", outcome.target)),
                TargetStatus::Skipped(reason) => {
                    lines.push(format!("[{}] skipped: {reason}", outcome.target));
                }
            }
        }
        if let Some(Err(err)) = &self.declarations {
            lines.push(format!("[declarations] {err}"));
        }
        lines.join("\n")
    }
}

/// Compile every configured target, then bundle declarations when the
/// modern target succeeded.
#[instrument(level = "info", skip_all, fields(root = %config.root.display()))]
pub async fn build(
    config: &BuildConfig,
    front_end: Arc<dyn FrontEnd>,
    bundler: &dyn DeclarationBundler,
) -> BuildReport {
    let orchestrator = Arc::new(CompileOrchestrator::from_config(config, front_end));
    let outcomes = orchestrator.run(&config.targets).await;

    let declarations = match &config.declaration_bundle {
        Some(bundle) if modern_target_succeeded(config, &outcomes) => {
            Some(bundle_declarations(config, bundle, bundler).await)
        }
        Some(_) => {
            info!("modern target did not succeed, skipping declaration bundling");
            None
        }
        None => None,
    };

    let report = BuildReport {
        outcomes,
        declarations,
    };
    info!(exit_code = report.exit_code(), "build finished");
    report
}

fn modern_target_succeeded(config: &BuildConfig, outcomes: &[TargetOutcome]) -> bool {
    let Some(modern) = config.modern_target() else {
        return false;
    };
    outcomes
        .iter()
        .any(|outcome| outcome.target == modern.name && outcome.is_success())
}

/// Wrap (optionally), bundle, revert, then rewrite the merged file into
/// the configured format.
async fn bundle_declarations(
    config: &BuildConfig,
    bundle: &DeclarationBundleConfig,
    bundler: &dyn DeclarationBundler,
) -> Result<PathBuf, BuildError> {
    let transaction = if bundle.namespace_wrapper {
        let plan = DeclarationWrapper::scan(&config.root.join(&bundle.input_dir))?;
        Some(plan.apply()?)
    } else {
        None
    };

    let bundled = bundler.bundle(&config.root, bundle).await;
    if let Some(transaction) = transaction {
        revert(transaction, bundled.is_ok())?;
    }
    bundled?;

    let output = config.declaration_output_path(bundle);
    tsdist_dts::resolve(&output, &config.library_name(), bundle.format)?;
    info!(output = %output.display(), format = %bundle.format, "declarations ready");
    Ok(output)
}

/// A revert failure is only surfaced when bundling itself went through;
/// otherwise the bundler's error wins.
fn revert(transaction: WrapTransaction, bundled: bool) -> Result<(), BuildError> {
    match transaction.revert() {
        Ok(()) => Ok(()),
        Err(err) if bundled => Err(err.into()),
        Err(err) => {
            warn!(error = %err, "failed to revert wrapped declarations");
            Ok(())
        }
    }
}
