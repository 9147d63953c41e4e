//! External declaration bundling.

use futures::future::BoxFuture;
use std::path::Path;
use tracing::{debug, instrument, warn};

use crate::config::DeclarationBundleConfig;
use crate::error::BuildError;

/// Merges per-file declaration output into one declaration file.
pub trait DeclarationBundler: Send + Sync {
    fn bundle<'a>(
        &'a self,
        root: &'a Path,
        config: &'a DeclarationBundleConfig,
    ) -> BoxFuture<'a, Result<(), BuildError>>;
}

/// Runs a bundler program in the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBundler {
    program: String,
    args: Vec<String>,
}

impl CommandBundler {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        CommandBundler {
            program: program.into(),
            args,
        }
    }

    /// `None` for an empty command.
    pub fn from_config(config: &DeclarationBundleConfig) -> Option<Self> {
        let (program, args) = config.command.split_first()?;
        Some(CommandBundler::new(program.clone(), args.to_vec()))
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl DeclarationBundler for CommandBundler {
    #[instrument(level = "info", skip_all, fields(command = %self.command_line()))]
    fn bundle<'a>(
        &'a self,
        root: &'a Path,
        _config: &'a DeclarationBundleConfig,
    ) -> BoxFuture<'a, Result<(), BuildError>> {
        Box::pin(async move {
            let output = tokio::process::Command::new(&self.program)
                .args(&self.args)
                .current_dir(root)
                .output()
                .await
                .map_err(|err| BuildError::io(&self.program, err))?;
            if output.status.success() {
                debug!("declaration bundler finished");
                return Ok(());
            }
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, stderr = %stderr.trim(), "declaration bundler failed");
            Err(BuildError::ExternalTool {
                command: self.command_line(),
                code: output.status.code(),
            })
        })
    }
}
