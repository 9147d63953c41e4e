use std::path::PathBuf;
use thiserror::Error;
use tsdist_dts::DtsError;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("TSConfig not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("invalid configuration: {0:#}")]
    Config(anyhow::Error),

    #[error("emit skipped for target '{target}'")]
    EmitSkipped { target: String },

    #[error("`{command}` failed with {}", exit_status_text(*code))]
    ExternalTool { command: String, code: Option<i32> },

    #[error(transparent)]
    Dts(#[from] DtsError),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("front end failed: {0:#}")]
    FrontEnd(anyhow::Error),

    #[error("file watcher failed: {0}")]
    Watch(#[from] notify::Error),
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }
}

fn exit_status_text(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
