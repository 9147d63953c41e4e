use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DtsError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8", path.display())]
    NonUtf8 { path: PathBuf },

    #[error(
        "unknown declaration format '{0}': expected one of global-umd, commonjs-namespace, plain-global"
    )]
    InvalidFormat(String),
}

impl DtsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DtsError::Io {
            path: path.into(),
            source,
        }
    }
}
