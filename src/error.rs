use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a whole phase, plus the translation failure that
/// the builder downgrades to a per-entry record.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to read directory {path:?}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("translation failed: {0}")]
    Translation(String),

    #[error("mapping file {path:?}: {message}")]
    Persistence { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ConvertError {
    pub fn persistence(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        ConvertError::Persistence {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
