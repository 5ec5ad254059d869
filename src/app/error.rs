use std::path::PathBuf;
use thiserror::Error;

/// Failures of a single generation run.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{} is not a directory.", .0.display())]
    NotADirectory(PathBuf),

    /// Filesystem fault while walking; the run is aborted.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to get current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

impl GenerateError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerateError::Io {
            path: path.into(),
            source,
        }
    }
}
