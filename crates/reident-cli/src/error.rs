//! Error types for reident-cli

use reident::ReidentError;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Result type alias for CLI operations
pub(crate) type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Dataset file is readable but not usable
    #[error("Invalid dataset: {0}")]
    InvalidData(String),

    /// CSV parse or write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Library error
    #[error("{0}")]
    Reident(#[from] ReidentError),
}

impl CliError {
    /// Numeric process status for this error
    pub(crate) fn code(&self) -> u8 {
        match self {
            Self::FileNotFound(_) => 3,
            Self::InvalidData(_) | Self::Csv(_) => 4,
            Self::Reident(
                ReidentError::InvalidHyperparameter { .. }
                | ReidentError::EmptySweepRange { .. }
                | ReidentError::InsufficientPopulation { .. },
            ) => 5,
            Self::Reident(ReidentError::Io(_)) | Self::Io(_) => 7,
            Self::Reident(_) | Self::Json(_) => 1,
        }
    }

    /// Get exit code for this error
    pub(crate) fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }
}
