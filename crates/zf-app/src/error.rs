//! Error types for the zf-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// provides a unified error interface for frontends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Installation error: {0}")]
    Project(String),

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Installation validation failed: {0}")]
    Validation(String),

    #[error("Zone not found: {0}")]
    ZoneNotFound(String),

    #[error("Runtime compilation failed: {0}")]
    Compile(String),

    #[error("Control error: {0}")]
    Control(String),

    #[error("Replay log error: {0}")]
    Replay(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for zf-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<zf_project::ProjectError> for AppError {
    fn from(err: zf_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<zf_controls::ControlError> for AppError {
    fn from(err: zf_controls::ControlError) -> Self {
        AppError::Control(err.to_string())
    }
}
