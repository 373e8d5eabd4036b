//! zf-project: installation file format, validation and restore-state files.

pub mod schema;
pub mod snapshot;
pub mod validate;

pub use schema::*;
pub use snapshot::{ZoneSnapshotDef, ZoneSnapshotFile, load_snapshot, save_snapshot};
pub use validate::{LATEST_VERSION, ValidationError, validate_installation};

use std::path::Path;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported file extension: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ProjectResult<InstallationDef> {
    let content = std::fs::read_to_string(path)?;
    let installation: InstallationDef = serde_yaml::from_str(&content)?;
    validate_installation(&installation)?;
    Ok(installation)
}

pub fn save_yaml(path: &Path, installation: &InstallationDef) -> ProjectResult<()> {
    validate_installation(installation)?;
    let content = serde_yaml::to_string(installation)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<InstallationDef> {
    let content = std::fs::read_to_string(path)?;
    let installation: InstallationDef = serde_json::from_str(&content)?;
    validate_installation(&installation)?;
    Ok(installation)
}

pub fn save_json(path: &Path, installation: &InstallationDef) -> ProjectResult<()> {
    validate_installation(installation)?;
    let content = serde_json::to_string_pretty(installation)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load an installation, picking the format from the file extension.
pub fn load(path: &Path) -> ProjectResult<InstallationDef> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => load_yaml(path),
        Some("json") => load_json(path),
        other => Err(ProjectError::UnsupportedFormat(
            other.unwrap_or_default().to_string(),
        )),
    }
}
