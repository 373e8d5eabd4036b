//! Installation loading, validation and introspection.

use std::path::Path;

use zf_project::InstallationDef;

use crate::error::{AppError, AppResult};

/// Summary of a zone for listing.
#[derive(Debug, Clone)]
pub struct ZoneSummary {
    pub id: String,
    pub name: String,
    pub cover_entity_id: String,
    pub sensor_entity_id: String,
}

/// Load an installation file (YAML or JSON, by extension) and validate it.
pub fn load_installation(path: &Path) -> AppResult<InstallationDef> {
    if !path.exists() {
        return Err(AppError::FileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        });
    }
    Ok(zf_project::load(path)?)
}

/// Validate installation structure.
pub fn validate_installation(installation: &InstallationDef) -> AppResult<()> {
    zf_project::validate_installation(installation)
        .map_err(|e| AppError::Validation(e.to_string()))
}

/// List zones in configuration order.
pub fn list_zones(installation: &InstallationDef) -> Vec<ZoneSummary> {
    installation
        .zones
        .iter()
        .map(|z| ZoneSummary {
            id: z.id.clone(),
            name: z.display_name(),
            cover_entity_id: z.cover_entity_id.clone(),
            sensor_entity_id: z.sensor_entity_id.clone(),
        })
        .collect()
}
