//! Restore-state file: last requested mode and target per zone.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ProjectResult;
use crate::schema::ZoneModeDef;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ZoneSnapshotFile {
    #[serde(default)]
    pub zones: Vec<ZoneSnapshotDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZoneSnapshotDef {
    /// Zone id as used in the installation file.
    pub zone: String,
    pub mode: ZoneModeDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_temperature: Option<f64>,
}

impl ZoneSnapshotFile {
    pub fn get(&self, zone: &str) -> Option<&ZoneSnapshotDef> {
        self.zones.iter().find(|z| z.zone == zone)
    }
}

/// Load a snapshot file. A missing file is an empty snapshot.
pub fn load_snapshot(path: &Path) -> ProjectResult<ZoneSnapshotFile> {
    if !path.exists() {
        return Ok(ZoneSnapshotFile::default());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_snapshot(path: &Path, snapshot: &ZoneSnapshotFile) -> ProjectResult<()> {
    let content = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, content)?;
    Ok(())
}
