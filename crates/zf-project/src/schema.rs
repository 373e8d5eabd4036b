//! Installation schema definitions.

use serde::{Deserialize, Serialize};

fn default_version() -> u32 {
    crate::validate::LATEST_VERSION
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstallationDef {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub name: String,
    pub thermostat: ThermostatDef,
    #[serde(default)]
    pub law: LawDef,
    #[serde(default)]
    pub zones: Vec<ZoneDef>,
}

/// The thermostat shared by every zone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThermostatDef {
    pub entity_id: String,
    pub min_temp: f64,
    pub max_temp: f64,
    pub target_temp_step: f64,
}

fn default_horizon_s() -> f64 {
    120.0
}

fn default_gain() -> f64 {
    5.0
}

/// Damper law tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LawDef {
    #[serde(default = "default_horizon_s")]
    pub horizon_s: f64,
    #[serde(default = "default_gain")]
    pub gain: f64,
}

impl Default for LawDef {
    fn default() -> Self {
        Self {
            horizon_s: default_horizon_s(),
            gain: default_gain(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZoneDef {
    /// Stable identifier, usually the area id.
    pub id: String,
    /// Human-readable area name.
    pub area: String,
    pub cover_entity_id: String,
    pub sensor_entity_id: String,
}

impl ZoneDef {
    /// Display name of the zone's controller.
    pub fn display_name(&self) -> String {
        format!("{} Climate Control", self.area)
    }
}

/// Zone mode as stored in configuration and restore files.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ZoneModeDef {
    #[default]
    Off,
    Auto,
}
