//! Inbound zone events and outbound damper commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zf_core::ZoneId;

use crate::mode::ZoneMode;
use crate::state::PositionReport;

/// Typed event routed to a single zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ZoneEvent {
    /// Requested zone mode, optionally with a new target.
    ModeChanged {
        mode: ZoneMode,
        target_temperature: Option<f64>,
    },
    /// New target temperature without a mode change.
    TargetTemperatureSet { target_temperature: f64 },
    /// Operating mode reported by the shared thermostat.
    ThermostatChanged { operating_mode: String },
    /// Position reported by the zone's damper.
    DamperPositionChanged { position: PositionReport },
    /// Raw reading from the zone's temperature sensor.
    TemperatureSampleChanged {
        value: String,
        timestamp: DateTime<Utc>,
    },
}

/// Fire-and-forget request to move a damper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SetDamperPosition {
    pub zone_id: ZoneId,
    /// Target position in `[0, 100]`.
    pub position: u8,
}

/// Mode and target recovered from the host's state restoration.
///
/// Applied like [`ZoneEvent::ModeChanged`] but never triggers an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RestoredZone {
    pub mode: ZoneMode,
    pub target_temperature: Option<f64>,
}
