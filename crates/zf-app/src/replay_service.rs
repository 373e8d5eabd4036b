//! Replay of recorded host events through the zone controllers.
//!
//! A replay log is a YAML list of steps: host entity updates as the host
//! published them, plus the mode and target commands a user issued.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use zf_controls::{DamperActuator, HostStateChange, ZoneEvent};
use zf_project::ZoneModeDef;

use crate::error::{AppError, AppResult};
use crate::runtime_compile::{ZoneRuntime, zone_mode};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayLog {
    #[serde(default)]
    pub steps: Vec<ReplayStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplayStep {
    /// Entity update published by the host.
    StateChanged(HostStateChange),
    /// Zone mode command, optionally with a new target.
    SetHvacMode {
        zone: String,
        mode: ZoneModeDef,
        #[serde(default)]
        target_temperature: Option<f64>,
    },
    /// Target temperature command.
    SetTemperature {
        zone: String,
        target_temperature: f64,
    },
}

/// A damper command issued during replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayCommand {
    /// Index of the step that caused the command.
    pub step: usize,
    pub zone: String,
    pub position: u8,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayReport {
    pub steps: usize,
    pub commands: Vec<ReplayCommand>,
}

/// Load a replay log from YAML.
pub fn load_replay(path: &Path) -> AppResult<ReplayLog> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_yaml::from_str(&content)
        .map_err(|e| AppError::Replay(format!("Failed to parse replay log: {}", e)))
}

/// Feed every step to the runtime in order.
///
/// Commands go to `actuator` as they are produced and are also collected in
/// the report.
pub fn run_replay(
    runtime: &mut ZoneRuntime,
    log: &ReplayLog,
    actuator: &mut dyn DamperActuator,
) -> AppResult<ReplayReport> {
    let mut report = ReplayReport::default();

    for (step, entry) in log.steps.iter().enumerate() {
        let commands = match entry {
            ReplayStep::StateChanged(change) => {
                runtime.router.on_host_state_change(change, actuator)?
            }
            ReplayStep::SetHvacMode {
                zone,
                mode,
                target_temperature,
            } => {
                let id = runtime.zone_id(zone)?;
                let event = ZoneEvent::ModeChanged {
                    mode: zone_mode(*mode),
                    target_temperature: *target_temperature,
                };
                runtime.router.dispatch(id, event, actuator)?.into_iter().collect()
            }
            ReplayStep::SetTemperature {
                zone,
                target_temperature,
            } => {
                let id = runtime.zone_id(zone)?;
                let event = ZoneEvent::TargetTemperatureSet {
                    target_temperature: *target_temperature,
                };
                runtime.router.dispatch(id, event, actuator)?.into_iter().collect()
            }
        };

        for command in commands {
            let zone = runtime
                .zone_key(command.zone_id)
                .unwrap_or_default()
                .to_string();
            debug!(step, zone = %zone, position = command.position, "replay command");
            report.commands.push(ReplayCommand {
                step,
                zone,
                position: command.position,
            });
        }
        report.steps += 1;
    }

    Ok(report)
}
