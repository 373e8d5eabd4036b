//! Single-zone controller.

use tracing::{debug, info, warn};
use zf_core::ZoneId;

use crate::error::ControlResult;
use crate::event::{RestoredZone, SetDamperPosition, ZoneEvent};
use crate::law::{DamperLaw, HoldReason, Outcome};
use crate::limits::ZoneLimits;
use crate::mode::ZoneMode;
use crate::state::ZoneControlState;

/// Owns one zone's state and runs the damper law against it.
///
/// Zone lifecycle:
///
/// - `Off -> Auto` on a mode command evaluates once immediately
/// - `Auto -> Off` stops evaluation without moving the damper
/// - in `Auto`, every accepted temperature sample evaluates once
#[derive(Debug, Clone)]
pub struct ZoneController {
    id: ZoneId,
    name: String,
    limits: ZoneLimits,
    law: DamperLaw,
    state: ZoneControlState,
}

impl ZoneController {
    pub fn new(id: ZoneId, name: impl Into<String>, limits: ZoneLimits, law: DamperLaw) -> Self {
        Self {
            id,
            name: name.into(),
            limits,
            law,
            state: ZoneControlState::new(),
        }
    }

    pub fn id(&self) -> ZoneId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn limits(&self) -> &ZoneLimits {
        &self.limits
    }

    pub fn law(&self) -> &DamperLaw {
        &self.law
    }

    pub fn state(&self) -> &ZoneControlState {
        &self.state
    }

    /// Apply one event, returning the command it produced, if any.
    ///
    /// Errors describe a dropped event; state is unchanged in that case.
    pub fn handle(&mut self, event: ZoneEvent) -> ControlResult<Option<SetDamperPosition>> {
        match event {
            ZoneEvent::ModeChanged {
                mode,
                target_temperature,
            } => {
                let was = self.state.mode;
                self.state
                    .on_mode_changed(mode, target_temperature, &self.limits)?;
                if was != mode {
                    info!(zone = %self.name, from = %was, to = %mode, "zone mode changed");
                }
                if was == ZoneMode::Off && mode == ZoneMode::Auto {
                    return Ok(self.evaluate_now());
                }
                Ok(None)
            }
            ZoneEvent::TargetTemperatureSet { target_temperature } => {
                self.state.on_target_set(target_temperature, &self.limits)?;
                debug!(zone = %self.name, target = ?self.state.target_temperature, "target set");
                Ok(None)
            }
            ZoneEvent::ThermostatChanged { operating_mode } => {
                let direction = self.state.on_thermostat_changed(&operating_mode)?;
                debug!(zone = %self.name, %direction, "thermostat direction resolved");
                Ok(None)
            }
            ZoneEvent::DamperPositionChanged { position } => {
                if let Some(p) = self.state.on_damper_position_changed(position)? {
                    debug!(zone = %self.name, position = p, "damper position reported");
                }
                Ok(None)
            }
            ZoneEvent::TemperatureSampleChanged { value, timestamp } => {
                let t = self.state.on_temperature_sample(&value, timestamp)?;
                debug!(zone = %self.name, temperature = t, %timestamp, "sample accepted");
                Ok(self.evaluate_now())
            }
        }
    }

    /// Apply a restored mode and target without evaluating.
    pub fn restore(&mut self, restored: &RestoredZone) -> ControlResult<()> {
        self.state
            .on_mode_changed(restored.mode, restored.target_temperature, &self.limits)?;
        info!(
            zone = %self.name,
            mode = %restored.mode,
            target = ?self.state.target_temperature,
            "zone state restored"
        );
        Ok(())
    }

    /// Run the law once against the current snapshot.
    ///
    /// An emitted command is recorded as the last known position and consumes
    /// the current sample.
    pub fn evaluate_now(&mut self) -> Option<SetDamperPosition> {
        match self.law.assess(&self.state) {
            Outcome::Command(cmd, eval) => {
                self.state.record_command(&cmd);
                info!(
                    zone = %self.name,
                    position = cmd.position,
                    rate = eval.rate_of_change,
                    drift = eval.projected_drift,
                    required = eval.required_change,
                    action = eval.action,
                    "damper command"
                );
                Some(SetDamperPosition {
                    zone_id: self.id,
                    position: cmd.position,
                })
            }
            Outcome::Hold(HoldReason::NoDirection) => {
                warn!(zone = %self.name, "no heating/cooling direction from thermostat, skipping");
                None
            }
            Outcome::Hold(HoldReason::Unchanged(eval)) => {
                debug!(
                    zone = %self.name,
                    position = eval.position,
                    action = eval.action,
                    "damper already at computed position"
                );
                None
            }
            Outcome::Hold(reason) => {
                debug!(zone = %self.name, ?reason, "evaluation skipped");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ControlError;
    use crate::state::PositionReport;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn sample(value: &str, secs: i64) -> ZoneEvent {
        ZoneEvent::TemperatureSampleChanged {
            value: value.to_string(),
            timestamp: at(secs),
        }
    }

    fn cooling_zone() -> ZoneController {
        let mut zone = ZoneController::new(
            ZoneId::from_index(0),
            "Bedroom Climate Control",
            ZoneLimits::default(),
            DamperLaw::default(),
        );
        zone.handle(ZoneEvent::ThermostatChanged {
            operating_mode: "cool".to_string(),
        })
        .unwrap();
        zone.handle(ZoneEvent::DamperPositionChanged {
            position: PositionReport::Percent(50.0),
        })
        .unwrap();
        zone
    }

    #[test]
    fn off_to_auto_evaluates_immediately() {
        let mut zone = cooling_zone();
        assert_eq!(zone.handle(sample("24.5", 0)).unwrap(), None);
        assert_eq!(zone.handle(sample("24.0", 60)).unwrap(), None);

        let cmd = zone
            .handle(ZoneEvent::ModeChanged {
                mode: ZoneMode::Auto,
                target_temperature: Some(22.0),
            })
            .unwrap();
        assert_eq!(
            cmd,
            Some(SetDamperPosition {
                zone_id: ZoneId::from_index(0),
                position: 55
            })
        );
    }

    #[test]
    fn auto_to_auto_does_not_evaluate() {
        let mut zone = cooling_zone();
        zone.handle(ZoneEvent::ModeChanged {
            mode: ZoneMode::Auto,
            target_temperature: Some(22.0),
        })
        .unwrap();
        zone.handle(sample("24.5", 0)).unwrap();
        zone.handle(sample("24.0", 60)).unwrap();
        let again = zone
            .handle(ZoneEvent::ModeChanged {
                mode: ZoneMode::Auto,
                target_temperature: Some(21.0),
            })
            .unwrap();
        assert_eq!(again, None);
        assert_eq!(zone.state().target_temperature, Some(21.0));
    }

    #[test]
    fn second_evaluation_on_same_sample_is_silent() {
        let mut zone = cooling_zone();
        zone.handle(ZoneEvent::ModeChanged {
            mode: ZoneMode::Auto,
            target_temperature: Some(22.0),
        })
        .unwrap();
        zone.handle(sample("24.5", 0)).unwrap();
        assert!(zone.handle(sample("24.0", 60)).unwrap().is_some());
        assert_eq!(zone.evaluate_now(), None);
        assert_eq!(zone.state().damper_position, 55);
    }

    #[test]
    fn thermostat_leaving_heat_cool_stops_commands() {
        let mut zone = cooling_zone();
        zone.handle(ZoneEvent::ModeChanged {
            mode: ZoneMode::Auto,
            target_temperature: Some(22.0),
        })
        .unwrap();

        let err = zone
            .handle(ZoneEvent::ThermostatChanged {
                operating_mode: "off".to_string(),
            })
            .unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(zone.handle(sample("24.5", 0)).unwrap(), None);
        assert_eq!(zone.handle(sample("24.0", 60)).unwrap(), None);
        assert_eq!(zone.state().damper_position, 50);

        zone.handle(ZoneEvent::ThermostatChanged {
            operating_mode: "cool".to_string(),
        })
        .unwrap();
        // 24.0 -> 23.0 over 60 s: drift -2 already overshoots the target by 1
        let cmd = zone.handle(sample("23.0", 120)).unwrap();
        assert_eq!(cmd.map(|c| c.position), Some(45));
    }

    #[test]
    fn off_to_auto_with_new_target_evaluates_same_sample() {
        let mut zone = cooling_zone();
        zone.handle(ZoneEvent::ModeChanged {
            mode: ZoneMode::Auto,
            target_temperature: Some(22.0),
        })
        .unwrap();
        zone.handle(sample("24.5", 0)).unwrap();
        assert_eq!(
            zone.handle(sample("24.0", 60)).unwrap().map(|c| c.position),
            Some(55)
        );

        let off = ZoneEvent::ModeChanged {
            mode: ZoneMode::Off,
            target_temperature: None,
        };
        zone.handle(off.clone()).unwrap();
        let unchanged = zone
            .handle(ZoneEvent::ModeChanged {
                mode: ZoneMode::Auto,
                target_temperature: Some(22.0),
            })
            .unwrap();
        assert_eq!(unchanged, None);

        zone.handle(off).unwrap();
        let cmd = zone
            .handle(ZoneEvent::ModeChanged {
                mode: ZoneMode::Auto,
                target_temperature: Some(18.0),
            })
            .unwrap();
        // required -6, drift -1, cooling: opens by 5 * 5
        assert_eq!(cmd.map(|c| c.position), Some(80));
    }

    #[test]
    fn restore_never_evaluates() {
        let mut zone = cooling_zone();
        zone.handle(sample("24.5", 0)).unwrap();
        zone.handle(sample("24.0", 60)).unwrap();
        zone.restore(&RestoredZone {
            mode: ZoneMode::Auto,
            target_temperature: Some(22.0),
        })
        .unwrap();
        assert_eq!(zone.state().mode, ZoneMode::Auto);
        assert_eq!(zone.state().damper_position, 50);

        // the next sample drives the law
        let cmd = zone.handle(sample("23.5", 120)).unwrap();
        assert!(cmd.is_some());
    }

    #[test]
    fn rejected_events_surface_errors() {
        let mut zone = cooling_zone();
        let err = zone
            .handle(ZoneEvent::ThermostatChanged {
                operating_mode: "dry".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, ControlError::UnrecognizedMode { .. }));
        assert!(err.is_recoverable());

        let err = zone.handle(sample("unknown", 0)).unwrap_err();
        assert!(matches!(err, ControlError::UnparsableSample { .. }));
    }
}
