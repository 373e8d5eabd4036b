//! Per-zone tracked observations.
//!
//! [`ZoneControlState`] holds the most recent thermostat, damper and sensor
//! observations for one zone. Each `on_*` operation touches only the fields it
//! owns and leaves state untouched when it returns an error. The one exception
//! is an unrecognized thermostat report, which suspends the resolved
//! direction until the thermostat reports heating or cooling again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zf_core::{PERCENT_MAX, PERCENT_MIN, Time, round_percent, s};

use crate::error::{ControlError, ControlResult};
use crate::law::DamperCommand;
use crate::limits::ZoneLimits;
use crate::mode::{HvacDirection, ZoneMode};

/// Damper position as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionReport {
    /// Percentage open, 0 = fully closed.
    Percent(f64),
    Open,
    Closed,
    Unknown,
}

impl PositionReport {
    /// Interpret a cover entity's state string and optional position attribute.
    ///
    /// A numeric position wins over the state string. Transitional states
    /// (`opening`, `closing`) without a position are `Unknown`.
    pub fn from_host(state: &str, current_position: Option<f64>) -> Self {
        if let Some(position) = current_position {
            return Self::Percent(position);
        }
        match state {
            "open" => Self::Open,
            "closed" => Self::Closed,
            _ => Self::Unknown,
        }
    }
}

/// Latest observations for one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneControlState {
    /// Requested zone mode.
    pub mode: ZoneMode,
    /// Direction resolved from the thermostat's last heating/cooling report.
    pub resolved_direction: Option<HvacDirection>,
    /// Set while the thermostat's latest report is neither heating nor cooling.
    #[serde(default)]
    pub direction_suspended: bool,
    /// Target temperature, already constrained to the zone limits.
    pub target_temperature: Option<f64>,
    pub current_temperature: Option<f64>,
    pub previous_temperature: Option<f64>,
    pub sample_timestamp: Option<DateTime<Utc>>,
    pub previous_sample_timestamp: Option<DateTime<Utc>>,
    /// Last known or commanded damper position, in `[0, 100]`.
    pub damper_position: u8,
    /// Sample timestamp that produced the last command. Cleared when the
    /// target or the direction changes.
    pub evaluated_sample: Option<DateTime<Utc>>,
}

impl Default for ZoneControlState {
    fn default() -> Self {
        Self {
            mode: ZoneMode::Off,
            resolved_direction: None,
            direction_suspended: false,
            target_temperature: None,
            current_temperature: None,
            previous_temperature: None,
            sample_timestamp: None,
            previous_sample_timestamp: None,
            damper_position: PERCENT_MAX,
            evaluated_sample: None,
        }
    }
}

impl ZoneControlState {
    /// Create the state of a freshly configured zone.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a requested zone mode and, when given, a new target.
    ///
    /// The target is clamped to `limits`. An invalid target rejects the
    /// whole update.
    pub fn on_mode_changed(
        &mut self,
        mode: ZoneMode,
        target_temperature: Option<f64>,
        limits: &ZoneLimits,
    ) -> ControlResult<()> {
        let target = target_temperature
            .map(|t| limits.constrain(t))
            .transpose()?;
        self.mode = mode;
        if let Some(target) = target {
            self.set_target(target);
        }
        Ok(())
    }

    /// Apply a new target temperature, clamped to `limits`.
    pub fn on_target_set(&mut self, target_temperature: f64, limits: &ZoneLimits) -> ControlResult<()> {
        let target = limits.constrain(target_temperature)?;
        self.set_target(target);
        Ok(())
    }

    /// Resolve the HVAC direction from the thermostat's operating mode.
    ///
    /// An unrecognized mode keeps the last resolved direction but suspends it,
    /// so [`active_direction`](Self::active_direction) is `None` until the
    /// next heating or cooling report.
    pub fn on_thermostat_changed(&mut self, operating_mode: &str) -> ControlResult<HvacDirection> {
        let direction = match HvacDirection::from_operating_mode(operating_mode) {
            Ok(direction) => direction,
            Err(err) => {
                self.direction_suspended = true;
                return Err(err);
            }
        };
        if self.resolved_direction != Some(direction) {
            self.evaluated_sample = None;
        }
        self.resolved_direction = Some(direction);
        self.direction_suspended = false;
        Ok(direction)
    }

    /// Direction the control law should act on, if any.
    pub fn active_direction(&self) -> Option<HvacDirection> {
        self.resolved_direction.filter(|_| !self.direction_suspended)
    }

    /// Record the damper position reported by the host.
    ///
    /// Returns the stored position, or `None` when the report was `Unknown`.
    pub fn on_damper_position_changed(&mut self, report: PositionReport) -> ControlResult<Option<u8>> {
        let position = match report {
            PositionReport::Percent(p) if p.is_finite() => round_percent(p),
            PositionReport::Percent(p) => {
                return Err(ControlError::UnparsableSample {
                    what: "damper position",
                    raw: p.to_string(),
                });
            }
            PositionReport::Open => PERCENT_MAX,
            PositionReport::Closed => PERCENT_MIN,
            PositionReport::Unknown => return Ok(None),
        };
        self.damper_position = position;
        Ok(Some(position))
    }

    /// Accept a temperature sample, shifting the current sample to previous.
    ///
    /// Rejects non-numeric or non-finite values and timestamps that are not
    /// strictly after the current sample. Rejected samples leave state as is.
    pub fn on_temperature_sample(&mut self, raw: &str, timestamp: DateTime<Utc>) -> ControlResult<f64> {
        let value = parse_temperature(raw)?;
        if let Some(current) = self.sample_timestamp {
            if timestamp <= current {
                return Err(ControlError::NonPositiveInterval {
                    previous: current,
                    current: timestamp,
                });
            }
        }

        self.previous_temperature = self.current_temperature;
        self.previous_sample_timestamp = self.sample_timestamp;
        self.current_temperature = Some(value);
        self.sample_timestamp = Some(timestamp);
        Ok(value)
    }

    /// Elapsed time between the previous and current sample.
    ///
    /// May be zero or negative for a hand-built state; the control law treats
    /// that as undefined.
    pub fn sample_interval(&self) -> Option<Time> {
        let (previous, current) = (self.previous_sample_timestamp?, self.sample_timestamp?);
        let delta = current - previous;
        let secs = match delta.num_microseconds() {
            Some(us) => us as f64 * 1e-6,
            None => delta.num_milliseconds() as f64 * 1e-3,
        };
        Some(s(secs))
    }

    /// Remember a command as the last known position and mark the current
    /// sample as consumed.
    pub fn record_command(&mut self, command: &DamperCommand) {
        self.damper_position = command.position;
        self.evaluated_sample = self.sample_timestamp;
    }

    fn set_target(&mut self, target: f64) {
        if self.target_temperature != Some(target) {
            self.evaluated_sample = None;
        }
        self.target_temperature = Some(target);
    }
}

fn parse_temperature(raw: &str) -> ControlResult<f64> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ControlError::UnparsableSample {
            what: "temperature",
            raw: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use zf_core::seconds;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn new_zone_starts_off_and_open() {
        let state = ZoneControlState::new();
        assert_eq!(state.mode, ZoneMode::Off);
        assert_eq!(state.damper_position, 100);
        assert!(state.resolved_direction.is_none());
    }

    #[test]
    fn sample_shifts_current_to_previous() {
        let mut state = ZoneControlState::new();
        state.on_temperature_sample("24.5", at(0)).unwrap();
        assert_eq!(state.current_temperature, Some(24.5));
        assert!(state.previous_temperature.is_none());

        state.on_temperature_sample("24.0", at(60)).unwrap();
        assert_eq!(state.previous_temperature, Some(24.5));
        assert_eq!(state.current_temperature, Some(24.0));
        assert_eq!(state.previous_sample_timestamp, Some(at(0)));
        assert_eq!(state.sample_timestamp, Some(at(60)));
        assert_eq!(seconds(state.sample_interval().unwrap()), 60.0);
    }

    #[test]
    fn unparsable_sample_keeps_previous_pair() {
        let mut state = ZoneControlState::new();
        state.on_temperature_sample("21.0", at(0)).unwrap();
        state.on_temperature_sample("21.5", at(30)).unwrap();
        let before = state.clone();

        for raw in ["unknown", "unavailable", "", "NaN", "inf", "21,5"] {
            let err = state.on_temperature_sample(raw, at(90)).unwrap_err();
            assert!(matches!(err, ControlError::UnparsableSample { .. }), "{raw}");
        }
        assert_eq!(state, before);
    }

    #[test]
    fn out_of_order_sample_is_rejected_without_change() {
        let mut state = ZoneControlState::new();
        state.on_temperature_sample("21.0", at(0)).unwrap();
        state.on_temperature_sample("21.5", at(30)).unwrap();
        let before = state.clone();

        let dup = state.on_temperature_sample("22.0", at(30)).unwrap_err();
        assert!(matches!(dup, ControlError::NonPositiveInterval { .. }));
        let older = state.on_temperature_sample("22.0", at(10)).unwrap_err();
        assert!(matches!(older, ControlError::NonPositiveInterval { .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn damper_reports_normalize() {
        let mut state = ZoneControlState::new();
        assert_eq!(
            state.on_damper_position_changed(PositionReport::Closed).unwrap(),
            Some(0)
        );
        assert_eq!(
            state.on_damper_position_changed(PositionReport::Open).unwrap(),
            Some(100)
        );
        assert_eq!(
            state
                .on_damper_position_changed(PositionReport::Percent(42.4))
                .unwrap(),
            Some(42)
        );
        assert_eq!(
            state.on_damper_position_changed(PositionReport::Unknown).unwrap(),
            None
        );
        assert_eq!(state.damper_position, 42);

        assert!(
            state
                .on_damper_position_changed(PositionReport::Percent(f64::NAN))
                .is_err()
        );
        assert_eq!(state.damper_position, 42);
    }

    #[test]
    fn position_report_prefers_attribute() {
        assert_eq!(
            PositionReport::from_host("open", Some(35.0)),
            PositionReport::Percent(35.0)
        );
        assert_eq!(PositionReport::from_host("closed", None), PositionReport::Closed);
        assert_eq!(PositionReport::from_host("opening", None), PositionReport::Unknown);
    }

    #[test]
    fn unrecognized_thermostat_mode_suspends_direction() {
        let mut state = ZoneControlState::new();
        state.on_thermostat_changed("heat").unwrap();
        assert!(state.on_thermostat_changed("fan_only").is_err());
        assert_eq!(state.resolved_direction, Some(HvacDirection::Heating));
        assert_eq!(state.active_direction(), None);

        state.on_thermostat_changed("cool").unwrap();
        assert_eq!(state.active_direction(), Some(HvacDirection::Cooling));
        assert!(!state.direction_suspended);
    }

    #[test]
    fn new_target_or_direction_clears_evaluated_sample() {
        let limits = ZoneLimits::default();
        let mut state = ZoneControlState::new();
        state.on_thermostat_changed("cool").unwrap();
        state.on_target_set(22.0, &limits).unwrap();
        state.on_temperature_sample("24.0", at(0)).unwrap();
        state.record_command(&DamperCommand { position: 55 });

        // same target, same direction: still consumed
        state.on_mode_changed(ZoneMode::Auto, Some(22.0), &limits).unwrap();
        state.on_thermostat_changed("cooling").unwrap();
        assert_eq!(state.evaluated_sample, Some(at(0)));

        state.on_target_set(18.0, &limits).unwrap();
        assert_eq!(state.evaluated_sample, None);

        state.record_command(&DamperCommand { position: 80 });
        state.on_thermostat_changed("heat").unwrap();
        assert_eq!(state.evaluated_sample, None);
    }

    #[test]
    fn mode_change_clamps_target() {
        let limits = ZoneLimits::new(16.0, 30.0, 0.5).unwrap();
        let mut state = ZoneControlState::new();
        state
            .on_mode_changed(ZoneMode::Auto, Some(40.0), &limits)
            .unwrap();
        assert_eq!(state.mode, ZoneMode::Auto);
        assert_eq!(state.target_temperature, Some(30.0));

        // no target keeps the old one
        state.on_mode_changed(ZoneMode::Off, None, &limits).unwrap();
        assert_eq!(state.target_temperature, Some(30.0));

        // invalid target rejects the mode too
        assert!(
            state
                .on_mode_changed(ZoneMode::Auto, Some(f64::NAN), &limits)
                .is_err()
        );
        assert_eq!(state.mode, ZoneMode::Off);
    }

    #[test]
    fn record_command_marks_sample() {
        let mut state = ZoneControlState::new();
        state.on_temperature_sample("21.0", at(0)).unwrap();
        state.record_command(&DamperCommand { position: 60 });
        assert_eq!(state.damper_position, 60);
        assert_eq!(state.evaluated_sample, Some(at(0)));
    }
}
