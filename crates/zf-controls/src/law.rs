//! Predictive damper control law.
//!
//! A one-step-ahead predictive proportional law on irregularly spaced samples:
//!
//! ```text
//! rate     = (T_cur - T_prev) / dt
//! drift    = rate * horizon
//! required = T_target - T_cur
//! action   = (required - drift) * sign      sign = +1 heating, -1 cooling
//! position = clamp(round(P_last + action * gain), 0, 100)
//! ```
//!
//! Positive `action` always opens the damper further. There is no integral
//! term and no derivative smoothing; only the two most recent samples count.

use serde::{Deserialize, Serialize};
use zf_core::{Time, round_percent, s, seconds};

use crate::error::{ControlError, ControlResult};
use crate::mode::{HvacDirection, ZoneMode};
use crate::state::ZoneControlState;

/// Default look-ahead horizon in seconds.
pub const DEFAULT_HORIZON_S: f64 = 120.0;
/// Default damper percentage step per degree of residual.
pub const DEFAULT_GAIN: f64 = 5.0;

/// Requested damper position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DamperCommand {
    /// Target position in `[0, 100]`.
    pub position: u8,
}

/// Intermediate values of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Temperature slope (degrees per second).
    pub rate_of_change: f64,
    /// Expected change over the horizon without damper movement (degrees).
    pub projected_drift: f64,
    /// Degrees still needed to reach target.
    pub required_change: f64,
    pub direction: HvacDirection,
    /// Residual correction, positive means open further.
    pub action: f64,
    /// Unrounded, unclamped position.
    pub raw_position: f64,
    /// Position after rounding and clamping.
    pub position: u8,
}

/// Why an evaluation produced no command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum HoldReason {
    /// Zone mode is not `Auto`.
    Off,
    /// Fewer than two samples have been seen.
    FirstSample,
    /// Previous sample is not strictly before the current one.
    NonPositiveInterval { elapsed_s: f64 },
    /// Thermostat is not currently reporting heating or cooling.
    NoDirection,
    /// No target temperature has been set.
    NoTarget,
    /// The current sample already produced a command.
    AlreadyEvaluated,
    /// Arithmetic produced a non-finite position.
    NonFinite,
    /// Computed position equals the last known position.
    Unchanged(Evaluation),
}

/// Result of assessing a zone snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Command(DamperCommand, Evaluation),
    Hold(HoldReason),
}

impl Outcome {
    pub fn command(&self) -> Option<DamperCommand> {
        match self {
            Self::Command(cmd, _) => Some(*cmd),
            Self::Hold(_) => None,
        }
    }
}

/// Predictive proportional damper law configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamperLaw {
    /// How far ahead drift is extrapolated.
    pub horizon: Time,
    /// Damper percentage per degree of residual.
    pub gain: f64,
}

impl Default for DamperLaw {
    fn default() -> Self {
        Self {
            horizon: s(DEFAULT_HORIZON_S),
            gain: DEFAULT_GAIN,
        }
    }
}

impl DamperLaw {
    /// Create a new damper law.
    ///
    /// # Arguments
    ///
    /// * `horizon` - Look-ahead duration (must be positive)
    /// * `gain` - Position step per degree of residual (must be positive)
    pub fn new(horizon: Time, gain: f64) -> ControlResult<Self> {
        let horizon_s = seconds(horizon);
        if !(horizon_s > 0.0 && horizon_s.is_finite()) {
            return Err(ControlError::InvalidArg {
                what: "horizon must be positive",
            });
        }
        if !(gain > 0.0 && gain.is_finite()) {
            return Err(ControlError::InvalidArg {
                what: "gain must be positive",
            });
        }
        Ok(Self { horizon, gain })
    }

    /// Assess a snapshot, returning either a command with its breakdown or
    /// the reason for holding.
    pub fn assess(&self, state: &ZoneControlState) -> Outcome {
        if state.mode != ZoneMode::Auto {
            return Outcome::Hold(HoldReason::Off);
        }
        let (Some(previous), Some(current), Some(dt)) = (
            state.previous_temperature,
            state.current_temperature,
            state.sample_interval(),
        ) else {
            return Outcome::Hold(HoldReason::FirstSample);
        };
        let dt_s = seconds(dt);
        if dt_s <= 0.0 {
            return Outcome::Hold(HoldReason::NonPositiveInterval { elapsed_s: dt_s });
        }
        let Some(direction) = state.active_direction() else {
            return Outcome::Hold(HoldReason::NoDirection);
        };
        let Some(target) = state.target_temperature else {
            return Outcome::Hold(HoldReason::NoTarget);
        };
        if state.evaluated_sample.is_some() && state.evaluated_sample == state.sample_timestamp {
            return Outcome::Hold(HoldReason::AlreadyEvaluated);
        }

        let rate_of_change = (current - previous) / dt_s;
        let projected_drift = rate_of_change * seconds(self.horizon);
        let required_change = target - current;
        let action = (required_change - projected_drift) * direction.sign();
        let raw_position = f64::from(state.damper_position) + action * self.gain;
        if !raw_position.is_finite() {
            return Outcome::Hold(HoldReason::NonFinite);
        }

        let evaluation = Evaluation {
            rate_of_change,
            projected_drift,
            required_change,
            direction,
            action,
            raw_position,
            position: round_percent(raw_position),
        };
        if evaluation.position == state.damper_position {
            return Outcome::Hold(HoldReason::Unchanged(evaluation));
        }
        Outcome::Command(
            DamperCommand {
                position: evaluation.position,
            },
            evaluation,
        )
    }

    /// Compute a damper command, or `None` when no movement is needed.
    pub fn evaluate(&self, state: &ZoneControlState) -> Option<DamperCommand> {
        self.assess(state).command()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use zf_core::{Tolerances, nearly_equal};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn snapshot(direction: HvacDirection, damper: u8) -> ZoneControlState {
        ZoneControlState {
            mode: ZoneMode::Auto,
            resolved_direction: Some(direction),
            direction_suspended: false,
            target_temperature: Some(22.0),
            current_temperature: Some(24.0),
            previous_temperature: Some(24.5),
            sample_timestamp: Some(at(60)),
            previous_sample_timestamp: Some(at(0)),
            damper_position: damper,
            evaluated_sample: None,
        }
    }

    #[test]
    fn cooling_scenario_opens_damper() {
        let law = DamperLaw::default();
        let outcome = law.assess(&snapshot(HvacDirection::Cooling, 50));
        let Outcome::Command(cmd, eval) = outcome else {
            panic!("expected command, got {outcome:?}");
        };
        let tol = Tolerances::default();
        assert!(nearly_equal(eval.rate_of_change, -0.5 / 60.0, tol));
        assert!(nearly_equal(eval.projected_drift, -1.0, tol));
        assert_eq!(eval.required_change, -2.0);
        assert!(nearly_equal(eval.action, 1.0, tol));
        assert_eq!(cmd.position, 55);
    }

    #[test]
    fn heating_scenario_closes_damper() {
        let law = DamperLaw::default();
        let cmd = law.evaluate(&snapshot(HvacDirection::Heating, 50)).unwrap();
        assert_eq!(cmd.position, 45);
    }

    #[test]
    fn saturates_at_fully_open() {
        let law = DamperLaw::default();
        let outcome = law.assess(&snapshot(HvacDirection::Cooling, 98));
        let Outcome::Command(cmd, eval) = outcome else {
            panic!("expected command, got {outcome:?}");
        };
        assert!((eval.raw_position - 103.0).abs() < 1e-9);
        assert_eq!(cmd.position, 100);
    }

    #[test]
    fn saturated_damper_already_open_holds() {
        let law = DamperLaw::default();
        let outcome = law.assess(&snapshot(HvacDirection::Cooling, 100));
        assert!(matches!(outcome, Outcome::Hold(HoldReason::Unchanged(_))));
    }

    #[test]
    fn first_sample_holds() {
        let mut state = snapshot(HvacDirection::Cooling, 50);
        state.previous_temperature = None;
        state.previous_sample_timestamp = None;
        assert_eq!(
            DamperLaw::default().assess(&state),
            Outcome::Hold(HoldReason::FirstSample)
        );
    }

    #[test]
    fn off_holds() {
        let mut state = snapshot(HvacDirection::Cooling, 50);
        state.mode = ZoneMode::Off;
        assert_eq!(
            DamperLaw::default().assess(&state),
            Outcome::Hold(HoldReason::Off)
        );
    }

    #[test]
    fn non_positive_interval_holds() {
        let mut state = snapshot(HvacDirection::Cooling, 50);
        state.previous_sample_timestamp = state.sample_timestamp;
        assert!(matches!(
            DamperLaw::default().assess(&state),
            Outcome::Hold(HoldReason::NonPositiveInterval { .. })
        ));

        state.previous_sample_timestamp = Some(at(120));
        assert!(matches!(
            DamperLaw::default().assess(&state),
            Outcome::Hold(HoldReason::NonPositiveInterval { elapsed_s }) if elapsed_s < 0.0
        ));
    }

    #[test]
    fn missing_direction_or_target_holds() {
        let mut state = snapshot(HvacDirection::Cooling, 50);
        state.resolved_direction = None;
        assert_eq!(
            DamperLaw::default().assess(&state),
            Outcome::Hold(HoldReason::NoDirection)
        );

        let mut state = snapshot(HvacDirection::Cooling, 50);
        state.direction_suspended = true;
        assert_eq!(
            DamperLaw::default().assess(&state),
            Outcome::Hold(HoldReason::NoDirection)
        );

        let mut state = snapshot(HvacDirection::Cooling, 50);
        state.target_temperature = None;
        assert_eq!(
            DamperLaw::default().assess(&state),
            Outcome::Hold(HoldReason::NoTarget)
        );
    }

    #[test]
    fn recorded_command_is_not_repeated() {
        let law = DamperLaw::default();
        let mut state = snapshot(HvacDirection::Cooling, 50);
        let cmd = law.evaluate(&state).unwrap();
        state.record_command(&cmd);
        assert_eq!(state.damper_position, 55);
        assert_eq!(law.assess(&state), Outcome::Hold(HoldReason::AlreadyEvaluated));
    }

    #[test]
    fn gain_and_horizon_are_configurable() {
        // No drift over a zero-slope pair, so only the residual counts.
        let mut state = snapshot(HvacDirection::Heating, 50);
        state.previous_temperature = Some(24.0);
        let law = DamperLaw::new(s(300.0), 10.0).unwrap();
        assert_eq!(law.evaluate(&state).unwrap().position, 30);
    }

    #[test]
    fn invalid_law_params() {
        assert!(DamperLaw::new(s(0.0), 5.0).is_err());
        assert!(DamperLaw::new(s(-1.0), 5.0).is_err());
        assert!(DamperLaw::new(s(120.0), 0.0).is_err());
        assert!(DamperLaw::new(s(120.0), f64::NAN).is_err());
    }
}
