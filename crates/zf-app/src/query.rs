//! One-shot evaluation of the damper law from plain numbers.

use chrono::{Duration, TimeZone, Utc};
use zf_controls::{DamperLaw, HvacDirection, Outcome, ZoneControlState, ZoneMode};
use zf_core::s;

use crate::error::{AppError, AppResult};

/// Inputs for a single evaluation.
#[derive(Debug, Clone)]
pub struct EvaluateRequest {
    pub direction: HvacDirection,
    pub target: f64,
    pub previous: f64,
    pub current: f64,
    /// Seconds between the two samples.
    pub interval_s: f64,
    pub damper: u8,
    pub horizon_s: f64,
    pub gain: f64,
}

/// Evaluate the law once against a synthetic zone snapshot.
pub fn evaluate_once(request: &EvaluateRequest) -> AppResult<Outcome> {
    if request.damper > 100 {
        return Err(AppError::InvalidInput(format!(
            "damper position {} is outside 0..=100",
            request.damper
        )));
    }
    for (what, v) in [
        ("target", request.target),
        ("previous", request.previous),
        ("current", request.current),
        ("interval", request.interval_s),
    ] {
        if !v.is_finite() {
            return Err(AppError::InvalidInput(format!("{what} must be finite")));
        }
    }
    if request.interval_s.abs() > 1.0e9 {
        return Err(AppError::InvalidInput("interval is too large".to_string()));
    }

    let law = DamperLaw::new(s(request.horizon_s), request.gain)?;
    let previous_at = Utc
        .timestamp_opt(0, 0)
        .single()
        .ok_or_else(|| AppError::InvalidInput("epoch out of range".to_string()))?;
    let current_at = previous_at + Duration::microseconds((request.interval_s * 1e6).round() as i64);

    let state = ZoneControlState {
        mode: ZoneMode::Auto,
        resolved_direction: Some(request.direction),
        direction_suspended: false,
        target_temperature: Some(request.target),
        current_temperature: Some(request.current),
        previous_temperature: Some(request.previous),
        sample_timestamp: Some(current_at),
        previous_sample_timestamp: Some(previous_at),
        damper_position: request.damper,
        evaluated_sample: None,
    };
    Ok(law.assess(&state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use zf_controls::HoldReason;

    fn request(direction: HvacDirection) -> EvaluateRequest {
        EvaluateRequest {
            direction,
            target: 22.0,
            previous: 24.5,
            current: 24.0,
            interval_s: 60.0,
            damper: 50,
            horizon_s: 120.0,
            gain: 5.0,
        }
    }

    #[test]
    fn evaluates_reference_scenarios() {
        let cool = evaluate_once(&request(HvacDirection::Cooling)).unwrap();
        assert_eq!(cool.command().map(|c| c.position), Some(55));
        let heat = evaluate_once(&request(HvacDirection::Heating)).unwrap();
        assert_eq!(heat.command().map(|c| c.position), Some(45));
    }

    #[test]
    fn zero_interval_holds() {
        let mut req = request(HvacDirection::Cooling);
        req.interval_s = 0.0;
        assert!(matches!(
            evaluate_once(&req).unwrap(),
            Outcome::Hold(HoldReason::NonPositiveInterval { .. })
        ));
    }

    #[test]
    fn rejects_bad_inputs() {
        let mut req = request(HvacDirection::Cooling);
        req.damper = 101;
        assert!(evaluate_once(&req).is_err());

        let mut req = request(HvacDirection::Cooling);
        req.current = f64::NAN;
        assert!(evaluate_once(&req).is_err());

        let mut req = request(HvacDirection::Cooling);
        req.gain = 0.0;
        assert!(matches!(evaluate_once(&req), Err(AppError::Control(_))));
    }
}
