//! Thermostat limits applied to zone targets.

use serde::{Deserialize, Serialize};

use zf_core::ensure_finite;

use crate::error::{ControlError, ControlResult};

/// Temperature bounds and step exposed by the shared thermostat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneLimits {
    /// Lowest accepted target (degrees).
    pub min_temp: f64,
    /// Highest accepted target (degrees).
    pub max_temp: f64,
    /// Target increment advertised to the user (degrees). Only exposed to the
    /// host UI; [`constrain`](Self::constrain) does not snap targets to it.
    pub step: f64,
}

impl ZoneLimits {
    /// Create zone limits.
    ///
    /// # Errors
    ///
    /// Returns error if the bounds are not finite, `min_temp >= max_temp`, or
    /// `step` is not positive.
    pub fn new(min_temp: f64, max_temp: f64, step: f64) -> ControlResult<Self> {
        ensure_finite(min_temp, "min_temp")?;
        ensure_finite(max_temp, "max_temp")?;
        if min_temp >= max_temp {
            return Err(ControlError::InvalidArg {
                what: "min_temp must be less than max_temp",
            });
        }
        if !(step > 0.0 && step.is_finite()) {
            return Err(ControlError::InvalidArg {
                what: "step must be positive",
            });
        }
        Ok(Self {
            min_temp,
            max_temp,
            step,
        })
    }

    /// Clamp a requested target into `[min_temp, max_temp]`.
    pub fn constrain(&self, target: f64) -> ControlResult<f64> {
        if !target.is_finite() {
            return Err(ControlError::InvalidTarget { value: target });
        }
        Ok(target.clamp(self.min_temp, self.max_temp))
    }
}

impl Default for ZoneLimits {
    fn default() -> Self {
        Self {
            min_temp: 7.0,
            max_temp: 35.0,
            step: 0.5,
        }
    }
}
