//! Zone mode and HVAC direction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};

/// Whether a zone is actively controlled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneMode {
    /// No damper commands are issued.
    #[default]
    Off,
    /// The damper follows the control law.
    Auto,
}

impl ZoneMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for ZoneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZoneMode {
    type Err = ControlError;

    /// Accepts `off`, and `auto` or its host alias `heat_cool`.
    fn from_str(s: &str) -> ControlResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "auto" | "heat_cool" => Ok(Self::Auto),
            _ => Err(ControlError::UnrecognizedMode { mode: s.to_string() }),
        }
    }
}

/// Sign convention for the thermostat's active operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacDirection {
    Heating,
    Cooling,
}

impl HvacDirection {
    /// Resolve the direction from a thermostat operating mode report.
    ///
    /// Both the mode names (`heat`, `cool`) and the action names (`heating`,
    /// `cooling`) are understood. Anything else, including `off`, is
    /// [`ControlError::UnrecognizedMode`].
    pub fn from_operating_mode(mode: &str) -> ControlResult<Self> {
        match mode.trim().to_ascii_lowercase().as_str() {
            "heat" | "heating" => Ok(Self::Heating),
            "cool" | "cooling" => Ok(Self::Cooling),
            _ => Err(ControlError::UnrecognizedMode {
                mode: mode.to_string(),
            }),
        }
    }

    /// `+1` when heating, `-1` when cooling.
    ///
    /// Multiplying a temperature residual by this yields a value where
    /// positive always means "open the damper further".
    pub fn sign(self) -> f64 {
        match self {
            Self::Heating => 1.0,
            Self::Cooling => -1.0,
        }
    }
}

impl fmt::Display for HvacDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heating => f.write_str("heating"),
            Self::Cooling => f.write_str("cooling"),
        }
    }
}
