//! Error types for zone control operations.

use chrono::{DateTime, Utc};
use thiserror::Error;
use zf_core::CoreError;

/// Result type for zone control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur while tracking or controlling a zone.
///
/// The first three kinds are expected during normal operation and are
/// recovered inside the zone: the offending event is dropped and state is
/// left as it was.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Thermostat operating mode maps to neither heating nor cooling.
    #[error("Unrecognized thermostat mode: {mode}")]
    UnrecognizedMode { mode: String },

    /// A temperature or position report could not be read as a finite number.
    #[error("Unparsable {what}: {raw:?}")]
    UnparsableSample { what: &'static str, raw: String },

    /// Two samples arrived with non-increasing timestamps.
    #[error("Non-positive sample interval: {current} is not after {previous}")]
    NonPositiveInterval {
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },

    /// Target temperature is not a finite number.
    #[error("Invalid target temperature: {value}")]
    InvalidTarget { value: f64 },

    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// An entity is already wired to a zone.
    #[error("Entity already wired: {entity_id}")]
    DuplicateEntity { entity_id: String },

    /// Zone is not registered with the router.
    #[error("Unknown zone: {zone}")]
    UnknownZone { zone: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ControlError {
    /// Whether the zone recovers from this error by dropping the event.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnrecognizedMode { .. }
                | Self::UnparsableSample { .. }
                | Self::NonPositiveInterval { .. }
                | Self::InvalidTarget { .. }
        )
    }
}
