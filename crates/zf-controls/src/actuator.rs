//! Outbound damper actuation.
//!
//! The controller hands every command to a [`DamperActuator`] and moves on.
//! It does not wait for the damper to move and does not retry; the host
//! reports the real position back later as a
//! [`ZoneEvent::DamperPositionChanged`](crate::ZoneEvent::DamperPositionChanged).

use crate::event::SetDamperPosition;

/// Sink for damper position commands.
pub trait DamperActuator {
    /// Request a new damper position. Failures are the implementor's concern.
    fn set_position(&mut self, command: SetDamperPosition);
}

/// Actuator that keeps every command it receives.
///
/// # Example
///
/// ```
/// use zf_controls::{DamperActuator, RecordingActuator, SetDamperPosition};
/// use zf_core::ZoneId;
///
/// let mut actuator = RecordingActuator::default();
/// actuator.set_position(SetDamperPosition { zone_id: ZoneId::from_index(0), position: 55 });
/// assert_eq!(actuator.last().map(|c| c.position), Some(55));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingActuator {
    pub commands: Vec<SetDamperPosition>,
}

impl RecordingActuator {
    pub fn last(&self) -> Option<&SetDamperPosition> {
        self.commands.last()
    }

    pub fn take(&mut self) -> Vec<SetDamperPosition> {
        std::mem::take(&mut self.commands)
    }
}

impl DamperActuator for RecordingActuator {
    fn set_position(&mut self, command: SetDamperPosition) {
        self.commands.push(command);
    }
}
