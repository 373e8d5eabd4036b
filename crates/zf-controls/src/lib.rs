//! Zone damper control for zoneflow.
//!
//! Each zone owns one motorized damper and one temperature sensor, and shares
//! a thermostat with the other zones. This crate turns the host's state
//! changes into damper position commands.
//!
//! # Architecture
//!
//! - [`ZoneControlState`] tracks the latest thermostat, damper and sensor
//!   observations for one zone
//! - [`DamperLaw`] is a pure one-step-ahead predictive proportional law that
//!   reads a state snapshot and proposes a new damper position
//! - [`ZoneController`] applies typed [`ZoneEvent`]s to its state and runs the
//!   law when a new temperature sample is accepted
//! - [`ZoneRouter`] maps raw host entity updates onto zone events and forwards
//!   commands to a [`DamperActuator`]
//!
//! Zones share no mutable data. Events for one zone are handled to completion
//! in arrival order.

pub mod actuator;
pub mod error;
pub mod event;
pub mod law;
pub mod limits;
pub mod mode;
pub mod router;
pub mod state;
pub mod zone;

pub use actuator::{DamperActuator, RecordingActuator};
pub use error::{ControlError, ControlResult};
pub use event::{RestoredZone, SetDamperPosition, ZoneEvent};
pub use law::{
    DEFAULT_GAIN, DEFAULT_HORIZON_S, DamperCommand, DamperLaw, Evaluation, HoldReason, Outcome,
};
pub use limits::ZoneLimits;
pub use mode::{HvacDirection, ZoneMode};
pub use router::{HostAttributes, HostStateChange, ZoneRouter};
pub use state::{PositionReport, ZoneControlState};
pub use zone::ZoneController;
