//! Shared application service layer for zoneflow.
//!
//! Turns an installation file into a running set of zone controllers, replays
//! recorded host events through them and persists zone mode/target between
//! runs. Frontends (the CLI) stay thin on top of this crate.

pub mod error;
pub mod project_service;
pub mod query;
pub mod replay_service;
pub mod runtime_compile;
pub mod state_service;

pub use error::{AppError, AppResult};
pub use project_service::{ZoneSummary, list_zones, load_installation, validate_installation};
pub use query::{EvaluateRequest, evaluate_once};
pub use replay_service::{ReplayCommand, ReplayLog, ReplayReport, ReplayStep, load_replay, run_replay};
pub use runtime_compile::{ZoneRuntime, compile_installation};
pub use state_service::{apply_snapshot, capture_snapshot};
