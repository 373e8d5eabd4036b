//! zf-core: stable foundation for zoneflow.
//!
//! Contains:
//! - units (uom SI time types + constructors)
//! - numeric (Real + tolerances + float and percent helpers)
//! - ids (compact zone identifiers)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
