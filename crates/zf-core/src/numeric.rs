use crate::{CoreError, CoreResult};

/// Floating point type used throughout the system
pub type Real = f64;

/// Lowest damper position (fully closed).
pub const PERCENT_MIN: u8 = 0;
/// Highest damper position (fully open).
pub const PERCENT_MAX: u8 = 100;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> CoreResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Round half-to-even, then clamp into `[0, 100]`.
///
/// Input must be finite.
pub fn round_percent(v: Real) -> u8 {
    let rounded = v.round_ties_even();
    rounded.clamp(PERCENT_MIN as Real, PERCENT_MAX as Real) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn round_percent_clamps_and_rounds() {
        assert_eq!(round_percent(54.6), 55);
        assert_eq!(round_percent(103.0), 100);
        assert_eq!(round_percent(-7.2), 0);
        // ties go to even
        assert_eq!(round_percent(52.5), 52);
        assert_eq!(round_percent(53.5), 54);
    }
}
