//! Confidence Intervals for Fused Estimates
//!
//! ## Overview
//!
//! The estimator reports a fused value with a one-sigma uncertainty. This
//! module turns that pair into the intervals published with each result,
//! under a Gaussian error assumption:
//!
//! ```text
//! 68% interval:  value ± 1.00 × uncertainty
//! 95% interval:  value ± z₉₅ × uncertainty      (z₉₅ = 1.96 by default)
//! ```
//!
//! ## Implementation Notes
//!
//! - Bounds are not clamped at zero. A concentration cannot be negative,
//!   but clamping would make the 95% interval stop containing the 68%
//!   interval strictly for small values.
//! - `uncertainty_percent` is relative to `|value|` and is 0 when the
//!   value is 0.

use serde::Serialize;

use crate::{constants::fusion::CI_68_Z_SCORE, stats::round_to};

/// Symmetric interval around a fused value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
    /// `upper - lower`
    pub range: f64,
}

impl Interval {
    /// Interval `center ± half_width`
    pub fn around(center: f64, half_width: f64) -> Self {
        let lower = center - half_width;
        let upper = center + half_width;
        Self {
            lower,
            upper,
            range: upper - lower,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Whether `other` lies strictly inside this interval
    pub fn strictly_contains(&self, other: &Interval) -> bool {
        self.lower < other.lower && other.upper < self.upper
    }
}

/// The intervals published with a fusion result
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceIntervals {
    #[serde(rename = "68_percent")]
    pub p68: Interval,
    #[serde(rename = "95_percent")]
    pub p95: Interval,
    /// Uncertainty relative to the fused value, one decimal
    pub uncertainty_percent: f64,
}

impl ConfidenceIntervals {
    /// Gaussian intervals for `value` with one-sigma `uncertainty`
    pub fn gaussian(value: f64, uncertainty: f64, z95: f64) -> Self {
        let uncertainty_percent = if value == 0.0 {
            0.0
        } else {
            round_to(uncertainty / value.abs() * 100.0, 1)
        };

        Self {
            p68: Interval::around(value, CI_68_Z_SCORE * uncertainty),
            p95: Interval::around(value, z95 * uncertainty),
            uncertainty_percent,
        }
    }
}
