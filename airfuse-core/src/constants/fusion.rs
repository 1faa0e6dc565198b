//! Fusion Estimator Constants
//!
//! This module defines the constants of the two-sensor estimator:
//! inverse-distance weighting of ground stations, nominal per-source
//! uncertainties and the numeric floors that keep inverse-variance
//! weighting away from division by zero.

// ===== INVERSE-DISTANCE WEIGHTING =====

/// Distance offset added before inverting, in kilometres.
///
/// Ground weights are `1 / (distance_km + IDW_EPSILON_KM)`, so a station
/// sitting exactly on the target gets weight 10 instead of infinity.
pub const IDW_EPSILON_KM: f64 = 0.1;

// ===== NOMINAL UNCERTAINTIES =====

/// Relative one-sigma uncertainty of a satellite retrieval.
///
/// Column retrievals are converted to surface concentrations through
/// a model and averaged over a pixel several kilometres wide.
///
/// Source: 15% of the retrieved value
pub const SATELLITE_NOMINAL_UNCERTAINTY: f64 = 0.15;

/// Relative one-sigma uncertainty of a single ground station.
///
/// Used only when one station contributes; with two or more stations the
/// sample standard deviation of their values takes over.
///
/// Source: 10% of the measured value
pub const GROUND_NOMINAL_UNCERTAINTY: f64 = 0.10;

// ===== NUMERIC FLOORS =====

/// Relative variance floor, multiplied by `value²`.
///
/// A computed variance of zero (e.g. identical station values) is raised
/// to this fraction of the squared estimate before it is inverted.
pub const VARIANCE_FLOOR_FRACTION: f64 = 1e-6;

/// Absolute variance floor used when the estimate itself is zero.
pub const VARIANCE_FLOOR_ABSOLUTE: f64 = 1e-6;

// ===== CONFIDENCE INTERVALS =====

/// z-score of the 68% interval (one sigma).
pub const CI_68_Z_SCORE: f64 = 1.0;

/// z-score of the 95% interval under the Gaussian assumption.
pub const CI_95_Z_SCORE: f64 = 1.96;

// ===== RESULT PAYLOAD =====

/// Contributing observations echoed back per pollutant.
pub const RAW_MEASUREMENT_LIMIT: usize = 5;
