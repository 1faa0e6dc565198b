//! Constants for AirFuse Core
//!
//! This module provides centralized, documented constants used throughout
//! the fusion engine. Every number the estimator, scorer or request layer
//! relies on is defined here once; the configuration tables take their
//! defaults from these values.
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Fusion**: Estimator weights, nominal uncertainties, variance floors
//! - **Quality**: Scoring ladder, spatial penalty, level thresholds
//! - **Geo**: Earth model and request radius limits
//! - **Pollutants**: Supported species, aliases and unit conversion factors
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Tune behaviour through `FusionConfig`, not by editing call sites
//! 3. Use descriptive names that include units

/// Fusion estimator parameters.
pub mod fusion;

/// Quality scoring ladder and thresholds.
pub mod quality;

/// Earth model and spatial limits.
pub mod geo;

/// Pollutant catalogue, aliases and unit conversions.
pub mod pollutants;

// Re-export commonly used constants for convenience
pub use fusion::{
    IDW_EPSILON_KM, SATELLITE_NOMINAL_UNCERTAINTY, GROUND_NOMINAL_UNCERTAINTY,
    CI_95_Z_SCORE,
};

pub use quality::{
    QUALITY_EXCELLENT_THRESHOLD, QUALITY_GOOD_THRESHOLD, QUALITY_FAIR_THRESHOLD,
};

pub use geo::{EARTH_RADIUS_KM, DEFAULT_RADIUS_KM, MIN_RADIUS_KM, MAX_RADIUS_KM};

pub use pollutants::{SUPPORTED_POLLUTANTS, DEFAULT_POLLUTANTS, SATELLITE_POLLUTANTS};
