//! Quality Scoring Ladder and Thresholds
//!
//! The quality score is a 0-1 heuristic built from how many sources
//! contributed and how far apart the ground stations are. All points of
//! the ladder live here; `QualityTable` copies them as its defaults.

// ===== SOURCE LADDER =====

/// Score when only a satellite pixel is available.
pub const SCORE_SATELLITE_ONLY: f64 = 0.5;

/// Score for a single ground station.
pub const SCORE_SINGLE_GROUND: f64 = 0.6;

/// Bonus per ground station beyond the first.
pub const SCORE_PER_EXTRA_STATION: f64 = 0.1;

/// Station count after which extra stations stop adding to the score.
pub const SCORE_STATION_CAP: usize = 4;

/// Bonus when satellite and ground both contribute.
pub const SCORE_FUSION_BONUS: f64 = 0.1;

/// Upper bound of the score.
pub const SCORE_MAX: f64 = 1.0;

// ===== SPATIAL PENALTY =====

/// Station spread that costs nothing, in kilometres.
pub const COVERAGE_FREE_KM: f64 = 20.0;

/// Width of one penalty step beyond the free spread, in kilometres.
pub const COVERAGE_STEP_KM: f64 = 25.0;

/// Score removed per step width beyond the free spread.
///
/// Prorated, not stepped: the penalty is
/// `COVERAGE_STEP_PENALTY * (spread - COVERAGE_FREE_KM) / COVERAGE_STEP_KM`,
/// so 32.5 km costs 0.025 rather than a whole 0.05.
pub const COVERAGE_STEP_PENALTY: f64 = 0.05;

// ===== LEVEL THRESHOLDS =====

/// Lowest score graded `excellent`.
pub const QUALITY_EXCELLENT_THRESHOLD: f64 = 0.8;

/// Lowest score graded `good`.
pub const QUALITY_GOOD_THRESHOLD: f64 = 0.6;

/// Lowest score graded `fair`; anything below is `poor`.
pub const QUALITY_FAIR_THRESHOLD: f64 = 0.4;

// ===== FACTOR LABELS =====

/// Spread (km) above which stations are reported as widely spread.
pub const WIDE_SPREAD_KM: f64 = 10.0;
