//! Quality Scorer
//!
//! ## Overview
//!
//! Every fused result carries a 0-1 quality score and a coarse level. The
//! score says how much data went into the estimate and how well it is
//! distributed; it does not look at the values themselves.
//!
//! ## Scoring Ladder
//!
//! ```text
//! satellite only                      0.5
//! one ground station                  0.6
//! each extra station (up to 4 total) +0.1
//! satellite and ground together      +0.1
//! cap                                 1.0
//! station spread beyond 20 km        −0.05 per 25 km (prorated)
//! floor                               0.0
//! ```
//!
//! The score is rounded to two decimals before it is graded, so that
//! `0.6 + 0.1 + 0.1` grades as `excellent` and not as `good`.
//!
//! ## Levels
//!
//! | Score   | Level       |
//! |---------|-------------|
//! | ≥ 0.8   | `excellent` |
//! | ≥ 0.6   | `good`      |
//! | ≥ 0.4   | `fair`      |
//! | < 0.4   | `poor`      |
//!
//! All points of the ladder live in one [`QualityTable`] so they can be
//! tuned through configuration without touching the scoring function.

use serde::{Deserialize, Serialize};

use crate::{
    constants::quality::{
        COVERAGE_FREE_KM, COVERAGE_STEP_KM, COVERAGE_STEP_PENALTY, QUALITY_EXCELLENT_THRESHOLD,
        QUALITY_FAIR_THRESHOLD, QUALITY_GOOD_THRESHOLD, SCORE_FUSION_BONUS, SCORE_MAX,
        SCORE_PER_EXTRA_STATION, SCORE_SATELLITE_ONLY, SCORE_SINGLE_GROUND, SCORE_STATION_CAP,
        WIDE_SPREAD_KM,
    },
    stats::round_to,
};

/// Coarse grade of a quality score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl QualityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Poor => "poor",
            Self::Fair => "fair",
            Self::Good => "good",
            Self::Excellent => "excellent",
        }
    }
}

impl core::fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score with its grade
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityScore {
    pub score: f64,
    pub level: QualityLevel,
}

/// Labels explaining a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityFactor {
    SingleMeasurement,
    DualMeasurements,
    MultipleMeasurements,
    SatelliteGroundFusion,
    GroundSensorAvailable,
    SatelliteDataAvailable,
    MultipleGroundSensors,
    WideSpatialSpread,
}

/// Scoring constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityTable {
    pub satellite_only: f64,
    pub single_ground: f64,
    pub per_extra_station: f64,
    /// Stations beyond this count add nothing
    pub station_cap: usize,
    pub fusion_bonus: f64,
    pub max_score: f64,
    pub coverage_free_km: f64,
    pub coverage_step_km: f64,
    /// Penalty per `coverage_step_km`, prorated over partial steps
    pub coverage_step_penalty: f64,
    pub excellent_threshold: f64,
    pub good_threshold: f64,
    pub fair_threshold: f64,
    /// Spread above which `wide_spatial_spread` is reported
    pub wide_spread_km: f64,
}

impl Default for QualityTable {
    fn default() -> Self {
        Self {
            satellite_only: SCORE_SATELLITE_ONLY,
            single_ground: SCORE_SINGLE_GROUND,
            per_extra_station: SCORE_PER_EXTRA_STATION,
            station_cap: SCORE_STATION_CAP,
            fusion_bonus: SCORE_FUSION_BONUS,
            max_score: SCORE_MAX,
            coverage_free_km: COVERAGE_FREE_KM,
            coverage_step_km: COVERAGE_STEP_KM,
            coverage_step_penalty: COVERAGE_STEP_PENALTY,
            excellent_threshold: QUALITY_EXCELLENT_THRESHOLD,
            good_threshold: QUALITY_GOOD_THRESHOLD,
            fair_threshold: QUALITY_FAIR_THRESHOLD,
            wide_spread_km: WIDE_SPREAD_KM,
        }
    }
}

impl QualityTable {
    /// Score a mix of sources
    ///
    /// `spatial_coverage_km` is the distance of the farthest contributing
    /// station. With no source at all the score is 0.
    pub fn score(&self, satellite_present: bool, ground_count: usize, spatial_coverage_km: f64) -> QualityScore {
        let base = match (satellite_present, ground_count) {
            (false, 0) => 0.0,
            (true, 0) => self.satellite_only,
            (_, n) => {
                let extra = n.min(self.station_cap).saturating_sub(1);
                let ground = self.single_ground + self.per_extra_station * extra as f64;
                if satellite_present {
                    ground + self.fusion_bonus
                } else {
                    ground
                }
            }
        };

        let score = base.min(self.max_score) - self.coverage_penalty(spatial_coverage_km);
        let score = round_to(score.max(0.0), 2);

        QualityScore {
            score,
            level: self.level_for(score),
        }
    }

    /// Penalty for station spread beyond the free radius
    ///
    /// Grows linearly with the excess spread; partial steps count pro rata.
    pub fn coverage_penalty(&self, spatial_coverage_km: f64) -> f64 {
        if spatial_coverage_km <= self.coverage_free_km || self.coverage_step_km <= 0.0 {
            return 0.0;
        }
        self.coverage_step_penalty * (spatial_coverage_km - self.coverage_free_km) / self.coverage_step_km
    }

    pub fn level_for(&self, score: f64) -> QualityLevel {
        if score >= self.excellent_threshold {
            QualityLevel::Excellent
        } else if score >= self.good_threshold {
            QualityLevel::Good
        } else if score >= self.fair_threshold {
            QualityLevel::Fair
        } else {
            QualityLevel::Poor
        }
    }

    /// Labels describing the source mix behind a score
    pub fn factors(&self, satellite_present: bool, ground_count: usize, spatial_coverage_km: f64) -> Vec<QualityFactor> {
        let mut factors = Vec::new();

        match ground_count + usize::from(satellite_present) {
            0 => return factors,
            1 => factors.push(QualityFactor::SingleMeasurement),
            2 => factors.push(QualityFactor::DualMeasurements),
            _ => factors.push(QualityFactor::MultipleMeasurements),
        }

        factors.push(match (satellite_present, ground_count > 0) {
            (true, true) => QualityFactor::SatelliteGroundFusion,
            (false, _) => QualityFactor::GroundSensorAvailable,
            (true, false) => QualityFactor::SatelliteDataAvailable,
        });

        if ground_count >= 2 {
            factors.push(QualityFactor::MultipleGroundSensors);
        }
        if spatial_coverage_km > self.wide_spread_km {
            factors.push(QualityFactor::WideSpatialSpread);
        }

        factors
    }
}

/// Score with the default table
pub fn score(satellite_present: bool, ground_count: usize, spatial_coverage_km: f64) -> QualityScore {
    QualityTable::default().score(satellite_present, ground_count, spatial_coverage_km)
}
