//! Engine configuration
//!
//! [`FusionConfig`] groups every tunable number the engine uses. Defaults
//! come from [`crate::constants`]; a JSON document may override any subset
//! of fields:
//!
//! ```json
//! {
//!   "estimator": { "ci95_z": 2.0 },
//!   "quality": { "coverage_free_km": 30.0 },
//!   "raw_measurement_limit": 3
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    constants::fusion::RAW_MEASUREMENT_LIMIT,
    errors::ConfigError,
    fusion::EstimatorConfig,
    normalizer::NormalizerConfig,
    quality::QualityTable,
};

/// Full engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    pub estimator: EstimatorConfig,
    pub quality: QualityTable,
    pub normalizer: NormalizerConfig,
    /// Contributing observations echoed back per pollutant
    pub raw_measurement_limit: usize,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            estimator: EstimatorConfig::default(),
            quality: QualityTable::default(),
            normalizer: NormalizerConfig::default(),
            raw_measurement_limit: RAW_MEASUREMENT_LIMIT,
        }
    }
}

impl FusionConfig {
    /// Parse and validate a JSON document; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Reject tables that cannot produce sensible output
    pub fn validate(&self) -> Result<(), ConfigError> {
        let est = &self.estimator;
        if !(est.idw_epsilon_km.is_finite() && est.idw_epsilon_km > 0.0) {
            return Err(invalid("idw_epsilon_km must be positive"));
        }
        let fractions = [est.satellite_nominal_fraction, est.ground_nominal_fraction];
        if fractions.iter().any(|f| !f.is_finite() || *f < 0.0) {
            return Err(invalid("nominal uncertainty fractions must be finite and not negative"));
        }
        let floors = [est.variance_floor_fraction, est.variance_floor_absolute];
        if !floors.iter().all(|f| f.is_finite() && *f > 0.0) {
            return Err(invalid("variance floors must be positive"));
        }
        if !(est.ci95_z.is_finite() && est.ci95_z > 1.0) {
            return Err(invalid("ci95_z must be greater than the 68% z-score"));
        }

        let q = &self.quality;
        let ladder = [
            q.satellite_only,
            q.single_ground,
            q.per_extra_station,
            q.fusion_bonus,
            q.coverage_step_penalty,
        ];
        if ladder.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(invalid("quality scores and penalties must not be negative"));
        }
        if q.station_cap == 0 {
            return Err(invalid("station_cap must be at least 1"));
        }
        if !(q.max_score > 0.0 && q.max_score <= 1.0) {
            return Err(invalid("max_score must be in (0, 1]"));
        }
        if q.coverage_free_km < 0.0 || q.coverage_step_km <= 0.0 {
            return Err(invalid("coverage distances must be positive"));
        }
        if !(q.excellent_threshold >= q.good_threshold && q.good_threshold >= q.fair_threshold) {
            return Err(invalid("quality thresholds must be ordered excellent >= good >= fair"));
        }

        Ok(())
    }
}

fn invalid(reason: &'static str) -> ConfigError {
    ConfigError::Invalid { reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = FusionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.raw_measurement_limit, 5);
        assert_eq!(config.estimator.ci95_z, 1.96);
        assert_eq!(config.quality.station_cap, 4);
    }

    #[test]
    fn partial_override() {
        let config = FusionConfig::from_json_str(
            r#"{ "quality": { "coverage_free_km": 30.0 }, "raw_measurement_limit": 3 }"#,
        )
        .unwrap();

        assert_eq!(config.quality.coverage_free_km, 30.0);
        assert_eq!(config.quality.single_ground, 0.6);
        assert_eq!(config.raw_measurement_limit, 3);
        assert!(config.normalizer.convert_units);
    }

    #[test]
    fn rejects_bad_tables() {
        let result = FusionConfig::from_json_str(r#"{ "estimator": { "idw_epsilon_km": 0.0 } }"#);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));

        let result = FusionConfig::from_json_str(
            r#"{ "quality": { "good_threshold": 0.9 } }"#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));

        let result = FusionConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn rejects_non_finite_fractions() {
        let mut config = FusionConfig::default();
        config.estimator.satellite_nominal_fraction = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let mut config = FusionConfig::default();
        config.estimator.ground_nominal_fraction = f64::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let mut config = FusionConfig::default();
        config.estimator.variance_floor_absolute = f64::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }
}
