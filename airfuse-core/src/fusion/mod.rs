//! Fusion Estimator for Satellite and Ground Observations
//!
//! ## Overview
//!
//! This module combines the observations picked by the spatial matcher into
//! one best estimate of a pollutant concentration, with a one-sigma
//! uncertainty. Satellite pixels cover everything but coarsely; ground
//! stations are precise but sparse. Fusing both gives an estimate that is
//! better than either source alone:
//!
//! ```text
//! satellite pixel ──────────────────────┐
//!                                        ├─→ inverse-variance ─→ value ± uncertainty
//! ground stations ─→ IDW mean + variance ┘
//! ```
//!
//! ## Algorithm
//!
//! ### Ground estimate (inverse-distance weighting)
//!
//! ```text
//! ground = Σ(wᵢ·gᵢ) / Σwᵢ        wᵢ = 1 / (distanceᵢ + ε),  ε = 0.1 km
//! ```
//!
//! Its variance is the sample variance of the station values when two or
//! more stations contribute, otherwise the nominal `(10% · value)²`.
//!
//! ### Satellite estimate
//!
//! The nearest usable pixel, with nominal variance `(15% · value)²`.
//!
//! ### Two-sensor fusion
//!
//! ```text
//! fused       = (s/σ²ₛ + g/σ²₉) / (1/σ²ₛ + 1/σ²₉)
//! uncertainty = √(1 / (1/σ²ₛ + 1/σ²₉))
//! ```
//!
//! The more stations agree, the smaller σ²₉ and the harder the ground pulls
//! the estimate toward itself.
//!
//! ## Numerical Stability
//!
//! - A zero variance (identical stations) is floored at `1e-6 · value²`,
//!   or `1e-6` when the value itself is 0, before it is inverted.
//! - Distances are offset by ε so a station on the target is finite.
//! - No branch panics; the only failure is "no data at all".
//!
//! ## Usage Example
//!
//! ```rust
//! use airfuse_core::fusion::{estimate, EstimatorConfig, FusionMethod};
//! # use airfuse_core::{Observation, SourceKind};
//! # let now = chrono::Utc::now();
//! # let ground = vec![
//! #     Observation::new(SourceKind::Ground, "NO2", 28.0, "µg/m³", 40.71, -74.0, now).unwrap(),
//! # ];
//! # let satellite = Observation::new(SourceKind::Satellite, "NO2", 30.0, "µg/m³", 40.7, -74.0, now).unwrap();
//!
//! let est = estimate(Some(&satellite), &ground, &EstimatorConfig::default()).unwrap();
//! assert_eq!(est.method, FusionMethod::SatelliteGroundSpatialFusion);
//! assert!(est.value > 28.0 && est.value < 30.0);
//! ```

pub mod confidence;

pub use confidence::{ConfidenceIntervals, Interval};

use serde::{Deserialize, Serialize};

use crate::{
    constants::fusion::{
        CI_95_Z_SCORE, GROUND_NOMINAL_UNCERTAINTY, IDW_EPSILON_KM, SATELLITE_NOMINAL_UNCERTAINTY,
        VARIANCE_FLOOR_ABSOLUTE, VARIANCE_FLOOR_FRACTION,
    },
    errors::FailureReason,
    observation::Observation,
    stats::{sample_variance, weighted_mean},
};

/// Tunable estimator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Distance offset for inverse-distance weights (km)
    pub idw_epsilon_km: f64,
    /// Satellite one-sigma uncertainty as a fraction of its value
    pub satellite_nominal_fraction: f64,
    /// Single-station one-sigma uncertainty as a fraction of its value
    pub ground_nominal_fraction: f64,
    /// Relative variance floor, times `value²`
    pub variance_floor_fraction: f64,
    /// Variance floor when the value is zero
    pub variance_floor_absolute: f64,
    /// z-score of the 95% interval
    pub ci95_z: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            idw_epsilon_km: IDW_EPSILON_KM,
            satellite_nominal_fraction: SATELLITE_NOMINAL_UNCERTAINTY,
            ground_nominal_fraction: GROUND_NOMINAL_UNCERTAINTY,
            variance_floor_fraction: VARIANCE_FLOOR_FRACTION,
            variance_floor_absolute: VARIANCE_FLOOR_ABSOLUTE,
            ci95_z: CI_95_Z_SCORE,
        }
    }
}

impl EstimatorConfig {
    /// Raise `variance` to the floor for an estimate of `value`
    pub fn floor_variance(&self, variance: f64, value: f64) -> f64 {
        let floor = if value == 0.0 {
            self.variance_floor_absolute
        } else {
            self.variance_floor_fraction * value * value
        };
        variance.max(floor)
    }

    /// Inverse-distance weight of a station `distance_km` from the target
    pub fn idw_weight(&self, distance_km: f64) -> f64 {
        1.0 / (distance_km + self.idw_epsilon_km)
    }
}

/// How a fused value was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionMethod {
    /// Satellite pixel fused with ground stations
    SatelliteGroundSpatialFusion,
    /// Two or more ground stations, no satellite
    MultiSensorInterpolation,
    SingleGroundSensor,
    SatelliteOnly,
}

impl FusionMethod {
    /// Method for a given mix of sources, `None` when nothing contributes
    pub fn classify(satellite_present: bool, ground_count: usize) -> Option<Self> {
        match (satellite_present, ground_count) {
            (false, 0) => None,
            (true, 0) => Some(Self::SatelliteOnly),
            (true, _) => Some(Self::SatelliteGroundSpatialFusion),
            (false, 1) => Some(Self::SingleGroundSensor),
            (false, _) => Some(Self::MultiSensorInterpolation),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SatelliteGroundSpatialFusion => "satellite_ground_spatial_fusion",
            Self::MultiSensorInterpolation => "multi_sensor_interpolation",
            Self::SingleGroundSensor => "single_ground_sensor",
            Self::SatelliteOnly => "satellite_only",
        }
    }
}

impl core::fmt::Display for FusionMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fused value with its one-sigma uncertainty
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub value: f64,
    pub uncertainty: f64,
    pub method: FusionMethod,
}

impl Estimate {
    pub fn confidence_intervals(&self, config: &EstimatorConfig) -> ConfidenceIntervals {
        ConfidenceIntervals::gaussian(self.value, self.uncertainty, config.ci95_z)
    }
}

/// Ground-side estimate before fusion
#[derive(Debug, Clone, Copy, PartialEq)]
struct SourceEstimate {
    value: f64,
    variance: f64,
}

fn satellite_estimate(satellite: &Observation, config: &EstimatorConfig) -> SourceEstimate {
    let value = satellite.value();
    let sigma = config.satellite_nominal_fraction * value.abs();
    SourceEstimate {
        value,
        variance: sigma * sigma,
    }
}

/// IDW mean of the stations; observations without a distance count as on-target
fn ground_estimate(ground: &[Observation], config: &EstimatorConfig) -> Option<SourceEstimate> {
    let value = weighted_mean(ground.iter().map(|obs| {
        (obs.value(), config.idw_weight(obs.distance_km().unwrap_or(0.0)))
    }))?;

    let values: Vec<f64> = ground.iter().map(Observation::value).collect();
    let variance = sample_variance(&values).unwrap_or_else(|| {
        let sigma = config.ground_nominal_fraction * value.abs();
        sigma * sigma
    });

    Some(SourceEstimate { value, variance })
}

/// Estimate a pollutant concentration from matched observations
///
/// `ground` is expected nearest first with distances attached, as the
/// spatial matcher returns it. Fails only when both inputs are empty.
pub fn estimate(
    satellite: Option<&Observation>,
    ground: &[Observation],
    config: &EstimatorConfig,
) -> Result<Estimate, FailureReason> {
    let method = FusionMethod::classify(satellite.is_some(), ground.len()).ok_or(FailureReason::NoData)?;

    let satellite = satellite.map(|obs| satellite_estimate(obs, config));
    let ground = ground_estimate(ground, config);

    let (value, uncertainty) = match (satellite, ground) {
        (Some(sat), Some(gnd)) => {
            let sat_var = config.floor_variance(sat.variance, sat.value);
            let gnd_var = config.floor_variance(gnd.variance, gnd.value);
            let precision = 1.0 / sat_var + 1.0 / gnd_var;
            let fused = (sat.value / sat_var + gnd.value / gnd_var) / precision;
            (fused, (1.0 / precision).sqrt())
        }
        (Some(single), None) | (None, Some(single)) => (single.value, single.variance.sqrt()),
        (None, None) => return Err(FailureReason::NoData),
    };

    Ok(Estimate {
        value,
        uncertainty,
        method,
    })
}
