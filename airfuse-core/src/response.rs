//! Response model
//!
//! The serialized shape is the one the HTTP layer publishes:
//!
//! ```text
//! {
//!   "method": "satellite_ground_fusion",
//!   "location": { "lat": .., "lon": .. },
//!   "timestamp": "...",
//!   "pollutants": {
//!     "NO2":  { "status": "success", "fused_value": .., "confidence_intervals": {..}, .. },
//!     "HCHO": { "status": "error", "pollutant": "HCHO", "reason": "no_data" }
//!   },
//!   "fusion_summary": { "success_rate": .., "overall_quality": .., .. },
//!   "quality_score": ..
//! }
//! ```
//!
//! Pollutants are kept in a `BTreeMap` so the output order is stable.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    errors::FailureReason,
    fusion::{ConfidenceIntervals, FusionMethod},
    observation::{Location, Observation},
    quality::{QualityFactor, QualityLevel},
    stats::{mean, round_to},
    temporal::TemporalContext,
    time::Timestamp,
};

/// Value of the top-level `method` field
pub const AGGREGATE_METHOD: &str = "satellite_ground_fusion";

/// Which sources went into a fused value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContributingSources {
    pub total_measurements: usize,
    #[serde(rename = "satellite_data")]
    pub satellite_count: usize,
    #[serde(rename = "ground_sensors")]
    pub ground_count: usize,
    /// Distance of the farthest contributing station
    pub spatial_coverage_km: f64,
}

/// Successful fusion of one pollutant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusionResult {
    pub pollutant: String,
    pub fused_value: f64,
    pub unit: String,
    pub uncertainty: f64,
    pub confidence_intervals: ConfidenceIntervals,
    pub quality_score: f64,
    pub quality_level: QualityLevel,
    pub quality_factors: Vec<QualityFactor>,
    #[serde(rename = "fusion_method")]
    pub method: FusionMethod,
    pub contributing_sources: ContributingSources,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporal_context: Option<TemporalContext>,
    /// First few contributing observations, satellite first
    pub raw_measurements: Vec<Observation>,
}

/// Pollutant that could not be fused
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusionFailure {
    pub pollutant: String,
    pub reason: FailureReason,
}

impl FusionFailure {
    pub fn new(pollutant: impl Into<String>, reason: FailureReason) -> Self {
        Self {
            pollutant: pollutant.into(),
            reason,
        }
    }
}

/// Per-pollutant entry of the response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PollutantOutcome {
    Success(FusionResult),
    #[serde(rename = "error")]
    Failure(FusionFailure),
}

impl PollutantOutcome {
    pub fn pollutant(&self) -> &str {
        match self {
            Self::Success(result) => &result.pollutant,
            Self::Failure(failure) => &failure.pollutant,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn result(&self) -> Option<&FusionResult> {
        match self {
            Self::Success(result) => Some(result),
            Self::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&FusionFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}

impl From<FusionResult> for PollutantOutcome {
    fn from(result: FusionResult) -> Self {
        Self::Success(result)
    }
}

impl From<FusionFailure> for PollutantOutcome {
    fn from(failure: FusionFailure) -> Self {
        Self::Failure(failure)
    }
}

/// Batch-level statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusionSummary {
    pub successful_pollutants: usize,
    pub total_pollutants: usize,
    /// `successful / total`, 0 for an empty batch
    pub success_rate: f64,
    /// Mean quality score of successful pollutants, two decimals
    pub overall_quality: f64,
    pub fusion_methods_used: BTreeMap<FusionMethod, usize>,
}

impl FusionSummary {
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a PollutantOutcome>) -> Self {
        let mut total = 0;
        let mut scores = Vec::new();
        let mut methods = BTreeMap::new();

        for outcome in outcomes {
            total += 1;
            if let Some(result) = outcome.result() {
                scores.push(result.quality_score);
                *methods.entry(result.method).or_insert(0) += 1;
            }
        }

        let successful = scores.len();
        let success_rate = if total == 0 {
            0.0
        } else {
            successful as f64 / total as f64
        };

        Self {
            successful_pollutants: successful,
            total_pollutants: total,
            success_rate,
            overall_quality: mean(&scores).map_or(0.0, |q| round_to(q, 2)),
            fusion_methods_used: methods,
        }
    }
}

/// Result of fusing every requested pollutant at one location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResponse {
    pub method: &'static str,
    pub location: Location,
    pub timestamp: Timestamp,
    #[serde(rename = "pollutants")]
    pub results: BTreeMap<String, PollutantOutcome>,
    pub fusion_summary: FusionSummary,
    /// Same as `fusion_summary.overall_quality`
    pub quality_score: f64,
}

impl AggregateResponse {
    /// Assemble a response from per-pollutant outcomes
    pub fn new(location: Location, timestamp: Timestamp, outcomes: Vec<PollutantOutcome>) -> Self {
        let fusion_summary = FusionSummary::from_outcomes(&outcomes);
        let results = outcomes
            .into_iter()
            .map(|outcome| (outcome.pollutant().to_string(), outcome))
            .collect();

        Self {
            method: AGGREGATE_METHOD,
            location,
            timestamp,
            results,
            quality_score: fusion_summary.overall_quality,
            fusion_summary,
        }
    }

    pub fn success_rate(&self) -> f64 {
        self.fusion_summary.success_rate
    }

    pub fn get(&self, pollutant: &str) -> Option<&PollutantOutcome> {
        self.results.get(pollutant)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn success(pollutant: &str, score: f64, method: FusionMethod) -> PollutantOutcome {
        PollutantOutcome::Success(FusionResult {
            pollutant: pollutant.into(),
            fused_value: 20.0,
            unit: "µg/m³".into(),
            uncertainty: 2.0,
            confidence_intervals: ConfidenceIntervals::gaussian(20.0, 2.0, 1.96),
            quality_score: score,
            quality_level: QualityLevel::Good,
            quality_factors: vec![QualityFactor::SingleMeasurement],
            method,
            contributing_sources: ContributingSources {
                total_measurements: 1,
                satellite_count: 0,
                ground_count: 1,
                spatial_coverage_km: 3.0,
            },
            temporal_context: None,
            raw_measurements: Vec::new(),
        })
    }

    #[test]
    fn summary_counts() {
        let outcomes = vec![
            success("NO2", 0.7, FusionMethod::SatelliteGroundSpatialFusion),
            success("O3", 0.6, FusionMethod::SingleGroundSensor),
            PollutantOutcome::Failure(FusionFailure::new("HCHO", FailureReason::NoData)),
        ];

        let summary = FusionSummary::from_outcomes(&outcomes);

        assert_eq!(summary.successful_pollutants, 2);
        assert_eq!(summary.total_pollutants, 3);
        assert!((summary.success_rate - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(summary.overall_quality, 0.65);
        assert_eq!(summary.fusion_methods_used.len(), 2);
    }

    #[test]
    fn empty_batch() {
        let summary = FusionSummary::from_outcomes(&Vec::<PollutantOutcome>::new());
        assert_eq!(summary.success_rate, 0.0);
        assert_eq!(summary.overall_quality, 0.0);
    }

    #[test]
    fn serialized_shape() {
        let timestamp = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let response = AggregateResponse::new(
            Location::new(40.7, -74.0),
            timestamp,
            vec![
                success("NO2", 0.6, FusionMethod::SingleGroundSensor),
                PollutantOutcome::Failure(FusionFailure::new("HCHO", FailureReason::Timeout)),
            ],
        );

        let json: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();

        assert_eq!(json["method"], "satellite_ground_fusion");
        assert_eq!(json["location"]["lat"], 40.7);
        assert_eq!(json["pollutants"]["NO2"]["status"], "success");
        assert_eq!(json["pollutants"]["NO2"]["fusion_method"], "single_ground_sensor");
        assert_eq!(json["pollutants"]["NO2"]["contributing_sources"]["ground_sensors"], 1);
        assert_eq!(json["pollutants"]["HCHO"]["status"], "error");
        assert_eq!(json["pollutants"]["HCHO"]["reason"], "timeout");
        assert_eq!(json["fusion_summary"]["success_rate"], 0.5);
        assert_eq!(
            json["fusion_summary"]["fusion_methods_used"]["single_ground_sensor"],
            1
        );
    }
}
