//! Fusion Orchestrator
//!
//! ## Overview
//!
//! [`FusionEngine`] runs the per-pollutant pipeline for every requested
//! pollutant and assembles the batch response:
//!
//! ```text
//!                 ┌─→ match ─→ estimate ─→ score ─→ NO2  result
//! observations ───┼─→ match ─→ estimate ─→ score ─→ O3   result
//!                 └─→ match ─→ estimate ─→ score ─→ HCHO failure (no data)
//!                                                        ↓
//!                                             AggregateResponse + summary
//! ```
//!
//! ## Failure Semantics
//!
//! - A pollutant without data becomes a `FusionFailure` entry; the batch
//!   carries on and the failure counts against the success rate.
//! - Only caller mistakes (empty or duplicate pollutant list, non-finite
//!   or out-of-range coordinates, non-positive radius) return `Err`.
//!
//! ## Concurrency
//!
//! The engine holds only its configuration and clock and never mutates
//! them, so one instance can serve many requests at once and the
//! per-pollutant work can be spread over tasks (see the connectors crate).

use std::{fmt, sync::Arc};

use crate::{
    config::FusionConfig,
    errors::RequestError,
    fusion::{estimate, Estimate},
    normalizer::Normalizer,
    observation::{Location, Observation, SourceKind},
    request::{validate_location, validate_pollutants, FusionRequest, PollutantRequest},
    response::{AggregateResponse, ContributingSources, FusionFailure, FusionResult, PollutantOutcome},
    spatial::{match_observations, SpatialMatch},
    temporal::TemporalContext,
    time::{SystemClock, TimeSource, Timestamp},
};

/// Stateless fusion engine
#[derive(Clone)]
pub struct FusionEngine {
    config: FusionConfig,
    clock: Arc<dyn TimeSource>,
}

impl fmt::Debug for FusionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FusionEngine")
            .field("config", &self.config)
            .field("wall_clock", &self.clock.is_wall_clock())
            .finish()
    }
}

impl Default for FusionEngine {
    fn default() -> Self {
        Self::new(FusionConfig::default())
    }
}

impl FusionEngine {
    /// Engine on the system clock
    pub fn new(config: FusionConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used for response timestamps and observation ages
    pub fn with_clock(mut self, clock: impl TimeSource + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Normalizer configured like this engine
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.config.normalizer.clone())
    }

    /// Fuse one pollutant
    ///
    /// `observations` may hold any pollutants and any distances; the
    /// matcher picks the relevant ones. `now` anchors the temporal context.
    pub fn fuse_pollutant(
        &self,
        request: &PollutantRequest,
        observations: &[Observation],
        now: Timestamp,
    ) -> PollutantOutcome {
        let matched = match_observations(observations, request);

        match estimate(matched.satellite.as_ref(), &matched.ground, &self.config.estimator) {
            Ok(est) => self.build_result(request, &matched, est, now).into(),
            Err(reason) => {
                log::debug!("{}: no fused value ({})", request.pollutant, reason);
                FusionFailure::new(request.pollutant.clone(), reason).into()
            }
        }
    }

    fn build_result(
        &self,
        request: &PollutantRequest,
        matched: &SpatialMatch,
        est: Estimate,
        now: Timestamp,
    ) -> FusionResult {
        let satellite_present = matched.satellite.is_some();
        let ground_count = matched.ground.len();
        let coverage = matched.spatial_coverage_km();

        let table = &self.config.quality;
        let quality = table.score(satellite_present, ground_count, coverage);

        log::debug!(
            "{}: {} value={:.3} uncertainty={:.3} score={} ({})",
            request.pollutant,
            est.method,
            est.value,
            est.uncertainty,
            quality.score,
            quality.level
        );

        FusionResult {
            pollutant: request.pollutant.clone(),
            fused_value: est.value,
            unit: result_unit(&request.pollutant, matched),
            uncertainty: est.uncertainty,
            confidence_intervals: est.confidence_intervals(&self.config.estimator),
            quality_score: quality.score,
            quality_level: quality.level,
            quality_factors: table.factors(satellite_present, ground_count, coverage),
            method: est.method,
            contributing_sources: ContributingSources {
                total_measurements: ground_count + usize::from(satellite_present),
                satellite_count: usize::from(satellite_present),
                ground_count,
                spatial_coverage_km: coverage,
            },
            temporal_context: TemporalContext::analyze(matched.contributing(), now),
            raw_measurements: matched
                .contributing()
                .take(self.config.raw_measurement_limit)
                .cloned()
                .collect(),
        }
    }

    /// Fuse every pollutant in `pollutants` at one location
    ///
    /// Pollutant names are canonicalised first, so results are keyed by
    /// canonical name (`pm25` comes back as `PM2.5`).
    pub fn fuse_all<S: AsRef<str>>(
        &self,
        pollutants: &[S],
        lat: f64,
        lon: f64,
        radius_km: f64,
        observations: &[Observation],
    ) -> Result<AggregateResponse, RequestError> {
        validate_location(lat, lon, radius_km)?;
        let pollutants = validate_pollutants(pollutants)?;
        let now = self.now();

        log::info!(
            "fusing {} pollutants at ({}, {}) within {} km from {} observations",
            pollutants.len(),
            lat,
            lon,
            radius_km,
            observations.len()
        );

        let outcomes = pollutants
            .iter()
            .map(|pollutant| {
                let request = PollutantRequest::new(pollutant.as_str(), lat, lon, radius_km);
                self.fuse_pollutant(&request, observations, now)
            })
            .collect();

        Ok(self.assemble(Location::new(lat, lon), now, outcomes))
    }

    /// Validate a service request, normalize its raw observations and fuse
    pub fn fuse_request(&self, request: &FusionRequest) -> Result<AggregateResponse, RequestError> {
        let validated = request.validate()?;

        let normalizer = self.normalizer().with_fallback_time(self.now());
        let mut observations =
            normalizer.normalize_batch(&request.observations.satellite, SourceKind::Satellite);
        observations.extend(normalizer.normalize_batch(&request.observations.ground, SourceKind::Ground));

        self.fuse_all(
            &validated.pollutants,
            validated.lat,
            validated.lon,
            validated.radius_km,
            &observations,
        )
    }

    /// Build the batch response from per-pollutant outcomes
    pub fn assemble(
        &self,
        location: Location,
        timestamp: Timestamp,
        outcomes: Vec<PollutantOutcome>,
    ) -> AggregateResponse {
        let response = AggregateResponse::new(location, timestamp, outcomes);

        log::info!(
            "fusion finished: {}/{} pollutants, success rate {:.2}, overall quality {}",
            response.fusion_summary.successful_pollutants,
            response.fusion_summary.total_pollutants,
            response.success_rate(),
            response.fusion_summary.overall_quality
        );

        response
    }
}

/// Unit of the fused value: the satellite's if present, else the nearest station's
fn result_unit(pollutant: &str, matched: &SpatialMatch) -> String {
    let Some(reference) = matched.contributing().next() else {
        return String::new();
    };

    if let Some(other) = matched.contributing().find(|obs| obs.unit() != reference.unit()) {
        log::warn!(
            "{}: mixed units in fusion ({} vs {}), reporting {}",
            pollutant,
            reference.unit(),
            other.unit(),
            reference.unit()
        );
    }

    reference.unit().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::FailureReason, time::FixedClock};
    use chrono::{TimeZone, Utc};

    fn noon() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn engine() -> FusionEngine {
        FusionEngine::default().with_clock(FixedClock::new(noon()))
    }

    fn ground(pollutant: &str, value: f64, lon: f64) -> Observation {
        Observation::new(SourceKind::Ground, pollutant, value, "µg/m³", 0.0, lon, noon()).unwrap()
    }

    #[test]
    fn partial_failure_does_not_abort() {
        let observations = vec![ground("NO2", 20.0, 0.01)];
        let response = engine()
            .fuse_all(&["NO2", "HCHO"], 0.0, 0.0, 50.0, &observations)
            .unwrap();

        assert!(response.get("NO2").unwrap().is_success());
        let failure = response.get("HCHO").unwrap().failure().unwrap();
        assert_eq!(failure.reason, FailureReason::NoData);
        assert_eq!(response.success_rate(), 0.5);
        assert_eq!(response.timestamp, noon());
    }

    #[test]
    fn caller_errors() {
        let engine = engine();

        assert_eq!(
            engine.fuse_all::<&str>(&[], 0.0, 0.0, 50.0, &[]).unwrap_err(),
            RequestError::EmptyPollutantList
        );
        assert!(matches!(
            engine.fuse_all(&["NO2"], f64::NAN, 0.0, 50.0, &[]),
            Err(RequestError::NonFiniteCoordinate { .. })
        ));
        assert_eq!(
            engine.fuse_all(&["NO2", "no2"], 0.0, 0.0, 50.0, &[]).unwrap_err(),
            RequestError::DuplicatePollutant("NO2".into())
        );
    }

    #[test]
    fn raw_measurements_limited() {
        let observations: Vec<Observation> =
            (0..8).map(|i| ground("O3", 40.0 + i as f64, 0.01 * i as f64)).collect();

        let response = engine().fuse_all(&["O3"], 0.0, 0.0, 50.0, &observations).unwrap();
        let result = response.get("O3").unwrap().result().unwrap();

        assert_eq!(result.raw_measurements.len(), 5);
        assert_eq!(result.contributing_sources.ground_count, 8);
        assert_eq!(result.raw_measurements[0].value(), 40.0);
    }

    #[test]
    fn satellite_unit_wins() {
        let satellite =
            Observation::new(SourceKind::Satellite, "NO2", 30.0, "ppb", 0.0, 0.0, noon()).unwrap();
        let observations = vec![satellite, ground("NO2", 28.0, 0.01)];

        let response = engine().fuse_all(&["NO2"], 0.0, 0.0, 50.0, &observations).unwrap();
        assert_eq!(response.get("NO2").unwrap().result().unwrap().unit, "ppb");
    }
}
