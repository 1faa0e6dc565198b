//! Fetch-and-fuse wrapper
//!
//! ## Overview
//!
//! [`Fetcher::fetch_and_fuse`] queries the injected sources for every
//! requested pollutant and runs the engine on what comes back:
//!
//! ```text
//! request ─→ validate ─→ JoinSet ─┬─ task NO2:  satellite ∥ ground ─→ fuse
//!                                 ├─ task O3:   satellite ∥ ground ─→ fuse
//!                                 └─ task PM10: ground only       ─→ fuse
//!                                             ↓
//!                                      AggregateResponse
//! ```
//!
//! ## Time Limits
//!
//! - Each source call runs under `source_timeout`; expiry counts as
//!   "no data from that source".
//! - The whole call runs under `request_timeout`; expiry aborts every
//!   in-flight task and returns [`FetchError::Timeout`].
//!
//! All pollutants of one call share the same response timestamp.

use std::{collections::HashMap, future::Future, sync::Arc, time::Duration};

use airfuse_core::{
    request::{validate_location, validate_pollutants},
    AggregateResponse, FailureReason, FusionEngine, FusionFailure, Location, PollutantOutcome,
    PollutantRequest, RequestError, Timestamp,
};
use thiserror::Error;
use tokio::task::JoinSet;

use crate::{satellite_covers, GroundSource, SatelliteSource, SourceError, SourceResult};

/// Errors that abort a whole fetch-and-fuse call
#[derive(Debug, Error)]
pub enum FetchError {
    /// The caller broke the request contract
    #[error("Invalid request: {0}")]
    Request(RequestError),

    /// The call did not finish within `request_timeout`
    #[error("Fetch timed out after {0:?}")]
    Timeout(Duration),
}

impl From<RequestError> for FetchError {
    fn from(err: RequestError) -> Self {
        Self::Request(err)
    }
}

/// Time limits for fetch-and-fuse
#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    /// Limit for a single source call
    pub source_timeout: Duration,
    /// Limit for the whole call
    pub request_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            source_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl FetchConfig {
    /// Set the per-source timeout in seconds
    pub fn source_timeout_secs(mut self, secs: u64) -> Self {
        self.source_timeout = Duration::from_secs(secs);
        self
    }

    /// Set the whole-call timeout in seconds
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout = Duration::from_secs(secs);
        self
    }
}

/// Engine plus the sources it draws observations from
#[derive(Clone)]
pub struct Fetcher {
    engine: FusionEngine,
    satellite: Arc<dyn SatelliteSource>,
    ground: Arc<dyn GroundSource>,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(
        engine: FusionEngine,
        satellite: Arc<dyn SatelliteSource>,
        ground: Arc<dyn GroundSource>,
    ) -> Self {
        Self {
            engine,
            satellite,
            ground,
            config: FetchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: FetchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn engine(&self) -> &FusionEngine {
        &self.engine
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch observations for every pollutant and fuse them
    ///
    /// Pollutants are fetched and fused concurrently, one task each.
    pub async fn fetch_and_fuse<S: AsRef<str>>(
        &self,
        pollutants: &[S],
        lat: f64,
        lon: f64,
        radius_km: f64,
    ) -> Result<AggregateResponse, FetchError> {
        validate_location(lat, lon, radius_km)?;
        let pollutants = validate_pollutants(pollutants)?;
        let now = self.engine.now();

        log::info!(
            "fetching {} pollutants at ({}, {}) within {} km",
            pollutants.len(),
            lat,
            lon,
            radius_km
        );

        let mut tasks = JoinSet::new();
        for pollutant in &pollutants {
            let task = PollutantTask {
                engine: self.engine.clone(),
                satellite: Arc::clone(&self.satellite),
                ground: Arc::clone(&self.ground),
                request: PollutantRequest::new(pollutant.as_str(), lat, lon, radius_km),
                source_timeout: self.config.source_timeout,
                now,
            };
            tasks.spawn(task.run());
        }

        let mut finished =
            match tokio::time::timeout(self.config.request_timeout, collect(&mut tasks)).await {
                Ok(finished) => finished,
                Err(_) => {
                    tasks.abort_all();
                    log::warn!(
                        "fetch for ({}, {}) exceeded {:?}, aborted {} pending tasks",
                        lat,
                        lon,
                        self.config.request_timeout,
                        tasks.len()
                    );
                    return Err(FetchError::Timeout(self.config.request_timeout));
                }
            };

        // Requested order; a task that died without an outcome reports no data
        let outcomes = pollutants
            .iter()
            .map(|pollutant| {
                finished
                    .remove(pollutant)
                    .unwrap_or_else(|| FusionFailure::new(pollutant.as_str(), FailureReason::NoData).into())
            })
            .collect();

        Ok(self.engine.assemble(Location::new(lat, lon), now, outcomes))
    }
}

/// Drain the join set, keyed by pollutant
async fn collect(tasks: &mut JoinSet<PollutantOutcome>) -> HashMap<String, PollutantOutcome> {
    let mut finished = HashMap::with_capacity(tasks.len());

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => {
                finished.insert(outcome.pollutant().to_string(), outcome);
            }
            Err(e) => log::warn!("fusion task failed: {}", e),
        }
    }

    finished
}

/// Everything one pollutant task owns
struct PollutantTask {
    engine: FusionEngine,
    satellite: Arc<dyn SatelliteSource>,
    ground: Arc<dyn GroundSource>,
    request: PollutantRequest,
    source_timeout: Duration,
    now: Timestamp,
}

/// How one source call ended
enum SourceOutcome {
    Skipped,
    Data(Vec<airfuse_core::Observation>),
    TimedOut,
    Failed,
}

impl PollutantTask {
    async fn run(self) -> PollutantOutcome {
        let req = &self.request;

        let satellite_call = async {
            if !satellite_covers(&req.pollutant) {
                return SourceOutcome::Skipped;
            }
            let call = self.satellite.fetch_near(req.lat, req.lon, req.radius_km, &req.pollutant);
            classify(self.satellite.name(), &req.pollutant, limit(self.source_timeout, call).await)
        };
        let ground_call = async {
            let call = self.ground.fetch_near(req.lat, req.lon, req.radius_km, &req.pollutant);
            classify(self.ground.name(), &req.pollutant, limit(self.source_timeout, call).await)
        };

        let (satellite, ground) = tokio::join!(satellite_call, ground_call);

        let mut observations = Vec::new();
        let mut queried = 0;
        let mut timed_out = 0;
        for outcome in [satellite, ground] {
            match outcome {
                SourceOutcome::Skipped => {}
                SourceOutcome::Data(data) => {
                    queried += 1;
                    observations.extend(data);
                }
                SourceOutcome::TimedOut => {
                    queried += 1;
                    timed_out += 1;
                }
                SourceOutcome::Failed => queried += 1,
            }
        }

        match self.engine.fuse_pollutant(req, &observations, self.now) {
            PollutantOutcome::Failure(failure) if timed_out > 0 && timed_out == queried => {
                FusionFailure::new(failure.pollutant, FailureReason::Timeout).into()
            }
            outcome => outcome,
        }
    }
}

async fn limit<F>(duration: Duration, call: F) -> SourceResult
where
    F: Future<Output = SourceResult>,
{
    match tokio::time::timeout(duration, call).await {
        Ok(result) => result,
        Err(_) => Err(SourceError::Timeout),
    }
}

fn classify(source: &str, pollutant: &str, result: SourceResult) -> SourceOutcome {
    match result {
        Ok(data) => {
            log::debug!("{}: {} returned {} observations", pollutant, source, data.len());
            SourceOutcome::Data(data)
        }
        Err(SourceError::Timeout) => {
            log::warn!("{}: {} timed out", pollutant, source);
            SourceOutcome::TimedOut
        }
        Err(e) => {
            log::warn!("{}: {} failed: {}", pollutant, source, e);
            SourceOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits() {
        let config = FetchConfig::default();
        assert_eq!(config.source_timeout, Duration::from_secs(30));
        assert_eq!(config.request_timeout, Duration::from_secs(60));

        let config = config.source_timeout_secs(5).request_timeout_secs(10);
        assert_eq!(config.source_timeout, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn fetch_error_messages() {
        let err: FetchError = RequestError::EmptyPollutantList.into();
        assert_eq!(err.to_string(), "Invalid request: No pollutants requested");
        assert_eq!(
            FetchError::Timeout(Duration::from_secs(60)).to_string(),
            "Fetch timed out after 60s"
        );
    }
}
