//! In-memory observation source
//!
//! Serves a fixed snapshot of observations, optionally after an artificial
//! delay or with a scripted failure. Used to replay archived data and to
//! exercise timeouts in tests.

use std::{sync::Arc, time::Duration};

use airfuse_core::{normalizer::canonical_pollutant, Observation, SourceKind};

use crate::{GroundSource, SatelliteSource, SourceError, SourceResult};

/// Source backed by a fixed observation list
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    observations: Arc<Vec<Observation>>,
    latency: Option<Duration>,
    failure: Option<SourceError>,
}

impl StaticSource {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self {
            observations: Arc::new(observations),
            latency: None,
            failure: None,
        }
    }

    /// Delay every answer by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Answer every call with `error`
    pub fn failing(error: SourceError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Number of observations in the snapshot
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    async fn serve(&self, pollutant: &str, kind: SourceKind) -> SourceResult {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let pollutant = canonical_pollutant(pollutant);
        Ok(self
            .observations
            .iter()
            .filter(|obs| obs.source() == kind && obs.pollutant() == pollutant)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl SatelliteSource for StaticSource {
    async fn fetch_near(&self, _lat: f64, _lon: f64, _radius_km: f64, pollutant: &str) -> SourceResult {
        self.serve(pollutant, SourceKind::Satellite).await
    }

    fn name(&self) -> &str {
        "static-satellite"
    }
}

#[async_trait::async_trait]
impl GroundSource for StaticSource {
    async fn fetch_near(&self, _lat: f64, _lon: f64, _radius_km: f64, pollutant: &str) -> SourceResult {
        self.serve(pollutant, SourceKind::Ground).await
    }

    fn name(&self) -> &str {
        "static-ground"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot() -> StaticSource {
        let now = Utc::now();
        StaticSource::new(vec![
            Observation::new(SourceKind::Satellite, "NO2", 30.0, "µg/m³", 40.7, -74.0, now).unwrap(),
            Observation::new(SourceKind::Ground, "NO2", 28.0, "µg/m³", 40.7, -74.0, now).unwrap(),
            Observation::new(SourceKind::Ground, "O3", 60.0, "µg/m³", 40.7, -74.0, now).unwrap(),
        ])
    }

    #[tokio::test]
    async fn filters_by_kind_and_pollutant() {
        let source = snapshot();

        let satellite = SatelliteSource::fetch_near(&source, 40.7, -74.0, 50.0, "no2").await.unwrap();
        assert_eq!(satellite.len(), 1);
        assert!(satellite[0].is_satellite());

        let ground = GroundSource::fetch_near(&source, 40.7, -74.0, 50.0, "O3").await.unwrap();
        assert_eq!(ground.len(), 1);
        assert_eq!(ground[0].value(), 60.0);
    }

    #[tokio::test]
    async fn scripted_failure() {
        let source = StaticSource::failing(SourceError::Unavailable("down".into()));
        let result = GroundSource::fetch_near(&source, 0.0, 0.0, 10.0, "NO2").await;

        assert_eq!(result, Err(SourceError::Unavailable("down".into())));
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_applied() {
        let source = snapshot().with_latency(Duration::from_secs(5));
        let started = tokio::time::Instant::now();

        let _ = GroundSource::fetch_near(&source, 0.0, 0.0, 10.0, "NO2").await;
        assert!(started.elapsed() >= Duration::from_secs(5));
    }
}
