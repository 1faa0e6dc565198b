//! Shared fixtures for fetch tests
//!
//! Sources here run on paused tokio time, so latencies of minutes cost
//! nothing in wall-clock terms.

#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use airfuse_connectors::{GroundSource, SatelliteSource, SourceResult, StaticSource};
use airfuse_core::{FixedClock, FusionEngine, Observation, SourceKind, Timestamp};
use chrono::{TimeZone, Utc};

pub const TARGET_LAT: f64 = 40.7128;
pub const TARGET_LON: f64 = -74.0060;

/// Kilometres per degree of latitude on a 6371 km sphere
const KM_PER_DEG_LAT: f64 = 111.194_926_644_558_73;

pub fn reference_time() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn test_engine() -> FusionEngine {
    FusionEngine::default().with_clock(FixedClock::new(reference_time()))
}

/// Observation `km` north of the target, stamped at the reference time
pub fn observation(source: SourceKind, pollutant: &str, value: f64, km: f64) -> Observation {
    Observation::new(
        source,
        pollutant,
        value,
        "µg/m³",
        TARGET_LAT + km / KM_PER_DEG_LAT,
        TARGET_LON,
        reference_time(),
    )
    .expect("test observation must be valid")
}

/// Satellite 30 µg/m³ at 5 km, station 28 µg/m³ at 2 km
pub fn no2_snapshot() -> (StaticSource, StaticSource) {
    let satellite = StaticSource::new(vec![observation(SourceKind::Satellite, "NO2", 30.0, 5.0)]);
    let ground = StaticSource::new(vec![observation(SourceKind::Ground, "NO2", 28.0, 2.0)]);
    (satellite, ground)
}

/// Satellite source that counts how often it is asked
#[derive(Clone, Default)]
pub struct CountingSatellite {
    inner: StaticSource,
    calls: Arc<AtomicUsize>,
}

impl CountingSatellite {
    pub fn new(inner: StaticSource) -> Self {
        Self {
            inner,
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SatelliteSource for CountingSatellite {
    async fn fetch_near(&self, lat: f64, lon: f64, radius_km: f64, pollutant: &str) -> SourceResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        SatelliteSource::fetch_near(&self.inner, lat, lon, radius_km, pollutant).await
    }
}

/// Ground source that sleeps, then records that it ran to completion
#[derive(Clone)]
pub struct SlowGround {
    latency: Duration,
    finished: Arc<AtomicBool>,
}

impl SlowGround {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            finished: Arc::default(),
        }
    }

    pub fn finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl GroundSource for SlowGround {
    async fn fetch_near(&self, _lat: f64, _lon: f64, _radius_km: f64, _pollutant: &str) -> SourceResult {
        tokio::time::sleep(self.latency).await;
        self.finished.store(true, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

/// Let spawned tasks run until they block again
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
