//! Common test utilities for integration tests
//!
//! This module provides:
//! - Observation builders anchored at a fixed reference time
//! - Points at known distances from a target
//! - A tolerance assertion for floating-point results

#![allow(dead_code)]

use airfuse_core::{FixedClock, FusionEngine, Observation, SourceKind, Timestamp};
use chrono::{Duration, TimeZone, Utc};

/// Target used by most scenarios (lower Manhattan)
pub const TARGET_LAT: f64 = 40.7128;
pub const TARGET_LON: f64 = -74.0060;

/// Kilometres per degree of latitude on a 6371 km sphere
pub const KM_PER_DEG_LAT: f64 = 111.194_926_644_558_73;

#[macro_export]
macro_rules! assert_within_tolerance {
    ($actual:expr, $expected:expr, $tolerance:expr) => {
        let diff = ($actual - $expected).abs();
        if diff > $tolerance {
            panic!(
                "Value {} not within tolerance {} of expected {} (diff: {})",
                $actual, $tolerance, $expected, diff
            );
        }
    };
}

/// Reference "now" for every scenario
pub fn reference_time() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Engine with default config on a fixed clock
pub fn test_engine() -> FusionEngine {
    FusionEngine::default().with_clock(FixedClock::new(reference_time()))
}

/// Latitude `km` north of the target (same longitude)
pub fn lat_north_of_target(km: f64) -> f64 {
    TARGET_LAT + km / KM_PER_DEG_LAT
}

/// Builder for test observations
pub struct ObservationBuilder {
    source: SourceKind,
    pollutant: String,
    value: f64,
    unit: String,
    lat: f64,
    lon: f64,
    age: Duration,
    station_id: Option<String>,
}

impl ObservationBuilder {
    pub fn satellite(pollutant: &str, value: f64) -> Self {
        Self::new(SourceKind::Satellite, pollutant, value)
    }

    pub fn ground(pollutant: &str, value: f64) -> Self {
        Self::new(SourceKind::Ground, pollutant, value)
    }

    fn new(source: SourceKind, pollutant: &str, value: f64) -> Self {
        Self {
            source,
            pollutant: pollutant.to_string(),
            value,
            unit: "µg/m³".to_string(),
            lat: TARGET_LAT,
            lon: TARGET_LON,
            age: Duration::zero(),
            station_id: None,
        }
    }

    /// Place the observation `km` north of the target
    pub fn km_north(mut self, km: f64) -> Self {
        self.lat = lat_north_of_target(km);
        self.lon = TARGET_LON;
        self
    }

    pub fn at(mut self, lat: f64, lon: f64) -> Self {
        self.lat = lat;
        self.lon = lon;
        self
    }

    pub fn unit(mut self, unit: &str) -> Self {
        self.unit = unit.to_string();
        self
    }

    pub fn minutes_old(mut self, minutes: i64) -> Self {
        self.age = Duration::minutes(minutes);
        self
    }

    pub fn station(mut self, id: &str) -> Self {
        self.station_id = Some(id.to_string());
        self
    }

    pub fn build(self) -> Observation {
        let obs = Observation::new(
            self.source,
            self.pollutant,
            self.value,
            self.unit,
            self.lat,
            self.lon,
            reference_time() - self.age,
        )
        .expect("test observation must be valid");

        match self.station_id {
            Some(id) => obs.with_station_id(id),
            None => obs,
        }
    }
}
