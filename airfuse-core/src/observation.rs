//! Observation data model
//!
//! An `Observation` is one pollutant reading in engine-native form: a value
//! with its unit, where it was taken, when, and which kind of source took
//! it. Observations are immutable once built; the matcher produces copies
//! with the computed distance attached instead of editing them in place.

use serde::Serialize;

use crate::{
    constants::geo::{LAT_MAX, LAT_MIN, LON_MAX, LON_MIN},
    errors::{ValidationError, ValidationResult},
    normalizer::canonical_pollutant,
    time::Timestamp,
};

/// Kind of instrument behind an observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Satellite retrieval (coarse pixel, wide coverage)
    Satellite,
    /// Ground monitoring station (point measurement)
    Ground,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Satellite => "satellite",
            Self::Ground => "ground",
        }
    }
}

/// Source-reported quality signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityFlag {
    Good,
    Moderate,
    /// Retrieval flagged unusable by the provider (clouds, glint, ...)
    Bad,
    #[default]
    Unknown,
}

impl QualityFlag {
    /// Parse a provider flag; anything unrecognised is `Unknown`
    pub fn parse(flag: &str) -> Self {
        match flag.trim().to_ascii_lowercase().as_str() {
            "good" | "high" | "valid" => Self::Good,
            "moderate" | "medium" | "fair" => Self::Moderate,
            "bad" | "low" | "invalid" | "poor" => Self::Bad,
            _ => Self::Unknown,
        }
    }

    /// Whether the reading may contribute to a fused estimate
    pub fn is_usable(&self) -> bool {
        *self != Self::Bad
    }
}

/// Geographic point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Check that a coordinate pair lies on the globe
pub fn check_coordinates(lat: f64, lon: f64) -> ValidationResult<()> {
    // `contains` is false for NaN, so non-finite values fail here too
    if !(LAT_MIN..=LAT_MAX).contains(&lat) {
        return Err(ValidationError::LatitudeOutOfRange { value: lat });
    }
    if !(LON_MIN..=LON_MAX).contains(&lon) {
        return Err(ValidationError::LongitudeOutOfRange { value: lon });
    }
    Ok(())
}

/// A single normalized pollutant reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pollutant: String,
    value: f64,
    unit: String,
    lat: f64,
    lon: f64,
    timestamp: Timestamp,
    source: SourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    station_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance_km: Option<f64>,
    quality: QualityFlag,
}

impl Observation {
    /// Build an observation, enforcing the intake constraints
    ///
    /// The pollutant name is stored in canonical form (`pm25` becomes
    /// `PM2.5`), matching the names requests are resolved to.
    pub fn new(
        source: SourceKind,
        pollutant: impl Into<String>,
        value: f64,
        unit: impl Into<String>,
        lat: f64,
        lon: f64,
        timestamp: Timestamp,
    ) -> ValidationResult<Self> {
        let pollutant = canonical_pollutant(&pollutant.into());
        let unit = unit.into();

        if pollutant.is_empty() {
            return Err(ValidationError::MissingPollutant);
        }
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteValue { value });
        }
        if unit.trim().is_empty() {
            return Err(ValidationError::MissingUnit);
        }
        check_coordinates(lat, lon)?;

        Ok(Self {
            pollutant,
            value,
            unit,
            lat,
            lon,
            timestamp,
            source,
            station_id: None,
            distance_km: None,
            quality: QualityFlag::Unknown,
        })
    }

    /// Attach the reporting station identifier
    pub fn with_station_id(mut self, station_id: impl Into<String>) -> Self {
        self.station_id = Some(station_id.into());
        self
    }

    /// Attach the provider quality flag
    pub fn with_quality(mut self, quality: QualityFlag) -> Self {
        self.quality = quality;
        self
    }

    /// Copy of this observation carrying a computed distance to the target
    pub(crate) fn at_distance(&self, distance_km: f64) -> Self {
        let mut located = self.clone();
        located.distance_km = Some(distance_km);
        located
    }

    pub fn pollutant(&self) -> &str {
        &self.pollutant
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn location(&self) -> Location {
        Location::new(self.lat, self.lon)
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }

    pub fn station_id(&self) -> Option<&str> {
        self.station_id.as_deref()
    }

    /// Great-circle distance to the fusion target, once matched
    pub fn distance_km(&self) -> Option<f64> {
        self.distance_km
    }

    pub fn quality(&self) -> QualityFlag {
        self.quality
    }

    pub fn is_satellite(&self) -> bool {
        self.source == SourceKind::Satellite
    }

    pub fn is_ground(&self) -> bool {
        self.source == SourceKind::Ground
    }
}
