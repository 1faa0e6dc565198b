//! Reading Normalizer
//!
//! ## Overview
//!
//! Satellite pixels and ground-station readings arrive in different shapes
//! from different providers. The normalizer turns each raw record into an
//! engine-native [`Observation`]:
//!
//! ```text
//! satellite pixel ──┐
//!                   ├─→ normalize() ─→ Observation { pollutant, value, unit,
//! station reading ──┘        │                      lat, lon, timestamp, ... }
//!                            ↓
//!                     ValidationError  (record dropped, logged)
//! ```
//!
//! ## Intake Rules
//!
//! A record is accepted only when:
//! - it carries a pollutant name and a finite numeric value
//! - it carries a non-blank unit
//! - its latitude lies in [-90, 90] and its longitude in [-180, 180]
//! - it carries a timestamp, or the normalizer has a fallback time
//!
//! Accepted records get their pollutant alias resolved (`pm25` → `PM2.5`)
//! and, when a factor is known, their value converted to µg/m³.
//!
//! ## Failure Policy
//!
//! Rejections are never fatal. [`Normalizer::normalize_batch`] drops bad
//! records with a warning and returns the rest.

mod units;

pub use units::{canonical_pollutant, canonical_unit, to_mass_concentration};

use serde::{Deserialize, Serialize};

use crate::{
    errors::{ValidationError, ValidationResult},
    observation::{Observation, QualityFlag, SourceKind},
    time::Timestamp,
};

/// A provider record before validation
///
/// Field aliases cover the spellings used by the satellite and
/// ground-network feeds (`parameter`, `measurement_time`, `quality`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default, alias = "parameter")]
    pub pollutant: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, alias = "measurement_time")]
    pub timestamp: Option<Timestamp>,
    #[serde(default, alias = "quality")]
    pub quality_flag: Option<String>,
    #[serde(default)]
    pub station_id: Option<String>,
}

/// Normalizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Convert ppb/ppm readings to µg/m³ where a factor is known
    pub convert_units: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self { convert_units: true }
    }
}

/// Converts raw provider records into observations
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
    /// Stamp for records that arrive without a timestamp
    fallback_time: Option<Timestamp>,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self {
            config,
            fallback_time: None,
        }
    }

    /// Stamp timestamp-less records with `received_at` instead of rejecting them
    pub fn with_fallback_time(mut self, received_at: Timestamp) -> Self {
        self.fallback_time = Some(received_at);
        self
    }

    /// Normalize one record
    pub fn normalize(&self, raw: &RawRecord, kind: SourceKind) -> ValidationResult<Observation> {
        let pollutant = raw
            .pollutant
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .map(canonical_pollutant)
            .ok_or(ValidationError::MissingPollutant)?;

        let value = raw.value.ok_or(ValidationError::MissingValue)?;
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteValue { value });
        }

        let unit = raw
            .unit
            .as_deref()
            .filter(|unit| !unit.trim().is_empty())
            .ok_or(ValidationError::MissingUnit)?;

        let timestamp = raw
            .timestamp
            .or(self.fallback_time)
            .ok_or(ValidationError::MissingTimestamp)?;

        let (value, unit) = if self.config.convert_units {
            to_mass_concentration(value, unit, &pollutant)
        } else {
            (value, canonical_unit(unit))
        };

        let mut observation =
            Observation::new(kind, pollutant, value, unit, raw.lat, raw.lon, timestamp)?;

        if let Some(flag) = raw.quality_flag.as_deref() {
            observation = observation.with_quality(QualityFlag::parse(flag));
        }
        if let Some(station_id) = raw.station_id.as_deref() {
            observation = observation.with_station_id(station_id);
        }

        Ok(observation)
    }

    /// Normalize a batch, dropping and logging records that fail intake
    pub fn normalize_batch(&self, records: &[RawRecord], kind: SourceKind) -> Vec<Observation> {
        let mut observations = Vec::with_capacity(records.len());

        for (index, raw) in records.iter().enumerate() {
            match self.normalize(raw, kind) {
                Ok(observation) => observations.push(observation),
                Err(e) => log::warn!(
                    "dropping {} record #{} ({:?}): {}",
                    kind.as_str(),
                    index,
                    raw.pollutant,
                    e
                ),
            }
        }

        observations
    }
}

/// Normalize one record with default settings
///
/// Records without a timestamp are rejected; use a [`Normalizer`] with a
/// fallback time to accept them.
pub fn normalize(raw: &RawRecord, kind: SourceKind) -> ValidationResult<Observation> {
    Normalizer::default().normalize(raw, kind)
}
