//! Error Types for Observation Intake, Requests and Configuration
//!
//! ## Error Categories
//!
//! The engine separates failures by who has to act on them:
//!
//! ### Record Rejections (`ValidationError`)
//! - A raw satellite pixel or ground reading that cannot become an
//!   `Observation` (non-finite value, missing unit, coordinates off the globe).
//! - Non-fatal: the caller drops the record, logs it and carries on.
//!
//! ### Per-Pollutant Outcomes (`FailureReason`)
//! - `NoData`: nothing of any kind was available for a pollutant/location.
//! - `Timeout`: every source queried for the pollutant ran out of time.
//! - These are data, not errors. They land in the response next to the
//!   successful pollutants and count against the success rate.
//!
//! ### Contract Violations (`RequestError`)
//! - An empty or malformed pollutant list, non-finite request coordinates,
//!   a radius that makes no sense. Raised before any fusion work starts.
//!
//! ### Configuration (`ConfigError`)
//! - Unreadable or unparsable configuration files, and tables whose
//!   constants contradict each other.
//!
//! ## Handling Strategy
//!
//! ```rust
//! use airfuse_core::{normalize, RawRecord, SourceKind, ValidationError};
//!
//! let record = RawRecord {
//!     pollutant: Some("NO2".into()),
//!     value: Some(f64::NAN),
//!     unit: Some("µg/m³".into()),
//!     lat: 40.7,
//!     lon: -74.0,
//!     ..RawRecord::default()
//! };
//!
//! match normalize(&record, SourceKind::Ground) {
//!     Ok(_observation) => {}
//!     Err(ValidationError::NonFiniteValue { .. }) => {
//!         // drop the record, keep going
//!     }
//!     Err(_other) => {}
//! }
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

/// Result type for observation validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Reasons a raw record is rejected by the normalizer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The record carries no numeric value at all
    #[error("Record carries no value")]
    MissingValue,

    /// Value makes no numeric sense (NaN, infinity)
    #[error("Invalid value: {value} is not a finite number")]
    NonFiniteValue {
        /// The offending reading
        value: f64,
    },

    /// Unit string absent or blank
    #[error("Record carries no unit")]
    MissingUnit,

    /// Pollutant name absent or blank
    #[error("Record carries no pollutant name")]
    MissingPollutant,

    /// No timestamp on the record and no fallback time configured
    #[error("Record carries no timestamp")]
    MissingTimestamp,

    /// Latitude not finite or outside [-90, 90]
    #[error("Latitude {value} outside [-90, 90]")]
    LatitudeOutOfRange {
        /// The offending latitude
        value: f64,
    },

    /// Longitude not finite or outside [-180, 180]
    #[error("Longitude {value} outside [-180, 180]")]
    LongitudeOutOfRange {
        /// The offending longitude
        value: f64,
    },
}

/// Caller contract violations detected before fusion starts
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    /// No pollutants were requested
    #[error("No pollutants requested")]
    EmptyPollutantList,

    /// A pollutant name in the list is empty or whitespace
    #[error("Pollutant name is blank")]
    BlankPollutant,

    /// The same pollutant appears twice (after alias resolution)
    #[error("Pollutant {0} requested more than once")]
    DuplicatePollutant(String),

    /// Request latitude or longitude is NaN or infinite
    #[error("Request coordinates must be finite (lat {lat}, lon {lon})")]
    NonFiniteCoordinate {
        /// Requested latitude
        lat: f64,
        /// Requested longitude
        lon: f64,
    },

    /// Request latitude outside [-90, 90]
    #[error("Latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    /// Request longitude outside [-180, 180]
    #[error("Longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    /// Search radius not finite or outside the accepted bounds
    #[error("Radius {radius_km} km outside [{min_km}, {max_km}]")]
    InvalidRadius {
        /// Requested radius
        radius_km: f64,
        /// Smallest accepted radius
        min_km: f64,
        /// Largest accepted radius
        max_km: f64,
    },

    /// Every requested pollutant was filtered out as unsupported
    #[error("None of the requested pollutants are supported")]
    NoSupportedPollutants,
}

/// Configuration loading and validation failures
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config document is not valid JSON for `FusionConfig`
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Config parsed but its constants contradict each other
    #[error("Invalid config: {reason}")]
    Invalid {
        /// What is wrong with the table
        reason: &'static str,
    },
}

/// Why a pollutant produced no fused value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// No satellite or ground observation at the requested location
    NoData,
    /// Every queried source timed out before delivering data
    Timeout,
}

impl FailureReason {
    /// Wire name used in serialized responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoData => "no_data",
            Self::Timeout => "timeout",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
