//! Core fusion engine for AirFuse
//!
//! Combines satellite retrievals and ground-station readings of air
//! pollutants into one best estimate per pollutant, with an uncertainty,
//! confidence intervals and a quality grade.
//!
//! Key properties:
//! - Pure computation over a snapshot of observations, no I/O
//! - Deterministic: no randomness, injected clock
//! - Partial failures are data, not errors
//!
//! ```no_run
//! use airfuse_core::{FusionEngine, Observation, SourceKind};
//!
//! let now = chrono::Utc::now();
//! let observations = vec![
//!     Observation::new(SourceKind::Satellite, "NO2", 30.0, "µg/m³", 40.70, -74.02, now).unwrap(),
//!     Observation::new(SourceKind::Ground, "NO2", 28.0, "µg/m³", 40.71, -74.00, now).unwrap(),
//! ];
//!
//! let engine = FusionEngine::default();
//! let response = engine
//!     .fuse_all(&["NO2", "O3"], 40.7128, -74.0060, 50.0, &observations)
//!     .unwrap();
//!
//! println!("{}", response.to_json_pretty().unwrap());
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod constants;
pub mod errors;
pub mod fusion;
pub mod normalizer;
pub mod observation;
pub mod orchestrator;
pub mod quality;
pub mod request;
pub mod response;
pub mod spatial;
pub mod stats;
pub mod temporal;
pub mod time;

// Public API
pub use config::FusionConfig;
pub use errors::{ConfigError, FailureReason, RequestError, ValidationError, ValidationResult};
pub use fusion::{estimate, ConfidenceIntervals, Estimate, EstimatorConfig, FusionMethod, Interval};
pub use normalizer::{normalize, Normalizer, NormalizerConfig, RawRecord};
pub use observation::{Location, Observation, QualityFlag, SourceKind};
pub use orchestrator::FusionEngine;
pub use quality::{score, QualityFactor, QualityLevel, QualityScore, QualityTable};
pub use request::{FusionRequest, PollutantRequest, RawObservations, ValidatedRequest};
pub use response::{
    AggregateResponse, ContributingSources, FusionFailure, FusionResult, FusionSummary,
    PollutantOutcome,
};
pub use spatial::{haversine_km, match_observations, SpatialMatch};
pub use temporal::{Freshness, TemporalContext};
pub use time::{FixedClock, SystemClock, TimeSource, Timestamp};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
