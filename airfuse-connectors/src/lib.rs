//! Observation Sources and Fetch Wrappers for AirFuse
//!
//! ## Overview
//!
//! The fusion engine in `airfuse-core` is a pure computation over a snapshot
//! of observations. This crate is the seam to whatever acquires those
//! observations (satellite product downloads, ground-network APIs) and the
//! place where time limits and caching live:
//!
//! ```text
//!                    ┌─ SatelliteSource::fetch_near ─┐
//! fetch_and_fuse ────┤    (per source timeout)       ├─→ FusionEngine ─→ AggregateResponse
//!  (one task per     └─ GroundSource::fetch_near ────┘
//!   pollutant, whole-call timeout)
//!
//! CachedEngine ─→ TTL cache ─→ fetch_and_fuse
//! ```
//!
//! ## Source Contract
//!
//! A source returns observations of the requested pollutant near the
//! requested point. It may return more than needed; the engine's spatial
//! matcher applies the radius and picks the nearest satellite pixel.
//!
//! Satellites are only asked for pollutants their instrument retrieves
//! (`NO2`, `O3`, `HCHO`, `AEROSOL`); ground networks are asked for all.
//!
//! ## Failure Policy
//!
//! - A source that errors or exceeds its timeout contributes nothing; the
//!   pollutant degrades to single-source fusion or to a failure entry.
//! - A pollutant whose every queried source timed out fails with reason
//!   `timeout` instead of `no_data`.
//! - No retries happen here. Retrying belongs to the source implementation.
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use airfuse_connectors::{Fetcher, StaticSource};
//! use airfuse_core::{FusionEngine, Observation, SourceKind};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let now = chrono::Utc::now();
//! let ground = StaticSource::new(vec![
//!     Observation::new(SourceKind::Ground, "NO2", 28.0, "µg/m³", 40.71, -74.0, now).unwrap(),
//! ]);
//!
//! let fetcher = Fetcher::new(
//!     FusionEngine::default(),
//!     Arc::new(StaticSource::default()),
//!     Arc::new(ground),
//! );
//! let response = fetcher.fetch_and_fuse(&["NO2"], 40.7128, -74.0060, 50.0).await?;
//! assert_eq!(response.fusion_summary.successful_pollutants, 1);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod fetch;
pub mod memory;

// Re-export common types
pub use cache::{CacheStats, CachedEngine};
pub use fetch::{FetchConfig, FetchError, Fetcher};
pub use memory::StaticSource;

use airfuse_core::{constants::pollutants::SATELLITE_POLLUTANTS, Observation};
use thiserror::Error;

/// Errors reported by an observation source
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SourceError {
    #[error("Timeout")]
    Timeout,

    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// Result type for source calls
pub type SourceResult = Result<Vec<Observation>, SourceError>;

/// Satellite retrieval provider
#[async_trait::async_trait]
pub trait SatelliteSource: Send + Sync {
    /// Observations of `pollutant` near `(lat, lon)`
    async fn fetch_near(&self, lat: f64, lon: f64, radius_km: f64, pollutant: &str) -> SourceResult;

    /// Name used in log messages
    fn name(&self) -> &str {
        "satellite"
    }
}

/// Ground monitoring network
#[async_trait::async_trait]
pub trait GroundSource: Send + Sync {
    /// Observations of `pollutant` within `radius_km` of `(lat, lon)`
    async fn fetch_near(&self, lat: f64, lon: f64, radius_km: f64, pollutant: &str) -> SourceResult;

    /// Name used in log messages
    fn name(&self) -> &str {
        "ground"
    }
}

/// Whether the satellite instrument retrieves `pollutant`
pub fn satellite_covers(pollutant: &str) -> bool {
    SATELLITE_POLLUTANTS.contains(&pollutant)
}
