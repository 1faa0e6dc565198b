//! Time management for the fusion engine
//!
//! The engine stamps every response and ages every observation against a
//! single "now". Taking that instant from an injected clock keeps the
//! numeric core deterministic:
//! - System clock (production)
//! - Fixed clock (tests, replays of archived snapshots)

use chrono::{DateTime, Duration, Utc};

/// Timestamp type used throughout the engine
pub type Timestamp = DateTime<Utc>;

/// Source of time for the engine
pub trait TimeSource: Send + Sync {
    /// Current wall-clock instant
    fn now(&self) -> Timestamp;

    /// Check if this source follows the real wall clock
    fn is_wall_clock(&self) -> bool;
}

/// System time source
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn is_wall_clock(&self) -> bool {
        true
    }
}

/// Fixed time source for testing
#[derive(Debug, Clone)]
pub struct FixedClock {
    timestamp: Timestamp,
}

impl FixedClock {
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    pub fn advance(&mut self, by: Duration) {
        self.timestamp += by;
    }
}

impl TimeSource for FixedClock {
    fn now(&self) -> Timestamp {
        self.timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }
}

/// Age of `earlier` relative to `now` in fractional hours, never negative
pub fn age_hours(earlier: Timestamp, now: Timestamp) -> f64 {
    let millis = now.signed_duration_since(earlier).num_milliseconds();
    (millis.max(0) as f64) / 3_600_000.0
}
