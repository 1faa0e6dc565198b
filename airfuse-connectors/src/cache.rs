//! Response cache in front of [`Fetcher`]
//!
//! Repeated requests for the same place and pollutant set within the TTL
//! are answered from memory. Keys round coordinates to four decimals
//! (about 11 m) and ignore pollutant order and alias spelling. A hit
//! reports the location of the current request, not of the call that
//! filled the entry.
//!
//! Expired entries are swept whenever a new response is stored, so the map
//! never holds more than the keys seen within one TTL.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use airfuse_core::{request::validate_pollutants, AggregateResponse, Location};
use tokio::time::Instant;

use crate::fetch::{FetchError, Fetcher};

/// Default lifetime of a cached response
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

/// Cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CacheStats {
    /// Requests answered from the cache
    pub hits: u64,
    /// Requests that went to the sources
    pub misses: u64,
    /// Responses currently held
    pub entries: usize,
}

impl CacheStats {
    /// Fraction of requests answered from the cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    lat_e4: i64,
    lon_e4: i64,
    radius_bits: u64,
    pollutants: Vec<String>,
}

impl CacheKey {
    fn new(pollutants: Vec<String>, lat: f64, lon: f64, radius_km: f64) -> Self {
        let mut pollutants = pollutants;
        pollutants.sort();
        Self {
            lat_e4: (lat * 1e4).round() as i64,
            lon_e4: (lon * 1e4).round() as i64,
            radius_bits: radius_km.to_bits(),
            pollutants,
        }
    }
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<CacheKey, (Instant, AggregateResponse)>,
    hits: u64,
    misses: u64,
}

/// Fetcher with a TTL response cache
pub struct CachedEngine {
    fetcher: Fetcher,
    ttl: Duration,
    state: Mutex<CacheState>,
}

impl CachedEngine {
    pub fn new(fetcher: Fetcher) -> Self {
        Self::with_ttl(fetcher, DEFAULT_TTL)
    }

    pub fn with_ttl(fetcher: Fetcher, ttl: Duration) -> Self {
        Self {
            fetcher,
            ttl,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached [`Fetcher::fetch_and_fuse`]
    ///
    /// Only successful calls are stored; errors always go back to the caller.
    pub async fn fetch_and_fuse<S: AsRef<str>>(
        &self,
        pollutants: &[S],
        lat: f64,
        lon: f64,
        radius_km: f64,
    ) -> Result<AggregateResponse, FetchError> {
        let key = CacheKey::new(validate_pollutants(pollutants)?, lat, lon, radius_km);

        {
            let mut state = self.lock();
            let cached = state
                .entries
                .get(&key)
                .filter(|(stored, _)| stored.elapsed() < self.ttl)
                .map(|(_, response)| response.clone());

            match cached {
                Some(mut response) => {
                    response.location = Location::new(lat, lon);
                    state.hits += 1;
                    log::debug!("cache hit for {:?} at ({}, {})", key.pollutants, lat, lon);
                    return Ok(response);
                }
                None => {
                    state.entries.remove(&key);
                    state.misses += 1;
                }
            }
        }

        let response = self.fetcher.fetch_and_fuse(pollutants, lat, lon, radius_km).await?;

        let mut state = self.lock();
        let swept = sweep(&mut state, self.ttl);
        if swept > 0 {
            log::debug!("cache swept {} expired entries", swept);
        }
        state.entries.insert(key, (Instant::now(), response.clone()));
        drop(state);

        Ok(response)
    }

    /// Drop expired entries, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        sweep(&mut self.lock(), self.ttl)
    }

    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            entries: state.entries.len(),
        }
    }

    // Entries are replaced whole, so a poisoned map is still consistent
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn sweep(state: &mut CacheState, ttl: Duration) -> usize {
    let before = state.entries.len();
    state.entries.retain(|_, (stored, _)| stored.elapsed() < ttl);
    before - state.entries.len()
}
