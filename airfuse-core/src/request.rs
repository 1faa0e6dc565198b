//! Fusion requests
//!
//! Two shapes live here:
//! - [`PollutantRequest`]: one unit of fusion work, created by the
//!   orchestrator for each requested pollutant.
//! - [`FusionRequest`]: the service-level request body (location, pollutant
//!   list, radius, raw observations), with the validation rules the HTTP
//!   layer applies before handing work to the engine.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        geo::{DEFAULT_RADIUS_KM, LAT_MAX, LAT_MIN, LON_MAX, LON_MIN, MAX_RADIUS_KM, MIN_RADIUS_KM},
        pollutants::{DEFAULT_POLLUTANTS, SUPPORTED_POLLUTANTS},
    },
    errors::RequestError,
    normalizer::{canonical_pollutant, RawRecord},
};

/// One pollutant to fuse at one location
#[derive(Debug, Clone, PartialEq)]
pub struct PollutantRequest {
    pub pollutant: String,
    pub lat: f64,
    pub lon: f64,
    pub radius_km: f64,
}

impl PollutantRequest {
    pub fn new(pollutant: impl Into<String>, lat: f64, lon: f64, radius_km: f64) -> Self {
        Self {
            pollutant: pollutant.into(),
            lat,
            lon,
            radius_km,
        }
    }
}

/// Check a pollutant list and return it with canonical names
///
/// Rejects empty lists, blank names and duplicates (after alias
/// resolution, so `pm25` and `PM2.5` collide).
pub fn validate_pollutants<S: AsRef<str>>(pollutants: &[S]) -> Result<Vec<String>, RequestError> {
    if pollutants.is_empty() {
        return Err(RequestError::EmptyPollutantList);
    }

    let mut seen = HashSet::with_capacity(pollutants.len());
    let mut canonical = Vec::with_capacity(pollutants.len());

    for name in pollutants {
        let name = name.as_ref();
        if name.trim().is_empty() {
            return Err(RequestError::BlankPollutant);
        }

        let resolved = canonical_pollutant(name);
        if !seen.insert(resolved.clone()) {
            return Err(RequestError::DuplicatePollutant(resolved));
        }
        canonical.push(resolved);
    }

    Ok(canonical)
}

/// Check the request location and the ground search radius
///
/// The engine accepts any positive, finite radius; the service bounds
/// are enforced by [`FusionRequest::validate`].
pub fn validate_location(lat: f64, lon: f64, radius_km: f64) -> Result<(), RequestError> {
    if !lat.is_finite() || !lon.is_finite() {
        return Err(RequestError::NonFiniteCoordinate { lat, lon });
    }
    if !(LAT_MIN..=LAT_MAX).contains(&lat) {
        return Err(RequestError::LatitudeOutOfRange(lat));
    }
    if !(LON_MIN..=LON_MAX).contains(&lon) {
        return Err(RequestError::LongitudeOutOfRange(lon));
    }
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(RequestError::InvalidRadius {
            radius_km,
            min_km: 0.0,
            max_km: f64::INFINITY,
        });
    }
    Ok(())
}

/// Split a comma-separated pollutant parameter (`"NO2, o3,pm25"`)
pub fn parse_pollutant_list(param: &str) -> Vec<String> {
    param
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn default_pollutants() -> Vec<String> {
    DEFAULT_POLLUTANTS.iter().map(|name| name.to_string()).collect()
}

fn default_radius_km() -> f64 {
    DEFAULT_RADIUS_KM
}

/// Raw observations shipped inside a request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawObservations {
    #[serde(default)]
    pub satellite: Vec<RawRecord>,
    #[serde(default)]
    pub ground: Vec<RawRecord>,
}

/// Service-level fusion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionRequest {
    pub lat: f64,
    pub lon: f64,
    #[serde(default = "default_pollutants")]
    pub pollutants: Vec<String>,
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,
    #[serde(default)]
    pub observations: RawObservations,
}

/// A request that passed service validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub lat: f64,
    pub lon: f64,
    /// Canonical, supported, de-duplicated pollutant names
    pub pollutants: Vec<String>,
    pub radius_km: f64,
}

impl FusionRequest {
    /// Request for the default pollutants and radius
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            pollutants: default_pollutants(),
            radius_km: DEFAULT_RADIUS_KM,
            observations: RawObservations::default(),
        }
    }

    pub fn with_pollutants<S: Into<String>>(mut self, pollutants: impl IntoIterator<Item = S>) -> Self {
        self.pollutants = pollutants.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    pub fn with_observations(mut self, observations: RawObservations) -> Self {
        self.observations = observations;
        self
    }

    /// Apply the service contract
    ///
    /// - latitude in [-90, 90], longitude in [-180, 180]
    /// - radius in [1, 200] km
    /// - pollutant names canonicalised, unsupported ones dropped,
    ///   failing if nothing supported remains
    pub fn validate(&self) -> Result<ValidatedRequest, RequestError> {
        validate_location(self.lat, self.lon, self.radius_km)?;

        if !(MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&self.radius_km) {
            return Err(RequestError::InvalidRadius {
                radius_km: self.radius_km,
                min_km: MIN_RADIUS_KM,
                max_km: MAX_RADIUS_KM,
            });
        }

        let supported: Vec<String> = self
            .pollutants
            .iter()
            .filter(|name| !name.trim().is_empty())
            .map(|name| canonical_pollutant(name))
            .filter(|name| SUPPORTED_POLLUTANTS.contains(&name.as_str()))
            .collect();

        if supported.is_empty() {
            return Err(RequestError::NoSupportedPollutants);
        }

        // Duplicates are a caller mistake even when they are supported
        let pollutants = validate_pollutants(&supported)?;

        Ok(ValidatedRequest {
            lat: self.lat,
            lon: self.lon,
            pollutants,
            radius_km: self.radius_km,
        })
    }
}
