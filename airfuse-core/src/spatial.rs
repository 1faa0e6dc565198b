//! Spatial Matcher
//!
//! ## Overview
//!
//! Given a target point, a search radius and a pollutant, the matcher picks
//! the observations that are allowed to contribute to the fused value:
//!
//! ```text
//!                 radius_km
//!            ┌───────────────┐
//!            │   G₁    G₂    │      G  ground stations: all inside the radius,
//!     S ·    │      ✕        │         sorted nearest first
//!            │  G₃           │      S  satellite pixels: the single nearest
//!            └───────────────┘         usable one, radius ignored
//!                 G₄ (dropped)
//! ```
//!
//! Satellites have coarse but wide coverage, so the nearest pixel is taken
//! wherever it is. Ground stations are point measurements and only count
//! within the radius.
//!
//! ## Determinism
//!
//! Ties in distance are broken by input order: the ground list uses a
//! stable sort and the satellite scan keeps the first of equally near
//! pixels. Nothing in the matcher is random.
//!
//! An empty match (no satellite, no stations) is not an error here; the
//! estimator decides what to do with it.

use crate::{
    constants::geo::EARTH_RADIUS_KM,
    observation::Observation,
    request::PollutantRequest,
};

/// Great-circle distance in kilometres (haversine formula)
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    // Clamp guards against rounding pushing `a` past 1 for antipodal points
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Observations selected for one pollutant at one location
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpatialMatch {
    /// Nearest usable satellite observation, distance attached
    pub satellite: Option<Observation>,
    /// Ground observations within the radius, nearest first, distances attached
    pub ground: Vec<Observation>,
}

impl SpatialMatch {
    /// Neither kind of observation was found
    pub fn is_empty(&self) -> bool {
        self.satellite.is_none() && self.ground.is_empty()
    }

    /// Distance of the farthest contributing ground station (0 without stations)
    pub fn spatial_coverage_km(&self) -> f64 {
        self.ground
            .iter()
            .filter_map(Observation::distance_km)
            .fold(0.0, f64::max)
    }

    /// Every contributing observation, satellite first
    pub fn contributing(&self) -> impl Iterator<Item = &Observation> {
        self.satellite.iter().chain(self.ground.iter())
    }
}

/// Select the satellite and ground observations relevant to `request`
pub fn match_observations(observations: &[Observation], request: &PollutantRequest) -> SpatialMatch {
    let mut nearest_satellite: Option<(f64, &Observation)> = None;
    let mut ground: Vec<(f64, &Observation)> = Vec::new();

    for obs in observations.iter().filter(|obs| obs.pollutant() == request.pollutant) {
        let distance = haversine_km(request.lat, request.lon, obs.lat(), obs.lon());

        if obs.is_satellite() {
            if !obs.quality().is_usable() {
                continue;
            }
            // Strictly nearer only, so the earliest of equal pixels wins
            let nearer = nearest_satellite.map_or(true, |(best, _)| distance < best);
            if nearer {
                nearest_satellite = Some((distance, obs));
            }
        } else if distance <= request.radius_km {
            ground.push((distance, obs));
        }
    }

    // `sort_by` is stable: equal distances keep input order
    ground.sort_by(|a, b| a.0.total_cmp(&b.0));

    log::debug!(
        "{}: matched satellite={} ground={} within {} km",
        request.pollutant,
        nearest_satellite.is_some(),
        ground.len(),
        request.radius_km
    );

    SpatialMatch {
        satellite: nearest_satellite.map(|(distance, obs)| obs.at_distance(distance)),
        ground: ground
            .into_iter()
            .map(|(distance, obs)| obs.at_distance(distance))
            .collect(),
    }
}
