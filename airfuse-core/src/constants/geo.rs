//! Earth Model and Spatial Limits

/// Mean Earth radius used by the haversine distance, in kilometres.
///
/// Source: IUGG mean radius R1
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Ground-station search radius when the caller gives none.
pub const DEFAULT_RADIUS_KM: f64 = 50.0;

/// Smallest search radius accepted from a service request.
pub const MIN_RADIUS_KM: f64 = 1.0;

/// Largest search radius accepted from a service request.
pub const MAX_RADIUS_KM: f64 = 200.0;

/// Latitude bounds in degrees.
pub const LAT_MIN: f64 = -90.0;
/// Upper latitude bound in degrees.
pub const LAT_MAX: f64 = 90.0;

/// Longitude bounds in degrees.
pub const LON_MIN: f64 = -180.0;
/// Upper longitude bound in degrees.
pub const LON_MAX: f64 = 180.0;
