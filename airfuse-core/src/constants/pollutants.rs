//! Pollutant Catalogue, Aliases and Unit Conversions

/// Pollutants a service request may ask for.
pub const SUPPORTED_POLLUTANTS: [&str; 7] = ["NO2", "O3", "PM2.5", "PM10", "HCHO", "SO2", "CO"];

/// Pollutants fused when a request names none.
pub const DEFAULT_POLLUTANTS: [&str; 5] = ["NO2", "O3", "PM2.5", "PM10", "HCHO"];

/// Species the geostationary instrument retrieves.
///
/// Particulates, SO2 and CO come from ground networks only, so the
/// satellite source is never queried for them.
pub const SATELLITE_POLLUTANTS: [&str; 4] = ["NO2", "O3", "HCHO", "AEROSOL"];

/// Lower-case aliases seen in upstream feeds, mapped to canonical names.
pub const POLLUTANT_ALIASES: [(&str, &str); 14] = [
    ("pm25", "PM2.5"),
    ("pm2.5", "PM2.5"),
    ("pm_2_5", "PM2.5"),
    ("pm10", "PM10"),
    ("pm_10", "PM10"),
    ("no2", "NO2"),
    ("nitrogen_dioxide", "NO2"),
    ("o3", "O3"),
    ("ozone", "O3"),
    ("so2", "SO2"),
    ("sulfur_dioxide", "SO2"),
    ("co", "CO"),
    ("carbon_monoxide", "CO"),
    ("formaldehyde", "HCHO"),
];

/// Canonical mass-concentration unit.
pub const UNIT_UG_M3: &str = "µg/m³";

/// Spellings of the mass-concentration unit found in feeds (lower-case).
pub const UG_M3_SPELLINGS: [&str; 5] = ["µg/m³", "ug/m3", "µg/m3", "μg/m³", "ug/m³"];

/// ppb → µg/m³ factors at 25 °C and 1 atm.
pub const PPB_TO_UG_M3: [(&str, f64); 3] = [("NO2", 1.88), ("O3", 1.96), ("SO2", 2.62)];

/// ppm → µg/m³ factors at 25 °C and 1 atm.
pub const PPM_TO_UG_M3: [(&str, f64); 1] = [("CO", 1150.0)];
