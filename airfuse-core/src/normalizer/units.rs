//! Pollutant name and unit canonicalisation
//!
//! Upstream feeds spell the same species and units in many ways
//! (`pm25`, `PM2.5`, `pm_2_5`; `ug/m3`, `µg/m³`). Everything downstream
//! compares names with plain string equality, so they are unified here.

use crate::constants::pollutants::{
    POLLUTANT_ALIASES, PPB_TO_UG_M3, PPM_TO_UG_M3, UG_M3_SPELLINGS, UNIT_UG_M3,
};

/// Canonical pollutant name: alias table first, otherwise upper-case
pub fn canonical_pollutant(name: &str) -> String {
    let trimmed = name.trim();
    let lowered = trimmed.to_lowercase();

    POLLUTANT_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or_else(|| trimmed.to_uppercase())
}

/// Canonical unit spelling (only mass concentration is unified)
pub fn canonical_unit(unit: &str) -> String {
    let trimmed = unit.trim();
    let lowered = trimmed.to_lowercase();

    if UG_M3_SPELLINGS.contains(&lowered.as_str()) {
        UNIT_UG_M3.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Convert a reading to µg/m³ when a factor is known for the pair
///
/// Returns the (possibly unchanged) value and the unit it is now in.
pub fn to_mass_concentration(value: f64, unit: &str, pollutant: &str) -> (f64, String) {
    let unit = canonical_unit(unit);

    let table: &[(&str, f64)] = match unit.to_lowercase().as_str() {
        "ppb" => &PPB_TO_UG_M3,
        "ppm" => &PPM_TO_UG_M3,
        _ => return (value, unit),
    };

    match table.iter().find(|(species, _)| *species == pollutant) {
        Some((_, factor)) => (value * factor, UNIT_UG_M3.to_string()),
        None => (value, unit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pollutant_aliases() {
        assert_eq!(canonical_pollutant("pm25"), "PM2.5");
        assert_eq!(canonical_pollutant(" Ozone "), "O3");
        assert_eq!(canonical_pollutant("hcho"), "HCHO");
        assert_eq!(canonical_pollutant("Aerosol"), "AEROSOL");
    }

    #[test]
    fn unit_spellings() {
        assert_eq!(canonical_unit("ug/m3"), "µg/m³");
        assert_eq!(canonical_unit("µg/m3"), "µg/m³");
        assert_eq!(canonical_unit("ppb"), "ppb");
        assert_eq!(canonical_unit(" molecules/cm2 "), "molecules/cm2");
    }

    #[test]
    fn known_conversions() {
        let (value, unit) = to_mass_concentration(10.0, "ppb", "NO2");
        assert!((value - 18.8).abs() < 1e-9);
        assert_eq!(unit, "µg/m³");

        let (value, unit) = to_mass_concentration(2.0, "PPM", "CO");
        assert_eq!(value, 2300.0);
        assert_eq!(unit, "µg/m³");
    }

    #[test]
    fn unknown_conversion_keeps_unit() {
        let (value, unit) = to_mass_concentration(5.0, "ppb", "HCHO");
        assert_eq!(value, 5.0);
        assert_eq!(unit, "ppb");
    }
}
