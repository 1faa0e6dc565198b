//! Loading engine configuration from disk

mod common;

use std::io::Write;

use airfuse_core::{ConfigError, FixedClock, FusionConfig, FusionEngine, QualityLevel};
use tempfile::NamedTempFile;

use common::{reference_time, ObservationBuilder as Obs, TARGET_LAT, TARGET_LON};

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_overrides_from_file() {
    let file = write_config(
        r#"{
            "estimator": { "ci95_z": 2.0 },
            "quality": { "excellent_threshold": 0.9 },
            "raw_measurement_limit": 1
        }"#,
    );

    let config = FusionConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.estimator.ci95_z, 2.0);
    assert_eq!(config.estimator.idw_epsilon_km, 0.1);
    assert_eq!(config.raw_measurement_limit, 1);

    let engine = FusionEngine::new(config).with_clock(FixedClock::new(reference_time()));
    let observations = vec![
        Obs::ground("NO2", 20.0).km_north(1.0).build(),
        Obs::ground("NO2", 22.0).km_north(3.0).build(),
        Obs::ground("NO2", 24.0).km_north(10.0).build(),
    ];

    let response = engine
        .fuse_all(&["NO2"], TARGET_LAT, TARGET_LON, 50.0, &observations)
        .unwrap();
    let result = response.get("NO2").unwrap().result().unwrap();

    // 0.8 no longer reaches the raised threshold
    assert_eq!(result.quality_score, 0.8);
    assert_eq!(result.quality_level, QualityLevel::Good);
    assert_eq!(result.raw_measurements.len(), 1);

    let ci = &result.confidence_intervals;
    assert!((ci.p95.upper - (result.fused_value + 2.0 * result.uncertainty)).abs() < 1e-9);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = FusionConfig::from_json_file(dir.path().join("absent.json"));

    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_invalid_table_in_file() {
    let file = write_config(r#"{ "quality": { "fair_threshold": 0.7 } }"#);

    let result = FusionConfig::from_json_file(file.path());
    assert!(matches!(result, Err(ConfigError::Invalid { .. })));
}
