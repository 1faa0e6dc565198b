//! Property tests for the estimator and the scorer

mod common;

use airfuse_core::{estimate, score, EstimatorConfig, Observation};
use proptest::prelude::*;

use common::ObservationBuilder as Obs;

fn ground_set(values: &[(f64, f64)]) -> Vec<Observation> {
    values
        .iter()
        .map(|(value, km)| Obs::ground("NO2", *value).km_north(*km).build())
        .collect()
}

/// Matched observations carry distances; run them through the engine's matcher
fn matched(satellite: Option<f64>, ground: &[(f64, f64)]) -> (Option<Observation>, Vec<Observation>) {
    let mut observations = ground_set(ground);
    if let Some(value) = satellite {
        observations.push(Obs::satellite("NO2", value).km_north(5.0).build());
    }

    let request = airfuse_core::PollutantRequest::new("NO2", common::TARGET_LAT, common::TARGET_LON, 200.0);
    let found = airfuse_core::match_observations(&observations, &request);
    (found.satellite, found.ground)
}

proptest! {
    /// Property: uncertainty is never negative and intervals contain the value
    #[test]
    fn prop_uncertainty_non_negative_and_contained(
        satellite in proptest::option::of(0.0f64..500.0),
        ground in proptest::collection::vec((0.0f64..500.0, 0.0f64..150.0), 0..6)
    ) {
        let (sat, gnd) = matched(satellite, &ground);
        let config = EstimatorConfig::default();

        match estimate(sat.as_ref(), &gnd, &config) {
            Ok(est) => {
                prop_assert!(est.uncertainty >= 0.0);
                prop_assert!(est.value.is_finite());

                let ci = est.confidence_intervals(&config);
                prop_assert!(ci.p68.lower <= est.value && est.value <= ci.p68.upper);
                // Below float resolution the bounds collapse onto the value
                if est.uncertainty > 1e-9 * est.value.abs().max(1.0) {
                    prop_assert!(ci.p95.strictly_contains(&ci.p68));
                }
            }
            Err(_) => prop_assert!(sat.is_none() && gnd.is_empty()),
        }
    }

    /// Property: an agreeing station never increases the uncertainty
    #[test]
    fn prop_agreeing_station_never_increases_uncertainty(
        satellite in 1.0f64..500.0,
        value in 1.0f64..500.0,
        existing in 1usize..5,
        distances in proptest::collection::vec(0.0f64..150.0, 6)
    ) {
        let config = EstimatorConfig::default();

        let before: Vec<(f64, f64)> = distances[..existing].iter().map(|km| (value, *km)).collect();
        let after: Vec<(f64, f64)> = distances[..=existing].iter().map(|km| (value, *km)).collect();

        let (sat, gnd_before) = matched(Some(satellite), &before);
        let (_, gnd_after) = matched(Some(satellite), &after);

        let u_before = estimate(sat.as_ref(), &gnd_before, &config).unwrap().uncertainty;
        let u_after = estimate(sat.as_ref(), &gnd_after, &config).unwrap().uncertainty;

        prop_assert!(u_after <= u_before + 1e-12, "{} > {}", u_after, u_before);
    }

    /// Property: score never decreases as stations are added at fixed spread
    #[test]
    fn prop_score_monotonic_in_station_count(
        satellite_present in any::<bool>(),
        count in 0usize..10,
        coverage in 0.0f64..300.0
    ) {
        let fewer = score(satellite_present, count, coverage);
        let more = score(satellite_present, count + 1, coverage);

        prop_assert!(more.score >= fewer.score);
        prop_assert!((0.0..=1.0).contains(&more.score));
        prop_assert!(more.level >= fewer.level);
    }
}
