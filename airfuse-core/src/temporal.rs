//! Temporal context of a fused result
//!
//! Ages are measured against the response timestamp, in hours, rounded to
//! one decimal. Freshness is graded on the average age.

use serde::Serialize;

use crate::{observation::Observation, stats::round_to, time::{age_hours, Timestamp}};

/// Freshness grade of the contributing observations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// Average age up to 1 h
    VeryFresh,
    /// Up to 3 h
    Fresh,
    /// Up to 6 h
    Moderate,
    /// Up to 24 h
    Old,
    VeryOld,
}

impl Freshness {
    pub fn from_age_hours(hours: f64) -> Self {
        if hours <= 1.0 {
            Self::VeryFresh
        } else if hours <= 3.0 {
            Self::Fresh
        } else if hours <= 6.0 {
            Self::Moderate
        } else if hours <= 24.0 {
            Self::Old
        } else {
            Self::VeryOld
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemporalContext {
    pub average_age_hours: f64,
    pub oldest_measurement_hours: f64,
    pub newest_measurement_hours: f64,
    pub temporal_spread_hours: f64,
    pub freshness_level: Freshness,
}

impl TemporalContext {
    /// Summarise observation ages relative to `now`, `None` without observations
    pub fn analyze<'a>(observations: impl IntoIterator<Item = &'a Observation>, now: Timestamp) -> Option<Self> {
        let ages: Vec<f64> = observations
            .into_iter()
            .map(|obs| age_hours(obs.timestamp(), now))
            .collect();

        let average = crate::stats::mean(&ages)?;
        let oldest = ages.iter().copied().fold(f64::MIN, f64::max);
        let newest = ages.iter().copied().fold(f64::MAX, f64::min);

        Some(Self {
            average_age_hours: round_to(average, 1),
            oldest_measurement_hours: round_to(oldest, 1),
            newest_measurement_hours: round_to(newest, 1),
            temporal_spread_hours: round_to(oldest - newest, 1),
            freshness_level: Freshness::from_age_hours(average),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::SourceKind;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn ages_and_freshness() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let observations: Vec<Observation> = [30, 90, 240]
            .iter()
            .map(|minutes| {
                Observation::new(
                    SourceKind::Ground,
                    "O3",
                    50.0,
                    "µg/m³",
                    0.0,
                    0.0,
                    now - Duration::minutes(*minutes),
                )
                .unwrap()
            })
            .collect();

        let context = TemporalContext::analyze(&observations, now).unwrap();

        assert_eq!(context.average_age_hours, 2.0);
        assert_eq!(context.oldest_measurement_hours, 4.0);
        assert_eq!(context.newest_measurement_hours, 0.5);
        assert_eq!(context.temporal_spread_hours, 3.5);
        assert_eq!(context.freshness_level, Freshness::Fresh);
    }

    #[test]
    fn empty_has_no_context() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert!(TemporalContext::analyze(&[], now).is_none());
    }

    #[test]
    fn freshness_boundaries() {
        assert_eq!(Freshness::from_age_hours(1.0), Freshness::VeryFresh);
        assert_eq!(Freshness::from_age_hours(6.0), Freshness::Moderate);
        assert_eq!(Freshness::from_age_hours(24.5), Freshness::VeryOld);
        assert_eq!(
            serde_json::to_string(&Freshness::VeryFresh).unwrap(),
            "\"very_fresh\""
        );
    }
}
