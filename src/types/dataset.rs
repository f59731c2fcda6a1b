//! Contains the `Dataset` structure, the ordered and deduplicated result of a range scrape.

use crate::types::observation::Observation;
use chrono::{DateTime, FixedOffset};
use std::collections::{BTreeSet, HashSet};

/// An immutable, time-ordered series of observations.
///
/// Invariants upheld by [`Dataset::from_observations`]:
/// * observations are sorted by timestamp (the absolute instant),
/// * no two observations share the same `(station, timestamp)`; the first one in
///   input order is kept.
///
/// # Examples
///
/// ```
/// use weatherscrape::{Dataset, Observation};
/// use chrono::DateTime;
///
/// let at = |s| DateTime::parse_from_rfc3339(s).unwrap();
/// let dataset = Dataset::from_observations(vec![
///     Observation::new("K1", at("2021-01-01T00:10:00-06:00"), [("tempAvg", 2.0)]),
///     Observation::new("K1", at("2021-01-01T00:05:00-06:00"), [("tempAvg", 1.0)]),
///     Observation::new("K1", at("2021-01-01T00:05:00-06:00"), [("tempAvg", 9.0)]),
/// ]);
///
/// assert_eq!(dataset.len(), 2);
/// assert_eq!(dataset.observations()[0].measurement("tempAvg"), Some(1.0));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    observations: Vec<Observation>,
}

impl Dataset {
    pub fn from_observations(mut observations: Vec<Observation>) -> Self {
        // Stable, so among equal timestamps the input order decides which one is kept.
        observations.sort_by_key(|o| o.timestamp());

        let mut seen: HashSet<(String, DateTime<FixedOffset>)> = HashSet::new();
        observations.retain(|o| seen.insert((o.station().to_string(), o.timestamp())));

        Self { observations }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Every measurement name that occurs in at least one observation, sorted.
    pub fn measurement_names(&self) -> BTreeSet<&str> {
        self.observations
            .iter()
            .flat_map(|o| o.measurements().keys().map(String::as_str))
            .collect()
    }

    pub fn first_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        self.observations.first().map(Observation::timestamp)
    }

    pub fn last_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        self.observations.last().map(Observation::timestamp)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather_data::stub::obs;

    #[test]
    fn test_same_instant_different_offsets_is_a_duplicate() {
        // 06:00 UTC written in two offsets.
        let dataset = Dataset::from_observations(vec![
            obs("K1", "2021-01-01T00:00:00-06:00", 1.0),
            obs("K1", "2021-01-01T06:00:00+00:00", 2.0),
        ]);
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.observations()[0].measurement("tempAvg"), Some(1.0));
    }

    #[test]
    fn test_same_timestamp_different_stations_are_kept() {
        let dataset = Dataset::from_observations(vec![
            obs("K1", "2021-01-01T00:00:00-06:00", 1.0),
            obs("K2", "2021-01-01T00:00:00-06:00", 2.0),
        ]);
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_measurement_names_is_union() {
        let at = |s| DateTime::parse_from_rfc3339(s).unwrap();
        let dataset = Dataset::from_observations(vec![
            Observation::new("K1", at("2021-01-01T00:00:00Z"), [("tempAvg", 1.0)]),
            Observation::new("K1", at("2021-01-01T00:05:00Z"), [("humidityAvg", 80.0)]),
        ]);
        let names: Vec<_> = dataset.measurement_names().into_iter().collect();
        assert_eq!(names, ["humidityAvg", "tempAvg"]);
        assert_eq!(dataset.first_timestamp(), Some(at("2021-01-01T00:00:00Z")));
        assert_eq!(dataset.last_timestamp(), Some(at("2021-01-01T00:05:00Z")));
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset::default();
        assert!(dataset.is_empty());
        assert!(dataset.measurement_names().is_empty());
        assert_eq!(dataset.first_timestamp(), None);
    }
}
