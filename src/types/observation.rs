//! Defines the `Observation` structure, a single timestamped reading from a weather station.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One weather reading from a station.
///
/// The timestamp is kept in the station's local time together with its UTC offset,
/// so both the wall-clock date (used for day boundaries and resampling) and the
/// absolute instant (used for ordering) are available.
///
/// Observations are immutable once created: they are built by a fetcher and only
/// read afterwards.
///
/// # Examples
///
/// ```
/// use weatherscrape::Observation;
/// use chrono::DateTime;
///
/// let ts = DateTime::parse_from_rfc3339("2020-12-31T00:04:57-06:00").unwrap();
/// let obs = Observation::new("KILCHICA679", ts, [("tempAvg", -1.2), ("humidityAvg", 88.0)]);
///
/// assert_eq!(obs.station(), "KILCHICA679");
/// assert_eq!(obs.measurement("tempAvg"), Some(-1.2));
/// assert_eq!(obs.measurement("windspeedAvg"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    station: String,
    timestamp: DateTime<FixedOffset>,
    measurements: BTreeMap<String, f64>,
}

impl Observation {
    /// Creates a new observation from any iterable of `(name, value)` pairs.
    ///
    /// When a measurement name occurs more than once, the last value wins.
    pub fn new<K, I>(station: impl Into<String>, timestamp: DateTime<FixedOffset>, measurements: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        Self {
            station: station.into(),
            timestamp,
            measurements: measurements
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }

    /// The opaque identifier of the station that produced this reading.
    pub fn station(&self) -> &str {
        &self.station
    }

    /// The station-local timestamp of the reading.
    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// The calendar date of the reading in station-local time.
    pub fn local_date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    pub fn measurements(&self) -> &BTreeMap<String, f64> {
        &self.measurements
    }

    pub fn measurement(&self, name: &str) -> Option<f64> {
        self.measurements.get(name).copied()
    }
}
