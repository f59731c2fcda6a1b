//! Serde models for the PWS history API response and their conversion into [`Observation`]s.

use crate::types::observation::Observation;
use crate::types::units::Units;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Numeric top-level fields that describe the record rather than the weather.
const BOOKKEEPING_FIELDS: [&str; 4] = ["epoch", "lat", "lon", "qcStatus"];

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryResponse {
    #[serde(default)]
    pub observations: Vec<RawObservation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawObservation {
    pub obs_time_utc: String,
    pub obs_time_local: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawObservation {
    /// Converts one API record into an [`Observation`] for `station`.
    ///
    /// The station offset is not sent explicitly, so it is derived from the difference
    /// between the local and UTC observation times.
    pub(crate) fn into_observation(self, station: &str, units: Units) -> Result<Observation, String> {
        let utc = DateTime::parse_from_rfc3339(&self.obs_time_utc)
            .map_err(|e| format!("invalid obsTimeUtc '{}': {}", self.obs_time_utc, e))?
            .naive_utc();
        let local = NaiveDateTime::parse_from_str(&self.obs_time_local, LOCAL_TIME_FORMAT)
            .map_err(|e| format!("invalid obsTimeLocal '{}': {}", self.obs_time_local, e))?;

        let timestamp = local_timestamp(local, utc)
            .ok_or_else(|| format!("inconsistent observation times {} / {}", local, utc))?;

        let mut measurements = BTreeMap::new();
        for (name, value) in self.fields {
            match value {
                Value::Object(block) if name == units.block_name() => {
                    measurements.extend(
                        block
                            .into_iter()
                            .filter_map(|(name, value)| value.as_f64().map(|v| (name, v))),
                    );
                }
                Value::Number(number) if !BOOKKEEPING_FIELDS.contains(&name.as_str()) => {
                    if let Some(v) = number.as_f64() {
                        measurements.insert(name, v);
                    }
                }
                _ => {}
            }
        }

        Ok(Observation::new(station, timestamp, measurements))
    }
}

fn local_timestamp(local: NaiveDateTime, utc: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    // Offsets are whole minutes; round away sub-minute jitter between the two fields.
    let offset_seconds = (local - utc).num_seconds();
    let offset_minutes = (offset_seconds + 30).div_euclid(60);
    let offset = FixedOffset::east_opt(i32::try_from(offset_minutes * 60).ok()?)?;
    offset.from_local_datetime(&local).single()
}
