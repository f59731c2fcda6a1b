//! Thins one day of observations down to a sampling interval.

use crate::types::interval::SamplingInterval;
use crate::types::observation::Observation;
use chrono::{NaiveDate, NaiveTime, TimeZone};
use std::collections::HashSet;

/// Keeps the first observation at or after each interval boundary of `date`.
///
/// Boundaries are local midnight plus whole multiples of `interval`, counted in elapsed
/// time. Midnight is placed in the UTC offset of the day's earliest observation, so on a
/// daylight-saving change the repeated (or skipped) wall-clock hour still maps to
/// distinct buckets. Each observation falls into the bucket `[boundary, next boundary)`;
/// per bucket the earliest observation survives, with ties resolved in input (fetch)
/// order. The original timestamps are kept, nothing is interpolated, and buckets without
/// data stay empty.
///
/// Observations whose station-local date is not `date` are dropped. The result is
/// ordered by timestamp.
pub fn resample_day(
    observations: Vec<Observation>,
    date: NaiveDate,
    interval: SamplingInterval,
) -> Vec<Observation> {
    let step_ms = interval.as_time_delta().num_milliseconds().max(1);

    let mut on_date: Vec<Observation> = observations
        .into_iter()
        .filter(|o| o.local_date() == date)
        .collect();
    // Stable, so equal timestamps stay in fetch order.
    on_date.sort_by_key(|o| o.timestamp());

    let Some(midnight) = on_date.first().and_then(|first| {
        first
            .timestamp()
            .offset()
            .from_local_datetime(&date.and_time(NaiveTime::MIN))
            .single()
    }) else {
        return on_date;
    };

    let mut seen_buckets = HashSet::new();
    on_date
        .into_iter()
        .filter(|o| {
            let offset_ms = (o.timestamp() - midnight).num_milliseconds();
            seen_buckets.insert(offset_ms.div_euclid(step_ms))
        })
        .collect()
}
