use crate::types::observation::Observation;
use crate::weather_data::error::FetchError;
use chrono::NaiveDate;
use std::future::Future;

/// Retrieves the observations one station reported on one calendar date.
///
/// Implementations must:
/// * only return observations whose station-local date equals `date`,
/// * treat "no readings that day" as success with an empty `Vec`,
/// * report throttling as [`FetchError::RateLimited`] so callers can back off,
/// * not mutate shared state, so the same day can be fetched again or concurrently.
pub trait DayFetcher: Send + Sync {
    fn fetch_day(
        &self,
        station: &str,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Observation>, FetchError>> + Send;
}

impl<F: DayFetcher> DayFetcher for &F {
    fn fetch_day(
        &self,
        station: &str,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Observation>, FetchError>> + Send {
        (**self).fetch_day(station, date)
    }
}
