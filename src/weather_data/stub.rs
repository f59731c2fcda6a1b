//! A scriptable in-memory [`DayFetcher`] used by the unit tests.

use crate::types::observation::Observation;
use crate::weather_data::error::FetchError;
use crate::weather_data::fetcher::DayFetcher;
use chrono::{DateTime, NaiveDate};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

type Hook = Box<dyn Fn(NaiveDate) + Send + Sync>;

/// Replies with scripted results per date. The last scripted result for a date repeats
/// forever; unscripted dates are empty successes.
#[derive(Default)]
pub(crate) struct StubFetcher {
    responses: Mutex<HashMap<NaiveDate, VecDeque<Result<Vec<Observation>, FetchError>>>>,
    calls: Mutex<Vec<NaiveDate>>,
    hang: HashSet<NaiveDate>,
    on_call: Option<Hook>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, date: NaiveDate, result: Result<Vec<Observation>, FetchError>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(date)
            .or_default()
            .push_back(result);
        self
    }

    /// Calls to this date never complete.
    pub fn hanging_on(mut self, date: NaiveDate) -> Self {
        self.hang.insert(date);
        self
    }

    /// Runs `hook` at the start of every call.
    pub fn on_call(mut self, hook: impl Fn(NaiveDate) + Send + Sync + 'static) -> Self {
        self.on_call = Some(Box::new(hook));
        self
    }

    pub fn calls(&self) -> Vec<NaiveDate> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn next_result(&self, date: NaiveDate) -> Result<Vec<Observation>, FetchError> {
        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(&date) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap_or(Ok(Vec::new())),
            None => Ok(Vec::new()),
        }
    }
}

impl DayFetcher for StubFetcher {
    async fn fetch_day(&self, _station: &str, date: NaiveDate) -> Result<Vec<Observation>, FetchError> {
        self.calls.lock().unwrap().push(date);
        if let Some(hook) = &self.on_call {
            hook(date);
        }
        let result = self.next_result(date);
        tokio::task::yield_now().await;
        if self.hang.contains(&date) {
            std::future::pending::<()>().await;
        }
        result
    }
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// An observation at an RFC 3339 timestamp with a single `tempAvg` measurement.
pub(crate) fn obs(station: &str, rfc3339: &str, temp: f64) -> Observation {
    Observation::new(
        station,
        DateTime::parse_from_rfc3339(rfc3339).unwrap(),
        [("tempAvg", temp)],
    )
}

/// One observation every `step_minutes` over a whole day at UTC-6.
pub(crate) fn day_of(station: &str, day: NaiveDate, step_minutes: u32) -> Vec<Observation> {
    (0..24 * 60)
        .step_by(step_minutes as usize)
        .map(|minute| {
            let ts = format!("{}T{:02}:{:02}:00-06:00", day, minute / 60, minute % 60);
            obs(station, &ts, f64::from(minute))
        })
        .collect()
}

pub(crate) fn unavailable(date: NaiveDate) -> FetchError {
    FetchError::SourceUnavailable {
        station: "KTEST1".to_string(),
        date,
        reason: "stubbed outage".to_string(),
    }
}

pub(crate) fn rate_limited(date: NaiveDate) -> FetchError {
    FetchError::RateLimited {
        station: "KTEST1".to_string(),
        date,
        retry_after: None,
    }
}
