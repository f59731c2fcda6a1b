//! The outcome of a range scrape: the dataset plus the dates that could not be fetched.

use crate::types::dataset::Dataset;
use crate::weather_data::error::FetchErrorKind;
use chrono::NaiveDate;
use std::fmt;

/// A date that ultimately failed, after any retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateFailure {
    pub date: NaiveDate,
    pub kind: FetchErrorKind,
    /// How many fetches were made for this date before giving up.
    pub attempts: u32,
}

impl fmt::Display for DateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} after {} attempt{}",
            self.date,
            self.kind,
            self.attempts,
            if self.attempts == 1 { "" } else { "s" }
        )
    }
}

/// A successful range scrape.
///
/// `failures` is non-empty on partial success. A date with no readings is not a failure:
/// it simply contributes nothing to `dataset`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeReport {
    pub dataset: Dataset,
    /// Failed dates in ascending order.
    pub failures: Vec<DateFailure>,
}

impl ScrapeReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
