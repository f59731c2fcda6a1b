use crate::range::report::DateFailure;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScrapeError {
    #[error("Station id must not be empty")]
    EmptyStation,

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("All {} dates in the range failed to fetch", failures.len())]
    AllDatesFailed { failures: Vec<DateFailure> },

    #[error("Scrape was cancelled")]
    Cancelled,
}
