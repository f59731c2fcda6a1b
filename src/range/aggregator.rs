//! Orchestrates per-date fetches over a date range into one [`Dataset`].

use crate::range::error::ScrapeError;
use crate::range::report::{DateFailure, ScrapeReport};
use crate::range::resample::resample_day;
use crate::range::retry::RetryPolicy;
use crate::types::dataset::Dataset;
use crate::types::date_range::DateRange;
use crate::types::interval::SamplingInterval;
use crate::types::observation::Observation;
use crate::weather_data::error::FetchError;
use crate::weather_data::fetcher::DayFetcher;
use bon::bon;
use chrono::NaiveDate;
use futures_util::{stream, StreamExt};
use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

pub const DEFAULT_CONCURRENCY: usize = 4;

/// What happened to one date after all attempts.
struct DayOutcome {
    date: NaiveDate,
    result: Result<Vec<Observation>, DateFailure>,
}

/// Fetches every date of a range through a [`DayFetcher`] and merges the results.
///
/// * Dates are fetched with at most `concurrency` requests in flight.
/// * Throttled dates are retried according to the [`RetryPolicy`]; the backoff sleeps
///   inside that date's own future, so other dates keep going.
/// * Any other failure marks the date as failed right away without aborting the range.
/// * Results are merged by a single owner once every date has finished, then resampled,
///   sorted and deduplicated.
///
/// # Examples
///
/// ```no_run
/// use weatherscrape::{PwsHistoryFetcher, RangeAggregator, ScrapeError};
/// use chrono::NaiveDate;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = PwsHistoryFetcher::builder().api_key("my-api-key").build()?;
/// let aggregator = RangeAggregator::builder().fetcher(fetcher).concurrency(8).build();
///
/// let report = aggregator
///     .scrape_range()
///     .station("KILCHICA679")
///     .start(NaiveDate::from_ymd_opt(2020, 12, 31).unwrap())
///     .end(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap())
///     .interval("5min".parse()?)
///     .call()
///     .await?;
///
/// println!("{} rows, {} failed dates", report.dataset.len(), report.failures.len());
/// # Ok(())
/// # }
/// ```
pub struct RangeAggregator<F> {
    fetcher: F,
    concurrency: usize,
    retry: RetryPolicy,
}

#[bon]
impl<F: DayFetcher> RangeAggregator<F> {
    /// Creates an aggregator. Defaults: [`DEFAULT_CONCURRENCY`] and [`RetryPolicy::default`].
    /// A concurrency of zero is treated as one.
    #[builder]
    pub fn new(fetcher: F, concurrency: Option<usize>, retry: Option<RetryPolicy>) -> Self {
        Self {
            fetcher,
            concurrency: concurrency.unwrap_or(DEFAULT_CONCURRENCY).max(1),
            retry: retry.unwrap_or_default(),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Scrapes `station` for every date in `start..=end`.
    ///
    /// # Arguments
    ///
    /// * `.station(&str)`: **Required.** The station id; must not be blank.
    /// * `.start(NaiveDate)` / `.end(NaiveDate)`: **Required.** Inclusive bounds, `start <= end`.
    /// * `.interval(SamplingInterval)`: Optional. Defaults to 5 minutes.
    /// * `.cancel(CancellationToken)`: Optional. Cancelling it abandons in-flight fetches.
    ///
    /// # Errors
    ///
    /// * [`ScrapeError::EmptyStation`] / [`ScrapeError::InvalidRange`] before any fetch.
    /// * [`ScrapeError::AllDatesFailed`] when not a single date could be fetched.
    /// * [`ScrapeError::Cancelled`] when the token fires; no partial dataset is returned.
    #[builder]
    pub async fn scrape_range(
        &self,
        station: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Option<SamplingInterval>,
        cancel: Option<CancellationToken>,
    ) -> Result<ScrapeReport, ScrapeError> {
        if station.trim().is_empty() {
            return Err(ScrapeError::EmptyStation);
        }
        let range = DateRange::new(start, end)?;
        let interval = interval.unwrap_or_default();
        let cancel = cancel.unwrap_or_default();

        if cancel.is_cancelled() {
            return Err(ScrapeError::Cancelled);
        }

        info!(
            "Scraping station {} for {} ({} dates) at {} intervals, {} concurrent fetches",
            station,
            range,
            range.len(),
            interval,
            self.concurrency
        );

        let outcomes = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Scrape of station {} for {} cancelled", station, range);
                return Err(ScrapeError::Cancelled);
            }
            outcomes = self.fetch_all(station, range) => outcomes,
        };

        let report = assemble(outcomes, interval)?;
        match (report.dataset.first_timestamp(), report.dataset.last_timestamp()) {
            (Some(first), Some(last)) => info!(
                "Scraped {} observations for station {} from {} to {}, {} of {} dates failed",
                report.dataset.len(),
                station,
                first,
                last,
                report.failures.len(),
                range.len()
            ),
            _ => info!(
                "Scraped no observations for station {}, {} of {} dates failed",
                station,
                report.failures.len(),
                range.len()
            ),
        }
        Ok(report)
    }

    async fn fetch_all(&self, station: &str, range: DateRange) -> Vec<DayOutcome> {
        stream::iter(range.days())
            .map(|date| self.fetch_with_retry(station, date))
            .buffer_unordered(self.concurrency)
            .collect()
            .await
    }

    async fn fetch_with_retry(&self, station: &str, date: NaiveDate) -> DayOutcome {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.fetcher.fetch_day(station, date).await {
                Ok(observations) => {
                    debug!(
                        "Fetched {} observations for {} on attempt {}",
                        observations.len(),
                        date,
                        attempts
                    );
                    return DayOutcome {
                        date,
                        result: Ok(observations),
                    };
                }
                Err(FetchError::RateLimited { retry_after, .. })
                    if self.retry.allows_another(attempts) =>
                {
                    let delay = self.retry.delay_before(attempts + 1, retry_after);
                    warn!(
                        "Rate limited on {} (attempt {}/{}), backing off for {:?}",
                        date, attempts, self.retry.max_attempts, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    warn!("Giving up on {} after {} attempt(s): {}", date, attempts, e);
                    return DayOutcome {
                        date,
                        result: Err(DateFailure {
                            date,
                            kind: e.kind(),
                            attempts,
                        }),
                    };
                }
            }
        }
    }
}

/// Single-owner merge of all per-date outcomes.
fn assemble(
    mut outcomes: Vec<DayOutcome>,
    interval: SamplingInterval,
) -> Result<ScrapeReport, ScrapeError> {
    // Completion order depends on scheduling; date order does not.
    outcomes.sort_by_key(|o| o.date);
    let total = outcomes.len();

    let mut observations = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome.result {
            Ok(day) => observations.extend(resample_day(day, outcome.date, interval)),
            Err(failure) => failures.push(failure),
        }
    }

    if failures.len() == total {
        return Err(ScrapeError::AllDatesFailed { failures });
    }

    Ok(ScrapeReport {
        dataset: Dataset::from_observations(observations),
        failures,
    })
}
