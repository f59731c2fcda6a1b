//! This module provides the main entry point of the crate: a client that scrapes a
//! personal weather station's history over a date range and optionally saves it as CSV.

use crate::error::WeatherScrapeError;
use crate::range::aggregator::RangeAggregator;
use crate::range::report::ScrapeReport;
use crate::range::retry::RetryPolicy;
use crate::types::interval::SamplingInterval;
use crate::types::observation::Observation;
use crate::types::units::Units;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use crate::weather_data::cached_fetcher::CachedFetcher;
use crate::weather_data::error::FetchError;
use crate::weather_data::fetcher::DayFetcher;
use crate::weather_data::pws_fetcher::PwsHistoryFetcher;
use bon::bon;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// The fetcher a [`WeatherScraper`] talks to: the PWS API, with or without the day cache.
pub enum SourceFetcher {
    Direct(PwsHistoryFetcher),
    Cached(CachedFetcher<PwsHistoryFetcher>),
}

impl DayFetcher for SourceFetcher {
    async fn fetch_day(&self, station: &str, date: NaiveDate) -> Result<Vec<Observation>, FetchError> {
        match self {
            SourceFetcher::Direct(fetcher) => fetcher.fetch_day(station, date).await,
            SourceFetcher::Cached(fetcher) => fetcher.fetch_day(station, date).await,
        }
    }
}

/// The main client for scraping weather station history.
///
/// It owns the HTTP fetcher, the on-disk day cache and the range aggregation settings.
/// Create one with [`WeatherScraper::builder()`].
///
/// # Examples
///
/// ```no_run
/// use weatherscrape::{WeatherScraper, WeatherScrapeError};
/// use chrono::NaiveDate;
/// use std::path::Path;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), WeatherScrapeError> {
/// let scraper = WeatherScraper::builder()
///     .api_key("my-api-key")
///     .build()
///     .await?;
///
/// let report = scraper
///     .scrape_to_csv()
///     .station("KILCHICA679")
///     .start(NaiveDate::from_ymd_opt(2020, 12, 31).unwrap())
///     .end(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap())
///     .interval("5min".parse().unwrap())
///     .output(Path::new("weather_data.csv"))
///     .call()
///     .await?;
///
/// for failure in &report.failures {
///     eprintln!("could not fetch {}", failure);
/// }
/// # Ok(())
/// # }
/// ```
pub struct WeatherScraper {
    aggregator: RangeAggregator<SourceFetcher>,
}

#[bon]
impl WeatherScraper {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `.api_key(String)`: **Required.** Key for the PWS history API.
    /// * `.base_url(String)`: Optional. Defaults to the public API host.
    /// * `.units(Units)`: Optional. Defaults to [`Units::Metric`].
    /// * `.cache_folder(PathBuf)`: Optional. Defaults to the system cache directory.
    /// * `.use_cache(bool)`: Optional. Defaults to `true`.
    /// * `.concurrency(usize)`: Optional. Concurrent day fetches, defaults to 4.
    /// * `.retry(RetryPolicy)`: Optional. Backoff for throttled days.
    /// * `.timeout(Duration)`: Optional. Per-request timeout, defaults to 30 seconds.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherScrapeError::CacheDirResolution`] or
    /// [`WeatherScrapeError::CacheDirCreation`] if the cache directory is unusable, and
    /// [`WeatherScrapeError::HttpClient`] if the HTTP client cannot be built.
    #[builder]
    pub async fn new(
        #[builder(into)] api_key: String,
        #[builder(into)] base_url: Option<String>,
        units: Option<Units>,
        cache_folder: Option<PathBuf>,
        use_cache: Option<bool>,
        concurrency: Option<usize>,
        retry: Option<RetryPolicy>,
        timeout: Option<Duration>,
    ) -> Result<Self, WeatherScrapeError> {
        let http = PwsHistoryFetcher::builder()
            .api_key(api_key)
            .maybe_base_url(base_url)
            .maybe_units(units)
            .maybe_timeout(timeout)
            .build()
            .map_err(WeatherScrapeError::HttpClient)?;

        let fetcher = if use_cache.unwrap_or(true) {
            let cache_folder = match cache_folder {
                Some(folder) => folder,
                None => get_cache_dir().map_err(WeatherScrapeError::CacheDirResolution)?,
            };
            ensure_cache_dir_exists(&cache_folder)
                .await
                .map_err(|e| WeatherScrapeError::CacheDirCreation(cache_folder.clone(), e))?;
            SourceFetcher::Cached(CachedFetcher::new(http, &cache_folder))
        } else {
            SourceFetcher::Direct(http)
        };

        Ok(Self {
            aggregator: RangeAggregator::builder()
                .fetcher(fetcher)
                .maybe_concurrency(concurrency)
                .maybe_retry(retry)
                .build(),
        })
    }

    /// Scrapes `station` for every date in `start..=end`, see [`RangeAggregator::scrape_range`].
    #[builder]
    pub async fn scrape_range(
        &self,
        station: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Option<SamplingInterval>,
        cancel: Option<CancellationToken>,
    ) -> Result<ScrapeReport, WeatherScrapeError> {
        Ok(self
            .aggregator
            .scrape_range()
            .station(station)
            .start(start)
            .end(end)
            .maybe_interval(interval)
            .maybe_cancel(cancel)
            .call()
            .await?)
    }

    /// Scrapes a range and writes the dataset to `output` as CSV.
    ///
    /// On partial success the CSV holds the dates that could be fetched and the returned
    /// report lists the ones that could not.
    #[builder]
    pub async fn scrape_to_csv(
        &self,
        station: &str,
        start: NaiveDate,
        end: NaiveDate,
        output: &Path,
        interval: Option<SamplingInterval>,
        cancel: Option<CancellationToken>,
    ) -> Result<ScrapeReport, WeatherScrapeError> {
        let report = self
            .scrape_range()
            .station(station)
            .start(start)
            .end(end)
            .maybe_interval(interval)
            .maybe_cancel(cancel)
            .call()
            .await?;

        let output = output.to_path_buf();
        let dataset = report.dataset.clone();
        tokio::task::spawn_blocking(move || dataset.write_csv(&output)).await??;
        Ok(report)
    }

    /// Removes every cached day of `station`. Does nothing when caching is disabled.
    pub async fn clear_cache(&self, station: &str) -> Result<(), WeatherScrapeError> {
        if let SourceFetcher::Cached(fetcher) = self.aggregator.fetcher() {
            fetcher.clear_station(station).await?;
        }
        Ok(())
    }
}
