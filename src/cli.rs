use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use weatherscrape::{SamplingInterval, Units};

/// Scrape a personal weather station's history into a CSV file.
#[derive(Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Station identifier, for example `KILCHICA679`.
    #[clap(short = 's', long, env = "WEATHERSCRAPE_STATION")]
    pub station: String,

    /// First date to fetch (inclusive), as `YYYY-MM-DD`.
    #[clap(long, env = "WEATHERSCRAPE_START")]
    pub start: NaiveDate,

    /// Last date to fetch (inclusive), as `YYYY-MM-DD`.
    #[clap(long, env = "WEATHERSCRAPE_END")]
    pub end: NaiveDate,

    /// Spacing between kept observations, e.g. `5min`, `30s`, `1h`.
    #[clap(short = 'i', long, default_value = "5min", env = "WEATHERSCRAPE_INTERVAL")]
    pub interval: SamplingInterval,

    #[clap(short = 'o', long, default_value = "weather_data.csv", env = "WEATHERSCRAPE_OUTPUT")]
    pub output: PathBuf,

    #[clap(long = "api-key", env = "WEATHERSCRAPE_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Unit system of the measurements: `metric`, `imperial` or `uk-hybrid`.
    #[clap(long, default_value = "metric", env = "WEATHERSCRAPE_UNITS")]
    pub units: Units,

    /// Maximum number of days fetched at the same time.
    #[clap(long, default_value = "4", env = "WEATHERSCRAPE_CONCURRENCY")]
    pub concurrency: usize,

    /// Fetch attempts per day when the source throttles, the first one included.
    #[clap(long = "max-attempts", default_value = "3", env = "WEATHERSCRAPE_MAX_ATTEMPTS")]
    pub max_attempts: u32,

    /// Directory for cached days. Defaults to the system cache directory.
    #[clap(long = "cache-dir", env = "WEATHERSCRAPE_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Always download, never read or write the day cache.
    #[clap(long = "no-cache", env = "WEATHERSCRAPE_NO_CACHE")]
    pub no_cache: bool,

    /// Also write the failed dates to this CSV file.
    #[clap(long, env = "WEATHERSCRAPE_FAILURES")]
    pub failures: Option<PathBuf>,

    #[clap(long = "base-url", env = "WEATHERSCRAPE_BASE_URL", hide = true)]
    pub base_url: Option<String>,
}
