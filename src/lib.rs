mod error;
mod export;
mod range;
mod scraper;
mod types;
mod utils;
mod weather_data;

pub use error::WeatherScrapeError;
pub use scraper::*;

pub use types::dataset::Dataset;
pub use types::date_range::DateRange;
pub use types::interval::{IntervalParseError, SamplingInterval};
pub use types::observation::Observation;
pub use types::units::{Units, UnitsParseError};

pub use weather_data::cached_fetcher::CachedFetcher;
pub use weather_data::error::{CacheError, FetchError, FetchErrorKind};
pub use weather_data::fetcher::DayFetcher;
pub use weather_data::pws_fetcher::{PwsHistoryFetcher, DEFAULT_BASE_URL};

pub use range::aggregator::{RangeAggregator, DEFAULT_CONCURRENCY};
pub use range::error::ScrapeError;
pub use range::report::{DateFailure, ScrapeReport};
pub use range::resample::resample_day;
pub use range::retry::RetryPolicy;

pub use export::csv::TIMESTAMP_COLUMN;
pub use export::error::ExportError;
