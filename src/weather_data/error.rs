use chrono::NaiveDate;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Why fetching one station-day failed.
///
/// Every fetcher reports one of these three outcomes; transport and decoding details
/// are folded into `reason` so the range aggregator only has to decide between
/// retrying (`RateLimited`) and recording the day as failed (everything else).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    #[error("Weather source unavailable for station '{station}' on {date}: {reason}")]
    SourceUnavailable {
        station: String,
        date: NaiveDate,
        reason: String,
    },

    #[error("Station '{station}' is not known to the weather source")]
    UnknownStation { station: String },

    #[error("Weather source is throttling requests for station '{station}' on {date}")]
    RateLimited {
        station: String,
        date: NaiveDate,
        /// Delay the source asked for, when it said so.
        retry_after: Option<Duration>,
    },
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::SourceUnavailable { .. } => FetchErrorKind::SourceUnavailable,
            FetchError::UnknownStation { .. } => FetchErrorKind::UnknownStation,
            FetchError::RateLimited { .. } => FetchErrorKind::RateLimited,
        }
    }

    pub(crate) fn unavailable(station: &str, date: NaiveDate, reason: impl fmt::Display) -> Self {
        FetchError::SourceUnavailable {
            station: station.to_string(),
            date,
            reason: reason.to_string(),
        }
    }
}

/// The category of a [`FetchError`], as recorded in a failure report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    SourceUnavailable,
    UnknownStation,
    RateLimited,
}

impl FetchErrorKind {
    fn as_str(&self) -> &'static str {
        match self {
            FetchErrorKind::SourceUnavailable => "source_unavailable",
            FetchErrorKind::UnknownStation => "unknown_station",
            FetchErrorKind::RateLimited => "rate_limited",
        }
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Problems with the on-disk day cache. These are logged by the caching fetcher and
/// never turn a fetch into a failure.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to read cache file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to write cache file '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed to create cache directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to delete cache '{0}'")]
    Deletion(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode cache data from '{0}'")]
    Decode(PathBuf, #[source] Box<bincode::error::DecodeError>),

    #[error("Failed to encode cache data")]
    Encode(#[source] Box<bincode::error::EncodeError>),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
