//! The sampling interval used when thinning a day of observations.

use chrono::TimeDelta;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntervalParseError {
    #[error("Sampling interval is empty")]
    Empty,

    #[error("Sampling interval '{0}' does not start with a whole number")]
    InvalidNumber(String),

    #[error("Unknown unit '{unit}' in sampling interval '{input}'")]
    UnknownUnit { input: String, unit: String },

    #[error("Sampling interval '{0}' must be greater than zero")]
    NotPositive(String),

    #[error("Sampling interval '{0}' is too large")]
    Overflow(String),
}

/// A strictly positive duration between successive observations after resampling.
///
/// Parses pandas-style frequency strings such as `"5min"`, `"30s"`, `"1h"` or `"1d"`.
/// A bare number is read as minutes.
///
/// # Examples
///
/// ```
/// use weatherscrape::SamplingInterval;
/// use chrono::TimeDelta;
///
/// let interval: SamplingInterval = "5min".parse().unwrap();
/// assert_eq!(interval.as_time_delta(), TimeDelta::minutes(5));
/// assert_eq!(interval.to_string(), "5min");
///
/// assert!("0min".parse::<SamplingInterval>().is_err());
/// assert!("5 fortnights".parse::<SamplingInterval>().is_err());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SamplingInterval(TimeDelta);

impl SamplingInterval {
    /// Wraps a duration, returning `None` unless it is strictly positive.
    pub fn new(delta: TimeDelta) -> Option<Self> {
        (delta > TimeDelta::zero()).then_some(Self(delta))
    }

    pub fn minutes(minutes: i64) -> Option<Self> {
        TimeDelta::try_minutes(minutes).and_then(Self::new)
    }

    pub fn as_time_delta(&self) -> TimeDelta {
        self.0
    }
}

impl Default for SamplingInterval {
    fn default() -> Self {
        Self(TimeDelta::minutes(5))
    }
}

impl FromStr for SamplingInterval {
    type Err = IntervalParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(IntervalParseError::Empty);
        }

        let split = trimmed
            .find(|c: char| !c.is_ascii_digit() && c != '-' && c != '+')
            .unwrap_or(trimmed.len());
        let (number, unit) = trimmed.split_at(split);
        let amount: i64 = number
            .parse()
            .map_err(|_| IntervalParseError::InvalidNumber(input.to_string()))?;
        if amount <= 0 {
            return Err(IntervalParseError::NotPositive(input.to_string()));
        }

        let unit = unit.trim().to_ascii_lowercase();
        let delta = match unit.as_str() {
            "s" | "sec" | "secs" | "second" | "seconds" => TimeDelta::try_seconds(amount),
            "" | "t" | "m" | "min" | "mins" | "minute" | "minutes" => TimeDelta::try_minutes(amount),
            "h" | "hr" | "hrs" | "hour" | "hours" => TimeDelta::try_hours(amount),
            "d" | "day" | "days" => TimeDelta::try_days(amount),
            _ => {
                return Err(IntervalParseError::UnknownUnit {
                    input: input.to_string(),
                    unit,
                })
            }
        };

        delta
            .map(Self)
            .ok_or_else(|| IntervalParseError::Overflow(input.to_string()))
    }
}

/// Formats using the largest unit that divides the interval exactly.
impl Display for SamplingInterval {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let seconds = self.0.num_seconds();
        if seconds % 86_400 == 0 {
            write!(f, "{}d", seconds / 86_400)
        } else if seconds % 3_600 == 0 {
            write!(f, "{}h", seconds / 3_600)
        } else if seconds % 60 == 0 {
            write!(f, "{}min", seconds / 60)
        } else {
            write!(f, "{}s", seconds)
        }
    }
}
