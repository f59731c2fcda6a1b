//! Defines the unit systems the PWS history API can report measurements in.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown unit system '{0}', expected metric, imperial or uk-hybrid")]
pub struct UnitsParseError(String);

/// The unit system requested from the PWS history API.
///
/// The API nests unit-dependent measurements (temperature, wind speed, pressure,
/// precipitation) under an object named after the unit system, while unit-free
/// measurements (humidity, wind direction, UV) sit at the top level of each observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Units {
    /// Celsius, km/h, hPa, mm.
    #[default]
    Metric,
    /// Fahrenheit, mph, inHg, in.
    Imperial,
    /// Celsius with mph wind speeds.
    UkHybrid,
}

impl Units {
    /// The value of the `units` query parameter.
    pub(crate) fn query_code(&self) -> &'static str {
        match self {
            Units::Metric => "m",
            Units::Imperial => "e",
            Units::UkHybrid => "h",
        }
    }

    /// The name of the JSON object holding unit-dependent measurements.
    pub(crate) fn block_name(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::UkHybrid => "uk_hybrid",
        }
    }
}

/// Formats a `Units` variant the way it is accepted on the command line.
///
/// # Examples
///
/// ```
/// use weatherscrape::Units;
///
/// assert_eq!(Units::UkHybrid.to_string(), "uk-hybrid");
/// assert_eq!("imperial".parse::<Units>().unwrap(), Units::Imperial);
/// ```
impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::UkHybrid => "uk-hybrid",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Units {
    type Err = UnitsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" | "m" => Ok(Units::Metric),
            "imperial" | "english" | "e" => Ok(Units::Imperial),
            "uk-hybrid" | "uk_hybrid" | "h" => Ok(Units::UkHybrid),
            _ => Err(UnitsParseError(s.to_string())),
        }
    }
}
