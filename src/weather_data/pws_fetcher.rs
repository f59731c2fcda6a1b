use crate::types::observation::Observation;
use crate::types::units::Units;
use crate::weather_data::error::FetchError;
use crate::weather_data::fetcher::DayFetcher;
use crate::weather_data::response::HistoryResponse;
use bon::bon;
use chrono::NaiveDate;
use log::{debug, info, warn};
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.weather.com";
const HISTORY_PATH: &str = "/v2/pws/history/all";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches one day of personal weather station history from the PWS history JSON API.
///
/// Status codes are mapped onto the [`DayFetcher`] contract:
/// * `200` is decoded, `204 No Content` is an empty day,
/// * `429` is [`FetchError::RateLimited`] (honouring `Retry-After` seconds),
/// * `404` is [`FetchError::UnknownStation`],
/// * anything else, transport errors and undecodable bodies are
///   [`FetchError::SourceUnavailable`].
///
/// # Examples
///
/// ```no_run
/// use weatherscrape::{DayFetcher, PwsHistoryFetcher, Units};
/// use chrono::NaiveDate;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = PwsHistoryFetcher::builder()
///     .api_key("my-api-key")
///     .units(Units::Metric)
///     .build()?;
///
/// let day = NaiveDate::from_ymd_opt(2020, 12, 31).unwrap();
/// let observations = fetcher.fetch_day("KILCHICA679", day).await?;
/// println!("{} observations on {}", observations.len(), day);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PwsHistoryFetcher {
    client: Client,
    base_url: String,
    api_key: String,
    units: Units,
}

#[bon]
impl PwsHistoryFetcher {
    /// Builds a fetcher. Defaults: [`DEFAULT_BASE_URL`], metric units, a 30 second timeout.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error when no `client` is supplied and building one fails.
    #[builder]
    pub fn new(
        #[builder(into)] api_key: String,
        #[builder(into)] base_url: Option<String>,
        units: Option<Units>,
        timeout: Option<Duration>,
        client: Option<Client>,
    ) -> Result<Self, reqwest::Error> {
        let client = match client {
            Some(client) => client,
            None => Client::builder()
                .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
                .build()?,
        };
        Ok(Self {
            client,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key,
            units: units.unwrap_or_default(),
        })
    }

    pub fn units(&self) -> Units {
        self.units
    }

    async fn download(&self, station: &str, date: NaiveDate) -> Result<Vec<Observation>, FetchError> {
        let url = format!("{}{}", self.base_url, HISTORY_PATH);
        let day = date.format("%Y%m%d").to_string();
        debug!("Requesting {} for station {} on {}", url, station, date);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("stationId", station),
                ("format", "json"),
                ("units", self.units.query_code()),
                ("date", day.as_str()),
                ("numericPrecision", "decimal"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                warn!("Request for station {} on {} failed: {}", station, date, e);
                FetchError::unavailable(station, date, e)
            })?;

        let status = response.status();
        match status {
            StatusCode::NO_CONTENT => {
                info!("No observations for station {} on {}", station, date);
                return Ok(Vec::new());
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .map(Duration::from_secs);
                warn!(
                    "Rate limited for station {} on {} (retry after {:?})",
                    station, date, retry_after
                );
                return Err(FetchError::RateLimited {
                    station: station.to_string(),
                    date,
                    retry_after,
                });
            }
            StatusCode::NOT_FOUND => {
                warn!("Station {} not found by the weather source", station);
                return Err(FetchError::UnknownStation {
                    station: station.to_string(),
                });
            }
            s if !s.is_success() => {
                warn!("HTTP error for station {} on {}: {}", station, date, s);
                return Err(FetchError::unavailable(station, date, format!("HTTP status {s}")));
            }
            _ => {}
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::unavailable(station, date, e))?;
        let observations = parse_history(&body, station, date, self.units)?;
        info!(
            "Fetched {} observations for station {} on {}",
            observations.len(),
            station,
            date
        );
        Ok(observations)
    }
}

impl DayFetcher for PwsHistoryFetcher {
    async fn fetch_day(&self, station: &str, date: NaiveDate) -> Result<Vec<Observation>, FetchError> {
        self.download(station, date).await
    }
}

/// Decodes a history body, keeping only observations on `date` in station-local time.
pub(crate) fn parse_history(
    body: &[u8],
    station: &str,
    date: NaiveDate,
    units: Units,
) -> Result<Vec<Observation>, FetchError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let response: HistoryResponse = serde_json::from_slice(body)
        .map_err(|e| FetchError::unavailable(station, date, format!("malformed response: {e}")))?;

    let mut observations = Vec::with_capacity(response.observations.len());
    for raw in response.observations {
        let observation = raw
            .into_observation(station, units)
            .map_err(|reason| FetchError::unavailable(station, date, reason))?;
        if observation.local_date() == date {
            observations.push(observation);
        } else {
            debug!(
                "Dropping observation at {} outside requested date {}",
                observation.timestamp(),
                date
            );
        }
    }
    Ok(observations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather_data::error::FetchErrorKind;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Serves one canned HTTP response on a local port. Resolves to the base URL and a
    /// receiver for the request head the client sent.
    async fn serve_once(
        status_line: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> std::io::Result<(String, oneshot::Receiver<String>)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);

        let mut response = format!("HTTP/1.1 {status_line}\r\n");
        for (name, value) in headers {
            response.push_str(&format!("{name}: {value}\r\n"));
        }
        response.push_str(&format!(
            "Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        ));

        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => head.extend_from_slice(&buf[..n]),
                }
            }
            let _ = tx.send(String::from_utf8_lossy(&head).into_owned());
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        Ok((base_url, rx))
    }

    fn fetcher_for(base_url: &str) -> PwsHistoryFetcher {
        // Local test servers must not be routed through an ambient HTTP proxy.
        let client = Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        PwsHistoryFetcher::builder()
            .api_key("secret")
            .base_url(base_url)
            .client(client)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_ok_response_is_parsed_and_query_is_sent() -> Result<(), Box<dyn std::error::Error>> {
        let body = r#"{"observations": [
            {"obsTimeUtc": "2020-12-31T06:04:57Z", "obsTimeLocal": "2020-12-31 00:04:57",
             "humidityAvg": 88, "metric": {"tempAvg": -1.2}}
        ]}"#;
        let (base_url, request) =
            serve_once("200 OK", &[("Content-Type", "application/json")], body).await?;

        let observations = fetcher_for(&base_url)
            .fetch_day("KILCHICA679", date(2020, 12, 31))
            .await?;
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].measurement("tempAvg"), Some(-1.2));

        let request = request.await?;
        let request_line = request.lines().next().unwrap_or_default();
        assert!(request_line.starts_with("GET /v2/pws/history/all?"));
        for param in ["stationId=KILCHICA679", "date=20201231", "units=m", "format=json", "apiKey=secret"] {
            assert!(request_line.contains(param), "missing {param} in {request_line}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_no_content_is_an_empty_day() -> Result<(), Box<dyn std::error::Error>> {
        let (base_url, _request) = serve_once("204 No Content", &[], "").await?;
        let observations = fetcher_for(&base_url)
            .fetch_day("KILCHICA679", date(2021, 1, 1))
            .await?;
        assert!(observations.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_too_many_requests_is_rate_limited_with_retry_after() -> std::io::Result<()> {
        let (base_url, _request) =
            serve_once("429 Too Many Requests", &[("Retry-After", "7")], "").await?;
        let err = fetcher_for(&base_url)
            .fetch_day("KILCHICA679", date(2021, 1, 1))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            FetchError::RateLimited {
                station: "KILCHICA679".to_string(),
                date: date(2021, 1, 1),
                retry_after: Some(Duration::from_secs(7)),
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_too_many_requests_without_retry_after() -> std::io::Result<()> {
        let (base_url, _request) = serve_once("429 Too Many Requests", &[], "").await?;
        let err = fetcher_for(&base_url)
            .fetch_day("KILCHICA679", date(2021, 1, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::RateLimited { retry_after: None, .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_not_found_is_unknown_station() -> std::io::Result<()> {
        let (base_url, _request) = serve_once("404 Not Found", &[], "").await?;
        let err = fetcher_for(&base_url)
            .fetch_day("NOSUCHSTATION", date(2021, 1, 1))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            FetchError::UnknownStation {
                station: "NOSUCHSTATION".to_string()
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_server_error_is_source_unavailable() -> std::io::Result<()> {
        let (base_url, _request) = serve_once("500 Internal Server Error", &[], "boom").await?;
        let err = fetcher_for(&base_url)
            .fetch_day("KILCHICA679", date(2021, 1, 1))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::SourceUnavailable);
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_ok_body_is_source_unavailable() -> std::io::Result<()> {
        let (base_url, _request) = serve_once("200 OK", &[], "<html>maintenance</html>").await?;
        let err = fetcher_for(&base_url)
            .fetch_day("KILCHICA679", date(2021, 1, 1))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::SourceUnavailable);
        Ok(())
    }

    #[test]
    fn test_parse_history_filters_other_dates() {
        let body = br#"{"observations": [
            {"obsTimeUtc": "2020-12-31T05:59:00Z", "obsTimeLocal": "2020-12-30 23:59:00", "metric": {"tempAvg": 1.0}},
            {"obsTimeUtc": "2020-12-31T06:04:00Z", "obsTimeLocal": "2020-12-31 00:04:00", "metric": {"tempAvg": 2.0}},
            {"obsTimeUtc": "2020-12-31T06:09:00Z", "obsTimeLocal": "2020-12-31 00:09:00", "metric": {"tempAvg": 3.0}}
        ]}"#;
        let observations = parse_history(body, "KILCHICA679", date(2020, 12, 31), Units::Metric).unwrap();
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].measurement("tempAvg"), Some(2.0));
        assert!(observations.iter().all(|o| o.local_date() == date(2020, 12, 31)));
    }

    #[test]
    fn test_parse_history_malformed_is_source_unavailable() {
        let err = parse_history(b"<html>oops</html>", "X", date(2021, 1, 1), Units::Metric).unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::SourceUnavailable);
    }

    #[test]
    fn test_parse_history_blank_body_is_empty_day() {
        let observations = parse_history(b"  \n", "X", date(2021, 1, 1), Units::Metric).unwrap();
        assert!(observations.is_empty());
    }

    #[test]
    fn test_builder_defaults() {
        let fetcher = PwsHistoryFetcher::builder()
            .api_key("key")
            .base_url("http://localhost:1234/")
            .build()
            .unwrap();
        assert_eq!(fetcher.base_url, "http://localhost:1234");
        assert_eq!(fetcher.units(), Units::Metric);
    }

    #[tokio::test]
    async fn test_unreachable_source_is_source_unavailable() {
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        let fetcher = PwsHistoryFetcher::builder()
            .api_key("key")
            .base_url("http://127.0.0.1:9")
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        let err = fetcher.fetch_day("X", date(2021, 1, 1)).await.unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::SourceUnavailable);
    }
}
