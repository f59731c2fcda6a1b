use crate::types::observation::Observation;
use crate::weather_data::error::{CacheError, FetchError};
use crate::weather_data::fetcher::DayFetcher;
use bincode::config::{Configuration, Fixint, LittleEndian};
use chrono::{Days, NaiveDate, Utc};
use log::{debug, info, warn};
use std::io;
use std::path::{Path, PathBuf};

const CACHE_FILE_EXTENSION: &str = "bin";
const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

/// Wraps a [`DayFetcher`] and keeps finished days on disk.
///
/// Each station-day is stored as `{cache_dir}/{station}/{YYYY-MM-DD}.bin`. A day is only
/// written once it has ended in every timezone, so the still-growing current day is
/// always fetched fresh.
///
/// Cache problems are logged and never fail a fetch.
pub struct CachedFetcher<F> {
    inner: F,
    cache_dir: PathBuf,
}

impl<F: DayFetcher> CachedFetcher<F> {
    pub fn new(inner: F, cache_dir: &Path) -> Self {
        Self {
            inner,
            cache_dir: cache_dir.to_path_buf(),
        }
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    fn station_dir(&self, station: &str) -> PathBuf {
        self.cache_dir.join(station_dir_name(station))
    }

    fn day_path(&self, station: &str, date: NaiveDate) -> PathBuf {
        self.station_dir(station)
            .join(format!("{}.{}", date.format("%Y-%m-%d"), CACHE_FILE_EXTENSION))
    }

    /// Deletes every cached day for `station`.
    pub async fn clear_station(&self, station: &str) -> Result<(), CacheError> {
        let dir = self.station_dir(station);
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => {
                info!("Cleared cache for station {} at {}", station, dir.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Deletion(dir, e)),
        }
    }

    async fn read_cached(path: &Path) -> Result<Option<Vec<Observation>>, CacheError> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::Read(path.to_path_buf(), e)),
        };
        let path_buf = path.to_path_buf();
        let observations = tokio::task::spawn_blocking(move || {
            bincode::serde::decode_from_slice::<Vec<Observation>, _>(&bytes, BINCODE_CONFIG)
                .map(|(observations, _)| observations)
                .map_err(|e| CacheError::Decode(path_buf, Box::new(e)))
        })
        .await??;
        Ok(Some(observations))
    }

    async fn write_cached(path: &Path, observations: Vec<Observation>) -> Result<(), CacheError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CacheError::DirCreation(parent.to_path_buf(), e))?;
        }
        let bytes = tokio::task::spawn_blocking(move || {
            bincode::serde::encode_to_vec(&observations, BINCODE_CONFIG)
                .map_err(|e| CacheError::Encode(Box::new(e)))
        })
        .await??;

        // Write then rename, so a concurrent reader never sees a half-written day.
        let tmp_path = path.with_extension(format!("{CACHE_FILE_EXTENSION}.tmp"));
        tokio::fs::write(&tmp_path, &bytes)
            .await
            .map_err(|e| CacheError::Write(tmp_path.clone(), e))?;
        tokio::fs::rename(&tmp_path, path)
            .await
            .map_err(|e| CacheError::Write(path.to_path_buf(), e))?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

/// Alphanumerics and `-` are kept; every other byte becomes `_` plus two hex digits, so
/// distinct station ids never share a directory.
fn station_dir_name(station: &str) -> String {
    let mut name = String::with_capacity(station.len());
    let mut utf8 = [0u8; 4];
    for c in station.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            name.push(c);
        } else {
            for byte in c.encode_utf8(&mut utf8).bytes() {
                name.push('_');
                name.push_str(&hex::encode([byte]));
            }
        }
    }
    name
}

/// A day is settled once it has ended everywhere, i.e. it is at least two UTC dates old.
fn is_settled(date: NaiveDate, today_utc: NaiveDate) -> bool {
    date.checked_add_days(Days::new(1))
        .is_some_and(|next| next < today_utc)
}

impl<F: DayFetcher> DayFetcher for CachedFetcher<F> {
    async fn fetch_day(&self, station: &str, date: NaiveDate) -> Result<Vec<Observation>, FetchError> {
        let path = self.day_path(station, date);
        match Self::read_cached(&path).await {
            Ok(Some(observations)) => {
                info!("Cache hit for station {} on {} at {:?}", station, date, path);
                return Ok(observations);
            }
            Ok(None) => debug!("Cache miss for station {} on {}", station, date),
            Err(e) => warn!("Ignoring unreadable cache entry {:?}: {}", path, e),
        }

        let observations = self.inner.fetch_day(station, date).await?;

        if is_settled(date, Utc::now().date_naive()) {
            if let Err(e) = Self::write_cached(&path, observations.clone()).await {
                warn!("Failed to cache station {} on {}: {}", station, date, e);
            }
        }
        Ok(observations)
    }
}
