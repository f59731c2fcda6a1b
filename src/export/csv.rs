//! CSV export of datasets and failure reports, written through polars.

use crate::export::error::ExportError;
use crate::range::report::ScrapeReport;
use crate::types::dataset::Dataset;
use chrono::SecondsFormat;
use log::info;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

pub const TIMESTAMP_COLUMN: &str = "timestamp";

impl Dataset {
    /// Builds a table with a `timestamp` column (RFC 3339 with the station offset) followed
    /// by one `f64` column per measurement name, sorted by name. Measurements an
    /// observation does not have are null.
    pub fn to_dataframe(&self) -> Result<DataFrame, ExportError> {
        let timestamps: Vec<String> = self
            .iter()
            .map(|o| o.timestamp().to_rfc3339_opts(SecondsFormat::Secs, false))
            .collect();

        let mut columns = vec![Column::new(TIMESTAMP_COLUMN.into(), timestamps)];
        for name in self.measurement_names() {
            let values: Vec<Option<f64>> = self.iter().map(|o| o.measurement(name)).collect();
            columns.push(Column::new(name.into(), values));
        }

        DataFrame::new(columns).map_err(ExportError::Frame)
    }

    /// Writes the dataset as CSV: a header row, then one row per observation in dataset
    /// order, with empty fields for missing measurements. Missing parent directories are
    /// created.
    pub fn write_csv(&self, path: &Path) -> Result<(), ExportError> {
        let mut df = self.to_dataframe()?;
        write_frame(&mut df, path)?;
        info!(
            "Wrote {} rows x {} columns to {}",
            df.height(),
            df.width(),
            path.display()
        );
        Ok(())
    }
}

impl ScrapeReport {
    /// Writes the failed dates as `date,error,attempts` rows.
    pub fn write_failures_csv(&self, path: &Path) -> Result<(), ExportError> {
        let dates: Vec<String> = self.failures.iter().map(|f| f.date.to_string()).collect();
        let kinds: Vec<String> = self.failures.iter().map(|f| f.kind.to_string()).collect();
        let attempts: Vec<u32> = self.failures.iter().map(|f| f.attempts).collect();

        let mut df = DataFrame::new(vec![
            Column::new("date".into(), dates),
            Column::new("error".into(), kinds),
            Column::new("attempts".into(), attempts),
        ])
        .map_err(ExportError::Frame)?;
        write_frame(&mut df, path)?;
        info!("Wrote {} failed dates to {}", df.height(), path.display());
        Ok(())
    }
}

fn write_frame(df: &mut DataFrame, path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| ExportError::DirCreation(parent.to_path_buf(), e))?;
    }
    let mut file =
        File::create(path).map_err(|e| ExportError::FileCreation(path.to_path_buf(), e))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .map_err(|e| ExportError::CsvWrite(path.to_path_buf(), e))
}
