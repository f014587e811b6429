use crate::types::region::Region;
use chrono::NaiveDate;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    // Errors during parquet writing (inside blocking task)
    #[error("I/O error writing parquet cache file '{0}'")]
    ParquetWriteIo(PathBuf, #[source] std::io::Error),
    #[error("Encoding error writing parquet cache file '{0}'")]
    ParquetWritePolars(PathBuf, #[source] PolarsError),

    #[error("Failed to scan parquet cache file '{0}'")]
    ParquetScan(PathBuf, #[source] PolarsError),

    #[error("No EIA API key configured, set EIA_API_KEY or pass one to the client")]
    MissingApiKey,

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse EIA response from {url}")]
    JsonParse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("EIA API returned an error for {url}: {message}")]
    Api { url: String, message: String },

    #[error("Period not found in the EIA response for {start} to {end}")]
    MissingPeriod { start: NaiveDate, end: NaiveDate },

    #[error("Expected a single period in the EIA response for {start} to {end}, found {periods:?}")]
    MultiplePeriods {
        start: NaiveDate,
        end: NaiveDate,
        periods: Vec<String>,
    },

    #[error("No {region} data is available")]
    NoRegionData { region: Region },

    #[error("Duplicate value for {region} in period {period}")]
    DuplicateEntry { period: String, region: String },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
