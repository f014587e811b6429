use crate::consumption::columns::{
    AREA_NAME, DUOAREA, PERIOD, PROCESS, PROCESS_NAME, PRODUCT, PRODUCT_NAME, SERIES,
    SERIES_DESCRIPTION, STANDARD_STATE_NAME, UNITS, VALUE,
};
use crate::consumption::error::FetchError;
use crate::consumption::response::{ApiEnvelope, ConsumptionRecord};
use crate::types::month::{month_chunks, Month};
use crate::types::region::normalize;
use chrono::NaiveDate;
use log::{debug, info, warn};
use polars::frame::DataFrame;
use polars::prelude::*;
use reqwest::Client;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::{fs, task};

pub const DEFAULT_BASE_URL: &str = "https://api.eia.gov/v2";
const CONSUMPTION_ROUTE: &str = "natural-gas/cons/sum/data";

pub struct ConsumptionDataLoader {
    cache_dir: PathBuf,
    base_url: String,
    api_key: Option<String>,
    download_client: Client,
}

impl ConsumptionDataLoader {
    pub fn new(cache_dir: &Path, base_url: &str, api_key: Option<String>) -> ConsumptionDataLoader {
        let download_client = Client::new();
        ConsumptionDataLoader {
            cache_dir: cache_dir.to_path_buf(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            download_client,
        }
    }

    /// Cache file name for a query; the query range is the cache key.
    pub fn cache_file_name(start: NaiveDate, end: NaiveDate) -> String {
        format!("consumption-{}-{}.parquet", start, end)
    }

    /// Loads the consumption records for `[start, end]`, one request per month.
    /// Handles caching and downloading. Returns a LazyFrame over the cached parquet file.
    pub async fn get_frame(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        refresh: bool,
    ) -> Result<LazyFrame, FetchError> {
        let parquet_path = self.cache_dir.join(Self::cache_file_name(start, end));

        if !refresh && fs::metadata(&parquet_path).await.is_ok() {
            info!(
                "Cache hit for consumption data {} to {} at {:?}",
                start, end, parquet_path
            );
        } else {
            info!(
                "Cache miss for consumption data {} to {}. Downloading and processing.",
                start, end
            );
            let api_key = self.api_key.as_deref().ok_or(FetchError::MissingApiKey)?;

            let mut records = Vec::new();
            for (chunk_start, chunk_end) in month_chunks(start, end) {
                records.extend(self.download(api_key, chunk_start, chunk_end).await?);
            }
            let df = records_to_frame(&records)?;

            fs::create_dir_all(&self.cache_dir)
                .await
                .map_err(|e| FetchError::CacheDirCreation(self.cache_dir.clone(), e))?;

            Self::cache_dataframe(df, &parquet_path).await?;
            info!(
                "Cached {} consumption records for {} to {} to {:?}",
                records.len(),
                start,
                end,
                parquet_path
            );
        }

        LazyFrame::scan_parquet(&parquet_path, Default::default())
            .map_err(|e| FetchError::ParquetScan(parquet_path.clone(), e))
    }

    /// URL for the month starting at `chunk_start`, without the API key.
    fn chunk_url(&self, chunk_start: NaiveDate) -> String {
        let month = Month::from_date(chunk_start);
        format!(
            "{}/{}/?frequency=monthly&data[0]=value&start={}&end={}",
            self.base_url, CONSUMPTION_ROUTE, month, month
        )
    }

    /// Downloads the records of one month window and checks that they describe exactly
    /// one period.
    async fn download(
        &self,
        api_key: &str,
        chunk_start: NaiveDate,
        chunk_end: NaiveDate,
    ) -> Result<Vec<ConsumptionRecord>, FetchError> {
        let url = self.chunk_url(chunk_start);
        info!("Downloading data from {}", url);

        let response = self
            .download_client
            .get(&url)
            .query(&[("api_key", api_key)])
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e.status());
                return Err(if let Some(status) = e.status() {
                    FetchError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    FetchError::NetworkRequest(url, e)
                });
            }
        };

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.clone(), e))?;
        let envelope: ApiEnvelope =
            serde_json::from_slice(&bytes).map_err(|source| FetchError::JsonParse {
                url: url.clone(),
                source,
            })?;

        if let Some(message) = envelope.error_message() {
            return Err(FetchError::Api { url, message });
        }
        let Some(body) = envelope.response else {
            return Err(FetchError::Api {
                url,
                message: "response body missing".to_string(),
            });
        };

        for warning in &body.warnings {
            warn!(
                "EIA warning for {}: {} {}",
                url,
                warning.warning.as_deref().unwrap_or_default(),
                warning.description.as_deref().unwrap_or_default()
            );
        }
        if let Some(total) = body.total.as_ref().and_then(total_rows) {
            if total > body.data.len() as u64 {
                warn!(
                    "EIA reports {} rows for {} but returned {}",
                    total,
                    url,
                    body.data.len()
                );
            }
        }

        validate_single_period(&body.data, chunk_start, chunk_end)?;
        debug!(
            "Received {} records for {} (date format {:?}, frequency {:?})",
            body.data.len(),
            Month::from_date(chunk_start),
            body.date_format,
            body.frequency
        );
        Ok(body.data)
    }

    /// Writes a DataFrame to a Parquet file asynchronously using spawn_blocking.
    pub(crate) async fn cache_dataframe(mut df: DataFrame, path: &Path) -> Result<(), FetchError> {
        let path_buf = path.to_path_buf();
        task::spawn_blocking(move || {
            write_cache_file(&path_buf, |file| {
                ParquetWriter::new(file)
                    .with_compression(ParquetCompression::Snappy)
                    .finish(&mut df)
                    .map_err(|e| FetchError::ParquetWritePolars(path_buf.clone(), e))?;
                Ok(())
            })
        })
        .await??;
        Ok(())
    }
}

/// Runs `write` against a temporary file next to `path` and moves it into place only
/// when the write succeeds. A failed write leaves nothing at `path`, so the next
/// lookup is a cache miss instead of a hit on a truncated file.
fn write_cache_file<F>(path: &Path, write: F) -> Result<(), FetchError>
where
    F: FnOnce(&mut File) -> Result<(), FetchError>,
{
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp_file =
        NamedTempFile::new_in(dir).map_err(|e| FetchError::ParquetWriteIo(path.to_path_buf(), e))?;
    write(temp_file.as_file_mut())?;
    temp_file
        .persist(path)
        .map_err(|e| FetchError::ParquetWriteIo(path.to_path_buf(), e.error))?;
    Ok(())
}

fn total_rows(total: &Value) -> Option<u64> {
    match total {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn validate_single_period(
    records: &[ConsumptionRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), FetchError> {
    if records.is_empty() || records.iter().any(|r| r.period.is_none()) {
        return Err(FetchError::MissingPeriod { start, end });
    }
    let periods: BTreeSet<&str> = records.iter().filter_map(|r| r.period.as_deref()).collect();
    if periods.len() != 1 {
        return Err(FetchError::MultiplePeriods {
            start,
            end,
            periods: periods.into_iter().map(str::to_string).collect(),
        });
    }
    Ok(())
}

fn text_column<F>(name: &str, records: &[ConsumptionRecord], field: F) -> Column
where
    F: Fn(&ConsumptionRecord) -> Option<String>,
{
    let values: Vec<Option<String>> = records.iter().map(field).collect();
    Column::new(name.into(), values)
}

/// Assembles API records into the records frame, adding the normalized area name.
pub(crate) fn records_to_frame(records: &[ConsumptionRecord]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        text_column(PERIOD, records, |r| r.period.clone()),
        text_column(DUOAREA, records, |r| r.duoarea.clone()),
        text_column(AREA_NAME, records, |r| r.area_name.clone()),
        text_column(PRODUCT, records, |r| r.product.clone()),
        text_column(PRODUCT_NAME, records, |r| r.product_name.clone()),
        text_column(PROCESS, records, |r| r.process.clone()),
        text_column(PROCESS_NAME, records, |r| r.process_name.clone()),
        text_column(SERIES, records, |r| r.series.clone()),
        text_column(SERIES_DESCRIPTION, records, |r| r.series_description.clone()),
        text_column(VALUE, records, ConsumptionRecord::value_text),
        text_column(UNITS, records, |r| r.units.clone()),
        text_column(STANDARD_STATE_NAME, records, |r| {
            r.area_name
                .as_deref()
                .and_then(normalize)
                .map(|region| region.name().to_string())
        }),
    ])
}
