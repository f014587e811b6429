//! This module provides the main entry point for retrieving EIA natural-gas consumption
//! data. The client owns the on-disk cache and the API key; everything it returns is a
//! Polars frame that can be reconciled or turned into a monthly series.

use crate::consumption::data_loader::{ConsumptionDataLoader, DEFAULT_BASE_URL};
use crate::error::EiaError;
use crate::types::component::Component;
use crate::types::consumption_frame::ConsumptionLazyFrame;
use crate::types::region::Region;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use bon::bon;
use chrono::NaiveDate;
use log::debug;
use polars::prelude::DataFrame;
use std::path::PathBuf;

/// Environment variable read for the API key when none is passed explicitly.
pub const API_KEY_ENV: &str = "EIA_API_KEY";

/// The main client struct for accessing EIA consumption data.
///
/// Downloaded months are cached as parquet files keyed by the requested date range, so
/// repeated queries do not hit the network. An API key is only needed on a cache miss.
///
/// # Examples
///
/// ```rust
/// # use eia_gas::{Eia, EiaError};
/// # async fn run() -> Result<(), EiaError> {
/// // Create a client using the default cache directory and EIA_API_KEY
/// let client = Eia::new().await?;
/// # Ok(())
/// # }
/// ```
pub struct Eia {
    loader: ConsumptionDataLoader,
}

#[bon]
impl Eia {
    /// Creates a client using the default cache directory (e.g. `~/.cache/eia_gas_cache`
    /// on Linux) and the API key from `EIA_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`EiaError::CacheDirResolution`] if the default cache directory cannot be found.
    /// Returns [`EiaError::CacheDirCreation`] if the cache directory cannot be created.
    pub async fn new() -> Result<Self, EiaError> {
        Self::configured().call().await
    }

    /// Creates a client caching into `cache_folder`, with the API key from `EIA_API_KEY`.
    ///
    /// The directory will be created if it doesn't exist.
    pub async fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, EiaError> {
        Self::configured().cache_folder(cache_folder).call().await
    }

    /// Creates a client with explicit settings.
    ///
    /// # Arguments
    ///
    /// * `.cache_folder(PathBuf)`: Optional. Defaults to the system cache directory.
    /// * `.api_key(String)`: Optional. Defaults to the `EIA_API_KEY` environment variable.
    /// * `.base_url(String)`: Optional. Defaults to `https://api.eia.gov/v2`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use eia_gas::{Eia, EiaError};
    /// # use std::path::PathBuf;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), EiaError> {
    /// let client = Eia::configured()
    ///     .cache_folder(PathBuf::from("/tmp/eia"))
    ///     .api_key("my-key".to_string())
    ///     .call()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn configured(
        cache_folder: Option<PathBuf>,
        api_key: Option<String>,
        base_url: Option<String>,
    ) -> Result<Self, EiaError> {
        let cache_folder = match cache_folder {
            Some(folder) => folder,
            None => get_cache_dir().map_err(EiaError::CacheDirResolution)?,
        };
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| EiaError::CacheDirCreation(cache_folder.clone(), e))?;

        let api_key = api_key
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            debug!("No EIA API key configured, only cached data is available");
        }
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            loader: ConsumptionDataLoader::new(&cache_folder, &base_url, api_key),
        })
    }

    /// Fetches all consumption records between `start` and `end`, one API request per
    /// month, served from the cache when this range was fetched before.
    ///
    /// # Arguments
    ///
    /// * `.start(NaiveDate)`: **Required.** First month start of the range.
    /// * `.end(NaiveDate)`: **Required.** End of the range; the month starting here is not requested.
    /// * `.refresh(bool)`: Optional. Ignore the cache and download again. Defaults to `false`.
    ///
    /// # Errors
    ///
    /// Returns [`EiaError::Fetch`] for network, API, response validation and cache errors.
    #[builder]
    pub async fn consumption(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        refresh: Option<bool>,
    ) -> Result<ConsumptionLazyFrame, EiaError> {
        let frame = self
            .loader
            .get_frame(start, end, refresh.unwrap_or(false))
            .await?;
        Ok(ConsumptionLazyFrame::new(frame))
    }

    /// Fetches one consumption component and pivots it into a state table
    /// (period rows × region columns), ready for [`crate::check_consistency`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use eia_gas::{check_consistency, Component, Eia, EiaError};
    /// # use chrono::NaiveDate;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), EiaError> {
    /// let client = Eia::new().await?;
    /// let table = client
    ///     .state_table()
    ///     .component(Component::Residential)
    ///     .start(NaiveDate::from_ymd_opt(2019, 1, 1).unwrap())
    ///     .end(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap())
    ///     .call()
    ///     .await?;
    /// let (annotated, inconsistent) = check_consistency(table)?;
    /// println!("inconsistent: {inconsistent}\n{annotated}");
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn state_table(
        &self,
        component: Component,
        start: NaiveDate,
        end: NaiveDate,
        refresh: Option<bool>,
    ) -> Result<DataFrame, EiaError> {
        self.consumption()
            .start(start)
            .end(end)
            .maybe_refresh(refresh)
            .call()
            .await?
            .component(component)
            .pivot()
    }

    /// Fetches the records of one component for a single region.
    ///
    /// # Arguments
    ///
    /// * `.region(Region)`: **Required.** A state, the District of Columbia or the nation.
    /// * `.component(Component)`: **Required.**
    /// * `.start(NaiveDate)`, `.end(NaiveDate)`, `.refresh(bool)`: as for [`Eia::consumption`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::FetchError::NoRegionData`] (wrapped in [`EiaError::Fetch`]) when
    /// the range holds no record for the region.
    #[builder]
    pub async fn state_consumption(
        &self,
        region: Region,
        component: Component,
        start: NaiveDate,
        end: NaiveDate,
        refresh: Option<bool>,
    ) -> Result<DataFrame, EiaError> {
        self.consumption()
            .start(start)
            .end(end)
            .maybe_refresh(refresh)
            .call()
            .await?
            .component(component)
            .state_records(region)
    }
}
