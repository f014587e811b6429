use crate::consistency::error::ConsistencyError;
use crate::consumption::error::FetchError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EiaError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Consistency(#[from] ConsistencyError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),

    #[error(transparent)]
    PolarsError(#[from] PolarsError),
}
