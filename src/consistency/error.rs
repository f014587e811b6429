use crate::types::cell::InvalidValue;
use crate::types::region::Region;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsistencyError {
    // The national key or a state key is absent from the row or table.
    #[error("{0} value not provided")]
    MissingField(Region),

    #[error("Invalid value for {region}")]
    InvalidValue {
        region: Region,
        #[source]
        source: InvalidValue,
    },

    #[error("{0} is provided more than once")]
    DuplicateField(Region),

    #[error("Invalid period label '{0}'")]
    InvalidPeriod(String),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
