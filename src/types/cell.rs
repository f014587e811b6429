//! Numeric coercion of table cells.
//!
//! EIA returns values as strings, numbers or nulls depending on the series. Every value
//! that takes part in reconciliation goes through [`RawCell::coerce`] so the national
//! figure and the state figures are read the same way.

use polars::prelude::AnyValue;
use thiserror::Error;

/// A cell value whose representation is not known yet.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Number(f64),
    Text(String),
    Missing,
}

/// A cell holds text that is neither numeric nor empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Value '{0}' is neither numeric nor missing")]
pub struct InvalidValue(pub String);

impl RawCell {
    /// Coerces the cell into a float, using NaN for a missing value.
    ///
    /// Text must parse to a finite number; only empty text counts as missing.
    pub fn coerce(&self) -> Result<f64, InvalidValue> {
        match self {
            RawCell::Number(value) => Ok(*value),
            RawCell::Missing => Ok(f64::NAN),
            RawCell::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Ok(f64::NAN);
                }
                // "NaN" and "inf" parse as floats but are not quantities.
                match trimmed.parse::<f64>() {
                    Ok(value) if value.is_finite() => Ok(value),
                    _ => Err(InvalidValue(text.clone())),
                }
            }
        }
    }

    /// Coerces the cell, mapping both missing and NaN to `None`.
    pub fn reading(&self) -> Result<Option<f64>, InvalidValue> {
        self.coerce().map(|v| if v.is_nan() { None } else { Some(v) })
    }

    /// Reads a polars cell. Integer and float cells become numbers, string cells keep
    /// their text for [`RawCell::coerce`]; other dtypes cannot hold a quantity.
    pub fn from_any_value(value: &AnyValue<'_>) -> Result<RawCell, InvalidValue> {
        let cell = match value {
            AnyValue::Null => RawCell::Missing,
            AnyValue::Float64(v) => RawCell::Number(*v),
            AnyValue::Float32(v) => RawCell::Number(f64::from(*v)),
            AnyValue::Int64(v) => RawCell::Number(*v as f64),
            AnyValue::Int32(v) => RawCell::Number(f64::from(*v)),
            AnyValue::UInt64(v) => RawCell::Number(*v as f64),
            AnyValue::UInt32(v) => RawCell::Number(f64::from(*v)),
            AnyValue::String(s) => RawCell::Text((*s).to_string()),
            AnyValue::StringOwned(s) => RawCell::Text(s.to_string()),
            other => return Err(InvalidValue(other.to_string())),
        };
        Ok(cell)
    }
}

impl From<f64> for RawCell {
    fn from(value: f64) -> Self {
        RawCell::Number(value)
    }
}

impl From<Option<f64>> for RawCell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(RawCell::Missing, RawCell::Number)
    }
}

impl From<&str> for RawCell {
    fn from(value: &str) -> Self {
        RawCell::Text(value.to_string())
    }
}

impl From<String> for RawCell {
    fn from(value: String) -> Self {
        RawCell::Text(value)
    }
}
