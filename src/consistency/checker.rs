//! Row-wise reconciliation of a state table (one row per period, one column per region).

use crate::consistency::error::ConsistencyError;
use crate::consistency::reconcile::reconcile;
use crate::types::cell::RawCell;
use crate::types::observation::ObservationRow;
use crate::types::region::{normalize, Region, STATES};
use log::{debug, info};
use polars::prelude::*;
use std::collections::HashMap;

/// Name of the appended column holding national minus state aggregate.
pub const ERROR_COLUMN: &str = "us_state_error";
/// Name of the appended column holding the sum of the state values.
pub const STATE_AGGREGATE_COLUMN: &str = "us_state_aggregate";

/// Reconciles every row of `table` and appends [`ERROR_COLUMN`] and
/// [`STATE_AGGREGATE_COLUMN`] (null where the row is undetermined).
///
/// The returned flag is `true` when the absolute errors of the determined rows sum to
/// more than zero. Region columns are never modified and columns that are not regions
/// (such as `period`) pass through unchanged.
///
/// # Errors
///
/// The whole table is rejected, with no partial annotation, if the national column or
/// any state column is absent ([`ConsistencyError::MissingField`]), if two columns
/// resolve to the same region ([`ConsistencyError::DuplicateField`]) or if any region
/// cell holds a non-numeric value ([`ConsistencyError::InvalidValue`]).
pub fn check_consistency(mut table: DataFrame) -> Result<(DataFrame, bool), ConsistencyError> {
    let cells = region_cells(&table)?;
    let height = table.height();

    let mut errors: Vec<Option<f64>> = Vec::with_capacity(height);
    let mut aggregates: Vec<Option<f64>> = Vec::with_capacity(height);
    for idx in 0..height {
        let row = ObservationRow::from_region_cells(|region| {
            cells.get(&region).and_then(|column| column.get(idx)).cloned()
        })?;
        let reconciliation = reconcile(&row);
        errors.push(reconciliation.error);
        aggregates.push(reconciliation.state_aggregate);
    }

    let undetermined = aggregates.iter().filter(|a| a.is_none()).count();
    if undetermined > 0 {
        debug!(
            "{} of {} rows have missing state values and were not reconciled",
            undetermined, height
        );
    }

    let total_abs_error: f64 = errors
        .iter()
        .flatten()
        .filter(|e| !e.is_nan())
        .map(|e| e.abs())
        .sum();
    let inconsistent = total_abs_error > 0.0;
    if inconsistent {
        info!(
            "State values do not add up to the national total (total absolute error {})",
            total_abs_error
        );
    }

    table.with_column(Series::new(ERROR_COLUMN.into(), errors))?;
    table.with_column(Series::new(STATE_AGGREGATE_COLUMN.into(), aggregates))?;

    Ok((table, inconsistent))
}

/// Reads every region column of the table into raw cells, keyed by region.
fn region_cells(table: &DataFrame) -> Result<HashMap<Region, Vec<RawCell>>, ConsistencyError> {
    let mut columns: HashMap<Region, &Column> = HashMap::new();
    for column in table.get_columns() {
        let Some(region) = normalize(column.name().as_str()) else {
            continue;
        };
        if columns.insert(region, column).is_some() {
            return Err(ConsistencyError::DuplicateField(region));
        }
    }

    for region in std::iter::once(Region::UnitedStates).chain(STATES) {
        if !columns.contains_key(&region) {
            return Err(ConsistencyError::MissingField(region));
        }
    }

    let mut cells = HashMap::with_capacity(columns.len());
    for (region, column) in columns {
        let mut values = Vec::with_capacity(column.len());
        for idx in 0..column.len() {
            let value = column.get(idx)?;
            let cell = RawCell::from_any_value(&value)
                .map_err(|source| ConsistencyError::InvalidValue { region, source })?;
            values.push(cell);
        }
        cells.insert(region, values);
    }
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a table with the given periods where every state holds `state_value` and the
    /// nation holds the matching entry of `national`.
    fn uniform_table(periods: &[&str], state_value: f64, national: &[Option<f64>]) -> DataFrame {
        let mut columns = vec![Column::new("period".into(), periods)];
        for region in STATES {
            columns.push(Column::new(
                region.name().into(),
                vec![Some(state_value); periods.len()],
            ));
        }
        columns.push(Column::new("United States".into(), national.to_vec()));
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn test_consistent_table_is_not_flagged() {
        let table = uniform_table(
            &["2024-01", "2024-02"],
            10.0,
            &[Some(510.0), Some(510.0)],
        );
        let (annotated, inconsistent) = check_consistency(table).unwrap();
        assert!(!inconsistent);

        let errors = annotated.column(ERROR_COLUMN).unwrap().f64().unwrap();
        assert_eq!(errors.get(0), Some(0.0));
        assert_eq!(errors.get(1), Some(0.0));
        let aggregates = annotated
            .column(STATE_AGGREGATE_COLUMN)
            .unwrap()
            .f64()
            .unwrap();
        assert_eq!(aggregates.get(0), Some(510.0));
        assert_eq!(annotated.width(), 1 + 52 + 2);
    }

    #[test]
    fn test_single_inconsistent_row_flags_table() {
        let table = uniform_table(
            &["2024-01", "2024-02", "2024-03"],
            10.0,
            &[Some(510.0), Some(515.5), Some(510.0)],
        );
        let (annotated, inconsistent) = check_consistency(table).unwrap();
        assert!(inconsistent);
        let errors = annotated.column(ERROR_COLUMN).unwrap().f64().unwrap();
        assert_eq!(errors.get(1), Some(5.5));
    }

    #[test]
    fn test_missing_state_value_is_null_not_zero() {
        let mut table = uniform_table(&["2024-01", "2024-02"], 10.0, &[Some(999.0), Some(510.0)]);
        table
            .with_column(Column::new("Texas".into(), [None::<f64>, Some(10.0)]))
            .unwrap();

        let (annotated, inconsistent) = check_consistency(table).unwrap();
        let errors = annotated.column(ERROR_COLUMN).unwrap().f64().unwrap();
        let aggregates = annotated
            .column(STATE_AGGREGATE_COLUMN)
            .unwrap()
            .f64()
            .unwrap();
        assert_eq!(errors.get(0), None);
        assert_eq!(aggregates.get(0), None);
        assert_eq!(errors.get(1), Some(0.0));
        // The only non-zero discrepancy sits on the undetermined row.
        assert!(!inconsistent);
    }

    #[test]
    fn test_string_cells_are_coerced() {
        let mut columns = vec![Column::new("period".into(), ["2024-01"])];
        for region in STATES {
            columns.push(Column::new(region.name().into(), ["2"]));
        }
        columns.push(Column::new("United States".into(), ["100"]));
        let table = DataFrame::new(columns).unwrap();

        let (annotated, inconsistent) = check_consistency(table).unwrap();
        assert!(inconsistent);
        let errors = annotated.column(ERROR_COLUMN).unwrap().f64().unwrap();
        assert_eq!(errors.get(0), Some(-2.0));
        // Source columns keep their original dtype.
        assert_eq!(annotated.column("Ohio").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_missing_national_column_aborts() {
        let table = uniform_table(&["2024-01"], 1.0, &[Some(51.0)])
            .drop("United States")
            .unwrap();
        let err = check_consistency(table).unwrap_err();
        assert!(matches!(
            err,
            ConsistencyError::MissingField(Region::UnitedStates)
        ));
    }

    #[test]
    fn test_missing_state_column_aborts() {
        let table = uniform_table(&["2024-01"], 1.0, &[Some(51.0)])
            .drop("Wyoming")
            .unwrap();
        let err = check_consistency(table).unwrap_err();
        assert!(matches!(err, ConsistencyError::MissingField(Region::Wyoming)));
    }

    #[test]
    fn test_invalid_value_aborts_whole_table() {
        let mut table = uniform_table(&["2024-01", "2024-02"], 1.0, &[Some(51.0), Some(51.0)]);
        table
            .with_column(Column::new("Maine".into(), ["1", "NA"]))
            .unwrap();
        let err = check_consistency(table).unwrap_err();
        assert!(matches!(
            err,
            ConsistencyError::InvalidValue {
                region: Region::Maine,
                ..
            }
        ));
    }

    #[test]
    fn test_rerun_replaces_annotation_columns() {
        let table = uniform_table(&["2024-01"], 1.0, &[Some(51.0)]);
        let (annotated, _) = check_consistency(table).unwrap();
        let width = annotated.width();
        let (annotated, inconsistent) = check_consistency(annotated).unwrap();
        assert_eq!(annotated.width(), width);
        assert!(!inconsistent);
    }
}
