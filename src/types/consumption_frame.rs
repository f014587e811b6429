//! Contains the `ConsumptionLazyFrame` structure for lazy operations on EIA consumption records.

use crate::consistency::checker::check_consistency;
use crate::consumption::columns::{PERIOD, PROCESS_NAME, STANDARD_STATE_NAME, VALUE};
use crate::consumption::error::FetchError;
use crate::disaggregation::series::MonthlySeries;
use crate::types::component::Component;
use crate::types::month::Month;
use crate::types::region::Region;
use crate::EiaError;
use log::debug;
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// A wrapper around a Polars `LazyFrame` holding EIA consumption records, one row per
/// (period, area, process) as returned by the API.
///
/// Instances are typically obtained via [`crate::Eia::consumption`].
///
/// # Errors
///
/// Operations that trigger computation on the underlying `LazyFrame` (e.g. `.collect()`
/// or [`ConsumptionLazyFrame::pivot`]) can return a [`PolarsError`].
#[derive(Clone)]
pub struct ConsumptionLazyFrame {
    /// The underlying Polars LazyFrame containing the consumption records.
    pub frame: LazyFrame,
}

impl ConsumptionLazyFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Filters the records based on a Polars predicate expression.
    ///
    /// Returns a *new* `ConsumptionLazyFrame`; the original remains unchanged.
    pub fn filter(&self, predicate: Expr) -> ConsumptionLazyFrame {
        ConsumptionLazyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Keeps the records of one consumption component (matched on `process-name`).
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use eia_gas::{Component, Eia, EiaError};
    /// # use chrono::NaiveDate;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), EiaError> {
    /// let client = Eia::new().await?;
    /// let residential = client
    ///     .consumption()
    ///     .start(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap())
    ///     .end(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    ///     .call()
    ///     .await?
    ///     .component(Component::Residential);
    /// println!("{}", residential.frame.collect()?);
    /// # Ok(())
    /// # }
    /// ```
    pub fn component(&self, component: Component) -> ConsumptionLazyFrame {
        self.filter(col(PROCESS_NAME).eq(lit(component.process_name())))
    }

    /// Keeps the records of one region (matched on the normalized area name).
    pub fn state(&self, region: Region) -> ConsumptionLazyFrame {
        self.filter(col(STANDARD_STATE_NAME).eq(lit(region.name())))
    }

    /// Keeps the records whose period lies between `start` and `end` (inclusive).
    pub fn get_range(&self, start: Month, end: Month) -> ConsumptionLazyFrame {
        self.filter(
            col(PERIOD)
                .gt_eq(lit(start.to_string()))
                .and(col(PERIOD).lt_eq(lit(end.to_string()))),
        )
    }

    /// Keeps the records of a single month.
    pub fn get_at(&self, month: Month) -> ConsumptionLazyFrame {
        self.filter(col(PERIOD).eq(lit(month.to_string())))
    }

    /// Pivots the records into a state table: one row per period (ascending), one column
    /// per normalized region (sorted by name), values in their raw textual form.
    ///
    /// Records without a normalized region are left out. Filter on a single component
    /// first, otherwise the same (period, region) pair shows up once per process.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::DuplicateEntry`] (wrapped in [`EiaError::Fetch`]) when a
    /// (period, region) pair occurs more than once.
    pub fn pivot(&self) -> Result<DataFrame, EiaError> {
        let df = self
            .frame
            .clone()
            .select([
                col(PERIOD),
                col(STANDARD_STATE_NAME),
                col(VALUE).cast(DataType::String),
            ])
            .collect()?;
        let (table, skipped) = pivot_state_table(&df)?;
        if skipped.without_period > 0 {
            debug!("Skipped {} records without a period", skipped.without_period);
        }
        if skipped.without_region > 0 {
            debug!(
                "Skipped {} records without a recognized region",
                skipped.without_region
            );
        }
        Ok(table)
    }

    /// Collects the records of one region.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NoRegionData`] (wrapped in [`EiaError::Fetch`]) when the
    /// current selection holds no record for `region`.
    pub fn state_records(&self, region: Region) -> Result<DataFrame, EiaError> {
        let df = self.state(region).frame.collect()?;
        if df.height() == 0 {
            return Err(FetchError::NoRegionData { region }.into());
        }
        Ok(df)
    }

    /// Pivots the records and runs the consistency check on the resulting state table.
    pub fn check_consistency(&self) -> Result<(DataFrame, bool), EiaError> {
        Ok(check_consistency(self.pivot()?)?)
    }

    /// Monthly series of one region, taken from the pivoted state table.
    pub fn monthly_series(&self, region: Region) -> Result<MonthlySeries, EiaError> {
        let table = self.pivot()?;
        Ok(MonthlySeries::from_state_table(&table, region)?)
    }
}

/// Records left out of a pivot.
#[derive(Debug, Default, PartialEq, Eq)]
struct SkippedRecords {
    without_period: usize,
    without_region: usize,
}

fn pivot_state_table(df: &DataFrame) -> Result<(DataFrame, SkippedRecords), FetchError> {
    let periods = df.column(PERIOD)?.str()?;
    let regions = df.column(STANDARD_STATE_NAME)?.str()?;
    let values = df.column(VALUE)?.str()?;

    let mut rows: BTreeMap<&str, BTreeMap<&str, Option<&str>>> = BTreeMap::new();
    let mut region_names: BTreeSet<&str> = BTreeSet::new();
    let mut skipped = SkippedRecords::default();

    for ((period, region), value) in periods.into_iter().zip(regions).zip(values) {
        let Some(period) = period else {
            skipped.without_period += 1;
            continue;
        };
        let Some(region) = region else {
            skipped.without_region += 1;
            continue;
        };
        region_names.insert(region);
        if rows.entry(period).or_default().insert(region, value).is_some() {
            return Err(FetchError::DuplicateEntry {
                period: period.to_string(),
                region: region.to_string(),
            });
        }
    }
    let mut columns = Vec::with_capacity(region_names.len() + 1);
    let period_values: Vec<&str> = rows.keys().copied().collect();
    columns.push(Column::new(PERIOD.into(), period_values));
    for name in region_names {
        let cells: Vec<Option<&str>> = rows
            .values()
            .map(|row| row.get(name).copied().flatten())
            .collect();
        columns.push(Column::new(name.into(), cells));
    }

    Ok((DataFrame::new(columns)?, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consistency::checker::ERROR_COLUMN;
    use crate::consumption::data_loader::records_to_frame;
    use crate::consumption::data_loader::tests::record;
    use crate::consumption::response::ConsumptionRecord;
    use crate::types::region::STATES;

    const RES: &str = "Residential Consumption";
    const COM: &str = "Commercial Consumption";

    fn lazy(records: &[ConsumptionRecord]) -> ConsumptionLazyFrame {
        ConsumptionLazyFrame::new(records_to_frame(records).unwrap().lazy())
    }

    /// All 51 states at `state_value` plus the nation, for one period and process.
    fn full_period(period: &str, process: &str, state_value: &str, national: &str) -> Vec<ConsumptionRecord> {
        let mut records: Vec<ConsumptionRecord> = STATES
            .iter()
            .map(|region| record(period, &format!("USA-{}", region.abbreviation()), process, Some(state_value)))
            .collect();
        records.push(record(period, "U.S.", process, Some(national)));
        records
    }

    #[test]
    fn test_component_state_and_range_filters() {
        let records = vec![
            record("2024-01", "Ohio", RES, Some("1")),
            record("2024-02", "Ohio", RES, Some("2")),
            record("2024-03", "Ohio", RES, Some("3")),
            record("2024-02", "Ohio", COM, Some("20")),
            record("2024-02", "Texas", RES, Some("200")),
        ];
        let frame = lazy(&records);

        let ohio_res = frame
            .component(Component::Residential)
            .state(Region::Ohio)
            .frame
            .collect()
            .unwrap();
        assert_eq!(ohio_res.height(), 3);

        let range = frame
            .get_range(Month::new(2, 2024), Month::new(3, 2024))
            .frame
            .collect()
            .unwrap();
        assert_eq!(range.height(), 4);

        let feb_com = frame
            .get_at(Month::new(2, 2024))
            .component(Component::Commercial)
            .frame
            .collect()
            .unwrap();
        assert_eq!(feb_com.height(), 1);
    }

    #[test]
    fn test_state_records_require_data() {
        let records = vec![
            record("2024-01", "USA-OH", RES, Some("1")),
            record("2024-02", "Ohio", RES, Some("2")),
            record("2024-02", "Texas", COM, Some("20")),
        ];
        let frame = lazy(&records);

        let ohio = frame.state_records(Region::Ohio).unwrap();
        assert_eq!(ohio.height(), 2);

        let err = frame
            .component(Component::Commercial)
            .state_records(Region::Ohio)
            .unwrap_err();
        assert!(matches!(
            err,
            EiaError::Fetch(FetchError::NoRegionData {
                region: Region::Ohio
            })
        ));
        assert_eq!(err.to_string(), "No Ohio data is available");

        let err = frame
            .get_at(Month::new(3, 2024))
            .state_records(Region::Texas)
            .unwrap_err();
        assert!(matches!(err, EiaError::Fetch(FetchError::NoRegionData { .. })));
    }

    #[test]
    fn test_pivot_shapes_state_table() {
        let records = vec![
            record("2024-02", "Ohio", RES, Some("2")),
            record("2024-01", "Ohio", RES, Some("1")),
            record("2024-01", "Alaska", RES, None),
            record("2024-01", "PADD 1", RES, Some("9")),
        ];
        let table = lazy(&records).pivot().unwrap();

        let names: Vec<&str> = table
            .get_column_names()
            .into_iter()
            .map(|n| n.as_str())
            .collect();
        assert_eq!(names, vec!["period", "Alaska", "Ohio"]);

        let periods = table.column(PERIOD).unwrap().str().unwrap();
        assert_eq!(periods.get(0), Some("2024-01"));
        assert_eq!(periods.get(1), Some("2024-02"));

        let alaska = table.column("Alaska").unwrap().str().unwrap();
        assert_eq!(alaska.get(0), None);
        assert_eq!(alaska.get(1), None);
        let ohio = table.column("Ohio").unwrap().str().unwrap();
        assert_eq!(ohio.get(1), Some("2"));
    }

    #[test]
    fn test_pivot_counts_skipped_records_by_cause() {
        let mut no_period = record("2024-01", "Ohio", RES, Some("4"));
        no_period.period = None;
        let records = vec![
            record("2024-01", "Ohio", RES, Some("1")),
            record("2024-01", "PADD 1", RES, Some("9")),
            record("2024-01", "Midwest Region", RES, Some("8")),
            no_period,
        ];
        let df = lazy(&records)
            .frame
            .select([
                col(PERIOD),
                col(STANDARD_STATE_NAME),
                col(VALUE).cast(DataType::String),
            ])
            .collect()
            .unwrap();
        let (table, skipped) = pivot_state_table(&df).unwrap();
        assert_eq!(table.height(), 1);
        assert_eq!(
            skipped,
            SkippedRecords {
                without_period: 1,
                without_region: 2,
            }
        );
    }

    #[test]
    fn test_pivot_rejects_duplicates() {
        let records = vec![
            record("2024-01", "Ohio", RES, Some("1")),
            record("2024-01", "Ohio", COM, Some("5")),
        ];
        let err = lazy(&records).pivot().unwrap_err();
        assert!(matches!(
            err,
            EiaError::Fetch(FetchError::DuplicateEntry { .. })
        ));
        assert!(lazy(&records).component(Component::Commercial).pivot().is_ok());
    }

    #[test]
    fn test_records_through_consistency_check() {
        let mut records = full_period("2024-01", RES, "10", "510");
        records.extend(full_period("2024-02", RES, "10", "512"));
        records.extend(full_period("2024-01", COM, "1", "51"));
        let frame = lazy(&records).component(Component::Residential);

        let (annotated, inconsistent) = frame.check_consistency().unwrap();
        assert!(inconsistent);
        let errors = annotated.column(ERROR_COLUMN).unwrap().f64().unwrap();
        assert_eq!(errors.get(0), Some(0.0));
        assert_eq!(errors.get(1), Some(2.0));

        let (_, commercial_inconsistent) = lazy(&records)
            .component(Component::Commercial)
            .check_consistency()
            .unwrap();
        assert!(!commercial_inconsistent);
    }

    #[test]
    fn test_monthly_series_of_national_column() {
        let mut records = full_period("2024-01", RES, "10", "310");
        records.extend(full_period("2024-02", RES, "10", "280"));
        let series = lazy(&records)
            .component(Component::Residential)
            .monthly_series(Region::UnitedStates)
            .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.observations()[1].value, 280.0);
    }
}
