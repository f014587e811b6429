use crate::consistency::error::ConsistencyError;
use crate::consumption::columns::PERIOD;
use crate::types::cell::RawCell;
use crate::types::month::Month;
use crate::types::region::{normalize, Region};
use chrono::NaiveDate;
use polars::prelude::DataFrame;

/// A monthly total dated by the first day of its month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyObservation {
    pub date: NaiveDate,
    pub value: f64,
}

/// Monthly observations ordered by date ascending.
///
/// The ordering is the caller's responsibility; it is not checked or sorted here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlySeries {
    observations: Vec<MonthlyObservation>,
}

impl MonthlySeries {
    pub fn new(observations: Vec<MonthlyObservation>) -> Self {
        Self { observations }
    }

    pub fn push(&mut self, date: NaiveDate, value: f64) {
        self.observations.push(MonthlyObservation { date, value });
    }

    pub fn observations(&self) -> &[MonthlyObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Reads one region column of a state table as a monthly series.
    ///
    /// Periods ("YYYY-MM" or "YYYY-MM-DD") are dated to the first of their month and the
    /// values go through the usual cell coercion, so a missing value becomes NaN.
    /// Rows keep the table order.
    pub fn from_state_table(table: &DataFrame, region: Region) -> Result<Self, ConsistencyError> {
        let value_column = table
            .get_columns()
            .iter()
            .find(|column| normalize(column.name().as_str()) == Some(region))
            .ok_or(ConsistencyError::MissingField(region))?;
        let periods = table.column(PERIOD)?.str()?;

        let mut series = MonthlySeries::default();
        for (idx, period) in periods.into_iter().enumerate() {
            let period = period.unwrap_or_default();
            let date = Month::parse_period(period)
                .and_then(Month::first_day)
                .ok_or_else(|| ConsistencyError::InvalidPeriod(period.to_string()))?;
            let value = RawCell::from_any_value(&value_column.get(idx)?)
                .and_then(|cell| cell.coerce())
                .map_err(|source| ConsistencyError::InvalidValue { region, source })?;
            series.push(date, value);
        }
        Ok(series)
    }
}

impl FromIterator<(NaiveDate, f64)> for MonthlySeries {
    fn from_iter<T: IntoIterator<Item = (NaiveDate, f64)>>(iter: T) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(date, value)| MonthlyObservation { date, value })
                .collect(),
        )
    }
}
