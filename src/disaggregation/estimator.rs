//! Uniform disaggregation of monthly totals into daily values.

use crate::disaggregation::series::MonthlySeries;
use crate::types::month::days_in_month;
use chrono::NaiveDate;
use log::info;

/// The half-open range `[start, end)` over which one monthly value determines the daily
/// estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub value: f64,
}

impl CoverageInterval {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// The monthly value spread over the days of the month containing `start`.
    pub fn daily_value(&self) -> f64 {
        self.value / f64::from(days_in_month(self.start))
    }
}

/// Daily view over a monthly series.
///
/// Built by [`build_daily_estimator`]. It owns a copy of the coverage intervals, so two
/// estimators built from the same series always agree.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyEstimator {
    intervals: Vec<CoverageInterval>,
}

/// Builds the coverage intervals of consecutive observation pairs.
///
/// The last observation has no successor and therefore covers nothing.
pub fn build_daily_estimator(series: &MonthlySeries) -> DailyEstimator {
    let intervals = series
        .observations()
        .windows(2)
        .map(|pair| CoverageInterval {
            start: pair[0].date,
            end: pair[1].date,
            value: pair[0].value,
        })
        .collect();
    DailyEstimator { intervals }
}

impl DailyEstimator {
    pub fn intervals(&self) -> &[CoverageInterval] {
        &self.intervals
    }

    /// Estimated value for `date`, `None` when no single interval covers it.
    ///
    /// Dates before the first observation, on or after the last one, or covered by
    /// several overlapping intervals (an unordered series) cannot be computed.
    pub fn estimate(&self, date: NaiveDate) -> Option<f64> {
        let mut covering = self.intervals.iter().filter(|i| i.contains(date));
        match (covering.next(), covering.next()) {
            (Some(interval), None) => Some(interval.daily_value()),
            _ => {
                info!("Cannot calculate uniform disaggregation for the date {}", date);
                None
            }
        }
    }

    pub fn as_fn(&self) -> impl Fn(NaiveDate) -> Option<f64> + '_ {
        move |date| self.estimate(date)
    }

    /// Estimates for every day in `[start, end)`.
    pub fn estimate_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<(NaiveDate, Option<f64>)> {
        start
            .iter_days()
            .take_while(|day| *day < end)
            .map(|day| (day, self.estimate(day)))
            .collect()
    }
}
