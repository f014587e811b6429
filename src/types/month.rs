use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;
use std::fmt::{Display, Formatter};

/// A calendar month, stored as (year, month number 1-12).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Month(pub i32, pub u32);

impl Month {
    pub fn new(month: u32, year: i32) -> Self {
        Self(year, month)
    }
    pub fn year(self) -> i32 {
        self.0
    }
    pub fn month(self) -> u32 {
        self.1
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.year(), date.month())
    }

    /// First day of the month, `None` if the month number is out of range.
    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0, self.1, 1)
    }

    /// Number of days in the month, `None` if the month number is out of range.
    pub fn days(self) -> Option<u32> {
        days_in_year_month(self.0, self.1)
    }

    pub fn succ(self) -> Month {
        if self.1 >= 12 {
            Month(self.0 + 1, 1)
        } else {
            Month(self.0, self.1 + 1)
        }
    }

    /// Parses an EIA period label, either "YYYY-MM" or a full "YYYY-MM-DD" date.
    pub fn parse_period(period: &str) -> Option<Month> {
        let period = period.trim();
        if let Ok(date) = NaiveDate::parse_from_str(period, "%Y-%m-%d") {
            return Some(Month::from_date(date));
        }
        let (year, month) = period.split_once('-')?;
        let month = Month(year.parse().ok()?, month.parse().ok()?);
        month.first_day().map(|_| month)
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0, self.1)
    }
}

fn days_in_year_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_month_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let first_day_of_next_month = NaiveDate::from_ymd_opt(next_month_year, next_month, 1)?;
    let last_day_of_current_month = first_day_of_next_month - Duration::days(1);
    Some(last_day_of_current_month.day())
}

/// Number of days (28-31) in the Gregorian calendar month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    // A valid NaiveDate always has a following month start, except at the very end
    // of chrono's range where December is 31 days anyway.
    days_in_year_month(date.year(), date.month()).unwrap_or(31)
}

/// Splits `[start, end]` into consecutive one-month request windows.
///
/// Breaks are the month starts inside the range (`start` itself when it is the first
/// of a month). Each window is the half-open pair between two neighbouring breaks, so
/// 2024-01-01..2024-04-01 yields January, February and March.
pub fn month_chunks(start: NaiveDate, end: NaiveDate) -> Vec<(NaiveDate, NaiveDate)> {
    let first = if start.day() == 1 {
        Month::from_date(start)
    } else {
        Month::from_date(start).succ()
    };

    let mut breaks = Vec::new();
    let mut current = first;
    while let Some(day) = current.first_day() {
        if day > end {
            break;
        }
        breaks.push(day);
        current = current.succ();
    }

    breaks.windows(2).map(|pair| (pair[0], pair[1])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(date(2024, 2, 10)), 29);
        assert_eq!(days_in_month(date(2023, 2, 1)), 28);
        assert_eq!(days_in_month(date(1900, 2, 1)), 28);
        assert_eq!(days_in_month(date(2000, 2, 1)), 29);
        for year in [1999, 2023, 2024] {
            assert_eq!(days_in_month(date(year, 1, 31)), 31);
            assert_eq!(days_in_month(date(year, 4, 15)), 30);
            assert_eq!(days_in_month(date(year, 12, 1)), 31);
        }
    }

    #[test]
    fn test_month_helpers() {
        let dec = Month::new(12, 2023);
        assert_eq!(dec.succ(), Month::new(1, 2024));
        assert_eq!(dec.to_string(), "2023-12");
        assert_eq!(Month::new(2, 2024).days(), Some(29));
        assert_eq!(Month::new(13, 2024).days(), None);
        assert_eq!(Month::new(13, 2024).first_day(), None);
    }

    #[test]
    fn test_parse_period() {
        assert_eq!(Month::parse_period("2024-03"), Some(Month::new(3, 2024)));
        assert_eq!(Month::parse_period("2024-03-01"), Some(Month::new(3, 2024)));
        assert_eq!(Month::parse_period("2024-13"), None);
        assert_eq!(Month::parse_period("March 2024"), None);
    }

    #[test]
    fn test_month_chunks() {
        let chunks = month_chunks(date(2024, 1, 1), date(2024, 4, 1));
        assert_eq!(
            chunks,
            vec![
                (date(2024, 1, 1), date(2024, 2, 1)),
                (date(2024, 2, 1), date(2024, 3, 1)),
                (date(2024, 3, 1), date(2024, 4, 1)),
            ]
        );

        // A mid-month start rounds up to the next month start.
        let chunks = month_chunks(date(2023, 11, 15), date(2024, 1, 20));
        assert_eq!(chunks, vec![(date(2023, 12, 1), date(2024, 1, 1))]);

        assert!(month_chunks(date(2024, 1, 1), date(2024, 1, 31)).is_empty());
        assert!(month_chunks(date(2024, 5, 1), date(2024, 1, 1)).is_empty());
    }
}
