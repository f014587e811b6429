//! Strongly typed reconciliation input: one period's national value and the readings
//! of all fifty states and the District of Columbia.

use crate::consistency::error::ConsistencyError;
use crate::types::cell::RawCell;
use crate::types::region::{normalize, Region, STATES, STATE_COUNT};
use std::collections::HashMap;

/// One period of consumption values, validated at construction.
///
/// The national value is kept as a float (NaN when missing). State readings are
/// `None` when the value is missing; a missing state never counts as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRow {
    national: f64,
    states: [Option<f64>; STATE_COUNT],
}

impl ObservationRow {
    /// Builds a row from already-coerced values, indexed in canonical state order.
    pub fn new(national: f64, states: [Option<f64>; STATE_COUNT]) -> Self {
        Self { national, states }
    }

    /// Builds a row from named cells.
    ///
    /// Names go through [`normalize`]; names that do not resolve to a region are ignored.
    ///
    /// # Errors
    ///
    /// * [`ConsistencyError::MissingField`] if the national key or any state key is absent.
    ///   A key whose value is missing is fine, the key itself must be there.
    /// * [`ConsistencyError::DuplicateField`] if two names resolve to the same region.
    /// * [`ConsistencyError::InvalidValue`] if a cell holds non-numeric text.
    pub fn from_cells<K, I>(cells: I) -> Result<Self, ConsistencyError>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, RawCell)>,
    {
        let mut by_region: HashMap<Region, RawCell> = HashMap::new();
        for (name, cell) in cells {
            let Some(region) = normalize(name.as_ref()) else {
                continue;
            };
            if by_region.insert(region, cell).is_some() {
                return Err(ConsistencyError::DuplicateField(region));
            }
        }
        Self::from_region_cells(|region| by_region.remove(&region))
    }

    /// Builds a row by asking `lookup` for each region: the nation first, then every
    /// state in canonical order.
    pub(crate) fn from_region_cells<F>(mut lookup: F) -> Result<Self, ConsistencyError>
    where
        F: FnMut(Region) -> Option<RawCell>,
    {
        let national_cell = lookup(Region::UnitedStates)
            .ok_or(ConsistencyError::MissingField(Region::UnitedStates))?;
        let national = national_cell
            .coerce()
            .map_err(|source| ConsistencyError::InvalidValue {
                region: Region::UnitedStates,
                source,
            })?;

        let mut states = [None; STATE_COUNT];
        for (slot, region) in states.iter_mut().zip(STATES) {
            let cell = lookup(region).ok_or(ConsistencyError::MissingField(region))?;
            *slot = cell
                .reading()
                .map_err(|source| ConsistencyError::InvalidValue { region, source })?;
        }

        Ok(Self { national, states })
    }

    pub fn national(&self) -> f64 {
        self.national
    }

    /// State readings in canonical order.
    pub fn states(&self) -> &[Option<f64>; STATE_COUNT] {
        &self.states
    }

    /// Reading for any region; the national value is `None` when it is NaN.
    pub fn get(&self, region: Region) -> Option<f64> {
        match region.state_index() {
            Some(index) => self.states[index],
            None if self.national.is_nan() => None,
            None => Some(self.national),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_cells() -> Vec<(String, RawCell)> {
        let mut cells: Vec<(String, RawCell)> = STATES
            .iter()
            .map(|region| (region.name().to_string(), RawCell::Number(1.0)))
            .collect();
        cells.push(("United States".to_string(), RawCell::from("51")));
        cells
    }

    #[test]
    fn test_from_cells_complete_row() {
        let row = ObservationRow::from_cells(complete_cells()).unwrap();
        assert_eq!(row.national(), 51.0);
        assert!(row.states().iter().all(|v| *v == Some(1.0)));
        assert_eq!(row.get(Region::Texas), Some(1.0));
        assert_eq!(row.get(Region::UnitedStates), Some(51.0));
    }

    #[test]
    fn test_missing_national_key_is_an_error() {
        let cells: Vec<_> = complete_cells()
            .into_iter()
            .filter(|(name, _)| name != "United States")
            .collect();
        let err = ObservationRow::from_cells(cells).unwrap_err();
        assert!(matches!(
            err,
            ConsistencyError::MissingField(Region::UnitedStates)
        ));
        assert_eq!(err.to_string(), "United States value not provided");
    }

    #[test]
    fn test_missing_state_key_names_the_state() {
        let cells: Vec<_> = complete_cells()
            .into_iter()
            .filter(|(name, _)| name != "Ohio")
            .collect();
        let err = ObservationRow::from_cells(cells).unwrap_err();
        assert!(matches!(err, ConsistencyError::MissingField(Region::Ohio)));
    }

    #[test]
    fn test_missing_value_keeps_key_and_becomes_none() {
        let mut cells = complete_cells();
        cells[3].1 = RawCell::Missing;
        cells[4].1 = RawCell::from("");
        let row = ObservationRow::from_cells(cells).unwrap();
        assert_eq!(row.states()[3], None);
        assert_eq!(row.states()[4], None);
    }

    #[test]
    fn test_invalid_and_duplicate_cells() {
        let mut cells = complete_cells();
        cells[0].1 = RawCell::from("n/a");
        let err = ObservationRow::from_cells(cells).unwrap_err();
        assert!(matches!(
            err,
            ConsistencyError::InvalidValue {
                region: Region::Alabama,
                ..
            }
        ));

        let mut cells = complete_cells();
        cells.push(("AL".to_string(), RawCell::Number(2.0)));
        let err = ObservationRow::from_cells(cells).unwrap_err();
        assert!(matches!(err, ConsistencyError::DuplicateField(Region::Alabama)));
    }

    #[test]
    fn test_invalid_cell_after_gap_still_fails() {
        // Cells are validated when the row is built, before any early exit on a gap.
        let mut cells = complete_cells();
        cells[0].1 = RawCell::Missing;
        cells[50].1 = RawCell::from("W");
        let err = ObservationRow::from_cells(cells).unwrap_err();
        assert!(matches!(
            err,
            ConsistencyError::InvalidValue {
                region: Region::Wyoming,
                ..
            }
        ));
    }

    #[test]
    fn test_non_finite_text_is_invalid_not_missing() {
        for text in ["NaN", "inf"] {
            let mut cells = complete_cells();
            cells[10].1 = RawCell::from(text);
            let err = ObservationRow::from_cells(cells).unwrap_err();
            assert!(matches!(
                err,
                ConsistencyError::InvalidValue {
                    region: Region::Georgia,
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_unknown_names_are_ignored() {
        let mut cells = complete_cells();
        cells.push(("PADD 3".to_string(), RawCell::from("garbage")));
        assert!(ObservationRow::from_cells(cells).is_ok());
    }
}
