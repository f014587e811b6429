use crate::types::observation::ObservationRow;

/// Result of reconciling one row against its national total.
///
/// Both fields are `None` (undetermined) when any state value is missing, which is
/// different from a computed zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reconciliation {
    /// National value minus the sum of the state values.
    pub error: Option<f64>,
    /// Sum of the fifty states and the District of Columbia.
    pub state_aggregate: Option<f64>,
}

impl Reconciliation {
    pub const UNDETERMINED: Reconciliation = Reconciliation {
        error: None,
        state_aggregate: None,
    };

    pub fn is_determined(&self) -> bool {
        self.state_aggregate.is_some()
    }
}

/// Compares the national value of a row with the sum of its state values.
///
/// States are summed in canonical order. The first missing state stops the sum and the
/// whole row is reported as undetermined; no partial sum is produced.
pub fn reconcile(row: &ObservationRow) -> Reconciliation {
    let mut state_aggregate = 0.0;
    for value in row.states() {
        match value {
            Some(v) => state_aggregate += v,
            None => return Reconciliation::UNDETERMINED,
        }
    }

    Reconciliation {
        error: Some(row.national() - state_aggregate),
        state_aggregate: Some(state_aggregate),
    }
}
