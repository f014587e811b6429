mod consistency;
mod consumption;
mod disaggregation;
mod eia;
mod error;
mod types;
mod utils;

pub use eia::*;
pub use error::EiaError;

pub use consistency::checker::{check_consistency, ERROR_COLUMN, STATE_AGGREGATE_COLUMN};
pub use consistency::error::ConsistencyError;
pub use consistency::reconcile::{reconcile, Reconciliation};

pub use consumption::error::FetchError;
pub use consumption::response::ConsumptionRecord;

pub use disaggregation::estimator::{build_daily_estimator, CoverageInterval, DailyEstimator};
pub use disaggregation::series::{MonthlyObservation, MonthlySeries};

pub use types::cell::{InvalidValue, RawCell};
pub use types::component::{Component, UnknownComponent};
pub use types::consumption_frame::ConsumptionLazyFrame;
pub use types::month::{days_in_month, month_chunks, Month};
pub use types::observation::ObservationRow;
pub use types::region::{
    canonical_state_list, national_label, normalize, Region, UnknownRegion, STATES, STATE_COUNT,
};
pub use types::units::{mmcf_to_bcf, MMCF_PER_BCF};
