//! Column names of the consumption records frame. They follow the field names of the
//! EIA v2 API so cached frames stay readable next to the raw responses.

pub const PERIOD: &str = "period";
pub const DUOAREA: &str = "duoarea";
pub const AREA_NAME: &str = "area-name";
pub const PRODUCT: &str = "product";
pub const PRODUCT_NAME: &str = "product-name";
pub const PROCESS: &str = "process";
pub const PROCESS_NAME: &str = "process-name";
pub const SERIES: &str = "series";
pub const SERIES_DESCRIPTION: &str = "series-description";
pub const VALUE: &str = "value";
pub const UNITS: &str = "units";

/// Normalized area name, see [`crate::normalize`].
pub const STANDARD_STATE_NAME: &str = "standard_state_name";
