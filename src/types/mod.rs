pub mod cell;
pub mod component;
pub mod consumption_frame;
pub mod month;
pub mod observation;
pub mod region;
pub mod units;
