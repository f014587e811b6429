pub mod estimator;
pub mod series;
