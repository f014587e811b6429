pub mod columns;
pub mod data_loader;
pub mod error;
pub mod response;
