//! Fetches two years of residential consumption and checks whether the state values add up
//! to the national figure for every month.

use chrono::NaiveDate;
use eia_gas::{check_consistency, Component, Eia, EiaError, ERROR_COLUMN};
use std::env;

#[tokio::main]
async fn main() -> Result<(), EiaError> {
    configure_polars_display();
    // Needs EIA_API_KEY on the first run, afterwards the cached parquet file is used.
    let client = Eia::new().await?;

    for component in [Component::Residential, Component::Commercial] {
        let table = client
            .state_table()
            .component(component)
            .start(NaiveDate::from_ymd_opt(2019, 1, 1).unwrap())
            .end(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap())
            .call()
            .await?;

        let (annotated, inconsistent) = check_consistency(table)?;
        println!("--- {} (inconsistent: {}) ---", component, inconsistent);
        println!("{}", annotated.select(["period", ERROR_COLUMN])?);
    }

    Ok(())
}

fn configure_polars_display() {
    // show every row of the two-year range
    env::set_var("POLARS_FMT_MAX_ROWS", "30");
}
