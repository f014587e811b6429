//! Spreads monthly national residential consumption uniformly over the days of each month.

use chrono::NaiveDate;
use eia_gas::{build_daily_estimator, Component, Eia, EiaError, Region};

#[tokio::main]
async fn main() -> Result<(), EiaError> {
    let client = Eia::new().await?;

    let series = client
        .consumption()
        .start(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap())
        .end(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .call()
        .await?
        .component(Component::Residential)
        .monthly_series(Region::UnitedStates)?;
    println!("Loaded {} monthly observations", series.len());

    let estimator = build_daily_estimator(&series);
    let from = NaiveDate::from_ymd_opt(2023, 2, 25).unwrap();
    let to = NaiveDate::from_ymd_opt(2023, 3, 5).unwrap();
    for (date, estimate) in estimator.estimate_range(from, to) {
        match estimate {
            Some(value) => println!("{date}: {value:.2}"),
            None => println!("{date}: no estimate"),
        }
    }

    Ok(())
}
