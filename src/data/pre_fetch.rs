// Async code to run in main before any analysis starts

use anyhow::{Context, Result};

use crate::Cli;
use crate::config::{BINANCE, PRICE_VERSION};
use crate::data::prices::bnapi_version::BNAPIVersion;
use crate::data::prices::serde_version::{SerdeVersion, check_local_data_validity};
use crate::data::prices::{CreatePriceSeriesData, get_price_series_async};
use crate::domain::PriceSeries;

/// Load the daily price series before any simulation runs.
///
/// If `check_local_data_validity` fails, the only choice is the API.
/// Otherwise both providers are available and we prioritize whatever the
/// user asked for (`--prefer-api` flips the order).
pub async fn fetch_price_data(
    prices_acceptable_age_secs: i64,
    args: &Cli,
) -> Result<(PriceSeries, &'static str)> {
    let providers: Vec<Box<dyn CreatePriceSeriesData>> = {
        let api_first = args.prefer_api;
        match (
            api_first,
            check_local_data_validity(prices_acceptable_age_secs, PRICE_VERSION, BINANCE.symbol),
        ) {
            (false, Ok(_)) => vec![
                Box::new(SerdeVersion { symbol: BINANCE.symbol }),
                Box::new(BNAPIVersion),
            ], // local first
            (true, Ok(_)) => vec![
                Box::new(BNAPIVersion),
                Box::new(SerdeVersion { symbol: BINANCE.symbol }),
            ], // API first
            (_, Err(e)) => {
                log::warn!("⚠️  Local cache validation failed: {:#}", e);
                log::warn!("⚠️  Falling back to Binance API...");
                vec![Box::new(BNAPIVersion)] // API only
            }
        }
    };

    let (series, signature) = get_price_series_async(&providers)
        .await
        .context("failed to retrieve the price series from any provider")?;

    log::info!("Successfully retrieved price data using: {}.", signature);
    Ok((series, signature))
}
