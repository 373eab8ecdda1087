pub mod bnapi_version;
pub mod cache_file;
pub mod serde_version;

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::domain::PriceSeries;

#[async_trait]
pub trait CreatePriceSeriesData {
    // Either create a price series OR return an anyhow::error
    async fn create_price_series(&self) -> Result<PriceSeries>;

    /// A unique identifier for this implementation (so that afterwards we know which one we used).
    fn signature(&self) -> &'static str;
}

pub async fn get_price_series_async(
    implementations: &[Box<dyn CreatePriceSeriesData>],
) -> Result<(PriceSeries, &'static str)> {
    for imp in implementations {
        match imp.create_price_series().await {
            Ok(series) => {
                let signature = imp.signature();
                return Ok((series, signature));
            }
            Err(e) => {
                log::info!("Error with an async implementation: {}", e);
                // Continue to the next implementation
            }
        }
    }
    Err(anyhow!("All async implementations failed to create data"))
}
