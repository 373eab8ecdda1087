use anyhow::{Context, Result, bail};
use async_trait::async_trait;

use crate::data::prices::{CreatePriceSeriesData, cache_file::CacheFile};
use crate::domain::PriceSeries;
use crate::utils::time_utils::how_many_seconds_ago;

pub fn check_local_data_validity(
    recency_required_secs: i64,
    version_required: f64,
    symbol: &str,
) -> Result<()> {
    let full_path = CacheFile::default_cache_path(symbol);

    log::debug!("Checking validity of local cache at {:?}...", full_path);
    let cache = CacheFile::load_from_path(&full_path)?;

    // Check version
    if cache.version != version_required {
        bail!(
            "Cache version mismatch: file v{} vs required v{}",
            cache.version,
            version_required
        );
    }

    // Check symbol matches
    if cache.symbol != symbol {
        bail!(
            "Cache symbol mismatch: file has {}, expected {}",
            cache.symbol,
            symbol
        );
    }

    // Check recency
    let seconds_ago = how_many_seconds_ago(cache.timestamp_ms);
    if seconds_ago > recency_required_secs {
        bail!(
            "Cache too old: created {} seconds ago (limit: {} seconds)",
            seconds_ago,
            recency_required_secs
        );
    }

    log::debug!(
        "✅ Cache valid: v{}, {}s old (limit {}s), symbol {}",
        cache.version,
        seconds_ago,
        recency_required_secs,
        cache.symbol
    );

    Ok(())
}

/// Write the price series to the binary cache file.
/// Uses bincode for ~10-20x faster serialization vs JSON.
pub fn write_price_data_locally(
    price_signature: &'static str,
    series: &PriceSeries,
    symbol: &str,
) -> Result<()> {
    if price_signature != "Binance API" {
        log::debug!("Skipping cache write (data not from Binance API)");
        return Ok(());
    }

    let full_path = CacheFile::default_cache_path(symbol);
    let cache = CacheFile::new(
        symbol,
        series.samples().to_vec(),
        crate::config::PRICE_VERSION,
    );
    cache.save_to_path(&full_path)?;

    log::info!(
        "✅ Cache written: {:?} ({} samples)",
        full_path,
        series.len()
    );
    Ok(())
}

/// Async wrapper for write_price_data_locally.
/// Spawns a blocking task so the runtime isn't stalled by disk I/O.
pub async fn write_price_data_async(
    price_signature: &'static str,
    series: PriceSeries,
    symbol: String,
) -> Result<()> {
    tokio::task::spawn_blocking(move || {
        write_price_data_locally(price_signature, &series, &symbol)
    })
    .await
    .context("Cache write task panicked")?
}

pub struct SerdeVersion {
    pub symbol: &'static str,
}

#[async_trait]
impl CreatePriceSeriesData for SerdeVersion {
    fn signature(&self) -> &'static str {
        "Local Cache"
    }

    async fn create_price_series(&self) -> Result<PriceSeries> {
        let full_path = CacheFile::default_cache_path(self.symbol);
        log::debug!("Reading cache from: {:?}...", full_path);

        let cache = tokio::task::spawn_blocking(move || CacheFile::load_from_path(&full_path))
            .await
            .context("Deserialization task panicked")?
            .context("Failed to load cache file")?;

        // Rebuild through the validating constructor; a tampered or stale
        // cache must not smuggle bad samples past it
        let series = PriceSeries::from_samples(cache.samples)
            .context("Cached samples failed series validation")?;

        log::info!(
            "✅ Cache loaded: {} samples for {}",
            series.len(),
            cache.symbol
        );
        Ok(series)
    }
}
