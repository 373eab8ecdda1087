//! File persistence and serialization configuration

/// Directory path for storing the price-series cache
pub const PRICE_PATH: &str = "price_data";

/// Base filename for the price cache (without extension)
pub const PRICE_FILENAME_WITHOUT_EXT: &str = "btc_prices";

/// Current version of the price cache serialization format
pub const PRICE_VERSION: f64 = 1.0;

/// Generate the symbol-specific cache filename
/// Example: "btc_prices_BTCUSDT_v1.bin"
pub fn price_cache_filename(symbol: &str) -> String {
    format!(
        "{}_{}_v{}.bin",
        PRICE_FILENAME_WITHOUT_EXT, symbol, PRICE_VERSION
    )
}
