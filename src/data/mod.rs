// Data loading and caching
pub mod pre_fetch;
pub mod prices;

// Re-export commonly used types
pub use pre_fetch::fetch_price_data;
pub use prices::CreatePriceSeriesData;
