//! Configuration module for the DCA analysis application.

pub mod analysis;
pub mod binance;
pub mod persistence;
pub mod report;

// Re-export commonly used items
pub use analysis::ANALYSIS;
pub use binance::BINANCE;
pub use persistence::{
    PRICE_FILENAME_WITHOUT_EXT, PRICE_PATH, PRICE_VERSION, price_cache_filename,
};
pub use report::REPORT;
