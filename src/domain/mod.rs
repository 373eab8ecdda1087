// Domain types and value objects
pub mod error;
pub mod price_series;
pub mod strategy;
pub mod window;

// Re-export commonly used types
pub use error::AnalysisError;
pub use price_series::{PriceSample, PriceSeries};
pub use strategy::Strategy;
pub use window::Window;
