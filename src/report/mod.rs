// Flat report artifacts (CSV + plotly HTML) and the logged comparison
pub mod comparison;
pub mod csv;
pub mod html;

pub use comparison::{ComparisonEntry, compare, log_comparison};
