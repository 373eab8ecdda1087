use chrono::NaiveDate;
use thiserror::Error;

/// Failures surfaced by series construction and the analysis passes.
///
/// Everything here is an explicit variant so callers can match on it;
/// NaN or infinite intermediates are converted to these before they can
/// reach an aggregate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("price series is empty")]
    EmptySeries,

    #[error("price series dates must be strictly increasing (violation at {date})")]
    UnorderedSeries { date: NaiveDate },

    #[error("{count} price sample(s) rejected: non-positive or non-finite close")]
    DataIntegrity { count: usize },

    #[error(
        "no {window_years}-year window fits a series spanning {first}..{last} \
         (need at least {window_years} years of data)"
    )]
    InsufficientData {
        window_years: u32,
        first: NaiveDate,
        last: NaiveDate,
    },

    #[error("invalid day of year {day}, expected 1..=366")]
    InvalidDayOfYear { day: u16 },
}
