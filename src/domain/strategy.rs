use serde::{Deserialize, Serialize};

use crate::domain::error::AnalysisError;

/// Number of equal allocations a yearly budget is split into for daily buys.
/// Fixed at 365 regardless of leap years so results stay comparable.
pub const DAILY_ALLOCATIONS_PER_YEAR: f64 = 365.0;

/// Number of equal allocations a yearly budget is split into for bi-weekly buys.
pub const BIWEEKLY_ALLOCATIONS_PER_YEAR: f64 = 26.0;

/// Spacing between bi-weekly target dates.
pub const BIWEEKLY_PERIOD_DAYS: u64 = 14;

/// How a fixed yearly budget is deployed against the price series.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    /// One full-budget purchase per calendar year, on the first trading day
    /// on or after the given day of year (1..=366).
    LumpSumOnDay(u16),
    /// Budget split into 365 equal buys, one per available trading day.
    DailyDca,
    /// Budget split into 26 equal buys, at targets spaced 14 days apart.
    BiWeeklyDca,
}

impl Strategy {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        match *self {
            Strategy::LumpSumOnDay(day) if day == 0 || day > 366 => {
                Err(AnalysisError::InvalidDayOfYear { day })
            }
            _ => Ok(()),
        }
    }
}

// Labels match the report conventions: day 1 and day 152 are the two
// lump-sum dates the comparison reports care about.
impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Strategy::LumpSumOnDay(1) => write!(f, "Lump Sum (Jan 1st)"),
            Strategy::LumpSumOnDay(152) => write!(f, "Lump Sum (June 1st)"),
            Strategy::LumpSumOnDay(day) => write!(f, "Lump Sum (day {})", day),
            Strategy::DailyDca => write!(f, "Daily DCA"),
            Strategy::BiWeeklyDca => write!(f, "Bi-Weekly DCA"),
        }
    }
}
