use rayon::prelude::*;

use crate::analysis::simulator::simulate;
use crate::domain::{AnalysisError, PriceSeries, Strategy};

/// Days scanned per year. Day 366 is intentionally excluded so results stay
/// comparable across leap and non-leap years.
pub const DAYS_SCANNED: u16 = 365;

/// Total acquired when the yearly lump sum lands on `day` every year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayPoint {
    pub day: u16,
    pub total_acquired: f64,
}

/// Lump-sum totals for each day of the year, in day order.
///
/// Days where no year produced a valid purchase are omitted entirely, so
/// every retained point has `total_acquired > 0`.
#[derive(Debug, Clone)]
pub struct DayOfYearScan {
    pub points: Vec<DayPoint>,
}

impl DayOfYearScan {
    pub fn get(&self, day: u16) -> Option<&DayPoint> {
        self.points.iter().find(|p| p.day == day)
    }

    /// Day with the highest total; earliest day wins a tie.
    pub fn best(&self) -> Option<&DayPoint> {
        self.points.iter().reduce(|best, p| {
            if p.total_acquired > best.total_acquired {
                p
            } else {
                best
            }
        })
    }

    /// Day with the lowest total; earliest day wins a tie.
    pub fn worst(&self) -> Option<&DayPoint> {
        self.points.iter().reduce(|worst, p| {
            if p.total_acquired < worst.total_acquired {
                p
            } else {
                worst
            }
        })
    }
}

/// Run the lump-sum simulation once per day of year over the full series.
///
/// Each day is independent, so the 365 simulations run on the rayon pool.
/// Order of the output is by day regardless of worker scheduling.
pub fn scan(series: &PriceSeries, yearly_budget: f64) -> Result<DayOfYearScan, AnalysisError> {
    let totals = (1..=DAYS_SCANNED)
        .into_par_iter()
        .map(|day| {
            simulate(series, Strategy::LumpSumOnDay(day), yearly_budget)
                .map(|outcome| (day, outcome.total_acquired))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let points = totals
        .into_iter()
        .filter(|&(_, total)| total > 0.0)
        .map(|(day, total_acquired)| DayPoint { day, total_acquired })
        .collect();

    Ok(DayOfYearScan { points })
}
