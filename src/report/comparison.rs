//! Full-series strategy comparison, logged at the end of a run.

use crate::analysis::simulator::simulate;
use crate::domain::{AnalysisError, PriceSeries, Strategy};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonEntry {
    pub strategy: Strategy,
    pub total_acquired: f64,
}

/// Run every strategy over the whole series with the same yearly budget.
pub fn compare(
    series: &PriceSeries,
    strategies: &[Strategy],
    yearly_budget: f64,
) -> Result<Vec<ComparisonEntry>, AnalysisError> {
    strategies
        .iter()
        .map(|&strategy| {
            simulate(series, strategy, yearly_budget).map(|outcome| ComparisonEntry {
                strategy,
                total_acquired: outcome.total_acquired,
            })
        })
        .collect()
}

/// Highest total; first entry wins a tie.
pub fn best(entries: &[ComparisonEntry]) -> Option<&ComparisonEntry> {
    entries.iter().reduce(|best, e| {
        if e.total_acquired > best.total_acquired {
            e
        } else {
            best
        }
    })
}

pub fn log_comparison(entries: &[ComparisonEntry]) {
    log::info!("--- Investment Strategy Comparison ---");
    for entry in entries {
        log::info!(
            "Total Bitcoin with {}: {:.8}",
            entry.strategy,
            entry.total_acquired
        );
    }
    if let Some(winner) = best(entries) {
        log::info!("The best performing strategy is: {}", winner.strategy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_best_takes_first_on_tie() {
        let entries = vec![
            ComparisonEntry { strategy: Strategy::DailyDca, total_acquired: 2.0 },
            ComparisonEntry { strategy: Strategy::BiWeeklyDca, total_acquired: 2.0 },
            ComparisonEntry { strategy: Strategy::LumpSumOnDay(1), total_acquired: 1.0 },
        ];
        assert_eq!(best(&entries).unwrap().strategy, Strategy::DailyDca);
    }

    #[test]
    fn test_compare_runs_every_strategy() {
        let first = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let series = PriceSeries::from_daily_closes(first, &[100.0; 30]).unwrap();
        let strategies = [Strategy::LumpSumOnDay(1), Strategy::DailyDca];
        let entries = compare(&series, &strategies, 1000.0).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].strategy, Strategy::LumpSumOnDay(1));
        assert!(entries.iter().all(|e| e.total_acquired > 0.0));
    }
}
