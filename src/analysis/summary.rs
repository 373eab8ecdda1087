use statrs::statistics::{Data, Distribution, Max, Min, OrderStatistics};

use crate::analysis::monte_carlo::TrialResult;
use crate::domain::Strategy;

/// Distribution of total-acquired over the Monte-Carlo trials, per strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategySummary {
    pub strategy: Strategy,
    pub trials: usize,
    pub mean: f64,
    pub median: f64,
    pub p10: f64,
    pub p90: f64,
    pub min: f64,
    pub max: f64,
}

/// Collapse per-trial results into one summary row per strategy.
///
/// Strategies with no surviving trials (every window sliced empty) are
/// omitted rather than reported as zeros.
pub fn summarize(results: &[TrialResult], strategies: &[Strategy]) -> Vec<StrategySummary> {
    strategies
        .iter()
        .filter_map(|&strategy| {
            let totals: Vec<f64> = results
                .iter()
                .filter(|r| r.strategy == strategy)
                .map(|r| r.total_acquired)
                .collect();
            if totals.is_empty() {
                return None;
            }

            let trials = totals.len();
            let mut data = Data::new(totals);
            Some(StrategySummary {
                strategy,
                trials,
                mean: data.mean().unwrap_or_default(),
                median: data.median(),
                p10: data.percentile(10),
                p90: data.percentile(90),
                min: data.min(),
                max: data.max(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(trial: usize, strategy: Strategy, total: f64) -> TrialResult {
        TrialResult { trial, strategy, total_acquired: total }
    }

    #[test]
    fn test_summary_statistics() {
        let results: Vec<TrialResult> = (0..5)
            .map(|i| result(i, Strategy::DailyDca, (i + 1) as f64))
            .collect();
        let summaries = summarize(&results, &[Strategy::DailyDca]);
        assert_eq!(summaries.len(), 1);

        let s = &summaries[0];
        assert_eq!(s.trials, 5);
        assert_eq!(s.mean, 3.0);
        assert_eq!(s.median, 3.0);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 5.0);
    }

    #[test]
    fn test_strategies_without_results_are_omitted() {
        let results = vec![result(0, Strategy::DailyDca, 1.5)];
        let summaries = summarize(&results, &[Strategy::DailyDca, Strategy::BiWeeklyDca]);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].strategy, Strategy::DailyDca);
    }

    #[test]
    fn test_results_are_split_by_strategy() {
        let results = vec![
            result(0, Strategy::DailyDca, 2.0),
            result(0, Strategy::BiWeeklyDca, 4.0),
            result(1, Strategy::DailyDca, 4.0),
            result(1, Strategy::BiWeeklyDca, 8.0),
        ];
        let summaries = summarize(&results, &[Strategy::DailyDca, Strategy::BiWeeklyDca]);
        assert_eq!(summaries[0].mean, 3.0);
        assert_eq!(summaries[1].mean, 6.0);
    }
}
