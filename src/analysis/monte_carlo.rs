use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::analysis::simulator::simulate;
use crate::config::ANALYSIS;
use crate::domain::{AnalysisError, PriceSeries, Strategy, Window};

/// Knobs for one Monte-Carlo run.
#[derive(Debug, Clone, Copy)]
pub struct MonteCarloConfig {
    pub window_years: u32,
    pub trials: usize,
    pub seed: u64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            window_years: ANALYSIS.monte_carlo.window_years,
            trials: ANALYSIS.monte_carlo.trials,
            seed: ANALYSIS.monte_carlo.seed,
        }
    }
}

/// One (trial, strategy) outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialResult {
    pub trial: usize,
    pub strategy: Strategy,
    pub total_acquired: f64,
}

/// The strategy set evaluated inside every sampled window.
pub fn trial_strategies() -> [Strategy; 4] {
    [
        Strategy::LumpSumOnDay(ANALYSIS.lump_sum_days.jan_1),
        Strategy::LumpSumOnDay(ANALYSIS.lump_sum_days.june_1),
        Strategy::DailyDca,
        Strategy::BiWeeklyDca,
    ]
}

/// All sample dates that can start a full `window_years` window.
pub fn valid_start_dates(series: &PriceSeries, window_years: u32) -> Vec<NaiveDate> {
    let last = series.last_date();
    series
        .samples()
        .iter()
        .map(|s| s.date)
        .filter(|&start| {
            Window::from_start_years(start, window_years)
                .is_some_and(|window| window.end <= last)
        })
        .collect()
}

/// Draw `trials` windows uniformly (with replacement) from the valid start
/// dates, using the caller-supplied RNG so runs are reproducible.
///
/// Fails with `InsufficientData` when no start date can carry a full
/// window, before any trial is drawn.
pub fn sample_windows<R: Rng + ?Sized>(
    series: &PriceSeries,
    window_years: u32,
    trials: usize,
    rng: &mut R,
) -> Result<Vec<Window>, AnalysisError> {
    let starts = valid_start_dates(series, window_years);
    if starts.is_empty() {
        return Err(AnalysisError::InsufficientData {
            window_years,
            first: series.first_date(),
            last: series.last_date(),
        });
    }

    let windows = (0..trials)
        .filter_map(|_| {
            let start = starts[rng.gen_range(0..starts.len())];
            Window::from_start_years(start, window_years)
        })
        .collect();
    Ok(windows)
}

/// Run the full Monte-Carlo evaluation: draw windows, slice the series,
/// simulate every strategy per window.
///
/// Windows are drawn sequentially from one seeded RNG, then simulated in
/// parallel, so results are identical regardless of worker count. A window
/// whose slice is empty is skipped without emitting results.
pub fn run(
    series: &PriceSeries,
    config: &MonteCarloConfig,
    strategies: &[Strategy],
    yearly_budget: f64,
) -> Result<Vec<TrialResult>, AnalysisError> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let windows = sample_windows(series, config.window_years, config.trials, &mut rng)?;

    let per_trial = windows
        .par_iter()
        .enumerate()
        .map(|(trial, window)| -> Result<Vec<TrialResult>, AnalysisError> {
            let Some(sub_series) = series.slice(window) else {
                return Ok(Vec::new());
            };
            strategies
                .iter()
                .map(|&strategy| {
                    simulate(&sub_series, strategy, yearly_budget).map(|outcome| {
                        TrialResult {
                            trial,
                            strategy,
                            total_acquired: outcome.total_acquired,
                        }
                    })
                })
                .collect()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(per_trial.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn long_series() -> PriceSeries {
        // ~7 years of daily data
        let closes: Vec<f64> = (0..2556).map(|i| 100.0 + (i % 50) as f64).collect();
        PriceSeries::from_daily_closes(date(2015, 1, 1), &closes).unwrap()
    }

    #[test]
    fn test_windows_never_overrun_the_series() {
        let series = long_series();
        let mut rng = StdRng::seed_from_u64(7);
        let windows = sample_windows(&series, 5, 200, &mut rng).unwrap();
        assert_eq!(windows.len(), 200);
        for window in windows {
            assert!(window.end <= series.last_date());
        }
    }

    #[test]
    fn test_zero_trials_is_empty_not_an_error() {
        let series = long_series();
        let mut rng = StdRng::seed_from_u64(7);
        let windows = sample_windows(&series, 5, 0, &mut rng).unwrap();
        assert!(windows.is_empty());

        let config = MonteCarloConfig { window_years: 5, trials: 0, seed: 7 };
        let results = run(&series, &config, &trial_strategies(), 1000.0).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_short_series_is_insufficient_data() {
        let series = PriceSeries::from_daily_closes(date(2020, 1, 1), &[100.0; 30]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let err = sample_windows(&series, 5, 10, &mut rng).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData { .. }));
    }

    #[test]
    fn test_series_spanning_exactly_one_window_has_one_start() {
        // 2015-01-01 .. 2020-01-01: only the first date fits a 5-year window
        let closes: Vec<f64> = vec![100.0; 1827];
        let series = PriceSeries::from_daily_closes(date(2015, 1, 1), &closes).unwrap();
        assert_eq!(series.last_date(), date(2020, 1, 1));

        let starts = valid_start_dates(&series, 5);
        assert_eq!(starts, vec![date(2015, 1, 1)]);

        let mut rng = StdRng::seed_from_u64(99);
        let windows = sample_windows(&series, 5, 25, &mut rng).unwrap();
        assert!(windows.iter().all(|w| *w == windows[0]));
    }

    #[test]
    fn test_same_seed_same_results() {
        let series = long_series();
        let config = MonteCarloConfig { window_years: 5, trials: 50, seed: 1234 };
        let strategies = trial_strategies();
        let a = run(&series, &config, &strategies, 1000.0).unwrap();
        let b = run(&series, &config, &strategies, 1000.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_trial_emits_one_result_per_strategy() {
        let series = long_series();
        let config = MonteCarloConfig { window_years: 5, trials: 20, seed: 5 };
        let strategies = trial_strategies();
        let results = run(&series, &config, &strategies, 1000.0).unwrap();
        assert_eq!(results.len(), 20 * strategies.len());
        for chunk in results.chunks(strategies.len()) {
            for (result, &strategy) in chunk.iter().zip(strategies.iter()) {
                assert_eq!(result.strategy, strategy);
            }
        }
    }
}
