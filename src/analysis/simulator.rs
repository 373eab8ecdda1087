use chrono::{Days, NaiveDate};

use crate::domain::strategy::{
    BIWEEKLY_ALLOCATIONS_PER_YEAR, BIWEEKLY_PERIOD_DAYS, DAILY_ALLOCATIONS_PER_YEAR,
};
use crate::domain::{AnalysisError, PriceSeries, Strategy};

/// One executed buy: the trading day it landed on and the quantity acquired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Purchase {
    pub date: NaiveDate,
    pub acquired: f64,
}

/// What a strategy bought over a series for a fixed yearly budget.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub strategy: Strategy,
    pub total_acquired: f64,
    /// Per-buy ledger, in date order. Feeds the cumulative-holdings chart.
    pub purchases: Vec<Purchase>,
    /// Contributions dropped because the division did not produce a finite
    /// value. Never folded into the total silently.
    pub non_finite_skips: usize,
}

struct Accumulator {
    total: f64,
    purchases: Vec<Purchase>,
    non_finite_skips: usize,
}

impl Accumulator {
    fn new() -> Self {
        Accumulator {
            total: 0.0,
            purchases: Vec::new(),
            non_finite_skips: 0,
        }
    }

    fn add(&mut self, date: NaiveDate, acquired: f64) {
        if acquired.is_finite() {
            self.total += acquired;
            self.purchases.push(Purchase { date, acquired });
        } else {
            self.non_finite_skips += 1;
        }
    }
}

/// Run one strategy over the whole of `series`.
///
/// Pure function: no state is shared across runs beyond what is passed in,
/// so callers are free to run it per (strategy, window) in parallel.
/// Periods whose trading day cannot be resolved contribute 0.
pub fn simulate(
    series: &PriceSeries,
    strategy: Strategy,
    yearly_budget: f64,
) -> Result<SimulationOutcome, AnalysisError> {
    strategy.validate()?;
    let mut acc = Accumulator::new();

    match strategy {
        Strategy::LumpSumOnDay(day) => {
            for year in series.years() {
                if let Some(sample) = series.resolve_in_year(year, day) {
                    acc.add(sample.date, yearly_budget / sample.close);
                }
            }
        }
        Strategy::DailyDca => {
            let allocation = yearly_budget / DAILY_ALLOCATIONS_PER_YEAR;
            for sample in series.samples() {
                acc.add(sample.date, allocation / sample.close);
            }
        }
        Strategy::BiWeeklyDca => {
            let allocation = yearly_budget / BIWEEKLY_ALLOCATIONS_PER_YEAR;
            let mut target = series.first_date();
            while target <= series.last_date() {
                if let Some(sample) = series.resolve(target) {
                    acc.add(sample.date, allocation / sample.close);
                }
                match target.checked_add_days(Days::new(BIWEEKLY_PERIOD_DAYS)) {
                    Some(next) => target = next,
                    None => break,
                }
            }
        }
    }

    Ok(SimulationOutcome {
        strategy,
        total_acquired: acc.total,
        purchases: acc.purchases,
        non_finite_skips: acc.non_finite_skips,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceSample;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        let tolerance = expected.abs() * 1e-9;
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_daily_dca_constant_price_closed_form() {
        // 3 consecutive days at 100, budget 300/year: total = 3 * (300/365/100)
        let series = PriceSeries::from_daily_closes(date(2020, 1, 1), &[100.0; 3]).unwrap();
        let outcome = simulate(&series, Strategy::DailyDca, 300.0).unwrap();
        assert_close(outcome.total_acquired, 3.0 * (300.0 / 365.0 / 100.0));
        assert_eq!(outcome.purchases.len(), 3);
        assert_eq!(outcome.non_finite_skips, 0);
    }

    #[test]
    fn test_daily_dca_varying_prices() {
        let series =
            PriceSeries::from_daily_closes(date(2020, 1, 1), &[100.0, 200.0, 400.0]).unwrap();
        let outcome = simulate(&series, Strategy::DailyDca, 365.0).unwrap();
        // 1/100 + 1/200 + 1/400 per daily dollar
        assert_close(outcome.total_acquired, 0.01 + 0.005 + 0.0025);
    }

    #[test]
    fn test_lump_sum_buys_once_per_year() {
        let samples = vec![
            PriceSample { date: date(2020, 1, 3), close: 100.0 },
            PriceSample { date: date(2020, 6, 1), close: 150.0 },
            PriceSample { date: date(2021, 1, 2), close: 200.0 },
        ];
        let series = PriceSeries::from_samples(samples).unwrap();
        let outcome = simulate(&series, Strategy::LumpSumOnDay(1), 1000.0).unwrap();
        // Day 1 of 2020 resolves to Jan 3, day 1 of 2021 to Jan 2
        assert_eq!(outcome.purchases.len(), 2);
        assert_close(outcome.total_acquired, 1000.0 / 100.0 + 1000.0 / 200.0);
    }

    #[test]
    fn test_lump_sum_unresolvable_year_contributes_zero() {
        // 2020 data ends in November, so day 350 only resolves in 2021
        let samples = vec![
            PriceSample { date: date(2020, 11, 1), close: 100.0 },
            PriceSample { date: date(2021, 12, 20), close: 250.0 },
        ];
        let series = PriceSeries::from_samples(samples).unwrap();
        let outcome = simulate(&series, Strategy::LumpSumOnDay(350), 1000.0).unwrap();
        assert_eq!(outcome.purchases.len(), 1);
        assert_close(outcome.total_acquired, 1000.0 / 250.0);
    }

    #[test]
    fn test_lump_sum_day_366_skips_non_leap_years() {
        let samples = vec![
            PriceSample { date: date(2023, 12, 31), close: 100.0 },
            PriceSample { date: date(2024, 12, 31), close: 200.0 },
        ];
        let series = PriceSeries::from_samples(samples).unwrap();
        let outcome = simulate(&series, Strategy::LumpSumOnDay(366), 1000.0).unwrap();
        // Only the leap year has a day 366
        assert_eq!(outcome.purchases.len(), 1);
        assert_eq!(outcome.purchases[0].date, date(2024, 12, 31));
    }

    #[test]
    fn test_bi_weekly_target_spacing() {
        // 29 consecutive days: targets at day 1, 15 and 29 all resolve exactly
        let series = PriceSeries::from_daily_closes(date(2020, 1, 1), &[100.0; 29]).unwrap();
        let outcome = simulate(&series, Strategy::BiWeeklyDca, 260.0).unwrap();
        assert_eq!(outcome.purchases.len(), 3);
        assert_eq!(outcome.purchases[0].date, date(2020, 1, 1));
        assert_eq!(outcome.purchases[1].date, date(2020, 1, 15));
        assert_eq!(outcome.purchases[2].date, date(2020, 1, 29));
        assert_close(outcome.total_acquired, 3.0 * (260.0 / 26.0 / 100.0));
    }

    #[test]
    fn test_bi_weekly_rolls_forward_over_gaps() {
        // Gap where the second target would land: buy happens on the next
        // available day instead
        let samples = vec![
            PriceSample { date: date(2020, 1, 1), close: 100.0 },
            PriceSample { date: date(2020, 1, 20), close: 200.0 },
        ];
        let series = PriceSeries::from_samples(samples).unwrap();
        let outcome = simulate(&series, Strategy::BiWeeklyDca, 260.0).unwrap();
        // Target Jan 1 hits Jan 1; target Jan 15 rolls to Jan 20
        assert_eq!(outcome.purchases.len(), 2);
        assert_eq!(outcome.purchases[1].date, date(2020, 1, 20));
        assert_close(outcome.total_acquired, 10.0 / 100.0 + 10.0 / 200.0);
    }

    #[test]
    fn test_invalid_day_is_rejected() {
        let series = PriceSeries::from_daily_closes(date(2020, 1, 1), &[100.0]).unwrap();
        let err = simulate(&series, Strategy::LumpSumOnDay(400), 1000.0).unwrap_err();
        assert_eq!(err, AnalysisError::InvalidDayOfYear { day: 400 });
    }
}
