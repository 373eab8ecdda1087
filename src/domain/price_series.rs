use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::domain::error::AnalysisError;
use crate::domain::window::Window;
use crate::utils::time_utils;

/// One daily close for the asset.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PriceSample {
    pub date: NaiveDate,
    pub close: f64,
}

/// Immutable, date-ordered collection of daily closes.
///
/// Invariants enforced at construction: non-empty, strictly increasing
/// dates, every close finite and positive. Samples that fail the price
/// check are dropped and counted (`integrity_skips`) rather than kept,
/// so the analysis passes never have to re-validate.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    samples: Vec<PriceSample>,
    integrity_skips: usize,
}

impl PriceSeries {
    pub fn from_samples(samples: Vec<PriceSample>) -> Result<Self, AnalysisError> {
        let total = samples.len();
        let samples: Vec<PriceSample> = samples
            .into_iter()
            .filter(|s| s.close.is_finite() && s.close > 0.0)
            .collect();
        let integrity_skips = total - samples.len();

        if samples.is_empty() {
            // An all-bad feed is a data problem, not an empty feed
            if integrity_skips > 0 {
                return Err(AnalysisError::DataIntegrity {
                    count: integrity_skips,
                });
            }
            return Err(AnalysisError::EmptySeries);
        }

        if let Some((_, bad)) = samples
            .iter()
            .tuple_windows()
            .find(|(a, b)| b.date <= a.date)
        {
            return Err(AnalysisError::UnorderedSeries { date: bad.date });
        }

        Ok(PriceSeries {
            samples,
            integrity_skips,
        })
    }

    /// Convenience constructor for consecutive daily closes starting at `first_date`.
    pub fn from_daily_closes(first_date: NaiveDate, closes: &[f64]) -> Result<Self, AnalysisError> {
        let samples = closes
            .iter()
            .enumerate()
            .filter_map(|(i, &close)| {
                let date = first_date.checked_add_days(chrono::Days::new(i as u64))?;
                Some(PriceSample { date, close })
            })
            .collect();
        Self::from_samples(samples)
    }

    pub fn samples(&self) -> &[PriceSample] {
        &self.samples
    }

    /// Sample count; never zero by construction.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Count of samples dropped at construction for bad closes.
    pub fn integrity_skips(&self) -> usize {
        self.integrity_skips
    }

    pub fn first_date(&self) -> NaiveDate {
        self.samples[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.samples[self.samples.len() - 1].date
    }

    /// Calendar years touched by the series, in order.
    pub fn years(&self) -> std::ops::RangeInclusive<i32> {
        self.first_date().year()..=self.last_date().year()
    }

    /// First sample on or after `target`, i.e. the next trading day.
    ///
    /// Binary search over the sorted dates, O(log n). Returns `None` when
    /// `target` is past the end of the series; the caller skips that
    /// contribution instead of failing.
    pub fn resolve(&self, target: NaiveDate) -> Option<&PriceSample> {
        let idx = self.samples.partition_point(|s| s.date < target);
        self.samples.get(idx)
    }

    /// Next trading day on or after day-of-year `day` within `year`.
    ///
    /// Resolution that would land in a later year counts as "no valid
    /// investment day" for `year`. Day 366 only maps to a date in leap
    /// years; elsewhere it resolves to nothing.
    pub fn resolve_in_year(&self, year: i32, day: u16) -> Option<&PriceSample> {
        let target = time_utils::nominal_day_in_year(year, day)?;
        let sample = self.resolve(target)?;
        (sample.date.year() == year).then_some(sample)
    }

    /// Sub-series of samples with date in `[window.start, window.end)`.
    ///
    /// `None` when no sample falls inside the window; the caller treats
    /// that as a zero-contribution skip.
    pub fn slice(&self, window: &Window) -> Option<PriceSeries> {
        let lo = self.samples.partition_point(|s| s.date < window.start);
        let hi = self.samples.partition_point(|s| s.date < window.end);
        if lo >= hi {
            return None;
        }
        Some(PriceSeries {
            samples: self.samples[lo..hi].to_vec(),
            integrity_skips: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_series_is_rejected() {
        let err = PriceSeries::from_samples(vec![]).unwrap_err();
        assert_eq!(err, AnalysisError::EmptySeries);
    }

    #[test]
    fn test_bad_closes_are_dropped_and_counted() {
        let samples = vec![
            PriceSample { date: date(2020, 1, 1), close: 100.0 },
            PriceSample { date: date(2020, 1, 2), close: -5.0 },
            PriceSample { date: date(2020, 1, 3), close: f64::NAN },
            PriceSample { date: date(2020, 1, 4), close: 105.0 },
        ];
        let series = PriceSeries::from_samples(samples).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.integrity_skips(), 2);
    }

    #[test]
    fn test_all_bad_closes_is_a_data_integrity_error() {
        let samples = vec![
            PriceSample { date: date(2020, 1, 1), close: 0.0 },
            PriceSample { date: date(2020, 1, 2), close: f64::INFINITY },
        ];
        let err = PriceSeries::from_samples(samples).unwrap_err();
        assert_eq!(err, AnalysisError::DataIntegrity { count: 2 });
    }

    #[test]
    fn test_out_of_order_dates_are_rejected() {
        let samples = vec![
            PriceSample { date: date(2020, 1, 2), close: 100.0 },
            PriceSample { date: date(2020, 1, 1), close: 101.0 },
        ];
        let err = PriceSeries::from_samples(samples).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::UnorderedSeries { date: date(2020, 1, 1) }
        );
    }

    #[test]
    fn test_resolve_exact_hit() {
        let series = PriceSeries::from_daily_closes(date(2020, 1, 1), &[10.0, 11.0, 12.0]).unwrap();
        let hit = series.resolve(date(2020, 1, 2)).unwrap();
        assert_eq!(hit.date, date(2020, 1, 2));
        assert_eq!(hit.close, 11.0);
    }

    #[test]
    fn test_resolve_normalizes_every_date_in_a_gap_to_the_same_day() {
        // Samples on Jan 1 and Jan 10: every target in Jan 2..=10 lands on Jan 10
        let samples = vec![
            PriceSample { date: date(2020, 1, 1), close: 100.0 },
            PriceSample { date: date(2020, 1, 10), close: 110.0 },
        ];
        let series = PriceSeries::from_samples(samples).unwrap();
        for day in 2..=10 {
            let hit = series.resolve(date(2020, 1, day)).unwrap();
            assert_eq!(hit.date, date(2020, 1, 10));
        }
    }

    #[test]
    fn test_resolve_past_end_is_none() {
        let series = PriceSeries::from_daily_closes(date(2020, 1, 1), &[10.0, 11.0]).unwrap();
        assert!(series.resolve(date(2020, 1, 3)).is_none());
    }

    #[test]
    fn test_resolve_in_year_does_not_cross_year_boundary() {
        // Series ends in November; day 350 of 2020 has no trading day in 2020
        let samples = vec![
            PriceSample { date: date(2020, 11, 1), close: 100.0 },
            PriceSample { date: date(2021, 1, 5), close: 120.0 },
        ];
        let series = PriceSeries::from_samples(samples).unwrap();
        assert!(series.resolve_in_year(2020, 350).is_none());
        assert!(series.resolve_in_year(2021, 1).is_some());
    }

    #[test]
    fn test_slice_is_half_open() {
        let series =
            PriceSeries::from_daily_closes(date(2020, 1, 1), &[10.0, 11.0, 12.0, 13.0]).unwrap();
        let window = Window { start: date(2020, 1, 2), end: date(2020, 1, 4) };
        let sub = series.slice(&window).unwrap();
        assert_eq!(sub.first_date(), date(2020, 1, 2));
        assert_eq!(sub.last_date(), date(2020, 1, 3));
    }

    #[test]
    fn test_slice_with_no_samples_is_none() {
        let series = PriceSeries::from_daily_closes(date(2020, 1, 1), &[10.0, 11.0]).unwrap();
        let window = Window { start: date(2021, 1, 1), end: date(2022, 1, 1) };
        assert!(series.slice(&window).is_none());
    }
}
