use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` slice of calendar time, `end` a whole number
/// of years after `start`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    /// Window starting at `start` and spanning `years` calendar years.
    ///
    /// A Feb 29 start clamps to Feb 28 in the target year, same as the
    /// usual calendar-offset convention.
    pub fn from_start_years(start: NaiveDate, years: u32) -> Option<Self> {
        let end = start.checked_add_months(Months::new(12 * years))?;
        Some(Window { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_span() {
        let w = Window::from_start_years(date(2017, 3, 15), 5).unwrap();
        assert_eq!(w.end, date(2022, 3, 15));
    }

    #[test]
    fn test_leap_day_start_clamps() {
        let w = Window::from_start_years(date(2020, 2, 29), 1).unwrap();
        assert_eq!(w.end, date(2021, 2, 28));
    }

    #[test]
    fn test_contains_is_half_open() {
        let w = Window::from_start_years(date(2020, 1, 1), 1).unwrap();
        assert!(w.contains(date(2020, 1, 1)));
        assert!(w.contains(date(2020, 12, 31)));
        assert!(!w.contains(date(2021, 1, 1)));
    }
}
