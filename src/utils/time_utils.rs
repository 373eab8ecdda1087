use chrono::{DateTime, Local, NaiveDate};

pub struct TimeUtils;

impl TimeUtils {
    pub const MS_IN_S: i64 = 1000;
    pub const MS_IN_MIN: i64 = Self::MS_IN_S * 60;
    pub const MS_IN_H: i64 = Self::MS_IN_MIN * 60;
    pub const MS_IN_D: i64 = Self::MS_IN_H * 24;
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d";
}

/// The calendar date (UTC) for an epoch-milliseconds timestamp.
pub fn epoch_ms_to_naive_date(epoch_ms: i64) -> Option<NaiveDate> {
    let dt = DateTime::from_timestamp_millis(epoch_ms)?;
    Some(dt.date_naive())
}

pub fn local_now_as_timestamp_ms() -> i64 {
    let now_local = Local::now();
    now_local.timestamp_millis()
}

pub fn how_many_seconds_ago(past_timestamp_ms: i64) -> i64 {
    // How many seconds ago was the event described by `past_timestamp_ms` ?
    let now_timestamp_ms = local_now_as_timestamp_ms();
    (now_timestamp_ms - past_timestamp_ms) / 1000
}

/// The `day`-th day (1-based ordinal) of `year`.
///
/// Day 152 of a non-leap year is June 1. The mapping is by ordinal, never
/// recomputed from month/day pairs, so the same day index always means the
/// same calendar offset. Day 366 only exists in leap years.
pub fn nominal_day_in_year(year: i32, day: u16) -> Option<NaiveDate> {
    NaiveDate::from_yo_opt(year, u32::from(day))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_152_is_june_1_in_a_non_leap_year() {
        assert_eq!(
            nominal_day_in_year(2023, 152),
            NaiveDate::from_ymd_opt(2023, 6, 1)
        );
    }

    #[test]
    fn test_day_366_only_exists_in_leap_years() {
        assert!(nominal_day_in_year(2023, 366).is_none());
        assert_eq!(
            nominal_day_in_year(2024, 366),
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );
    }

    #[test]
    fn test_epoch_ms_maps_to_utc_date() {
        // 2021-01-01T00:00:00Z
        assert_eq!(
            epoch_ms_to_naive_date(1_609_459_200_000),
            NaiveDate::from_ymd_opt(2021, 1, 1)
        );
    }
}
