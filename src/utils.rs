use std::collections::HashSet;

use chrono::{Datelike as _, Days, NaiveDate, NaiveTime, Timelike as _, Weekday};

/// Minute offset of a time within its day. Seconds are ignored, matching how
/// attendance differences are taken against `HH:MM` schedule boundaries.
pub fn minutes_of_day(time: NaiveTime) -> i32 {
    (time.hour() * 60 + time.minute()) as i32
}

/// Parses `HH:MM` or `HH:MM:SS`. Empty or malformed input is `None`.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    if value.is_empty() {
        return None;
    }

    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

/// First and last calendar day of a month.
pub fn month_bounds(year: i32, month: u32) -> (NaiveDate, NaiveDate) {
    let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();

    let next_month = match month {
        12 => NaiveDate::from_ymd_opt(year + 1, 1, 1),
        _ => NaiveDate::from_ymd_opt(year, month + 1, 1),
    }.unwrap();

    (first, next_month.pred_opt().unwrap())
}

/// Counts days in `start..=end` that are neither Saturday, Sunday, nor in the
/// holiday set.
pub fn business_days_between(start: NaiveDate, end: NaiveDate, holidays: &HashSet<NaiveDate>) -> u32 {
    let mut business_days = 0;
    let mut cursor = start;

    while cursor <= end {
        if cursor.weekday() != Weekday::Sat
            && cursor.weekday() != Weekday::Sun
            && !holidays.contains(&cursor)
        {
            business_days += 1;
        }

        cursor = cursor.checked_add_days(Days::new(1)).unwrap();
    }

    business_days
}
