//! Calendar helpers for the daily simulation loop.
//!
//! Everything works on civil dates with no time zone. Month addition clamps to
//! the last valid day (Jan 31 + 1 month = Feb 28/29) and saturates at the ends
//! of jiff's supported range.

use jiff::ToSpan;
use jiff::civil::{Date, Weekday};

/// Number of days from `d1` to `d2` (negative when `d2 < d1`).
#[inline]
pub fn days_between(d1: Date, d2: Date) -> i32 {
    (d2 - d1).get_days()
}

#[inline]
pub fn add_days(d: Date, n: i32) -> Date {
    d.saturating_add(n.days())
}

/// Add calendar months, clamping the day to the target month's length.
#[inline]
pub fn add_months(d: Date, n: i32) -> Date {
    d.saturating_add(n.months())
}

/// Move a weekend date forward to the following Monday.
pub fn roll_to_business_day(d: Date) -> Date {
    match d.weekday() {
        Weekday::Saturday => add_days(d, 2),
        Weekday::Sunday => add_days(d, 1),
        _ => d,
    }
}

/// Number of days in the inclusive range `[start, end]`, zero if empty.
pub fn days_inclusive(start: Date, end: Date) -> usize {
    (days_between(start, end) + 1).max(0) as usize
}

/// Number of first-of-month dates in the inclusive range `[start, end]`.
pub fn month_starts_inclusive(start: Date, end: Date) -> usize {
    if start > end {
        return 0;
    }
    let mut first = jiff::civil::date(start.year(), start.month(), 1);
    if first < start {
        first = add_months(first, 1);
    }
    let mut count = 0;
    while first <= end {
        count += 1;
        first = add_months(first, 1);
    }
    count
}
