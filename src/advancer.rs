//! The forward field-wise jump advancer and the backward tick-by-tick scan
//! (§4.5, §4.7 of `SPEC_FULL.md`).
//!
//! `find_next` mirrors the teacher's `Cron::find_occurrence` shape — walk
//! month, then day, then hour/minute, re-checking from the top whenever a
//! field had to move — but the day-level check is this spec's expanded
//! predicate (`matcher::day_admits`) instead of a plain bitmask test, and
//! the walk is expressed over this crate's own `CalendarTime` instead of
//! `chrono::NaiveDateTime`.
//!
//! `find_prev` is deliberately simpler: a literal day-by-day backward scan
//! rather than a mirrored jump. Proving a backward jump correct against
//! every anchor predicate (nearest-weekday, nth-weekday, last-weekday,
//! last-occurrence, WOY) would essentially mean re-deriving `find_next`'s
//! termination argument in reverse; a plain scan is obviously correct and
//! the crate does not need `prev` to be as fast as `next` (§9, resolved
//! Open Question).

use crate::bitset;
use crate::calendar::{self, CalendarTime};
use crate::errors::CronError;
use crate::matcher;
use crate::pattern::CompiledPattern;

/// Upper bound on the number of calendar days either search will step
/// through before giving up and reporting [`CronError::NoMatch`] (§4.5,
/// §4.7). Comfortably covers any pattern with a satisfiable day predicate,
/// including a fixed `L`/`#`/`W` anchor that only recurs across leap-year
/// boundaries, while still bounding patterns that can never be satisfied
/// (e.g. `31W` combined with `MONTH=FEB`).
const MAX_DAY_ITERATIONS: u32 = 10_000;

fn recompute_weekday(t: &mut CalendarTime) {
    t.weekday = calendar::weekday(t.year, t.month, t.day);
}

fn add_one_day(t: &mut CalendarTime) {
    let dim = calendar::days_in_month(t.year, t.month);
    if t.day < dim {
        t.day += 1;
    } else {
        t.day = 1;
        if t.month < 12 {
            t.month += 1;
        } else {
            t.month = 1;
            t.year += 1;
        }
    }
    recompute_weekday(t);
}

fn sub_one_day(t: &mut CalendarTime) {
    if t.day > 1 {
        t.day -= 1;
    } else {
        if t.month > 1 {
            t.month -= 1;
        } else {
            t.month = 12;
            t.year -= 1;
        }
        t.day = calendar::days_in_month(t.year, t.month);
    }
    recompute_weekday(t);
}

/// Jumps forward to the first instant of the next month `months` admits
/// after `t.month` — a direct bitset scan (§4.5 step 1's "find the next set
/// month with index > C.mon"), not a step-by-one-calendar-month loop, so a
/// pattern like `1,6,12` jumps straight from February to June.
fn jump_to_month_start(t: &mut CalendarTime, months: u64) {
    match bitset::next_set_from(months, t.month + 1) {
        Some(m) => t.month = m,
        None => {
            t.month = bitset::first_set(months).expect("months mask is never empty");
            t.year += 1;
        }
    }
    t.day = 1;
    t.hour = 0;
    t.minute = 0;
    t.second = 0;
    recompute_weekday(t);
}

/// Backward counterpart of [`jump_to_month_start`]: the largest admissible
/// month strictly before `t.month`, jumped to directly via
/// `bitset::prev_set_before` rather than stepping one month at a time.
fn jump_to_month_end(t: &mut CalendarTime, months: u64) {
    match bitset::prev_set_before(months, t.month) {
        Some(m) => t.month = m,
        None => {
            t.month = bitset::last_set(months).expect("months mask is never empty");
            t.year -= 1;
        }
    }
    t.day = calendar::days_in_month(t.year, t.month);
    t.hour = 23;
    t.minute = 59;
    t.second = 0;
    recompute_weekday(t);
}

/// Smallest `(hour, minute)` admissible by `pattern`, no earlier than
/// `(start_hour, start_minute)` within the same day, or `None` if the day
/// has no admissible time at or after that point.
fn find_time_in_day_forward(
    pattern: &CompiledPattern,
    start_hour: u8,
    start_minute: u8,
) -> Option<(u8, u8)> {
    if bitset::test(pattern.hours, start_hour) {
        if let Some(m) = bitset::next_set_from(pattern.minutes, start_minute) {
            return Some((start_hour, m));
        }
    }
    let next_hour = bitset::next_set_from(pattern.hours, start_hour + 1)?;
    let m = bitset::first_set(pattern.minutes)?;
    Some((next_hour, m))
}

/// Largest `(hour, minute)` admissible by `pattern`, no later than
/// `(start_hour, start_minute)` within the same day, or `None` if the day
/// has no admissible time at or before that point.
fn find_time_in_day_backward(
    pattern: &CompiledPattern,
    start_hour: u8,
    start_minute: u8,
) -> Option<(u8, u8)> {
    if bitset::test(pattern.hours, start_hour) {
        if let Some(m) = bitset::prev_set_before(pattern.minutes, start_minute + 1) {
            return Some((start_hour, m));
        }
    }
    if start_hour == 0 {
        return None;
    }
    let prev_hour = bitset::prev_set_before(pattern.hours, start_hour)?;
    let m = bitset::last_set(pattern.minutes)?;
    Some((prev_hour, m))
}

/// The largest minute-boundary timestamp strictly less than `ts`.
fn prev_minute_boundary(ts: i64) -> Result<i64, CronError> {
    let floor = ts - ts.rem_euclid(60);
    if floor < ts {
        Ok(floor)
    } else {
        floor.checked_sub(60).ok_or(CronError::Overflow)
    }
}

/// `next(t, pattern)` (§4.5): the smallest matching instant at or after `t`
/// (seconds truncated to the enclosing minute), found by jumping the month,
/// then the day (through the expanded day predicate), then the hour/minute
/// within that day — re-checking from the month whenever a coarser field
/// had to move. Inclusive of `t` itself when `t` already matches (§8
/// invariant 3, scenario 1 in the concrete scenario table) — the reference
/// `jcron_next()` zeroes the seconds field and tests the resulting minute
/// without pre-advancing past it.
pub fn find_next(ts: i64, pattern: &CompiledPattern) -> Result<i64, CronError> {
    if !pattern.has_cron() {
        return Err(CronError::NoMatch);
    }
    let mut t = calendar::from_timestamp(ts)?;
    t.second = 0;

    for _ in 0..MAX_DAY_ITERATIONS {
        if !bitset::test(pattern.months, t.month) {
            jump_to_month_start(&mut t, pattern.months);
            continue;
        }
        if !matcher::day_admits(pattern, &t) {
            add_one_day(&mut t);
            t.hour = 0;
            t.minute = 0;
            continue;
        }
        match find_time_in_day_forward(pattern, t.hour, t.minute) {
            Some((h, m)) => {
                t.hour = h;
                t.minute = m;
                t.second = 0;
                return calendar::to_timestamp(&t);
            }
            None => {
                add_one_day(&mut t);
                t.hour = 0;
                t.minute = 0;
            }
        }
    }
    Err(CronError::NoMatch)
}

/// `prev(t, pattern)` (§4.7): the largest matching instant strictly before
/// `t`, found by a literal backward day-by-day scan.
pub fn find_prev(ts: i64, pattern: &CompiledPattern) -> Result<i64, CronError> {
    if !pattern.has_cron() {
        return Err(CronError::NoMatch);
    }
    let start = prev_minute_boundary(ts)?;
    let mut t = calendar::from_timestamp(start)?;

    for _ in 0..MAX_DAY_ITERATIONS {
        if !bitset::test(pattern.months, t.month) {
            jump_to_month_end(&mut t, pattern.months);
            continue;
        }
        if !matcher::day_admits(pattern, &t) {
            sub_one_day(&mut t);
            t.hour = 23;
            t.minute = 59;
            continue;
        }
        match find_time_in_day_backward(pattern, t.hour, t.minute) {
            Some((h, m)) => {
                t.hour = h;
                t.minute = m;
                t.second = 0;
                return calendar::to_timestamp(&t);
            }
            None => {
                sub_one_day(&mut t);
                t.hour = 23;
                t.minute = 59;
            }
        }
    }
    Err(CronError::NoMatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn ts(year: i64, month: u8, day: u8, hour: u8, minute: u8) -> i64 {
        calendar::to_timestamp(&CalendarTime {
            year, month, day, hour, minute, second: 0, weekday: 0,
        })
        .unwrap()
    }

    #[test]
    fn next_is_inclusive_of_an_already_matching_instant() {
        let p = parse("* * * * * *").unwrap();
        let from = ts(2025, 10, 23, 10, 0);
        assert_eq!(find_next(from, &p).unwrap(), from);
    }

    #[test]
    fn next_advances_past_a_non_matching_instant() {
        let p = parse("* 5 * * * *").unwrap();
        let from = ts(2025, 10, 23, 10, 0);
        assert_eq!(find_next(from, &p).unwrap(), ts(2025, 10, 23, 10, 5));
    }

    #[test]
    fn next_wraps_month_and_year() {
        let p = parse("* 0 0 1 1 *").unwrap();
        let from = ts(2025, 12, 31, 23, 59);
        assert_eq!(find_next(from, &p).unwrap(), ts(2026, 1, 1, 0, 0));
    }

    #[test]
    fn next_last_day_of_february_non_leap() {
        let p = parse("* 0 9 L 2 *").unwrap();
        let from = ts(2023, 2, 1, 0, 0);
        assert_eq!(find_next(from, &p).unwrap(), ts(2023, 2, 28, 9, 0));
    }

    #[test]
    fn next_last_day_of_february_leap() {
        let p = parse("* 0 9 L 2 *").unwrap();
        let from = ts(2024, 2, 1, 0, 0);
        assert_eq!(find_next(from, &p).unwrap(), ts(2024, 2, 29, 9, 0));
    }

    #[test]
    fn next_nth_weekday_occurrence() {
        // Second Tuesday of the month at midnight.
        let p = parse("* 0 0 * * 2#2").unwrap();
        let from = ts(2024, 10, 1, 0, 0);
        assert_eq!(find_next(from, &p).unwrap(), ts(2024, 10, 8, 0, 0));
    }

    #[test]
    fn next_nearest_weekday_clamped_into_month() {
        // 1W: nearest weekday to the 1st.
        let p = parse("* 0 0 1W * *").unwrap();
        // 2023-01-01 is a Sunday; nearest weekday is Monday 2023-01-02.
        let from = ts(2022, 12, 31, 0, 0);
        assert_eq!(find_next(from, &p).unwrap(), ts(2023, 1, 2, 0, 0));
    }

    #[test]
    fn next_respects_day_of_month_and_day_of_week_conjunction() {
        let p = parse("* 0 0 1 * 1").unwrap();
        // January 1 2024 is a Monday: both sides agree immediately.
        assert_eq!(
            find_next(ts(2023, 12, 31, 0, 0), &p).unwrap(),
            ts(2024, 1, 1, 0, 0)
        );
    }

    #[test]
    fn prev_every_minute() {
        let p = parse("* * * * * *").unwrap();
        let from = ts(2025, 10, 23, 10, 1);
        assert_eq!(find_prev(from, &p).unwrap(), ts(2025, 10, 23, 10, 0));
    }

    #[test]
    fn prev_wraps_year_backwards() {
        let p = parse("* 0 0 1 1 *").unwrap();
        let from = ts(2024, 1, 1, 0, 0);
        assert_eq!(find_prev(from, &p).unwrap(), ts(2023, 1, 1, 0, 0));
    }

    #[test]
    fn prev_last_friday_of_month() {
        let p = parse("* 0 0 * * 5L").unwrap();
        let from = ts(2024, 1, 1, 0, 0);
        // Last Friday of December 2023 is the 29th.
        assert_eq!(find_prev(from, &p).unwrap(), ts(2023, 12, 29, 0, 0));
    }

    #[test]
    fn next_unsatisfiable_pattern_reports_no_match() {
        // 31W never applies in February, in any year.
        let p = parse("* 0 0 31W 2 *").unwrap();
        assert_eq!(find_next(ts(2025, 1, 1, 0, 0), &p), Err(CronError::NoMatch));
    }

    #[test]
    fn next_jumps_directly_to_next_set_month() {
        // Months 1, 6, 12: starting in February must land on June directly,
        // not step through March/April/May one calendar month at a time.
        let p = parse("* * * * 1,6,12 *").unwrap();
        let from = ts(2025, 2, 10, 0, 0);
        assert_eq!(find_next(from, &p).unwrap(), ts(2025, 6, 1, 0, 0));
    }

    #[test]
    fn next_jumps_month_across_year_boundary_when_none_set_remains() {
        // December is past every set month (1, 6), so the scan must wrap to
        // January of the following year rather than finding nothing.
        let p = parse("* * * * 1,6 *").unwrap();
        let from = ts(2025, 12, 2, 0, 0);
        assert_eq!(find_next(from, &p).unwrap(), ts(2026, 1, 1, 0, 0));
    }

    #[test]
    fn prev_jumps_directly_to_prev_set_month() {
        let p = parse("* * * * 1,6,12 *").unwrap();
        let from = ts(2025, 8, 1, 0, 0);
        assert_eq!(find_prev(from, &p).unwrap(), ts(2025, 6, 30, 23, 59));
    }

    #[test]
    fn prev_jumps_month_across_year_boundary_when_none_set_remains() {
        // January is before every set month (6, 12), so the scan must wrap
        // back to December of the preceding year.
        let p = parse("* * * * 6,12 *").unwrap();
        let from = ts(2025, 1, 5, 0, 0);
        assert_eq!(find_prev(from, &p).unwrap(), ts(2024, 12, 31, 23, 59));
    }
}
