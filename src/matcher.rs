//! The match predicate (§4.4, §4.5 of `SPEC_FULL.md`): decides whether a
//! single UTC instant is admitted by a compiled pattern. Shared, unchanged,
//! between the public `matches()` entry point and the field-wise jump
//! advancer in `advancer.rs` — both need exactly the same day predicate, so
//! it lives here once rather than being duplicated.

use crate::calendar::{self, CalendarTime};
use crate::errors::CronError;
use crate::pattern::{CompiledPattern, DayOfWeekAnchor};

/// Nearest weekday to `target_day` within `(year, month)`, clamped so the
/// result never crosses into an adjacent month (§4.3): Saturday rolls back
/// to the preceding Friday unless that would leave the month, in which case
/// it rolls forward to Monday instead; Sunday rolls forward to the following
/// Monday unless that would leave the month, in which case it rolls back to
/// Friday instead. Returns `None` if `target_day` does not exist in this
/// month at all (e.g. `31W` in a 30-day month).
fn nearest_weekday(year: i64, month: u8, target_day: u8) -> Option<u8> {
    let dim = calendar::days_in_month(year, month);
    if target_day == 0 || target_day > dim {
        return None;
    }
    let wd = calendar::weekday(year, month, target_day);
    Some(match wd {
        0 => {
            if target_day < dim { target_day + 1 } else { target_day - 2 }
        }
        6 => {
            if target_day > 1 { target_day - 1 } else { target_day + 2 }
        }
        _ => target_day,
    })
}

/// True if `day` is the `n`-th occurrence of weekday `wday` within its month
/// (§4.3, `<N>#<M>`).
fn is_nth_weekday_occurrence(day: u8, n: u8) -> bool {
    ((day - 1) / 7) + 1 == n
}

/// True if `day` is the last occurrence of its own weekday within the month
/// (§4.3, `<N>L`): no later day in the same month shares the weekday.
fn is_last_weekday_occurrence(year: i64, month: u8, day: u8) -> bool {
    day + 7 > calendar::days_in_month(year, month)
}

/// Day-of-month side (§4.3, §4.5): the plain mask and every anchor item in
/// the comma list are independently OR-combined — `"5,L"` admits day 5 OR
/// the last day of the month, not only a whole-field anchor reading.
fn day_of_month_admits(pattern: &CompiledPattern, t: &CalendarTime) -> bool {
    if crate::bitset::test(pattern.days_of_month, t.day) {
        return true;
    }
    let anchor = &pattern.dom_anchor;
    if anchor.last && t.day == calendar::days_in_month(t.year, t.month) {
        return true;
    }
    if anchor.last_weekday {
        let last = calendar::days_in_month(t.year, t.month);
        if nearest_weekday(t.year, t.month, last) == Some(t.day) {
            return true;
        }
    }
    for target in 1..=31u8 {
        if crate::bitset::test(anchor.nearest_weekday_days, target)
            && nearest_weekday(t.year, t.month, target) == Some(t.day)
        {
            return true;
        }
    }
    false
}

fn day_of_week_admits(pattern: &CompiledPattern, t: &CalendarTime) -> bool {
    match pattern.dow_anchor {
        DayOfWeekAnchor::None => crate::bitset::test(pattern.days_of_week, t.weekday),
        DayOfWeekAnchor::Nth { dow, n } => {
            t.weekday == dow && is_nth_weekday_occurrence(t.day, n)
        }
        DayOfWeekAnchor::LastOccurrence(dow) => {
            t.weekday == dow && is_last_weekday_occurrence(t.year, t.month, t.day)
        }
    }
}

fn week_of_year_admits(pattern: &CompiledPattern, t: &CalendarTime) -> bool {
    if !pattern.woy.enabled {
        return true;
    }
    let weeks = pattern.woy.weeks();
    if weeks.is_empty() {
        return true;
    }
    let week = calendar::ordinal_week(t.year, t.month, t.day);
    weeks.contains(&week)
}

/// The day predicate (§4.5): day-of-month and day-of-week sides are
/// evaluated independently, through whichever anchor each field carries,
/// and conjoined with AND — the spec's explicit departure from traditional
/// cron's "OR when both are restricted" rule. Each sub-predicate is a pure
/// function of `(year, month, day, weekday)`, which is what lets the
/// field-wise jump advancer step through candidate days one at a time and
/// still terminate (§4.5's termination argument).
pub(crate) fn day_admits(pattern: &CompiledPattern, t: &CalendarTime) -> bool {
    day_of_month_admits(pattern, t) && day_of_week_admits(pattern, t) && week_of_year_admits(pattern, t)
}

/// Full field-by-field predicate (§4.4): minute, hour, month, and the day
/// predicate above.
pub(crate) fn fields_admit(pattern: &CompiledPattern, t: &CalendarTime) -> bool {
    crate::bitset::test(pattern.minutes, t.minute)
        && crate::bitset::test(pattern.hours, t.hour)
        && crate::bitset::test(pattern.months, t.month)
        && day_admits(pattern, t)
}

/// `matches(timestamp, pattern)` (§6): does `pattern` admit the given
/// instant? Modifier-only (`EOD:`/`SOD:`) patterns have no cron body to test
/// against and always report no match — they only ever adjust an instant
/// already produced by `next`/`prev` (§4.6).
pub fn matches(timestamp: i64, pattern: &CompiledPattern) -> Result<bool, CronError> {
    if !pattern.has_cron() {
        return Ok(false);
    }
    let t = calendar::from_timestamp(timestamp)?;
    Ok(fields_admit(pattern, &t))
}
