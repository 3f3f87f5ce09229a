//! SOD ("start of duration") and EOD ("end of duration") post-processing
//! (§4.6 of `SPEC_FULL.md`), applied to an instant already produced by
//! [`crate::advancer::find_next`]/[`crate::advancer::find_prev`].
//!
//! SOD offsets a matched instant forward by the modifier's amount. EOD
//! anchors to the end of the enclosing hour/day/week/month and subtracts
//! the modifier's amount from that anchor — "the job's deadline is `amount`
//! before the end of the period this match fell in." Every day/week/hour
//! boundary is computed with plain integer division on the UTC-seconds
//! timestamp; the only field that isn't a fixed-length unit is the month,
//! which goes through a small calendar-aware shift.
//!
//! This is where the resolved discrepancy in §4.6 lives: the reference
//! `jcron_next()` computes this adjustment and then discards it, always
//! returning the unmodified match. This crate's `next`/`prev` apply it, per
//! the spec's explicit textual description of what SOD/EOD are for.

use crate::calendar::{self, CalendarTime};
use crate::errors::CronError;
use crate::pattern::{Modifier, PeriodUnit};

const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_WEEK: i64 = 604_800;

/// The `(year, month)` that lies `delta` whole calendar months from `ts`.
fn shifted_year_month(ts: i64, delta: i64) -> Result<(i64, u8), CronError> {
    let t = calendar::from_timestamp(ts)?;
    let total = (t.year * 12 + (t.month as i64 - 1)) + delta;
    let year = total.div_euclid(12);
    let month = (total.rem_euclid(12) + 1) as u8;
    Ok((year, month))
}

/// SOD's month shift (§4.6): advance `delta` whole calendar months and snap
/// to the 1st of that month at 00:00:00, regardless of the original
/// day/time — unlike the H/D/W units, a month offset is not a fixed
/// duration, so "two months from the 31st" is snapped rather than clamped.
fn add_months_snap_to_first(ts: i64, delta: i64) -> Result<i64, CronError> {
    let (year, month) = shifted_year_month(ts, delta)?;
    calendar::to_timestamp(&CalendarTime { year, month, day: 1, hour: 0, minute: 0, second: 0, weekday: 0 })
}

/// EOD's month shift (§4.6): step `delta` whole calendar months back from an
/// end-of-month anchor, re-snapping the day to the last day of the landed-on
/// month (rather than clamping to the anchor's original day number) while
/// keeping the anchor's 23:59:59 time-of-day.
fn sub_months_snap_to_last(ts: i64, delta: i64) -> Result<i64, CronError> {
    let t = calendar::from_timestamp(ts)?;
    let (year, month) = shifted_year_month(ts, -delta)?;
    let day = calendar::days_in_month(year, month);
    calendar::to_timestamp(&CalendarTime { year, month, day, ..t })
}

fn shift_by_duration(ts: i64, amount: i64, unit: PeriodUnit) -> Result<i64, CronError> {
    match unit {
        PeriodUnit::Hour => ts.checked_add(amount * SECONDS_PER_HOUR).ok_or(CronError::Overflow),
        PeriodUnit::Day => ts.checked_add(amount * SECONDS_PER_DAY).ok_or(CronError::Overflow),
        PeriodUnit::Week => ts.checked_add(amount * SECONDS_PER_WEEK).ok_or(CronError::Overflow),
        PeriodUnit::Month => add_months_snap_to_first(ts, amount),
    }
}

/// The last second of the day/week/month containing `ts`, or — for `Hour` —
/// of the *day* containing `ts` (§4.6: "H/D → set time to 23:59:59 of the
/// current day"; only the subsequent subtraction step distinguishes hours
/// from days, not the anchor itself). Weeks end on Saturday (the compiled
/// pattern's weekday numbering has Sunday = 0).
fn end_of_unit(ts: i64, unit: PeriodUnit) -> Result<i64, CronError> {
    match unit {
        PeriodUnit::Hour | PeriodUnit::Day => {
            let day_start = ts - ts.rem_euclid(SECONDS_PER_DAY);
            day_start.checked_add(SECONDS_PER_DAY - 1).ok_or(CronError::Overflow)
        }
        PeriodUnit::Week => {
            let t = calendar::from_timestamp(ts)?;
            let day_start = ts - ts.rem_euclid(SECONDS_PER_DAY);
            let days_to_saturday = (6 - t.weekday as i64).rem_euclid(7);
            day_start
                .checked_add(days_to_saturday * SECONDS_PER_DAY)
                .and_then(|d| d.checked_add(SECONDS_PER_DAY - 1))
                .ok_or(CronError::Overflow)
        }
        PeriodUnit::Month => {
            let t = calendar::from_timestamp(ts)?;
            let last_day = calendar::days_in_month(t.year, t.month);
            calendar::to_timestamp(&CalendarTime {
                day: last_day,
                hour: 23,
                minute: 59,
                second: 59,
                ..t
            })
        }
    }
}

/// Applies an `S<d><U>` modifier: offset `ts` forward by `amount` units.
pub fn apply_sod(ts: i64, modifier: Modifier) -> Result<i64, CronError> {
    shift_by_duration(ts, modifier.amount as i64, modifier.unit)
}

/// Applies an `E<d><U>` modifier: anchor to the end of the enclosing unit,
/// then step back `amount` units from that anchor.
pub fn apply_eod(ts: i64, modifier: Modifier) -> Result<i64, CronError> {
    let anchor = end_of_unit(ts, modifier.unit)?;
    match modifier.unit {
        PeriodUnit::Month => sub_months_snap_to_last(anchor, modifier.amount as i64),
        _ => shift_by_duration(anchor, -(modifier.amount as i64), modifier.unit),
    }
}
