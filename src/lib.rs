//! # jcron
//!
//! A parser and evaluator for an extended cron grammar over fixed-size,
//! stack-resident compiled patterns. Every operation works on UTC
//! `i64`-seconds-since-epoch timestamps — there is no time zone handling and
//! no wall-clock/calendar type beyond [`calendar::CalendarTime`], the small
//! struct the calendar math is built on.
//!
//! ## Pattern grammar
//!
//! ```text
//! ┌──────────────── second (parsed, validated, ignored — all five of the
//! │                  matching fields below are what determine a match)
//! │ ┌────────────── minute (0-59)
//! │ │ ┌──────────── hour (0-23)
//! │ │ │ ┌────────── day of month (1-31, L, LW, <N>W)
//! │ │ │ │ ┌──────── month (1-12, JAN-DEC)
//! │ │ │ │ │ ┌────── day of week (0-6, SUN-SAT, L, <N>L, <N>#<M>)
//! │ │ │ │ │ │ ┌──── optional: WOY:<list> | S<amount><unit> | E<amount><unit>
//! │ │ │ │ │ │ │
//! * * * * * * *
//! ```
//!
//! Day-of-month and day-of-week, when both restricted, are a conjunction
//! (AND) rather than the traditional cron disjunction — see §4.3 of the
//! design notes in `DESIGN.md` for the reasoning.
//!
//! A pattern beginning with `EOD:` or `SOD:` is a modifier-only pattern with
//! no cron body; a pattern containing top-level `|` is an alternation of
//! full cron bodies whose field masks are combined with bitwise OR.
//!
//! ## Example
//!
//! ```rust
//! use jcron::CompiledPattern;
//! use std::str::FromStr;
//!
//! let pattern = CompiledPattern::from_str("0 0 0 * * FRI").expect("valid pattern");
//! let now = 1_700_000_000; // any UTC-seconds timestamp
//! let next = jcron::next(now, &pattern).expect("a Friday exists");
//! let previous = jcron::prev(now, &pattern).expect("a Friday exists");
//! println!("next Friday midnight: {next}, previous: {previous}");
//! ```
//!
//! ## Crate features
//! - `serde`: [`serde::Serialize`]/[`serde::Deserialize`] for
//!   [`CompiledPattern`], round-tripping through its canonical textual form.
//! - `ffi`: a C ABI (`jcron_parse`, `jcron_next`, `jcron_prev`,
//!   `jcron_matches`, `jcron_next_n`, `jcron_strerror`, `jcron_version`) in
//!   [`ffi`], for embedding this crate behind the same surface the reference
//!   C implementation exposes.

#![cfg_attr(not(feature = "ffi"), forbid(unsafe_code))]

pub mod bitset;
pub mod calendar;
pub mod errors;

mod advancer;
mod driver;
mod iterator;
mod matcher;
mod modifiers;
mod parser;
mod pattern;

#[cfg(feature = "ffi")]
pub mod ffi;

pub use calendar::CalendarTime;
pub use driver::{next, next_full, next_n, prev, prev_full, NextResult, PrevResult};
pub use errors::{strerror, CronError, ErrorCode};
pub use iterator::OccurrencesIter;
pub use matcher::matches;
pub use pattern::{CompiledPattern, DayOfMonthAnchor, DayOfWeekAnchor, Modifier, PeriodUnit, WeekOfYear};

/// Parses a cron expression into a [`CompiledPattern`].
///
/// Equivalent to `pattern.parse::<CompiledPattern>()` via [`std::str::FromStr`];
/// provided as a free function since that is how the reference `jcron_parse`
/// is named and typically called.
pub fn parse(pattern: &str) -> Result<CompiledPattern, CronError> {
    std::str::FromStr::from_str(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ts(year: i64, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> i64 {
        calendar::to_timestamp(&CalendarTime { year, month, day, hour, minute, second, weekday: 0 })
            .unwrap()
    }

    #[test]
    fn parse_and_matches_round_trip() {
        let pattern = parse("0 0 9 1 1 *").unwrap();
        let matching = ts(2030, 1, 1, 9, 0, 0);
        let not_matching = ts(2030, 1, 1, 10, 0, 0);
        assert!(matches(matching, &pattern).unwrap());
        assert!(!matches(not_matching, &pattern).unwrap());
    }

    #[test]
    fn next_and_prev_agree_with_matches() {
        let pattern = parse("0 0 0 * * MON").unwrap();
        let from = ts(2025, 10, 20, 12, 0, 0); // a Monday
        let next_occurrence = next(from, &pattern).unwrap();
        let prev_occurrence = prev(from, &pattern).unwrap();
        assert!(matches(next_occurrence, &pattern).unwrap());
        assert!(matches(prev_occurrence, &pattern).unwrap());
        assert!(next_occurrence > from);
        assert!(prev_occurrence < from);
    }

    #[test]
    fn occurrences_iterator_walks_forward() {
        let pattern = parse("0 0 0 * * 5,6").unwrap();
        let from = ts(2022, 2, 17, 0, 0, 0);
        let runs: Vec<i64> = pattern.occurrences_from(from).take(4).map(|r| r.unwrap()).collect();
        assert_eq!(runs[0], ts(2022, 2, 18, 0, 0, 0));
        assert_eq!(runs[1], ts(2022, 2, 19, 0, 0, 0));
        assert_eq!(runs[2], ts(2022, 2, 25, 0, 0, 0));
        assert_eq!(runs[3], ts(2022, 2, 26, 0, 0, 0));
    }

    #[test]
    fn alternation_combines_masks() {
        let pattern = parse("0 0 0 * * MON|0 0 0 * * FRI").unwrap();
        let monday = ts(2025, 10, 20, 0, 0, 0);
        let friday = ts(2025, 10, 24, 0, 0, 0);
        let tuesday = ts(2025, 10, 21, 0, 0, 0);
        assert!(matches(monday, &pattern).unwrap());
        assert!(matches(friday, &pattern).unwrap());
        assert!(!matches(tuesday, &pattern).unwrap());
    }

    #[test]
    fn eod_modifier_pattern_has_no_cron_body() {
        let pattern = parse("EOD:E1D").unwrap();
        assert!(!pattern.has_cron());
        assert!(pattern.is_eod_pattern());
    }

    #[rstest]
    #[case("* * * * * *")]
    #[case("0 0 0 1 1 *")]
    #[case("* */15 9-17 * * MON-FRI")]
    #[case("0 0 0 L * 5L")]
    #[case("0 0 0 31W 2 *")]
    #[case("0 0 0 * * 0#2")]
    #[case("0 0 0 * * * WOY:1,10,20")]
    fn valid_patterns_parse(#[case] expr: &str) {
        assert!(parse(expr).is_ok());
    }

    #[rstest]
    #[case("* * *")]
    #[case("invalid")]
    #[case("60 0 0 * * *")]
    #[case("* * * * * * * *")]
    fn invalid_patterns_are_rejected(#[case] expr: &str) {
        assert!(parse(expr).is_err());
    }
}
