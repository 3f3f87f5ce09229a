//! Parses a pattern, checks a few timestamps against it, and walks to the
//! next and previous matches.

use jcron::calendar::{to_timestamp, CalendarTime};
use jcron::{matches, next, parse, prev};

fn main() {
    let pattern = parse("0 30 9 * * MON-FRI").expect("valid pattern");

    let now = to_timestamp(&CalendarTime {
        year: 2026,
        month: 7,
        day: 26,
        hour: 12,
        minute: 0,
        second: 0,
        weekday: 0,
    })
    .expect("valid calendar time");

    println!("pattern: {pattern}");
    println!("matches now: {}", matches(now, &pattern).unwrap());

    let next_run = next(now, &pattern).expect("weekdays exist");
    let prev_run = prev(now, &pattern).expect("weekdays exist");
    println!("next run (unix seconds): {next_run}");
    println!("previous run (unix seconds): {prev_run}");
}
