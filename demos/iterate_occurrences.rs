//! Walks the next five occurrences of a pattern using
//! `CompiledPattern::occurrences_from`.

use jcron::calendar::{to_timestamp, CalendarTime};
use jcron::parse;

fn main() {
    let pattern = parse("0 0 0 1 * *").expect("valid pattern"); // midnight on the 1st of every month

    let from = to_timestamp(&CalendarTime {
        year: 2026,
        month: 1,
        day: 1,
        hour: 0,
        minute: 0,
        second: 0,
        weekday: 0,
    })
    .expect("valid calendar time");

    for (i, occurrence) in pattern.occurrences_from(from).take(5).enumerate() {
        match occurrence {
            Ok(ts) => println!("occurrence {i}: {ts}"),
            Err(err) => {
                eprintln!("stopped early: {err}");
                break;
            }
        }
    }
}
