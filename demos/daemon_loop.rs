//! Sketches the daemon collaborator role named in §6/§10.3 of the design
//! notes: parse each crontab-style line once, then call `matches` on a
//! per-minute tick, logging and skipping any line that fails to parse
//! instead of aborting the whole batch.

use jcron::calendar::{to_timestamp, CalendarTime};
use jcron::{matches, parse, CompiledPattern};

fn compile_jobs(lines: &[&str]) -> Vec<(String, CompiledPattern)> {
    let mut jobs = Vec::new();
    for line in lines {
        match parse(line) {
            Ok(pattern) => jobs.push((line.to_string(), pattern)),
            Err(err) => eprintln!("skipping job '{line}': {err}"),
        }
    }
    jobs
}

fn tick(jobs: &[(String, CompiledPattern)], now: i64) {
    for (line, pattern) in jobs {
        match matches(now, pattern) {
            Ok(true) => println!("firing: {line}"),
            Ok(false) => {}
            Err(err) => eprintln!("error evaluating '{line}' at {now}: {err}"),
        }
    }
}

fn main() {
    let lines = [
        "0 0 9 * * MON-FRI",
        "0 */15 * * * *",
        "not a valid line",
    ];
    let jobs = compile_jobs(&lines);

    let now = to_timestamp(&CalendarTime {
        year: 2026,
        month: 7,
        day: 27,
        hour: 9,
        minute: 0,
        second: 0,
        weekday: 0,
    })
    .expect("valid calendar time");

    tick(&jobs, now);
}
