use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jcron::{calendar::CalendarTime, next, parse};

fn take_100_occurrences(start: i64) {
    let pattern = parse("15 15 15 L 3 *").expect("valid pattern");
    let mut seed = start;
    for _ in 0..100 {
        // `next` is inclusive of an already-matching seed, so each round
        // must advance past the previous raw match by at least a minute
        // before searching again — the same reseed rule `next_n` uses.
        match next(seed, &pattern) {
            Ok(ts) => seed = ts + 60,
            Err(_) => break,
        };
    }
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let start = CalendarTime { year: 2025, month: 1, day: 1, hour: 0, minute: 0, second: 0, weekday: 0 };
    let start_ts = jcron::calendar::to_timestamp(&start).unwrap();

    c.bench_function("parse", |b| {
        b.iter(|| parse(black_box("*/15 9-17 * * * MON-FRI")).unwrap())
    });

    c.bench_function("next_single", |b| {
        let pattern = parse("* 0 0 * * MON-FRI").unwrap();
        b.iter(|| next(black_box(start_ts), &pattern).unwrap())
    });

    c.bench_function("next_take_100", |b| {
        b.iter(|| take_100_occurrences(black_box(start_ts)))
    });

    c.bench_function("matches", |b| {
        let pattern = parse("* 0 0 L * 5L").unwrap();
        b.iter(|| jcron::matches(black_box(start_ts), &pattern).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
