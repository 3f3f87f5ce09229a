//! Composition of the advancer and the SOD/EOD post-processor into the
//! public `next`/`prev`/`next_n` operations (§4.6, §4.8 of
//! `SPEC_FULL.md`).
//!
//! Kept as its own module — distinct from `advancer` (the search) and
//! `modifiers` (the adjustment) — because both `next_n` and the occurrence
//! iterator in `iterator.rs` need the same "search, then adjust" sequence
//! `next_full`/`prev_full` provide, and neither belongs inside the search
//! itself.

use crate::advancer;
use crate::errors::CronError;
use crate::modifiers;
use crate::pattern::CompiledPattern;

/// The result of a `next`/`prev` search before and after SOD/EOD
/// adjustment. `raw` is the actual cron-field match; `adjusted` is what the
/// modifier turns it into (equal to `raw` when the pattern carries no
/// modifier). [`next_n`] and [`crate::iterator::OccurrencesIter`] reseed
/// their next search from `raw`, not `adjusted` — an EOD modifier can move
/// `adjusted` far from the instant that actually satisfied the cron fields,
/// and reseeding from it could skip or repeat raw matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextResult {
    pub raw: i64,
    pub adjusted: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrevResult {
    pub raw: i64,
    pub adjusted: i64,
}

fn apply_modifier(raw: i64, pattern: &CompiledPattern) -> Result<i64, CronError> {
    if let Some(m) = pattern.sod() {
        modifiers::apply_sod(raw, m)
    } else if let Some(m) = pattern.eod() {
        modifiers::apply_eod(raw, m)
    } else {
        Ok(raw)
    }
}

/// `next(t, pattern)` (§6): the modifier-adjusted instant of the smallest
/// cron match strictly after `t`.
pub fn next(ts: i64, pattern: &CompiledPattern) -> Result<i64, CronError> {
    Ok(next_full(ts, pattern)?.adjusted)
}

/// `next`, exposing both the raw cron match and the modifier-adjusted
/// result.
pub fn next_full(ts: i64, pattern: &CompiledPattern) -> Result<NextResult, CronError> {
    let raw = advancer::find_next(ts, pattern)?;
    let adjusted = apply_modifier(raw, pattern)?;
    Ok(NextResult { raw, adjusted })
}

/// `prev(t, pattern)` (§6): the modifier-adjusted instant of the largest
/// cron match strictly before `t`.
pub fn prev(ts: i64, pattern: &CompiledPattern) -> Result<i64, CronError> {
    Ok(prev_full(ts, pattern)?.adjusted)
}

/// `prev`, exposing both the raw cron match and the modifier-adjusted
/// result.
pub fn prev_full(ts: i64, pattern: &CompiledPattern) -> Result<PrevResult, CronError> {
    let raw = advancer::find_prev(ts, pattern)?;
    let adjusted = apply_modifier(raw, pattern)?;
    Ok(PrevResult { raw, adjusted })
}

/// `next_n(t, pattern, count)` (§4.8): the next `count` modifier-adjusted
/// matches strictly after `t`.
///
/// Each search reseeds from the previous raw match plus 60 seconds rather
/// than handing the previous result straight back into `find_next` — the
/// reference `jcron_next_n()` does the latter, which (since its own
/// `next()` never advances past a match already sitting on a minute
/// boundary) can return the same instant twice. Advancing the seed by one
/// minute is this crate's documented departure from that behavior (§4.8).
pub fn next_n(ts: i64, pattern: &CompiledPattern, count: usize) -> Result<Vec<i64>, CronError> {
    let mut results = Vec::with_capacity(count);
    let mut seed = ts;
    for _ in 0..count {
        let found = next_full(seed, pattern)?;
        results.push(found.adjusted);
        seed = found.raw.checked_add(60).ok_or(CronError::Overflow)?;
    }
    Ok(results)
}
