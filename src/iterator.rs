//! Occurrence iterator (§6 of `SPEC_FULL.md`, generalizing the teacher's
//! `CronIterator`).
//!
//! The teacher's iterator wraps `Cron::find_next_occurrence`/chrono and
//! yields bare `DateTime<Tz>`, silently stopping on any error. This crate's
//! operations are fallible in ways callers should be able to observe (an
//! unsatisfiable pattern, a timestamp overflow at the edge of `i64`), so
//! `OccurrencesIter::Item` is `Result<i64, CronError>` and the iterator
//! stops — returning `None` on every subsequent call — after yielding the
//! first `Err`, rather than swallowing it.

use crate::driver;
use crate::errors::CronError;
use crate::pattern::CompiledPattern;

/// Search direction for an [`OccurrencesIter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Lazily walks successive matches of a [`CompiledPattern`], forward from
/// (`occurrences_from`) or backward from (`occurrences_before`) a seed
/// instant. Each step reseeds from the previous raw cron match plus/minus
/// one minute, the same rule `driver::next_n` uses (§4.8) — not from the
/// modifier-adjusted value, which an EOD/SOD pattern could move far away
/// from the timeline the cron fields themselves describe.
pub struct OccurrencesIter<'p> {
    pattern: &'p CompiledPattern,
    seed: i64,
    direction: Direction,
    exhausted: bool,
    /// True until the first call to `next()` has run. `next_full`/`prev_full`
    /// are inclusive of their seed (§4.5), but this iterator's contract is
    /// "strictly after `from`"/"strictly before `before`" — so the very
    /// first search, like every one after it, must start from one minute
    /// past/before the boundary rather than on it.
    started: bool,
}

impl<'p> OccurrencesIter<'p> {
    pub(crate) fn forward(pattern: &'p CompiledPattern, from: i64) -> Self {
        OccurrencesIter { pattern, seed: from, direction: Direction::Forward, exhausted: false, started: false }
    }

    pub(crate) fn backward(pattern: &'p CompiledPattern, before: i64) -> Self {
        OccurrencesIter { pattern, seed: before, direction: Direction::Backward, exhausted: false, started: false }
    }
}

impl<'p> Iterator for OccurrencesIter<'p> {
    type Item = Result<i64, CronError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        if !self.started {
            self.started = true;
            let advanced = match self.direction {
                Direction::Forward => self.seed.checked_add(60),
                Direction::Backward => self.seed.checked_sub(60),
            };
            match advanced {
                Some(s) => self.seed = s,
                None => {
                    self.exhausted = true;
                    return Some(Err(CronError::Overflow));
                }
            }
        }
        let result = match self.direction {
            Direction::Forward => driver::next_full(self.seed, self.pattern),
            Direction::Backward => driver::prev_full(self.seed, self.pattern),
        };
        match result {
            Ok(found) => {
                let adjusted = match self.direction {
                    Direction::Forward => found.raw.checked_add(60),
                    Direction::Backward => found.raw.checked_sub(60),
                };
                match adjusted {
                    Some(next_seed) => {
                        self.seed = next_seed;
                        Some(Ok(found.adjusted))
                    }
                    None => {
                        self.exhausted = true;
                        Some(Err(CronError::Overflow))
                    }
                }
            }
            Err(err) => {
                self.exhausted = true;
                Some(Err(err))
            }
        }
    }
}
