//! Error taxonomy (§7 of `SPEC_FULL.md`).
//!
//! `CronError` is the idiomatic, diagnostic-carrying Rust error type every
//! fallible operation in this crate returns. [`ErrorCode`] is the small,
//! stable numeric enumeration the spec's external interface (§6) promises —
//! every `CronError` maps onto exactly one `ErrorCode` via [`CronError::code`].
//! Kept as a hand-written `Display` impl in the teacher's own idiom rather
//! than a `thiserror` derive, since the teacher never took that dependency.

use strum::{Display as StrumDisplay, IntoStaticStr};

/// Stable, numerically-coded error taxonomy (§6/§7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, IntoStaticStr)]
pub enum ErrorCode {
    #[strum(serialize = "Success")]
    Ok = 0,
    #[strum(serialize = "Invalid cron pattern syntax")]
    InvalidPattern = -1,
    #[strum(serialize = "Invalid time value")]
    InvalidTime = -2,
    #[strum(serialize = "Pattern has no future matches")]
    NoMatch = -3,
    #[strum(serialize = "Time calculation overflow")]
    Overflow = -4,
    #[strum(serialize = "Null pointer argument")]
    NullPointer = -5,
}

impl ErrorCode {
    /// The signed numeric value the spec assigns this code (§6).
    pub const fn value(self) -> i32 {
        self as i32
    }
}

/// A richer, diagnostic-carrying error. Every variant maps to one stable
/// [`ErrorCode`] via [`CronError::code`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CronError {
    /// Syntax, range, or unknown-modifier failure while compiling a pattern.
    /// Carries a short description of the offending token or field.
    InvalidPattern(String),
    /// A timestamp or calendar field is outside its representable/valid range.
    InvalidTime,
    /// The safety cap was exhausted, a field mask was empty, or the pattern
    /// names an impossible calendar constraint (e.g. February 30th).
    NoMatch,
    /// Calendar arithmetic would exceed the representable range of `i64`
    /// seconds.
    Overflow,
    /// A null pointer was passed across the `ffi` feature's C ABI. Never
    /// constructed by safe code.
    NullPointer,
}

impl CronError {
    /// Maps this error onto the stable numeric taxonomy of §6.
    pub const fn code(&self) -> ErrorCode {
        match self {
            CronError::InvalidPattern(_) => ErrorCode::InvalidPattern,
            CronError::InvalidTime => ErrorCode::InvalidTime,
            CronError::NoMatch => ErrorCode::NoMatch,
            CronError::Overflow => ErrorCode::Overflow,
            CronError::NullPointer => ErrorCode::NullPointer,
        }
    }
}

impl std::fmt::Display for CronError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CronError::InvalidPattern(msg) => write!(f, "invalid cron pattern: {msg}"),
            CronError::InvalidTime => write!(f, "invalid time value"),
            CronError::NoMatch => write!(f, "pattern has no matching instant"),
            CronError::Overflow => write!(f, "time calculation overflow"),
            CronError::NullPointer => write!(f, "null pointer argument"),
        }
    }
}

impl std::error::Error for CronError {}

/// `strerror(code)` — a stable short string keyed on the numeric code (§6).
/// Distinct from `CronError`'s `Display`, which may carry call-specific
/// detail; this is the fixed string the spec's external interface promises.
pub fn strerror(code: ErrorCode) -> &'static str {
    code.into()
}
