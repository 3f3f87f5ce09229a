//! C ABI surface (§10.6 of `SPEC_FULL.md`), gated behind the `ffi` Cargo
//! feature.
//!
//! Mirrors the reference `jcron.h` function names and struct shapes closely
//! enough that a C caller written against that header needs only a relinked
//! library, not a rewrite: `jcron_parse`, `jcron_next`, `jcron_prev`,
//! `jcron_matches`, `jcron_next_n`, `jcron_strerror`, `jcron_version`. The
//! `#[repr(C)]` structs are a reduced, Rust-native version of
//! `jcron_pattern_t`/`jcron_result_t` — no `_reserved` padding (this isn't
//! binary-compatible with the C struct, just call-compatible at the
//! function-signature level) — holding a [`CompiledPattern`] or a result
//! pair behind a stable field layout instead.
//!
//! Every public function here is `unsafe` and begins by null-checking its
//! pointer arguments, which is the one place [`CronError::NullPointer`] is
//! ever actually constructed.

use std::ffi::{c_char, c_int, c_longlong, CStr, CString};
use std::str::FromStr;

use crate::driver;
use crate::errors::{CronError, ErrorCode};
use crate::matcher;
use crate::pattern::CompiledPattern;

/// C-visible compiled pattern. Opaque to callers beyond its size; they are
/// expected to treat it as a handle, matching `jcron_pattern_t`'s role in
/// the reference API.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct JcronPattern {
    inner: CompiledPattern,
}

/// C-visible result of a `next`/`prev` search.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct JcronResult {
    pub next_time: c_longlong,
    pub prev_time: c_longlong,
    pub error_code: c_int,
}

fn code_to_c_int(code: ErrorCode) -> c_int {
    code.value()
}

/// # Safety
/// `pattern` and `out` must be valid, non-null, properly aligned pointers.
#[no_mangle]
pub unsafe extern "C" fn jcron_parse(pattern: *const c_char, out: *mut JcronPattern) -> c_int {
    if pattern.is_null() || out.is_null() {
        return code_to_c_int(CronError::NullPointer.code());
    }
    let c_str = unsafe { CStr::from_ptr(pattern) };
    let s = match c_str.to_str() {
        Ok(s) => s,
        Err(_) => return code_to_c_int(ErrorCode::InvalidPattern),
    };
    match CompiledPattern::from_str(s) {
        Ok(compiled) => {
            unsafe { (*out).inner = compiled };
            code_to_c_int(ErrorCode::Ok)
        }
        Err(err) => code_to_c_int(err.code()),
    }
}

/// # Safety
/// `pattern` and `out` must be valid, non-null, properly aligned pointers.
#[no_mangle]
pub unsafe extern "C" fn jcron_next(
    from_timestamp: c_longlong,
    pattern: *const JcronPattern,
    out: *mut JcronResult,
) -> c_int {
    if pattern.is_null() || out.is_null() {
        return code_to_c_int(CronError::NullPointer.code());
    }
    let compiled = unsafe { &(*pattern).inner };
    match driver::next(from_timestamp, compiled) {
        Ok(ts) => {
            unsafe {
                (*out).next_time = ts;
                (*out).prev_time = 0;
                (*out).error_code = code_to_c_int(ErrorCode::Ok);
            }
            code_to_c_int(ErrorCode::Ok)
        }
        Err(err) => {
            unsafe { (*out).error_code = code_to_c_int(err.code()) };
            code_to_c_int(err.code())
        }
    }
}

/// # Safety
/// `pattern` and `out` must be valid, non-null, properly aligned pointers.
#[no_mangle]
pub unsafe extern "C" fn jcron_prev(
    from_timestamp: c_longlong,
    pattern: *const JcronPattern,
    out: *mut JcronResult,
) -> c_int {
    if pattern.is_null() || out.is_null() {
        return code_to_c_int(CronError::NullPointer.code());
    }
    let compiled = unsafe { &(*pattern).inner };
    match driver::prev(from_timestamp, compiled) {
        Ok(ts) => {
            unsafe {
                (*out).next_time = 0;
                (*out).prev_time = ts;
                (*out).error_code = code_to_c_int(ErrorCode::Ok);
            }
            code_to_c_int(ErrorCode::Ok)
        }
        Err(err) => {
            unsafe { (*out).error_code = code_to_c_int(err.code()) };
            code_to_c_int(err.code())
        }
    }
}

/// # Safety
/// `pattern` must be a valid, non-null, properly aligned pointer.
#[no_mangle]
pub unsafe extern "C" fn jcron_matches(timestamp: c_longlong, pattern: *const JcronPattern) -> c_int {
    if pattern.is_null() {
        return code_to_c_int(CronError::NullPointer.code());
    }
    let compiled = unsafe { &(*pattern).inner };
    match matcher::matches(timestamp, compiled) {
        Ok(true) => 1,
        Ok(false) => 0,
        Err(err) => code_to_c_int(err.code()),
    }
}

/// # Safety
/// `pattern` must be valid and non-null; `results` must point to at least
/// `count` writable [`JcronResult`] slots.
#[no_mangle]
pub unsafe extern "C" fn jcron_next_n(
    from_timestamp: c_longlong,
    pattern: *const JcronPattern,
    count: c_int,
    results: *mut JcronResult,
) -> c_int {
    if pattern.is_null() || results.is_null() || count < 0 {
        return code_to_c_int(CronError::NullPointer.code());
    }
    let compiled = unsafe { &(*pattern).inner };
    match driver::next_n(from_timestamp, compiled, count as usize) {
        Ok(timestamps) => {
            for (i, ts) in timestamps.into_iter().enumerate() {
                unsafe {
                    let slot = results.add(i);
                    (*slot).next_time = ts;
                    (*slot).prev_time = 0;
                    (*slot).error_code = code_to_c_int(ErrorCode::Ok);
                }
            }
            code_to_c_int(ErrorCode::Ok)
        }
        Err(err) => code_to_c_int(err.code()),
    }
}

/// Returns a stable, static, NUL-terminated string for `error_code`, or a
/// null pointer if the code is not one this crate defines.
#[no_mangle]
pub extern "C" fn jcron_strerror(error_code: c_int) -> *const c_char {
    let code = match error_code {
        0 => ErrorCode::Ok,
        -1 => ErrorCode::InvalidPattern,
        -2 => ErrorCode::InvalidTime,
        -3 => ErrorCode::NoMatch,
        -4 => ErrorCode::Overflow,
        -5 => ErrorCode::NullPointer,
        _ => return std::ptr::null(),
    };
    // Leaked once per distinct error code; these are static, `'static`-
    // lifetime strings reused for the life of the process, matching the
    // reference API's own static string table.
    let text: &'static str = crate::errors::strerror(code);
    Box::leak(CString::new(text).expect("error strings are ASCII").into_boxed_c_str()).as_ptr()
}

/// Returns this crate's version string, matching `jcron_version()`.
#[no_mangle]
pub extern "C" fn jcron_version() -> *const c_char {
    static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_next_round_trip_through_ffi_shapes() {
        let pattern_cstring = CString::new("* 0 0 1 1 *").unwrap();
        let mut out = JcronPattern { inner: CompiledPattern::from_str("* * * * * *").unwrap() };
        let rc = unsafe { jcron_parse(pattern_cstring.as_ptr(), &mut out) };
        assert_eq!(rc, 0);

        let mut result = JcronResult { next_time: 0, prev_time: 0, error_code: 0 };
        let ts = crate::calendar::to_timestamp(&crate::calendar::CalendarTime {
            year: 2025, month: 1, day: 1, hour: 0, minute: 0, second: 0, weekday: 0,
        })
        .unwrap();
        let rc = unsafe { jcron_next(ts, &out, &mut result) };
        assert_eq!(rc, 0);
        assert!(result.next_time >= ts);
    }

    #[test]
    fn null_pointer_is_rejected() {
        let rc = unsafe { jcron_parse(std::ptr::null(), std::ptr::null_mut()) };
        assert_eq!(rc, ErrorCode::NullPointer.value());
    }
}
