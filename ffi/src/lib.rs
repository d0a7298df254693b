//! C-ABI wrapper around `hrms-core`.
//!
//! # Overview
//! Exposes the working-day calendar and the request pipeline through
//! `extern "C"` functions so a non-Rust UI can count leave days and call the
//! HRMS API without linking serde or an async runtime itself.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - The client handle owns a current-thread tokio runtime; `hrms_execute`
//!   blocks the calling thread until the pipeline finishes, backoff included.
//! - A single `FfiApiResult` envelope conveys success bodies and errors.
//! - The C caller owns all returned pointers and must call the matching
//!   `hrms_*_free` / `hrms_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use hrms_core::calendar::parse_iso_date;
use hrms_core::{
    count_working_days_iso, execute, is_compoff_eligible, ClientConfig, HolidaySet, HrmsClient,
    UreqTransport,
};
use tokio::runtime::Runtime;

use types::*;

/// Borrow a non-null C string argument. `None` when it is not UTF-8.
///
/// # Safety
/// `ptr` must point to a NUL-terminated string that outlives the borrow.
unsafe fn arg<'a>(ptr: *const c_char) -> Option<&'a str> {
    CStr::from_ptr(ptr).to_str().ok()
}

fn runtime() -> Option<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .ok()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client bound to `base_url` with the built-in holiday list and
/// default retry budget and timeout.
///
/// Returns null if `base_url` is null or not UTF-8, or if an internal panic
/// occurs. The caller must free the returned pointer with `hrms_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn hrms_client_new(base_url: *const c_char) -> *mut FfiHrmsClient {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let (Some(url), Some(runtime)) = (unsafe { arg(base_url) }, runtime()) else {
            return std::ptr::null_mut();
        };
        Box::into_raw(Box::new(FfiHrmsClient {
            client: HrmsClient::new(url),
            holidays: HolidaySet::default(),
            transport: UreqTransport::default(),
            runtime,
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a client from `config/hrms.toml` and `HRMS_*` environment
/// variables. Returns null if the configuration cannot be loaded.
#[unsafe(no_mangle)]
pub extern "C" fn hrms_client_from_config() -> *mut FfiHrmsClient {
    catch_unwind(|| {
        let config = match ClientConfig::load() {
            Ok(config) => config,
            Err(_) => return std::ptr::null_mut(),
        };
        let (Ok(holidays), Some(runtime)) = (config.holiday_set(), runtime()) else {
            return std::ptr::null_mut();
        };
        Box::into_raw(Box::new(FfiHrmsClient {
            client: config.client(),
            holidays,
            transport: config.transport(),
            runtime,
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `hrms_client_new` or `hrms_client_from_config`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn hrms_client_free(client: *mut FfiHrmsClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(client) });
        }));
    }
}

/// The client's base URL as an owned C string, or null if `client` is null.
/// Free it with `hrms_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn hrms_client_base_url(client: *const FfiHrmsClient) -> *mut c_char {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        into_c_string(client.client.base_url().to_string())
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

/// Count working days in the inclusive range `start..=end` (`YYYY-MM-DD`),
/// skipping weekends and the `holidays_len` dates in `holidays`.
///
/// `holidays` may be null when `holidays_len` is 0. Returns -1 for a null or
/// malformed argument; a reversed range counts 0.
#[unsafe(no_mangle)]
pub extern "C" fn hrms_count_working_days(
    start: *const c_char,
    end: *const c_char,
    holidays: *const *const c_char,
    holidays_len: u32,
) -> i64 {
    catch_unwind(|| {
        if start.is_null() || end.is_null() || (holidays.is_null() && holidays_len > 0) {
            return -1;
        }
        let (Some(start), Some(end)) = (unsafe { arg(start) }, unsafe { arg(end) }) else {
            return -1;
        };
        let entries: &[*const c_char] = if holidays_len == 0 {
            &[]
        } else {
            unsafe { std::slice::from_raw_parts(holidays, holidays_len as usize) }
        };
        let mut dates = Vec::with_capacity(entries.len());
        for &entry in entries {
            match (!entry.is_null()).then(|| unsafe { arg(entry) }).flatten() {
                Some(date) => dates.push(date),
                None => return -1,
            }
        }
        let Ok(holidays) = HolidaySet::from_iso(dates) else {
            return -1;
        };
        count_working_days_iso(start, end, &holidays).map_or(-1, i64::from)
    })
    .unwrap_or(-1)
}

/// 1 if working on `date` earns a comp-off under the client's holiday list,
/// 0 if it is a regular working day, -1 for a null or malformed argument.
#[unsafe(no_mangle)]
pub extern "C" fn hrms_is_compoff_eligible(
    client: *const FfiHrmsClient,
    date: *const c_char,
) -> i32 {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() || date.is_null() {
            return -1;
        }
        let client = unsafe { &*client };
        match unsafe { arg(date) }.map(parse_iso_date) {
            Some(Ok(date)) => i32::from(is_compoff_eligible(date, &client.holidays)),
            _ => -1,
        }
    }))
    .unwrap_or(-1)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Send `method path` with an optional JSON `body` through the retrying
/// pipeline and wait for the outcome.
///
/// `path` is resolved against the client's base URL. `body` may be null.
/// `retries` is the number of attempts; 0 uses the client's budget.
/// Never returns null. Free the result with `hrms_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn hrms_execute(
    client: *const FfiHrmsClient,
    method: FfiHttpMethod,
    path: *const c_char,
    body: *const c_char,
    retries: u32,
) -> *mut FfiApiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiApiResult::null_arg("client");
        }
        if path.is_null() {
            return FfiApiResult::null_arg("path");
        }
        let client = unsafe { &*client };
        let Some(path) = (unsafe { arg(path) }) else {
            return FfiApiResult::invalid_arg("path");
        };
        let body = if body.is_null() {
            None
        } else {
            match unsafe { arg(body) } {
                Some(body) => Some(body.to_string()),
                None => return FfiApiResult::invalid_arg("body"),
            }
        };

        let mut descriptor = client.client.request(method.into(), path, body);
        if retries > 0 {
            descriptor = descriptor.with_retries(retries);
        }
        match client.runtime.block_on(execute(&client.transport, &descriptor)) {
            Ok(value) => FfiApiResult::ok(&value),
            Err(err) => FfiApiResult::from_error(&err),
        }
    }))
    .unwrap_or_else(|_| FfiApiResult::panic("internal panic in hrms_execute"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiApiResult` returned by `hrms_execute`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn hrms_free_result(result: *mut FfiApiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.json.is_null() {
            drop(unsafe { CString::from_raw(result.json) });
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn hrms_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
