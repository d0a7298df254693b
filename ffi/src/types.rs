//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! The C side never sees core types. Requests go in as a method enum plus C
//! strings; every outcome comes back in one `FfiApiResult` envelope whose
//! `json` field carries the success body serialized as text. Conversion
//! helpers live here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use hrms_core::{ApiError, HolidaySet, HrmsClient, HttpMethod, UreqTransport};
use serde_json::Value;
use tokio::runtime::Runtime;

/// Opaque handle returned by `hrms_client_new`. C callers pass it back into
/// every call that talks to the API.
pub struct FfiHrmsClient {
    pub(crate) client: HrmsClient,
    pub(crate) holidays: HolidaySet,
    pub(crate) transport: UreqTransport,
    pub(crate) runtime: Runtime,
}

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<FfiHttpMethod> for HttpMethod {
    fn from(m: FfiHttpMethod) -> Self {
        match m {
            FfiHttpMethod::Get => HttpMethod::Get,
            FfiHttpMethod::Post => HttpMethod::Post,
            FfiHttpMethod::Put => HttpMethod::Put,
            FfiHttpMethod::Delete => HttpMethod::Delete,
        }
    }
}

/// Error codes returned in `FfiApiResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Transport = 1,
    Http = 2,
    Deserialization = 3,
    Serialization = 4,
    RetriesExhausted = 5,
    InvalidArg = 6,
    NullArg = 7,
    Panic = 8,
}

/// Result envelope for `hrms_execute`.
///
/// On success `error_code` is `Ok`, `error_message` is null and `json` holds
/// the response body as JSON text. A 401 is a success here:
/// the body carries the server's rejection message.
/// On failure `json` is null, `error_message` is the text to show the user
/// and `http_status` is the last HTTP status seen, or 0.
#[repr(C)]
pub struct FfiApiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub json: *mut c_char,
}

/// Hand a Rust string to C. Interior NULs cannot occur in serialized JSON or
/// in our messages; if one does, the caller gets an empty string.
pub(crate) fn into_c_string(s: String) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

impl FfiApiResult {
    fn boxed(
        error_code: FfiErrorCode,
        error_message: Option<String>,
        http_status: u16,
        json: Option<String>,
    ) -> *mut Self {
        Box::into_raw(Box::new(FfiApiResult {
            error_code,
            error_message: error_message.map_or(std::ptr::null_mut(), into_c_string),
            http_status,
            json: json.map_or(std::ptr::null_mut(), into_c_string),
        }))
    }

    pub(crate) fn ok(value: &Value) -> *mut Self {
        Self::boxed(FfiErrorCode::Ok, None, 0, Some(value.to_string()))
    }

    pub(crate) fn from_error(err: &ApiError) -> *mut Self {
        let code = match err {
            ApiError::Transport(_) => FfiErrorCode::Transport,
            ApiError::Http { .. } => FfiErrorCode::Http,
            ApiError::DeserializationError(_) => FfiErrorCode::Deserialization,
            ApiError::SerializationError(_) => FfiErrorCode::Serialization,
            ApiError::RetriesExhausted { .. } => FfiErrorCode::RetriesExhausted,
            ApiError::InvalidDate(_) | ApiError::NotCompoffEligible(_) | ApiError::Config(_) => {
                FfiErrorCode::InvalidArg
            }
        };
        Self::boxed(code, Some(err.message()), err.status().unwrap_or(0), None)
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::NullArg, Some(format!("null argument: {name}")), 0, None)
    }

    pub(crate) fn invalid_arg(name: &str) -> *mut Self {
        let message = format!("invalid UTF-8 in argument: {name}");
        Self::boxed(FfiErrorCode::InvalidArg, Some(message), 0, None)
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::Panic, Some(msg.to_string()), 0, None)
    }
}
