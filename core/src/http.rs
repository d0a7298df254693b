//! HTTP transport types shared by the pipeline and its transports.
//!
//! # Design
//! Requests and responses are plain data. `HrmsClient` builds
//! `RequestDescriptor` values, the pipeline hands the inner `HttpRequest` to a
//! `Transport`, and the transport returns an `HttpResponse` for the pipeline
//! to classify. Keeping the wire step behind `Transport` lets tests script
//! every outcome without a socket.
//!
//! All fields use owned types (`String`, `Vec`) so values can cross the FFI
//! boundary without lifetime concerns.

use std::fmt;

/// Attempts made per call when the caller does not choose a budget.
pub const DEFAULT_RETRIES: u32 = 3;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One call's worth of input to `pipeline::execute`: the request plus the
/// number of attempts allowed (including the first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub request: HttpRequest,
    pub retries: u32,
}

impl RequestDescriptor {
    pub fn new(request: HttpRequest) -> Self {
        Self {
            request,
            retries: DEFAULT_RETRIES,
        }
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.request.method
    }

    pub fn url(&self) -> &str {
        &self.request.url
    }
}
