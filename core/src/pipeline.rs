//! Resilient request execution: one call in, one JSON value or one error out.
//!
//! # Design
//! Every outcome of an attempt is first classified by [`classify`]:
//! - 2xx and 401 are successes and their body is parsed as JSON. A 401 is
//!   returned as data so the caller can read its `message` (e.g. "Invalid
//!   employee credentials") and render a login error without special-casing.
//!   A body that is not JSON, including an empty one, is a retryable
//!   `DeserializationError`.
//! - Any other status becomes `ApiError::Http`, carrying the body's `message`
//!   when the body has one.
//! - Transport failures come from the `Transport` itself.
//!
//! All three failure kinds share one retry loop, including deterministic
//! 4xx/5xx responses, so a non-idempotent request may reach the server more
//! than once. Between attempts the pipeline sleeps `2^i` seconds for the
//! 0-based attempt index `i`; it never sleeps after the final attempt.
//!
//! There is no cancellation handle: dropping the returned future abandons any
//! remaining attempts and backoff.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::error::ApiError;
use crate::http::{HttpResponse, RequestDescriptor};
use crate::transport::Transport;

pub const BASE_BACKOFF_MS: u64 = 1000;
const UNAUTHORIZED: u16 = 401;

/// Delay before the attempt that follows attempt `attempt_index` (0-based).
pub fn backoff_delay(attempt_index: u32) -> Duration {
    let factor = 1u64.checked_shl(attempt_index).unwrap_or(u64::MAX);
    Duration::from_millis(BASE_BACKOFF_MS.saturating_mul(factor))
}

/// Turn a raw response into the pipeline's result for one attempt.
pub fn classify(response: HttpResponse) -> Result<Value, ApiError> {
    if response.is_success() || response.status == UNAUTHORIZED {
        return parse_body(&response.body);
    }
    Err(http_error(&response))
}

fn parse_body(body: &str) -> Result<Value, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

fn http_error(response: &HttpResponse) -> ApiError {
    let message = serde_json::from_str::<Value>(&response.body)
        .ok()
        .as_ref()
        .and_then(crate::types::message_of)
        .map(str::to_owned)
        .unwrap_or_else(|| format!("HTTP error, status {}", response.status));
    ApiError::Http {
        status: response.status,
        message,
    }
}

/// Send `descriptor` through `transport`, retrying failed attempts with
/// exponential backoff until the budget is spent.
///
/// A budget of 0 is treated as 1: every call makes at least one attempt.
pub async fn execute<T: Transport>(
    transport: &T,
    descriptor: &RequestDescriptor,
) -> Result<Value, ApiError> {
    let attempts = descriptor.retries.max(1);
    let request = &descriptor.request;

    let mut attempt = 0;
    loop {
        debug!(
            method = %request.method,
            url = %request.url,
            attempt = attempt + 1,
            "sending request"
        );

        let err = match transport.send(request).await.and_then(classify) {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !err.is_retryable() {
            return Err(err);
        }

        if attempt + 1 >= attempts {
            error!(url = %request.url, attempts, error = %err, "request failed, retries exhausted");
            return Err(ApiError::RetriesExhausted {
                attempts,
                last: Box::new(err),
            });
        }

        let delay = backoff_delay(attempt);
        warn!(
            url = %request.url,
            attempt = attempt + 1,
            error = %err,
            retry_in_ms = delay.as_millis() as u64,
            "attempt failed"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
