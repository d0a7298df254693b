//! Client core for the HRMS (HR-management) API.
//!
//! # Overview
//! Two independent pieces sit under a thin endpoint catalogue:
//! - [`pipeline::execute`] sends a [`RequestDescriptor`] through a
//!   [`Transport`], retrying failures with exponential backoff, and yields a
//!   single JSON value or a single [`ApiError`].
//! - [`calendar::count_working_days`] counts the weekdays in an inclusive date
//!   range that are not in a [`HolidaySet`].
//!
//! [`HrmsClient`] builds descriptors for each remote endpoint; rendering and
//! form handling belong to the UI layer above.
//!
//! # Design
//! - `HrmsClient` is stateless: it holds only `base_url` and a retry budget.
//! - The network is behind the `Transport` trait; `UreqTransport` is the
//!   production implementation and tests script their own.
//! - The holiday list is configuration (`ClientConfig`), not a constant.
//! - Types use owned `String` / `Vec` fields to simplify FFI mapping.

pub mod calendar;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod pipeline;
pub mod transport;
pub mod types;

pub use calendar::{
    count_working_days, count_working_days_iso, is_compoff_eligible, is_working_day, HolidaySet,
};
pub use client::HrmsClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestDescriptor, DEFAULT_RETRIES};
pub use pipeline::execute;
pub use transport::{Transport, UreqTransport};
pub use types::{LoginOutcome, User, UserType};
