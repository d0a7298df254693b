//! In-memory stand-in for the HRMS API.
//!
//! Serves the same paths, status codes and `{"message": ...}` error bodies as
//! the real service so the client core can be exercised over real HTTP.
//! `MockOptions::fail_first` makes the first N requests answer 503, which is
//! how tests drive the client's retry path.

pub mod handlers;
pub mod store;

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

use crate::handlers::*;
use crate::store::Store;

pub type Db = Arc<RwLock<Store>>;

#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct MockOptions {
    /// Number of leading requests answered with 503 before normal service.
    pub fail_first: u32,
    pub admin_email: String,
    pub admin_password: String,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            fail_first: 0,
            admin_email: "admin@gmail.com".to_string(),
            admin_password: "123".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Db,
    pub admin: Arc<AdminCredentials>,
    failures_left: Arc<AtomicU32>,
}

pub fn app() -> Router {
    app_with(MockOptions::default())
}

pub fn app_with(options: MockOptions) -> Router {
    let state = AppState {
        store: Arc::new(RwLock::new(Store::default())),
        admin: Arc::new(AdminCredentials {
            email: options.admin_email,
            password: options.admin_password,
        }),
        failures_left: Arc::new(AtomicU32::new(options.fail_first)),
    };

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/force-change-password", put(force_change_password))
        .route("/forgot-password", post(forgot_password))
        .route("/profile/change-password/{employee_id}", put(change_password))
        .route("/profile/{employee_id}", get(get_profile).put(update_profile))
        .route("/notifications/{employee_id}", get(notifications))
        .route("/notifications/mark-read/{employee_id}", put(mark_notifications_read))
        .route("/leave-application", post(submit_leave))
        .route("/leave-applications/{employee_id}", get(leave_history))
        .route("/leave-balance/{employee_id}", get(leave_balance))
        .route("/compoff-request", post(submit_compoff))
        .route("/admin/leave-requests", get(admin_leave_requests))
        .route("/admin/leave-action/{record_id}", put(leave_action))
        .route("/admin/compoff-requests", get(admin_compoff_requests))
        .route("/admin/compoff-action/{record_id}", put(compoff_action))
        .route("/admin/reset-employee-password", put(reset_employee_password))
        .route("/admin/dashboard-stats", get(dashboard_stats))
        .route("/admin/attendance-records", get(admin_attendance_records))
        .route("/attendance/login", post(attendance_login))
        .route("/attendance/logout/{record_id}", put(attendance_logout))
        .route("/attendance/{employee_id}", get(attendance_records))
        .layer(middleware::from_fn_with_state(state.clone(), inject_failures))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, options: MockOptions) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(options)).await
}

async fn inject_failures(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let injected = state
        .failures_left
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if injected {
        tracing::debug!(uri = %request.uri(), "injecting 503");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"message": "service unavailable"})),
        )
            .into_response();
    }
    next.run(request).await
}
