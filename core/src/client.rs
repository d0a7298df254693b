//! Request builders for every HRMS API endpoint.
//!
//! # Design
//! `HrmsClient` holds only a `base_url` and a retry budget and carries no
//! mutable state between calls. Each `build_*` method produces a
//! `RequestDescriptor` for `pipeline::execute`; nothing here touches the
//! network. Who is logged in is the caller's concern: ids are passed in
//! explicitly rather than read from ambient session state.

use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, RequestDescriptor, DEFAULT_RETRIES};
use crate::types::{
    ApprovalAction, AttendanceLogin, ChangePassword, CompoffRequest, Decision, ForceChangePassword,
    ForgotPassword, LeaveRequest, LoginRequest, ProfileUpdate, RegisterEmployee,
    ResetEmployeePassword, UserType,
};

/// Stateless builder of HRMS API requests.
#[derive(Debug, Clone)]
pub struct HrmsClient {
    base_url: String,
    retries: u32,
}

impl HrmsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            retries: DEFAULT_RETRIES,
        }
    }

    /// Retry budget applied to every descriptor this client builds.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve an API path (with or without a leading slash) against the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Descriptor for an arbitrary path; the typed builders below all go through here.
    pub fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> RequestDescriptor {
        let headers = if body.is_some() {
            vec![("content-type".to_string(), "application/json".to_string())]
        } else {
            Vec::new()
        };
        RequestDescriptor::new(HttpRequest {
            method,
            url: self.url(path),
            headers,
            body,
        })
        .with_retries(self.retries)
    }

    fn json<T: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        payload: &T,
    ) -> Result<RequestDescriptor, ApiError> {
        let body = serde_json::to_string(payload)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(self.request(method, path, Some(body)))
    }

    // --- authentication ---

    pub fn build_login(
        &self,
        username: &str,
        password: &str,
        user_type: UserType,
    ) -> Result<RequestDescriptor, ApiError> {
        let payload = LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
            user_type,
        };
        self.json(HttpMethod::Post, "/login", &payload)
    }

    pub fn build_force_change_password(
        &self,
        user_id: &str,
        new_password: &str,
    ) -> Result<RequestDescriptor, ApiError> {
        let payload = ForceChangePassword {
            user_id: user_id.to_string(),
            new_password: new_password.to_string(),
        };
        self.json(HttpMethod::Put, "/force-change-password", &payload)
    }

    pub fn build_forgot_password(&self, email: &str) -> Result<RequestDescriptor, ApiError> {
        let payload = ForgotPassword {
            email: email.trim().to_string(),
        };
        self.json(HttpMethod::Post, "/forgot-password", &payload)
    }

    pub fn build_register(&self, input: &RegisterEmployee) -> Result<RequestDescriptor, ApiError> {
        self.json(HttpMethod::Post, "/register", input)
    }

    // --- profile ---

    pub fn build_get_profile(&self, employee_id: &str) -> RequestDescriptor {
        self.request(HttpMethod::Get, &format!("/profile/{employee_id}"), None)
    }

    pub fn build_update_profile(
        &self,
        employee_id: &str,
        update: &ProfileUpdate,
    ) -> Result<RequestDescriptor, ApiError> {
        self.json(HttpMethod::Put, &format!("/profile/{employee_id}"), update)
    }

    pub fn build_change_password(
        &self,
        employee_id: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<RequestDescriptor, ApiError> {
        let payload = ChangePassword {
            old_password: old_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.json(HttpMethod::Put, &format!("/profile/change-password/{employee_id}"), &payload)
    }

    pub fn build_notifications(&self, employee_id: &str) -> RequestDescriptor {
        self.request(HttpMethod::Get, &format!("/notifications/{employee_id}"), None)
    }

    pub fn build_mark_notifications_read(&self, employee_id: &str) -> RequestDescriptor {
        self.request(HttpMethod::Put, &format!("/notifications/mark-read/{employee_id}"), None)
    }

    // --- leave and comp-off ---

    pub fn build_submit_leave(
        &self,
        request: &LeaveRequest,
    ) -> Result<RequestDescriptor, ApiError> {
        self.json(HttpMethod::Post, "/leave-application", request)
    }

    pub fn build_leave_history(&self, employee_id: &str) -> RequestDescriptor {
        self.request(HttpMethod::Get, &format!("/leave-applications/{employee_id}"), None)
    }

    pub fn build_leave_balance(&self, employee_id: &str) -> RequestDescriptor {
        self.request(HttpMethod::Get, &format!("/leave-balance/{employee_id}"), None)
    }

    pub fn build_submit_compoff(
        &self,
        request: &CompoffRequest,
    ) -> Result<RequestDescriptor, ApiError> {
        self.json(HttpMethod::Post, "/compoff-request", request)
    }

    // --- admin ---

    pub fn build_admin_leave_requests(&self) -> RequestDescriptor {
        self.request(HttpMethod::Get, "/admin/leave-requests", None)
    }

    pub fn build_leave_action(
        &self,
        record_id: &str,
        action: Decision,
        comment: &str,
    ) -> Result<RequestDescriptor, ApiError> {
        let payload = ApprovalAction {
            action,
            comment: comment.trim().to_string(),
        };
        self.json(HttpMethod::Put, &format!("/admin/leave-action/{record_id}"), &payload)
    }

    pub fn build_admin_compoff_requests(&self) -> RequestDescriptor {
        self.request(HttpMethod::Get, "/admin/compoff-requests", None)
    }

    pub fn build_compoff_action(
        &self,
        record_id: &str,
        action: Decision,
        comment: &str,
    ) -> Result<RequestDescriptor, ApiError> {
        let payload = ApprovalAction {
            action,
            comment: comment.trim().to_string(),
        };
        self.json(HttpMethod::Put, &format!("/admin/compoff-action/{record_id}"), &payload)
    }

    pub fn build_reset_employee_password(
        &self,
        email: &str,
        new_password: &str,
    ) -> Result<RequestDescriptor, ApiError> {
        let payload = ResetEmployeePassword {
            email: email.trim().to_string(),
            new_password: new_password.to_string(),
        };
        self.json(HttpMethod::Put, "/admin/reset-employee-password", &payload)
    }

    pub fn build_dashboard_stats(&self) -> RequestDescriptor {
        self.request(HttpMethod::Get, "/admin/dashboard-stats", None)
    }

    pub fn build_admin_attendance_records(&self) -> RequestDescriptor {
        self.request(HttpMethod::Get, "/admin/attendance-records", None)
    }

    // --- attendance ---

    pub fn build_attendance_login(
        &self,
        login: &AttendanceLogin,
    ) -> Result<RequestDescriptor, ApiError> {
        self.json(HttpMethod::Post, "/attendance/login", login)
    }

    pub fn build_attendance_logout(&self, record_id: &str) -> RequestDescriptor {
        self.request(HttpMethod::Put, &format!("/attendance/logout/{record_id}"), None)
    }

    pub fn build_attendance_records(&self, employee_id: &str) -> RequestDescriptor {
        self.request(HttpMethod::Get, &format!("/attendance/{employee_id}"), None)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::calendar::HolidaySet;

    fn client() -> HrmsClient {
        HrmsClient::new("http://127.0.0.1:5000")
    }

    fn body(d: &RequestDescriptor) -> serde_json::Value {
        serde_json::from_str(d.request.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn build_login_produces_json_post() {
        let d = client().build_login(" asha@example.com ", "pw", UserType::Admin).unwrap();
        assert_eq!(d.method(), HttpMethod::Post);
        assert_eq!(d.url(), "http://127.0.0.1:5000/login");
        assert_eq!(
            d.request.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        assert_eq!(d.retries, 3);
        let b = body(&d);
        assert_eq!(b["username"], "asha@example.com");
        assert_eq!(b["user_type"], "admin");
    }

    #[test]
    fn get_builders_have_no_body_or_headers() {
        let c = client();
        for d in [
            c.build_get_profile("SSQ-1001"),
            c.build_leave_history("SSQ-1001"),
            c.build_leave_balance("SSQ-1001"),
            c.build_notifications("SSQ-1001"),
            c.build_attendance_records("SSQ-1001"),
            c.build_admin_leave_requests(),
            c.build_admin_compoff_requests(),
            c.build_dashboard_stats(),
            c.build_admin_attendance_records(),
        ] {
            assert_eq!(d.method(), HttpMethod::Get, "{}", d.url());
            assert!(d.request.body.is_none());
            assert!(d.request.headers.is_empty());
        }
    }

    #[test]
    fn paths_include_ids() {
        let c = client();
        assert_eq!(
            c.build_leave_balance("SSQ-1001").url(),
            "http://127.0.0.1:5000/leave-balance/SSQ-1001"
        );
        assert_eq!(
            c.build_mark_notifications_read("SSQ-1001").url(),
            "http://127.0.0.1:5000/notifications/mark-read/SSQ-1001"
        );
        let logout = c.build_attendance_logout("abc");
        assert_eq!(logout.method(), HttpMethod::Put);
        assert_eq!(logout.url(), "http://127.0.0.1:5000/attendance/logout/abc");
        assert!(logout.request.body.is_none());
    }

    #[test]
    fn build_submit_leave_carries_leave_days() {
        let from = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 1, 26).unwrap();
        let holidays = HolidaySet::default();
        let leave = LeaveRequest::new("SSQ-1001", "Casual Leave", from, to, "trip", &holidays);
        let d = client().build_submit_leave(&leave).unwrap();
        assert_eq!(d.url(), "http://127.0.0.1:5000/leave-application");
        let b = body(&d);
        assert_eq!(b["leave_days"], 5);
        assert_eq!(b["leave_type"], "Casual Leave");
    }

    #[test]
    fn build_actions_target_record() {
        let c = client();
        let d = c.build_leave_action("r-1", Decision::Approved, " ok ").unwrap();
        assert_eq!(d.method(), HttpMethod::Put);
        assert_eq!(d.url(), "http://127.0.0.1:5000/admin/leave-action/r-1");
        assert_eq!(body(&d), serde_json::json!({"action": "Approved", "comment": "ok"}));

        let d = c.build_compoff_action("r-2", Decision::Rejected, "").unwrap();
        assert_eq!(d.url(), "http://127.0.0.1:5000/admin/compoff-action/r-2");
        assert_eq!(body(&d)["action"], "Rejected");
    }

    #[test]
    fn with_retries_propagates_to_descriptors() {
        let c = client().with_retries(1);
        assert_eq!(c.build_dashboard_stats().retries, 1);
        assert_eq!(c.build_forgot_password("a@b.c").unwrap().retries, 1);
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let c = HrmsClient::new("http://127.0.0.1:5000/");
        assert_eq!(c.base_url(), "http://127.0.0.1:5000");
        assert_eq!(c.build_dashboard_stats().url(), "http://127.0.0.1:5000/admin/dashboard-stats");
        assert_eq!(c.url("login"), "http://127.0.0.1:5000/login");
    }
}
