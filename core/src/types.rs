//! Request payloads and response shapes for the HRMS API.
//!
//! # Design
//! Payload structs serialize to exactly the JSON the server reads. Response
//! DTOs cover the shapes callers branch on; everything else stays a
//! `serde_json::Value` as returned by the pipeline. Dates on the wire are
//! `YYYY-MM-DD` strings, which chrono's serde support produces for `NaiveDate`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::calendar::{count_working_days, is_compoff_eligible, HolidaySet};
use crate::error::ApiError;

pub const WFH_LEAVE_TYPE: &str = "WFH";

/// Read the `message` field the API puts on most responses.
pub fn message_of(value: &Value) -> Option<&str> {
    value.get("message").and_then(Value::as_str)
}

/// Deserialize a pipeline result into a typed response.
pub fn parse_json<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Employee,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub user_type: UserType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForceChangePassword {
    pub user_id: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPassword {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePassword {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetEmployeePassword {
    pub email: String,
    pub new_password: String,
}

/// A logged-in user as the API returns it. Profile fields beyond the
/// identifying ones are kept verbatim in `profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default = "default_user_type")]
    pub user_type: UserType,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

fn default_user_type() -> UserType {
    UserType::Employee
}

/// What a login (or forced password change) response means for the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Authenticated(User),
    PasswordChangeRequired { user_id: String },
    Rejected { message: String },
}

impl LoginOutcome {
    /// Interpret a login response body. 401 bodies arrive here as ordinary
    /// values and map to `Rejected`.
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        if value.get("force_change").and_then(Value::as_bool) == Some(true) {
            let user_id = value
                .get("user_id")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    ApiError::DeserializationError("force_change without user_id".into())
                })?;
            return Ok(LoginOutcome::PasswordChangeRequired {
                user_id: user_id.to_string(),
            });
        }
        if let Some(user) = value.get("user") {
            return Ok(LoginOutcome::Authenticated(parse_json(user.clone())?));
        }
        let message = message_of(&value).unwrap_or("An unknown error occurred.");
        Ok(LoginOutcome::Rejected {
            message: message.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporting_manager1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporting_manager1_mail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporting_manager2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporting_manager2_mail: Option<String>,
}

/// Partial profile update. Only the fields present in the JSON are applied;
/// the UI sends one section (personal, contact, bank, work) at a time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    // personal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permanent_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aadhar_number: Option<String>,
    // contact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contactnumber: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_contact_relation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_number: Option<String>,
    // bank
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ifsc_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_holder_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    // work
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporting_manager1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporting_manager2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub is_read: u8,
}

impl Notification {
    pub fn read(&self) -> bool {
        self.is_read != 0
    }
}

// ---------------------------------------------------------------------------
// Leave and comp-off
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub employee_id: String,
    pub leave_type: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub description: String,
    pub leave_days: u32,
}

impl LeaveRequest {
    /// Build a leave application, counting `leave_days` as working days in
    /// `from_date..=to_date`.
    pub fn new(
        employee_id: &str,
        leave_type: &str,
        from_date: NaiveDate,
        to_date: NaiveDate,
        description: &str,
        holidays: &HolidaySet,
    ) -> Self {
        Self {
            employee_id: employee_id.to_string(),
            leave_type: leave_type.to_string(),
            from_date,
            to_date,
            description: description.trim().to_string(),
            leave_days: count_working_days(from_date, to_date, holidays),
        }
    }

    /// Work-from-home travels through the leave endpoint as leave type `WFH`.
    pub fn work_from_home(
        employee_id: &str,
        from_date: NaiveDate,
        to_date: NaiveDate,
        description: &str,
        holidays: &HolidaySet,
    ) -> Self {
        Self::new(employee_id, WFH_LEAVE_TYPE, from_date, to_date, description, holidays)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoffRequest {
    pub employee_id: String,
    pub work_date: NaiveDate,
    pub description: String,
}

impl CompoffRequest {
    /// Fails with `NotCompoffEligible` unless `work_date` is a weekend or holiday.
    pub fn new(
        employee_id: &str,
        work_date: NaiveDate,
        description: &str,
        holidays: &HolidaySet,
    ) -> Result<Self, ApiError> {
        if !is_compoff_eligible(work_date, holidays) {
            return Err(ApiError::NotCompoffEligible(work_date));
        }
        Ok(Self {
            employee_id: employee_id.to_string(),
            work_date,
            description: description.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalAction {
    pub action: Decision,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveApplication {
    pub record_id: String,
    pub employee_id: String,
    pub leave_type: String,
    pub from_date: String,
    pub to_date: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub comment: Option<String>,
    pub leave_days: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub allotted: i64,
    pub availed: i64,
    pub balance: i64,
}

/// Leave balance keyed by balance column (`sick_leave`, `wfh`, `compoff`, ...).
pub type LeaveBalance = BTreeMap<String, BalanceEntry>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub employee_count: u64,
    pub pending_leaves: u64,
    pub pending_compoffs: u64,
}

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceLogin {
    pub employee_id: String,
    pub date: NaiveDate,
    pub employee_name: String,
    pub work_location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub record_id: String,
    pub date: String,
    pub login_time: String,
    #[serde(default)]
    pub work_location: Option<String>,
    #[serde(default)]
    pub logout_time: Option<String>,
    #[serde(default)]
    pub employee_name: Option<String>,
}
