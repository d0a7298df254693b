//! In-memory records behind the mock HRMS API.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// Profile columns a `PUT /profile/{id}` may change.
pub const PROFILE_KEYS: [&str; 25] = [
    "first_name",
    "last_name",
    "gender",
    "dob",
    "permanent_address",
    "current_address",
    "pan_number",
    "aadhar_number",
    "contactnumber",
    "alternate_contact_number",
    "alternate_contact_person",
    "alternate_contact_relation",
    "emergency_number",
    "account_number",
    "ifsc_code",
    "account_holder_name",
    "branch",
    "department",
    "reporting_manager1",
    "reporting_manager1_mail",
    "reporting_manager2",
    "reporting_manager2_mail",
    "employee_role",
    "employment_status",
    "join_date",
];

/// Allotment seeded for every new employee, by balance column.
pub const DEFAULT_ALLOTMENT: [(&str, i64); 6] = [
    ("sick_leave", 8),
    ("casual_leave", 18),
    ("earned_leave", 0),
    ("paternity_leave", 0),
    ("wfh", 12),
    ("compoff", 0),
];

const FIRST_EMPLOYEE_NUMBER: u32 = 1001;

#[derive(Debug, Clone)]
pub struct Employee {
    pub id: String,
    pub email: String,
    pub password: String,
    pub force_password_change: bool,
    pub profile: Map<String, Value>,
}

impl Employee {
    /// The employee as the API returns it: every column except the password.
    pub fn to_json(&self) -> Value {
        let mut out = self.profile.clone();
        out.insert("id".into(), json!(self.id));
        out.insert("email".into(), json!(self.email));
        out.insert("user_type".into(), json!("employee"));
        out.insert("force_password_change".into(), json!(u8::from(self.force_password_change)));
        Value::Object(out)
    }

    pub fn field(&self, key: &str) -> Value {
        self.profile.get(key).cloned().unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaveApplication {
    pub record_id: String,
    pub employee_id: String,
    pub leave_type: String,
    pub from_date: String,
    pub to_date: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub comment: Option<String>,
    pub submitted_at: String,
    pub leave_days: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompoffRecord {
    pub record_id: String,
    pub employee_id: String,
    pub work_date: String,
    pub description: Option<String>,
    pub status: String,
    pub comment: Option<String>,
    pub submitted_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRecord {
    pub record_id: String,
    pub employee_id: String,
    pub date: String,
    pub login_time: String,
    pub work_location: String,
    pub logout_time: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub employee_id: String,
    pub message: String,
    pub is_read: bool,
}

#[derive(Debug, Default)]
pub struct Store {
    pub employees: BTreeMap<String, Employee>,
    pub balances: BTreeMap<String, BTreeMap<String, i64>>,
    pub leaves: Vec<LeaveApplication>,
    pub compoffs: Vec<CompoffRecord>,
    pub attendance: Vec<AttendanceRecord>,
    pub notifications: Vec<Notification>,
}

impl Store {
    pub fn next_employee_id(&self) -> String {
        let last = self
            .employees
            .keys()
            .filter_map(|id| id.strip_prefix("SSQ-")?.parse::<u32>().ok())
            .max();
        let next = last.map_or(FIRST_EMPLOYEE_NUMBER, |n| n + 1);
        format!("SSQ-{next}")
    }

    pub fn employee_by_email(&self, email: &str) -> Option<&Employee> {
        self.employees.values().find(|e| e.email == email)
    }

    pub fn employee_by_email_mut(&mut self, email: &str) -> Option<&mut Employee> {
        self.employees.values_mut().find(|e| e.email == email)
    }

    pub fn seed_balance(&mut self, employee_id: &str) {
        let allotment = DEFAULT_ALLOTMENT.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        self.balances.insert(employee_id.to_string(), allotment);
    }

    pub fn notify(&mut self, employee_id: &str, message: impl Into<String>) {
        self.notifications.push(Notification {
            employee_id: employee_id.to_string(),
            message: message.into(),
            is_read: false,
        });
    }

    /// Allotted, availed and remaining days per balance column. Availed days
    /// are approved applications whose leave type names the column, e.g.
    /// `Sick Leave` for `sick_leave` and `WFH` for `wfh`.
    pub fn leave_balance(&mut self, employee_id: &str) -> Value {
        if !self.balances.contains_key(employee_id) {
            self.seed_balance(employee_id);
        }
        let allotment = &self.balances[employee_id];
        let mut out = Map::new();
        for (column, allotted) in allotment {
            let label = column.replace('_', " ");
            let availed: i64 = self
                .leaves
                .iter()
                .filter(|l| l.employee_id == employee_id && l.status == "Approved")
                .filter(|l| l.leave_type.eq_ignore_ascii_case(&label))
                .map(|l| l.leave_days)
                .sum();
            out.insert(
                column.clone(),
                json!({"allotted": allotted, "availed": availed, "balance": allotted - availed}),
            );
        }
        Value::Object(out)
    }
}

pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn now_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn now_time() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}
