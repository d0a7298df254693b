//! Route handlers. Every response body is a JSON value; failures carry
//! `{"message": ...}` with the status the real API uses.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Map, Value};

use crate::store::{
    new_record_id, now_time, now_timestamp, AttendanceRecord, CompoffRecord, Employee,
    LeaveApplication, PROFILE_KEYS,
};
use crate::AppState;

pub type Reply = (StatusCode, Json<Value>);
pub type ApiResult = Result<Reply, Reply>;

fn ok(status: StatusCode, body: Value) -> ApiResult {
    Ok((status, Json(body)))
}

fn fail(status: StatusCode, message: impl Into<String>) -> Reply {
    (status, Json(json!({ "message": message.into() })))
}

/// Non-empty string field, the way the API treats "required".
fn text<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn require<'a>(body: &'a Value, keys: &[&str], message: &str) -> Result<Vec<&'a str>, Reply> {
    keys.iter()
        .map(|k| text(body, k))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| fail(StatusCode::BAD_REQUEST, message))
}

fn decision(body: &Value) -> Result<(&str, Option<String>), Reply> {
    let action = body
        .get("action")
        .and_then(Value::as_str)
        .filter(|a| matches!(*a, "Approved" | "Rejected"))
        .ok_or_else(|| fail(StatusCode::BAD_REQUEST, "Invalid action"))?;
    let comment = text(body, "comment").map(str::to_owned);
    Ok((action, comment))
}

// --- authentication ---

pub async fn register(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult {
    let fields = require(
        &body,
        &["first_name", "last_name", "email", "password"],
        "Missing required fields",
    )?;
    let (email, password) = (fields[2], fields[3]);

    let mut store = state.store.write().await;
    if store.employee_by_email(email).is_some() {
        return Err(fail(StatusCode::CONFLICT, "Email already exists"));
    }
    let id = store.next_employee_id();
    let mut profile = Map::new();
    for key in PROFILE_KEYS.iter().chain(["personal_email"].iter()) {
        if let Some(value) = body.get(*key) {
            profile.insert(key.to_string(), value.clone());
        }
    }
    store.employees.insert(
        id.clone(),
        Employee {
            id: id.clone(),
            email: email.to_string(),
            password: password.to_string(),
            force_password_change: true,
            profile,
        },
    );
    store.seed_balance(&id);
    tracing::info!(employee_id = %id, "registered employee");
    ok(StatusCode::CREATED, json!({"message": "Registration successful!", "id": id}))
}

pub async fn login(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult {
    let fields = require(
        &body,
        &["username", "password", "user_type"],
        "Email, password, and user_type are required",
    )?;
    let (username, password, user_type) = (fields[0], fields[1], fields[2]);

    match user_type {
        "admin" => {
            if username == state.admin.email && password == state.admin.password {
                let admin = json!({"id": "ADMIN-001", "first_name": "Admin", "last_name": "User",
                                   "email": state.admin.email, "user_type": "admin"});
                ok(StatusCode::OK, json!({"message": "Admin login successful!", "user": admin}))
            } else {
                Err(fail(StatusCode::UNAUTHORIZED, "Invalid Admin credentials"))
            }
        }
        "employee" => {
            if username == state.admin.email {
                return Err(fail(StatusCode::UNAUTHORIZED, "Invalid employee credentials"));
            }
            let store = state.store.read().await;
            match store.employee_by_email(username) {
                Some(e) if e.password == password && e.force_password_change => ok(
                    StatusCode::OK,
                    json!({
                        "message": "Password change required",
                        "force_change": true,
                        "user_id": e.id
                    }),
                ),
                Some(e) if e.password == password => {
                    ok(StatusCode::OK, json!({"message": "Login successful!", "user": e.to_json()}))
                }
                _ => Err(fail(StatusCode::UNAUTHORIZED, "Invalid employee credentials")),
            }
        }
        _ => Err(fail(StatusCode::BAD_REQUEST, "Invalid user type specified")),
    }
}

pub async fn force_change_password(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult {
    let fields = require(
        &body,
        &["user_id", "new_password"],
        "User ID and new password are required",
    )?;
    let (user_id, new_password) = (fields[0], fields[1]);

    let mut store = state.store.write().await;
    let employee = store
        .employees
        .get_mut(user_id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Employee not found"))?;
    employee.password = new_password.to_string();
    employee.force_password_change = false;
    let user = employee.to_json();
    store.notify(user_id, "Your password was successfully set on first login.");
    ok(
        StatusCode::OK,
        json!({"message": "Password updated successfully! Logging in...", "user": user}),
    )
}

pub async fn forgot_password(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult {
    let email =
        text(&body, "email").ok_or_else(|| fail(StatusCode::BAD_REQUEST, "Email is required"))?;

    let mut store = state.store.write().await;
    let Some(employee) = store.employee_by_email_mut(email) else {
        let message = "If an account with that email exists, a new password has been sent.";
        return ok(StatusCode::OK, json!({ "message": message }));
    };
    // The mock has no mail transport; the temporary password goes nowhere.
    let temporary: String = new_record_id()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(10)
        .collect();
    employee.password = temporary;
    employee.force_password_change = true;
    let id = employee.id.clone();
    store.notify(&id, "Your password was reset via email request.");
    tracing::info!(employee_id = %id, "issued temporary password");
    ok(
        StatusCode::OK,
        json!({"message": "A new password has been sent to your email address."}),
    )
}

// --- profile ---

pub async fn get_profile(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> ApiResult {
    let store = state.store.read().await;
    let employee = store
        .employees
        .get(&employee_id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Employee not found"))?;
    ok(StatusCode::OK, employee.to_json())
}

pub async fn update_profile(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult {
    let mut store = state.store.write().await;
    let employee = store
        .employees
        .get_mut(&employee_id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Employee not found"))?;

    let updates: Vec<(String, Value)> = body
        .as_object()
        .map(|obj| {
            obj.iter()
                .filter(|(k, _)| PROFILE_KEYS.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
        .unwrap_or_default();
    if updates.is_empty() {
        return Err(fail(StatusCode::BAD_REQUEST, "No valid fields to update"));
    }
    employee.profile.extend(updates);
    let user = employee.to_json();
    store.notify(&employee_id, "Your profile details have been updated.");
    ok(StatusCode::OK, json!({"message": "Profile updated successfully!", "user": user}))
}

pub async fn change_password(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult {
    let fields = require(
        &body,
        &["old_password", "new_password"],
        "Old and new passwords are required",
    )?;
    let (old_password, new_password) = (fields[0], fields[1]);

    let mut store = state.store.write().await;
    let employee = store
        .employees
        .get_mut(&employee_id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Employee not found"))?;
    if employee.password != old_password {
        return Err(fail(StatusCode::BAD_REQUEST, "Incorrect old password"));
    }
    employee.password = new_password.to_string();
    store.notify(&employee_id, "Your password was changed successfully.");
    ok(StatusCode::OK, json!({"message": "Password updated successfully!"}))
}

pub async fn notifications(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> ApiResult {
    let store = state.store.read().await;
    let list: Vec<Value> = store
        .notifications
        .iter()
        .rev()
        .filter(|n| n.employee_id == employee_id)
        .map(|n| json!({"message": n.message, "is_read": u8::from(n.is_read)}))
        .collect();
    ok(StatusCode::OK, Value::Array(list))
}

pub async fn mark_notifications_read(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> ApiResult {
    let mut store = state.store.write().await;
    let mut count = 0;
    for n in store
        .notifications
        .iter_mut()
        .filter(|n| n.employee_id == employee_id && !n.is_read)
    {
        n.is_read = true;
        count += 1;
    }
    ok(StatusCode::OK, json!({"message": format!("{count} notifications marked as read.")}))
}

// --- leave and comp-off ---

pub async fn submit_leave(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult {
    const MISSING: &str = "Missing required fields for leave application";
    let fields = require(&body, &["employee_id", "leave_type", "from_date"], MISSING)?;
    let leave_days = body
        .get("leave_days")
        .and_then(Value::as_i64)
        .ok_or_else(|| fail(StatusCode::BAD_REQUEST, MISSING))?;
    let (employee_id, leave_type) = (fields[0].to_string(), fields[1].to_string());

    let mut store = state.store.write().await;
    store.leaves.push(LeaveApplication {
        record_id: new_record_id(),
        employee_id: employee_id.clone(),
        leave_type: leave_type.clone(),
        from_date: fields[2].to_string(),
        to_date: text(&body, "to_date").map(str::to_owned),
        description: text(&body, "description").map(str::to_owned),
        status: "Pending".to_string(),
        comment: None,
        submitted_at: now_timestamp(),
        leave_days,
    });
    store.notify(
        &employee_id,
        format!("Your request for {leave_days} days of {leave_type} has been submitted."),
    );
    let message = format!("{leave_days} days of {leave_type} application submitted successfully!");
    ok(StatusCode::CREATED, json!({ "message": message }))
}

pub async fn leave_history(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> ApiResult {
    let store = state.store.read().await;
    let history: Vec<Value> = store
        .leaves
        .iter()
        .rev()
        .filter(|l| l.employee_id == employee_id)
        .map(|l| json!(l))
        .collect();
    ok(StatusCode::OK, Value::Array(history))
}

pub async fn leave_balance(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> ApiResult {
    let mut store = state.store.write().await;
    ok(StatusCode::OK, store.leave_balance(&employee_id))
}

pub async fn submit_compoff(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult {
    let fields = require(
        &body,
        &["employee_id", "work_date"],
        "Missing required fields for comp-off request",
    )?;
    let (employee_id, work_date) = (fields[0].to_string(), fields[1].to_string());

    let mut store = state.store.write().await;
    store.compoffs.push(CompoffRecord {
        record_id: new_record_id(),
        employee_id: employee_id.clone(),
        work_date: work_date.clone(),
        description: text(&body, "description").map(str::to_owned),
        status: "Pending".to_string(),
        comment: None,
        submitted_at: now_timestamp(),
    });
    store.notify(
        &employee_id,
        format!(
            "Your request to earn a comp-off for working on {work_date} \
             has been submitted for approval."
        ),
    );
    ok(StatusCode::CREATED, json!({"message": "Comp-off request submitted successfully!"}))
}

// --- admin ---

fn with_employee(mut record: Value, employee: Option<&Employee>, keys: &[&str]) -> Value {
    if let (Some(obj), Some(e)) = (record.as_object_mut(), employee) {
        obj.insert("email".into(), json!(e.email));
        for key in keys {
            obj.insert(key.to_string(), e.field(key));
        }
    }
    record
}

pub async fn admin_leave_requests(State(state): State<AppState>) -> ApiResult {
    let store = state.store.read().await;
    let keys = ["first_name", "last_name", "reporting_manager1", "reporting_manager2"];
    let pending: Vec<Value> = store
        .leaves
        .iter()
        .filter(|l| l.status == "Pending")
        .filter_map(|l| {
            let employee = store.employees.get(&l.employee_id)?;
            Some(with_employee(json!(l), Some(employee), &keys))
        })
        .collect();
    ok(StatusCode::OK, Value::Array(pending))
}

pub async fn leave_action(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult {
    let (action, comment) = decision(&body)?;

    let mut store = state.store.write().await;
    let leave = store
        .leaves
        .iter_mut()
        .find(|l| l.record_id == record_id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Leave request not found"))?;
    leave.status = action.to_string();
    leave.comment = comment.clone();
    let mut message = format!(
        "Your request for {} days of {} has been {}.",
        leave.leave_days,
        leave.leave_type,
        action.to_lowercase()
    );
    if let Some(comment) = comment {
        message.push_str(&format!(" Admin comment: {comment}"));
    }
    let employee_id = leave.employee_id.clone();
    store.notify(&employee_id, message);
    ok(StatusCode::OK, json!({"message": "Leave request processed successfully!"}))
}

pub async fn admin_compoff_requests(State(state): State<AppState>) -> ApiResult {
    let store = state.store.read().await;
    let keys = ["first_name", "last_name"];
    let pending: Vec<Value> = store
        .compoffs
        .iter()
        .filter(|c| c.status == "Pending")
        .filter_map(|c| {
            let employee = store.employees.get(&c.employee_id)?;
            Some(with_employee(json!(c), Some(employee), &keys))
        })
        .collect();
    ok(StatusCode::OK, Value::Array(pending))
}

pub async fn compoff_action(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult {
    let (action, comment) = decision(&body)?;

    let mut store = state.store.write().await;
    let request = store
        .compoffs
        .iter_mut()
        .find(|c| c.record_id == record_id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Comp-off request not found"))?;
    request.status = action.to_string();
    request.comment = comment.clone();
    let (employee_id, work_date) = (request.employee_id.clone(), request.work_date.clone());

    let mut message = if action == "Approved" {
        if let Some(compoff) = store
            .balances
            .get_mut(&employee_id)
            .and_then(|b| b.get_mut("compoff"))
        {
            *compoff += 1;
        }
        format!(
            "Your request to earn a comp-off for working on {work_date} has been approved. \
             Your balance has been updated."
        )
    } else {
        format!("Your request to earn a comp-off for working on {work_date} has been rejected.")
    };
    if let Some(comment) = comment {
        message.push_str(&format!(" Admin comment: {comment}"));
    }
    store.notify(&employee_id, message);
    ok(StatusCode::OK, json!({"message": "Comp-off request processed successfully!"}))
}

pub async fn reset_employee_password(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult {
    let fields = require(&body, &["email", "new_password"], "Email and new password are required")?;
    let (email, new_password) = (fields[0], fields[1]);

    let mut store = state.store.write().await;
    let employee = store
        .employee_by_email_mut(email)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Employee not found with that email"))?;
    employee.password = new_password.to_string();
    employee.force_password_change = true;
    let id = employee.id.clone();
    store.notify(&id, "Your password was reset by an administrator.");
    ok(
        StatusCode::OK,
        json!({"message": format!("Password for {email} has been reset successfully.")}),
    )
}

pub async fn dashboard_stats(State(state): State<AppState>) -> ApiResult {
    let store = state.store.read().await;
    let pending_leaves = store.leaves.iter().filter(|l| l.status == "Pending").count();
    let pending_compoffs = store.compoffs.iter().filter(|c| c.status == "Pending").count();
    ok(
        StatusCode::OK,
        json!({
            "employee_count": store.employees.len(),
            "pending_leaves": pending_leaves,
            "pending_compoffs": pending_compoffs,
        }),
    )
}

fn attendance_json(record: &AttendanceRecord, employee: Option<&Employee>) -> Value {
    let name = employee.map(|e| {
        format!(
            "{} {}",
            e.field("first_name").as_str().unwrap_or_default(),
            e.field("last_name").as_str().unwrap_or_default()
        )
    });
    let mut value = json!(record);
    value["employee_name"] = json!(name);
    value
}

pub async fn admin_attendance_records(State(state): State<AppState>) -> ApiResult {
    let store = state.store.read().await;
    let records: Vec<Value> = store
        .attendance
        .iter()
        .rev()
        .map(|r| attendance_json(r, store.employees.get(&r.employee_id)))
        .collect();
    ok(StatusCode::OK, Value::Array(records))
}

// --- attendance ---

pub async fn attendance_login(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult {
    let fields = require(
        &body,
        &["employee_id", "date", "work_location", "employee_name"],
        "Missing required attendance login fields",
    )?;
    let record = AttendanceRecord {
        record_id: new_record_id(),
        employee_id: fields[0].to_string(),
        date: fields[1].to_string(),
        login_time: now_time(),
        work_location: fields[2].to_string(),
        logout_time: None,
    };
    let mut reply = json!(record);
    reply["employee_name"] = json!(fields[3]);

    state.store.write().await.attendance.push(record);
    ok(
        StatusCode::CREATED,
        json!({"message": "Login recorded successfully!", "record": reply}),
    )
}

pub async fn attendance_logout(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> ApiResult {
    let mut store = state.store.write().await;
    let record = store
        .attendance
        .iter_mut()
        .find(|r| r.record_id == record_id && r.logout_time.is_none())
        .ok_or_else(|| {
            fail(StatusCode::NOT_FOUND, "Attendance record not found or already logged out")
        })?;
    let logout_time = now_time();
    record.logout_time = Some(logout_time.clone());
    ok(
        StatusCode::OK,
        json!({"message": "Logout recorded successfully!", "logout_time": logout_time}),
    )
}

pub async fn attendance_records(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> ApiResult {
    let store = state.store.read().await;
    let employee = store.employees.get(&employee_id);
    let records: Vec<Value> = store
        .attendance
        .iter()
        .rev()
        .filter(|r| r.employee_id == employee_id)
        .map(|r| attendance_json(r, employee))
        .collect();
    ok(StatusCode::OK, Value::Array(records))
}
