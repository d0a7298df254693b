//! Check builders, the calendar and response classification against JSON
//! vectors stored in `test-vectors/`.
//!
//! Request bodies are compared as parsed JSON, not raw strings, so field
//! ordering never causes false negatives.

use hrms_core::pipeline::classify;
use hrms_core::types::{CompoffRequest, Decision, LeaveRequest, ProfileUpdate, RegisterEmployee};
use hrms_core::{
    count_working_days_iso, ApiError, HolidaySet, HrmsClient, HttpMethod, HttpResponse,
    RequestDescriptor,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:5000";

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn holidays_of(value: &Value) -> HolidaySet {
    match value {
        Value::String(s) if s == "default" => HolidaySet::default(),
        Value::Array(dates) => {
            HolidaySet::from_iso(dates.iter().map(|d| d.as_str().unwrap())).unwrap()
        }
        other => panic!("bad holidays entry: {other}"),
    }
}

fn s<'a>(input: &'a Value, key: &str) -> &'a str {
    input[key].as_str().unwrap_or_else(|| panic!("missing {key}"))
}

fn from<T: serde::de::DeserializeOwned>(input: &Value) -> T {
    serde_json::from_value(input.clone()).unwrap()
}

/// Run the builder a vector names with the vector's input.
fn build(client: &HrmsClient, endpoint: &str, input: &Value) -> RequestDescriptor {
    let holidays = HolidaySet::default();
    match endpoint {
        "login" => client
            .build_login(s(input, "username"), s(input, "password"), from(&input["user_type"]))
            .unwrap(),
        "register" => client.build_register(&from::<RegisterEmployee>(input)).unwrap(),
        "submit_leave" => {
            let request = LeaveRequest::new(
                s(input, "employee_id"),
                s(input, "leave_type"),
                from(&input["from_date"]),
                from(&input["to_date"]),
                s(input, "description"),
                &holidays,
            );
            client.build_submit_leave(&request).unwrap()
        }
        "submit_compoff" => {
            let request = CompoffRequest::new(
                s(input, "employee_id"),
                from(&input["work_date"]),
                s(input, "description"),
                &holidays,
            )
            .unwrap();
            client.build_submit_compoff(&request).unwrap()
        }
        "leave_action" => client
            .build_leave_action(
                s(input, "record_id"),
                from::<Decision>(&input["action"]),
                s(input, "comment"),
            )
            .unwrap(),
        "change_password" => client
            .build_change_password(
                s(input, "employee_id"),
                s(input, "old_password"),
                s(input, "new_password"),
            )
            .unwrap(),
        "update_profile" => client
            .build_update_profile(s(input, "employee_id"), &from::<ProfileUpdate>(input))
            .unwrap(),
        "leave_balance" => client.build_leave_balance(s(input, "employee_id")),
        "attendance_logout" => client.build_attendance_logout(s(input, "record_id")),
        other => panic!("no builder for {other}"),
    }
}

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let client = HrmsClient::new(BASE_URL);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected_request"];
        let descriptor = build(&client, s(case, "endpoint"), &case["input"]);
        let req = &descriptor.request;

        assert_eq!(req.method, parse_method(s(expected, "method")), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", s(expected, "path")), "{name}: url");

        let expected_headers: Vec<(String, String)> = expected["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| (h[0].as_str().unwrap().to_string(), h[1].as_str().unwrap().to_string()))
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        let body = req
            .body
            .as_deref()
            .map(|b| serde_json::from_str::<Value>(b).unwrap())
            .unwrap_or(Value::Null);
        assert_eq!(body, expected["body"], "{name}: body");
        assert_eq!(descriptor.retries, 3, "{name}: retries");
    }
}

#[test]
fn working_day_test_vectors() {
    let raw = include_str!("../../test-vectors/working_days.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let holidays = holidays_of(&case["holidays"]);
        let count = count_working_days_iso(s(case, "start"), s(case, "end"), &holidays).unwrap();
        assert_eq!(u64::from(count), case["expected"].as_u64().unwrap(), "{name}");
    }
}

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse {
            status: case["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: s(case, "body").to_string(),
        };
        let expected = &case["expected"];
        let result = classify(response);

        if let Some(ok) = expected.get("ok") {
            assert_eq!(result.as_ref().ok(), Some(ok), "{name}: {result:?}");
        } else if let Some(err) = expected.get("error") {
            match result {
                Err(ApiError::Http { status, message }) => {
                    let expected_status = err["status"].as_u64().unwrap();
                    assert_eq!(u64::from(status), expected_status, "{name}: status");
                    assert_eq!(message, s(err, "message"), "{name}: message");
                }
                other => panic!("{name}: expected an HTTP error, got {other:?}"),
            }
        } else {
            assert!(
                matches!(result, Err(ApiError::DeserializationError(_))),
                "{name}: {result:?}"
            );
        }
    }
}
