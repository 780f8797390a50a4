use rosterd::ipc::{self, AppState, Request};
use rosterd::store::MemoryStore;
use serde_json::json;

fn rejecting_state() -> AppState {
    let mut store = MemoryStore::new();
    store.set_reject_writes(true);
    AppState::new(Box::new(store))
}

fn request(
    state: &mut AppState,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let req: Request = serde_json::from_value(json!({
        "id": id,
        "method": method,
        "params": params,
    }))
    .expect("build request");
    let resp = ipc::handle_request(state, req);
    assert_eq!(resp.get("id").and_then(|v| v.as_str()), Some(id));
    resp
}

fn error_code(resp: &serde_json::Value) -> &str {
    assert_eq!(resp.get("ok").and_then(|v| v.as_bool()), Some(false));
    resp.pointer("/error/code")
        .and_then(|v| v.as_str())
        .expect("error code")
}

#[test]
fn rejected_writes_surface_per_operation_codes() {
    let mut state = rejecting_state();

    let resp = request(
        &mut state,
        "1",
        "students.create",
        json!({ "name": "Alice", "age": "21", "course": "CS" }),
    );
    assert_eq!(error_code(&resp), "db_insert_failed");

    let resp = request(
        &mut state,
        "2",
        "students.update",
        json!({ "studentId": "ffffffffffffffffffffffff", "name": "Alice", "age": "21", "course": "CS" }),
    );
    assert_eq!(error_code(&resp), "db_update_failed");

    let resp = request(
        &mut state,
        "3",
        "students.delete",
        json!({ "studentId": "ffffffffffffffffffffffff", "confirm": true }),
    );
    assert_eq!(error_code(&resp), "db_delete_failed");
}

#[test]
fn failed_writes_leave_the_collection_readable_and_unchanged() {
    let mut state = rejecting_state();

    let resp = request(
        &mut state,
        "1",
        "students.create",
        json!({ "name": "Alice", "age": "21", "course": "CS" }),
    );
    assert_eq!(error_code(&resp), "db_insert_failed");

    // Reads keep working and show nothing was written.
    let listed = request(&mut state, "2", "students.list", json!({}));
    assert_eq!(listed.get("ok").and_then(|v| v.as_bool()), Some(true));
    let students = listed
        .pointer("/result/students")
        .and_then(|v| v.as_array())
        .expect("students array");
    assert!(students.is_empty());
}

#[test]
fn validation_runs_before_the_store_is_touched() {
    let mut state = rejecting_state();

    // Were the store consulted first, this would be db_insert_failed.
    let resp = request(
        &mut state,
        "1",
        "students.create",
        json!({ "name": "Alice", "age": "twenty", "course": "CS" }),
    );
    assert_eq!(error_code(&resp), "invalid_input");
}

#[test]
fn declined_delete_never_reaches_a_failing_store() {
    let mut state = rejecting_state();

    let resp = request(
        &mut state,
        "1",
        "students.delete",
        json!({ "studentId": "ffffffffffffffffffffffff", "confirm": false }),
    );
    assert_eq!(resp.get("ok").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(
        resp.pointer("/result/deleted").and_then(|v| v.as_bool()),
        Some(false)
    );
}
