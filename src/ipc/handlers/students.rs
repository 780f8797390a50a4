use crate::controller::{DeleteOutcome, FormError};
use crate::form::FormInput;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::store::{StoreError, StudentRecord};
use serde_json::json;

fn row_json(record: &StudentRecord) -> serde_json::Value {
    json!({
        "id": record.id.to_hex(),
        "name": record.name,
        "age": record.age,
        "course": record.course
    })
}

fn roster_json(records: &[StudentRecord]) -> serde_json::Value {
    serde_json::Value::Array(records.iter().map(row_json).collect())
}

/// Pulls the three form fields out of params. They arrive as strings
/// exactly as typed in the entry widgets; validation happens downstream.
fn form_params(req: &Request) -> Result<FormInput, serde_json::Value> {
    let field = |key: &str| -> Result<String, serde_json::Value> {
        match req.params.get(key).and_then(|v| v.as_str()) {
            Some(v) => Ok(v.to_string()),
            None => Err(err(&req.id, "bad_params", format!("missing {key}"), None)),
        }
    };
    Ok(FormInput {
        name: field("name")?,
        age: field("age")?,
        course: field("course")?,
    })
}

fn student_id_param(req: &Request) -> Result<String, serde_json::Value> {
    match req.params.get("studentId").and_then(|v| v.as_str()) {
        Some(v) => Ok(v.to_string()),
        None => Err(err(&req.id, "bad_params", "missing studentId", None)),
    }
}

/// Maps controller failures onto the wire codes: validation problems are
/// `invalid_input` (the shell shows a warning dialog and aborts the
/// operation), a malformed identifier is the caller's fault, everything
/// else is the store failing mid-operation.
fn form_err(req_id: &str, db_code: &str, e: FormError) -> serde_json::Value {
    match e {
        FormError::Invalid(v) => err(req_id, "invalid_input", v.to_string(), None),
        FormError::Store(s @ StoreError::BadId(_)) => {
            err(req_id, "bad_params", s.to_string(), None)
        }
        FormError::Store(s) => err(req_id, db_code, s.to_string(), None),
    }
}

fn handle_students_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    match state.form.roster() {
        Ok(records) => ok(&req.id, json!({ "students": roster_json(&records) })),
        Err(e) => form_err(&req.id, "db_query_failed", e),
    }
}

fn handle_students_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let input = match form_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match state.form.insert(&input) {
        Ok(done) => ok(
            &req.id,
            json!({
                "studentId": done.id,
                "students": roster_json(&done.roster)
            }),
        ),
        Err(e) => form_err(&req.id, "db_insert_failed", e),
    }
}

fn handle_students_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student_id = match student_id_param(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match state.form.lookup(&student_id) {
        Ok(Some(record)) => ok(&req.id, json!({ "student": row_json(&record) })),
        Ok(None) => err(&req.id, "not_found", "student not found", None),
        Err(e) => form_err(&req.id, "db_query_failed", e),
    }
}

fn handle_students_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student_id = match student_id_param(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let input = match form_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match state.form.update(&student_id, &input) {
        Ok(done) => ok(
            &req.id,
            json!({
                "updated": done.matched,
                "students": roster_json(&done.roster)
            }),
        ),
        Err(e) => form_err(&req.id, "db_update_failed", e),
    }
}

fn handle_students_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student_id = match student_id_param(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let confirm = req
        .params
        .get("confirm")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    match state.form.delete(&student_id, confirm) {
        Ok(DeleteOutcome::Declined) => {
            ok(&req.id, json!({ "confirmed": false, "deleted": false }))
        }
        Ok(DeleteOutcome::Deleted { removed, roster }) => ok(
            &req.id,
            json!({
                "confirmed": true,
                "deleted": removed,
                "students": roster_json(&roster)
            }),
        ),
        Err(e) => form_err(&req.id, "db_delete_failed", e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_students_list(state, req)),
        "students.create" => Some(handle_students_create(state, req)),
        "students.get" => Some(handle_students_get(state, req)),
        "students.update" => Some(handle_students_update(state, req)),
        "students.delete" => Some(handle_students_delete(state, req)),
        _ => None,
    }
}
