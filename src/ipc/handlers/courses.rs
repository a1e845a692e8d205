use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{coerce_id, fields_object, repo_err};
use crate::ipc::types::{AppState, Request};
use crate::model::NewCourse;
use crate::repo::delete_course;
use serde_json::json;

async fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(repos) = state.repos.as_ref() else {
        return err(&req.id, "no_workspace", "open a workspace first");
    };
    match repos.courses.get_all().await {
        Ok(courses) => ok(&req.id, json!({ "courses": courses })),
        Err(e) => repo_err(&req.id, e),
    }
}

async fn handle_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(repos) = state.repos.as_ref() else {
        return err(&req.id, "no_workspace", "open a workspace first");
    };
    let Some(id) = coerce_id(req.params.get("id")) else {
        return ok(&req.id, json!({ "course": null }));
    };
    match repos.courses.get_by_id(id).await {
        Ok(course) => ok(&req.id, json!({ "course": course })),
        Err(e) => repo_err(&req.id, e),
    }
}

async fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(repos) = state.repos.as_ref() else {
        return err(&req.id, "no_workspace", "open a workspace first");
    };
    let Some(fields) = fields_object(&req.params) else {
        return err(&req.id, "bad_params", "missing params.fields");
    };
    let new: NewCourse = match serde_json::from_value(json!(fields)) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.to_string()),
    };
    match repos.courses.create(new).await {
        Ok(course) => ok(&req.id, json!({ "course": course })),
        Err(e) => repo_err(&req.id, e),
    }
}

async fn handle_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(repos) = state.repos.as_ref() else {
        return err(&req.id, "no_workspace", "open a workspace first");
    };
    let Some(fields) = fields_object(&req.params) else {
        return err(&req.id, "bad_params", "missing params.fields");
    };
    let Some(id) = coerce_id(req.params.get("id")) else {
        return ok(&req.id, json!({ "course": null }));
    };
    match repos.courses.update(id, fields).await {
        Ok(course) => ok(&req.id, json!({ "course": course })),
        Err(e) => repo_err(&req.id, e),
    }
}

/// Deleting a course cascades to its assignments and grades. Partial
/// failure is fail-forward: the course is already gone, the error names
/// the stage that stopped.
async fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(repos) = state.repos.as_ref() else {
        return err(&req.id, "no_workspace", "open a workspace first");
    };
    let Some(id) = coerce_id(req.params.get("id")) else {
        // An unparsable id matches nothing; deletion of nothing succeeds.
        return ok(&req.id, json!({ "deleted": true }));
    };
    match delete_course(&repos.courses, &repos.assignments, &repos.grades, id).await {
        Ok(deleted) => ok(&req.id, json!({ "deleted": deleted })),
        Err(e) => err(&req.id, "cascade_failed", e.to_string()),
    }
}

pub async fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "courses.list" => Some(handle_list(state, req).await),
        "courses.get" => Some(handle_get(state, req).await),
        "courses.create" => Some(handle_create(state, req).await),
        "courses.update" => Some(handle_update(state, req).await),
        "courses.delete" => Some(handle_delete(state, req).await),
        _ => None,
    }
}
