use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{coerce_id, fields_object, repo_err};
use crate::ipc::types::{AppState, Request};
use crate::model::NewAssignment;
use serde_json::json;

async fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(repos) = state.repos.as_ref() else {
        return err(&req.id, "no_workspace", "open a workspace first");
    };
    match repos.assignments.get_all().await {
        Ok(assignments) => ok(&req.id, json!({ "assignments": assignments })),
        Err(e) => repo_err(&req.id, e),
    }
}

async fn handle_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(repos) = state.repos.as_ref() else {
        return err(&req.id, "no_workspace", "open a workspace first");
    };
    let Some(id) = coerce_id(req.params.get("id")) else {
        return ok(&req.id, json!({ "assignment": null }));
    };
    match repos.assignments.get_by_id(id).await {
        Ok(assignment) => ok(&req.id, json!({ "assignment": assignment })),
        Err(e) => repo_err(&req.id, e),
    }
}

async fn handle_list_by_course(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(repos) = state.repos.as_ref() else {
        return err(&req.id, "no_workspace", "open a workspace first");
    };
    let Some(course_id) = coerce_id(req.params.get("courseId")) else {
        return ok(&req.id, json!({ "assignments": [] }));
    };
    match repos.assignments.get_by_course(course_id).await {
        Ok(assignments) => ok(&req.id, json!({ "assignments": assignments })),
        Err(e) => repo_err(&req.id, e),
    }
}

async fn handle_upcoming(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(repos) = state.repos.as_ref() else {
        return err(&req.id, "no_workspace", "open a workspace first");
    };
    // Negative days invert the window, which simply matches nothing.
    let days = req.params.get("days").and_then(|v| v.as_i64()).unwrap_or(7);
    match repos.assignments.get_upcoming(days).await {
        Ok(assignments) => ok(&req.id, json!({ "assignments": assignments })),
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
    let new: NewAssignment = match serde_json::from_value(json!(fields)) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.to_string()),
    };
    match repos.assignments.create(new).await {
        Ok(assignment) => ok(&req.id, json!({ "assignment": assignment })),
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
        return ok(&req.id, json!({ "assignment": null }));
    };
    match repos.assignments.update(id, fields).await {
        Ok(assignment) => ok(&req.id, json!({ "assignment": assignment })),
        Err(e) => repo_err(&req.id, e),
    }
}

async fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(repos) = state.repos.as_ref() else {
        return err(&req.id, "no_workspace", "open a workspace first");
    };
    let Some(id) = coerce_id(req.params.get("id")) else {
        return ok(&req.id, json!({ "deleted": true }));
    };
    match repos.assignments.delete(id).await {
        Ok(deleted) => ok(&req.id, json!({ "deleted": deleted })),
        Err(e) => repo_err(&req.id, e),
    }
}

async fn handle_toggle_complete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(repos) = state.repos.as_ref() else {
        return err(&req.id, "no_workspace", "open a workspace first");
    };
    let Some(id) = coerce_id(req.params.get("id")) else {
        return ok(&req.id, json!({ "assignment": null }));
    };
    match repos.assignments.toggle_complete(id).await {
        Ok(assignment) => ok(&req.id, json!({ "assignment": assignment })),
        Err(e) => repo_err(&req.id, e),
    }
}

pub async fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "assignments.list" => Some(handle_list(state, req).await),
        "assignments.get" => Some(handle_get(state, req).await),
        "assignments.listByCourse" => Some(handle_list_by_course(state, req).await),
        "assignments.upcoming" => Some(handle_upcoming(state, req).await),
        "assignments.create" => Some(handle_create(state, req).await),
        "assignments.update" => Some(handle_update(state, req).await),
        "assignments.delete" => Some(handle_delete(state, req).await),
        "assignments.toggleComplete" => Some(handle_toggle_complete(state, req).await),
        _ => None,
    }
}
