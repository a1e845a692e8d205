use crate::calc::{calculate_course_grade, letter_grade};
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{coerce_id, fields_object, repo_err};
use crate::ipc::types::{AppState, Request};
use crate::model::NewGrade;
use serde_json::{json, Map, Value};

/// Entry validation for grade numerics, applied before anything reaches
/// the repository: score/maxScore/weight must be finite numbers when
/// present, and maxScore must stay strictly positive so the derivation
/// never divides by zero.
fn check_numeric_fields(fields: &Map<String, Value>) -> Result<(), String> {
    for key in ["score", "maxScore", "weight"] {
        let Some(v) = fields.get(key) else {
            continue;
        };
        let Some(n) = v.as_f64() else {
            return Err(format!("{key} must be numeric"));
        };
        if !n.is_finite() {
            return Err(format!("{key} must be finite"));
        }
        if key == "maxScore" && n <= 0.0 {
            return Err("maxScore must be greater than zero".to_string());
        }
    }
    Ok(())
}

async fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(repos) = state.repos.as_ref() else {
        return err(&req.id, "no_workspace", "open a workspace first");
    };
    match repos.grades.get_all().await {
        Ok(grades) => ok(&req.id, json!({ "grades": grades })),
        Err(e) => repo_err(&req.id, e),
    }
}

async fn handle_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(repos) = state.repos.as_ref() else {
        return err(&req.id, "no_workspace", "open a workspace first");
    };
    let Some(id) = coerce_id(req.params.get("id")) else {
        return ok(&req.id, json!({ "grade": null }));
    };
    match repos.grades.get_by_id(id).await {
        Ok(grade) => ok(&req.id, json!({ "grade": grade })),
        Err(e) => repo_err(&req.id, e),
    }
}

async fn handle_list_by_course(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(repos) = state.repos.as_ref() else {
        return err(&req.id, "no_workspace", "open a workspace first");
    };
    let Some(course_id) = coerce_id(req.params.get("courseId")) else {
        return ok(&req.id, json!({ "grades": [] }));
    };
    match repos.grades.get_by_course(course_id).await {
        Ok(grades) => ok(&req.id, json!({ "grades": grades })),
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
    if let Err(msg) = check_numeric_fields(fields) {
        return err(&req.id, "bad_params", msg);
    }
    let new: NewGrade = match serde_json::from_value(json!(fields)) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.to_string()),
    };
    match repos.grades.create(new).await {
        Ok(grade) => ok(&req.id, json!({ "grade": grade })),
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
    if let Err(msg) = check_numeric_fields(fields) {
        return err(&req.id, "bad_params", msg);
    }
    let Some(id) = coerce_id(req.params.get("id")) else {
        return ok(&req.id, json!({ "grade": null }));
    };
    match repos.grades.update(id, fields).await {
        Ok(grade) => ok(&req.id, json!({ "grade": grade })),
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
    match repos.grades.delete(id).await {
        Ok(deleted) => ok(&req.id, json!({ "deleted": deleted })),
        Err(e) => repo_err(&req.id, e),
    }
}

/// Derived course performance: the weighted percentage over the course's
/// grade entries plus its display letter.
async fn handle_course_summary(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(repos) = state.repos.as_ref() else {
        return err(&req.id, "no_workspace", "open a workspace first");
    };
    let Some(course_id) = coerce_id(req.params.get("courseId")) else {
        // Matches nothing: same shape as a course with no grades.
        return ok(
            &req.id,
            json!({
                "courseId": null,
                "percent": 0.0,
                "letter": letter_grade(0.0),
                "gradeCount": 0
            }),
        );
    };
    match repos.grades.get_by_course(course_id).await {
        Ok(grades) => {
            let percent = calculate_course_grade(&grades);
            ok(
                &req.id,
                json!({
                    "courseId": course_id,
                    "percent": percent,
                    "letter": letter_grade(percent),
                    "gradeCount": grades.len()
                }),
            )
        }
        Err(e) => repo_err(&req.id, e),
    }
}

pub async fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grades.list" => Some(handle_list(state, req).await),
        "grades.get" => Some(handle_get(state, req).await),
        "grades.listByCourse" => Some(handle_list_by_course(state, req).await),
        "grades.create" => Some(handle_create(state, req).await),
        "grades.update" => Some(handle_update(state, req).await),
        "grades.delete" => Some(handle_delete(state, req).await),
        "grades.courseSummary" => Some(handle_course_summary(state, req).await),
        _ => None,
    }
}
