use crate::ipc::error::err;
use crate::repo::RepoError;
use serde_json::{Map, Value};

/// Coerce an id param to an integer. Numbers truncate, numeric strings
/// parse; anything else is `None`, which handlers treat as not-found
/// rather than as an error.
pub fn coerce_id(v: Option<&Value>) -> Option<i64> {
    match v? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// The `fields` object of a create/update request.
pub fn fields_object(params: &Value) -> Option<&Map<String, Value>> {
    params.get("fields").and_then(|v| v.as_object())
}

/// Map repository failures onto the response taxonomy: an unmergeable
/// patch is the caller's fault, everything else is the storage medium.
pub fn repo_err(id: &str, e: RepoError) -> Value {
    match e {
        RepoError::InvalidPatch(source) => err(id, "bad_params", source.to_string()),
        RepoError::Store(source) => err(id, "storage_failed", source.to_string()),
    }
}
