//! Typed CRUD repositories over the document store, one per entity
//! collection. Every operation awaits the latency profile first, then
//! does a full read-modify-write of its collection and returns detached
//! copies. Absence is `None`/`true`, never an error; only storage faults
//! and unmergeable patches error out.

mod assignments;
mod cascade;
mod courses;
mod grades;

pub use assignments::AssignmentRepo;
pub use cascade::{delete_course, CascadeError};
pub use courses::CourseRepo;
pub use grades::GradeRepo;

use crate::store::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A shallow-merge update produced a value that no longer fits the
    /// record shape (wrong type under a known field). Pre-repository
    /// validation is supposed to catch this; surfacing it keeps a bad
    /// patch from ever being persisted.
    #[error("patch does not fit the record shape: {0}")]
    InvalidPatch(serde_json::Error),
}

pub(crate) trait HasId {
    fn record_id(&self) -> i64;
}

/// Next id for a collection: `max(existing) + 1`, or 1 when empty. The
/// counter is derived from current contents, not stored, so deleting
/// anything below the max never shifts it, but deleting the max record
/// frees its id for the next create. Two creates racing over the same
/// snapshot can both observe the same max; accepted under the
/// single-user model.
pub(crate) fn next_id<T: HasId>(rows: &[T]) -> i64 {
    rows.iter().map(HasId::record_id).max().unwrap_or(0) + 1
}

/// Shallow-merge `patch` over `record`: a field present in the patch
/// overwrites (explicit null included), a field absent is preserved.
pub(crate) fn merge_patch<T>(record: &T, patch: &Map<String, Value>) -> Result<T, RepoError>
where
    T: Serialize + DeserializeOwned,
{
    let mut doc = serde_json::to_value(record).map_err(RepoError::InvalidPatch)?;
    if let Value::Object(obj) = &mut doc {
        for (k, v) in patch {
            obj.insert(k.clone(), v.clone());
        }
    }
    serde_json::from_value(doc).map_err(RepoError::InvalidPatch)
}
