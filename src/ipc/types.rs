use crate::latency::Latency;
use crate::repo::{AssignmentRepo, CourseRepo, GradeRepo};
use crate::store::{Store, StoreError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// The three entity repositories over one shared workspace store.
pub struct Repos {
    pub courses: CourseRepo,
    pub assignments: AssignmentRepo,
    pub grades: GradeRepo,
}

impl Repos {
    /// Open the workspace store and seed each collection's bundled
    /// defaults exactly once. A workspace that already holds data is
    /// left as-is.
    pub fn open(workspace: &Path, latency: Latency) -> Result<Self, StoreError> {
        let store = Arc::new(Store::open(workspace)?);
        let repos = Self {
            courses: CourseRepo::new(store.clone(), latency),
            assignments: AssignmentRepo::new(store.clone(), latency),
            grades: GradeRepo::new(store, latency),
        };
        repos.courses.seed_defaults()?;
        repos.assignments.seed_defaults()?;
        repos.grades.seed_defaults()?;
        Ok(repos)
    }
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub repos: Option<Repos>,
    pub latency: Latency,
}

impl AppState {
    pub fn new(latency: Latency) -> Self {
        Self {
            workspace: None,
            repos: None,
            latency,
        }
    }
}
