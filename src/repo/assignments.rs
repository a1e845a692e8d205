use super::{merge_patch, next_id, HasId, RepoError};
use crate::latency::Latency;
use crate::model::{Assignment, NewAssignment, Status};
use crate::store::{Store, StoreError};
use chrono::{Duration, Utc};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

pub const ASSIGNMENTS_KEY: &str = "scholar_hub_assignments";
const DEFAULT_ASSIGNMENTS: &str = include_str!("../../seed/assignments.json");

impl HasId for Assignment {
    fn record_id(&self) -> i64 {
        self.id
    }
}

pub struct AssignmentRepo {
    store: Arc<Store>,
    latency: Latency,
}

impl AssignmentRepo {
    pub fn new(store: Arc<Store>, latency: Latency) -> Self {
        Self { store, latency }
    }

    pub fn seed_defaults(&self) -> Result<(), StoreError> {
        self.store.seed_if_absent(ASSIGNMENTS_KEY, DEFAULT_ASSIGNMENTS)
    }

    pub async fn get_all(&self) -> Result<Vec<Assignment>, RepoError> {
        self.latency.before_read().await;
        Ok(self.store.read(ASSIGNMENTS_KEY)?)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Assignment>, RepoError> {
        self.latency.before_read().await;
        let rows: Vec<Assignment> = self.store.read(ASSIGNMENTS_KEY)?;
        Ok(rows.into_iter().find(|a| a.id == id))
    }

    pub async fn get_by_course(&self, course_id: i64) -> Result<Vec<Assignment>, RepoError> {
        self.latency.before_read().await;
        let rows: Vec<Assignment> = self.store.read(ASSIGNMENTS_KEY)?;
        Ok(rows.into_iter().filter(|a| a.course_id == course_id).collect())
    }

    /// Pending assignments due inside the next `days` days. The window
    /// starts at now inclusive: an already-overdue pending assignment is
    /// not "upcoming", it is the caller's overdue state.
    pub async fn get_upcoming(&self, days: i64) -> Result<Vec<Assignment>, RepoError> {
        self.latency.before_read().await;
        let rows: Vec<Assignment> = self.store.read(ASSIGNMENTS_KEY)?;
        let now = Utc::now();
        let horizon = now + Duration::days(days);
        Ok(rows
            .into_iter()
            .filter(|a| a.status != Status::Completed && a.due_date >= now && a.due_date <= horizon)
            .collect())
    }

    pub async fn create(&self, new: NewAssignment) -> Result<Assignment, RepoError> {
        self.latency.before_write().await;
        let mut rows: Vec<Assignment> = self.store.read(ASSIGNMENTS_KEY)?;
        let assignment = Assignment {
            id: next_id(&rows),
            course_id: new.course_id,
            title: new.title,
            description: new.description,
            due_date: new.due_date,
            priority: new.priority,
            status: new.status,
            max_score: new.max_score,
            weight: new.weight,
            created_at: Utc::now(),
        };
        rows.push(assignment.clone());
        self.store.write(ASSIGNMENTS_KEY, &rows)?;
        debug!(id = assignment.id, course_id = assignment.course_id, "created assignment");
        Ok(assignment)
    }

    pub async fn update(
        &self,
        id: i64,
        patch: &Map<String, Value>,
    ) -> Result<Option<Assignment>, RepoError> {
        self.latency.before_write().await;
        let mut rows: Vec<Assignment> = self.store.read(ASSIGNMENTS_KEY)?;
        let Some(slot) = rows.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        let merged = merge_patch(slot, patch)?;
        *slot = merged.clone();
        self.store.write(ASSIGNMENTS_KEY, &rows)?;
        Ok(Some(merged))
    }

    pub async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        self.latency.before_write().await;
        let mut rows: Vec<Assignment> = self.store.read(ASSIGNMENTS_KEY)?;
        rows.retain(|a| a.id != id);
        self.store.write(ASSIGNMENTS_KEY, &rows)?;
        Ok(true)
    }

    /// Atomic flip between pending and completed. Unknown id is a no-op
    /// reported as `None`.
    pub async fn toggle_complete(&self, id: i64) -> Result<Option<Assignment>, RepoError> {
        self.latency.before_toggle().await;
        let mut rows: Vec<Assignment> = self.store.read(ASSIGNMENTS_KEY)?;
        let Some(slot) = rows.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        slot.status = slot.status.toggled();
        let toggled = slot.clone();
        self.store.write(ASSIGNMENTS_KEY, &rows)?;
        Ok(Some(toggled))
    }
}
