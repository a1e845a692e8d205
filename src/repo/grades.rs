use super::{merge_patch, next_id, HasId, RepoError};
use crate::latency::Latency;
use crate::model::{Grade, NewGrade};
use crate::store::{Store, StoreError};
use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

pub const GRADES_KEY: &str = "scholar_hub_grades";
const DEFAULT_GRADES: &str = include_str!("../../seed/grades.json");

impl HasId for Grade {
    fn record_id(&self) -> i64 {
        self.id
    }
}

pub struct GradeRepo {
    store: Arc<Store>,
    latency: Latency,
}

impl GradeRepo {
    pub fn new(store: Arc<Store>, latency: Latency) -> Self {
        Self { store, latency }
    }

    pub fn seed_defaults(&self) -> Result<(), StoreError> {
        self.store.seed_if_absent(GRADES_KEY, DEFAULT_GRADES)
    }

    pub async fn get_all(&self) -> Result<Vec<Grade>, RepoError> {
        self.latency.before_read().await;
        Ok(self.store.read(GRADES_KEY)?)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Grade>, RepoError> {
        self.latency.before_read().await;
        let rows: Vec<Grade> = self.store.read(GRADES_KEY)?;
        Ok(rows.into_iter().find(|g| g.id == id))
    }

    pub async fn get_by_course(&self, course_id: i64) -> Result<Vec<Grade>, RepoError> {
        self.latency.before_read().await;
        let rows: Vec<Grade> = self.store.read(GRADES_KEY)?;
        Ok(rows.into_iter().filter(|g| g.course_id == course_id).collect())
    }

    pub async fn create(&self, new: NewGrade) -> Result<Grade, RepoError> {
        self.latency.before_write().await;
        let mut rows: Vec<Grade> = self.store.read(GRADES_KEY)?;
        let grade = Grade {
            id: next_id(&rows),
            course_id: new.course_id,
            assignment_id: new.assignment_id,
            score: new.score,
            max_score: new.max_score,
            weight: new.weight,
            category: new.category,
            date: Utc::now(),
        };
        rows.push(grade.clone());
        self.store.write(GRADES_KEY, &rows)?;
        debug!(id = grade.id, course_id = grade.course_id, "created grade");
        Ok(grade)
    }

    pub async fn update(
        &self,
        id: i64,
        patch: &Map<String, Value>,
    ) -> Result<Option<Grade>, RepoError> {
        self.latency.before_write().await;
        let mut rows: Vec<Grade> = self.store.read(GRADES_KEY)?;
        let Some(slot) = rows.iter_mut().find(|g| g.id == id) else {
            return Ok(None);
        };
        let merged = merge_patch(slot, patch)?;
        *slot = merged.clone();
        self.store.write(GRADES_KEY, &rows)?;
        Ok(Some(merged))
    }

    pub async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        self.latency.before_write().await;
        let mut rows: Vec<Grade> = self.store.read(GRADES_KEY)?;
        rows.retain(|g| g.id != id);
        self.store.write(GRADES_KEY, &rows)?;
        Ok(true)
    }
}
