use super::{merge_patch, next_id, HasId, RepoError};
use crate::latency::Latency;
use crate::model::{Course, NewCourse};
use crate::store::{Store, StoreError};
use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

pub const COURSES_KEY: &str = "scholar_hub_courses";
const DEFAULT_COURSES: &str = include_str!("../../seed/courses.json");

impl HasId for Course {
    fn record_id(&self) -> i64 {
        self.id
    }
}

pub struct CourseRepo {
    store: Arc<Store>,
    latency: Latency,
}

impl CourseRepo {
    pub fn new(store: Arc<Store>, latency: Latency) -> Self {
        Self { store, latency }
    }

    /// Install the bundled default courses unless the workspace already
    /// holds a collection. Called once per workspace open.
    pub fn seed_defaults(&self) -> Result<(), StoreError> {
        self.store.seed_if_absent(COURSES_KEY, DEFAULT_COURSES)
    }

    pub async fn get_all(&self) -> Result<Vec<Course>, RepoError> {
        self.latency.before_read().await;
        Ok(self.store.read(COURSES_KEY)?)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Course>, RepoError> {
        self.latency.before_read().await;
        let rows: Vec<Course> = self.store.read(COURSES_KEY)?;
        Ok(rows.into_iter().find(|c| c.id == id))
    }

    pub async fn create(&self, new: NewCourse) -> Result<Course, RepoError> {
        self.latency.before_write().await;
        let mut rows: Vec<Course> = self.store.read(COURSES_KEY)?;
        let course = Course {
            id: next_id(&rows),
            name: new.name,
            code: new.code,
            instructor: new.instructor,
            schedule: new.schedule,
            credits: new.credits,
            color: new.color,
            semester: new.semester,
            created_at: Utc::now(),
        };
        rows.push(course.clone());
        self.store.write(COURSES_KEY, &rows)?;
        debug!(id = course.id, code = %course.code, "created course");
        Ok(course)
    }

    pub async fn update(
        &self,
        id: i64,
        patch: &Map<String, Value>,
    ) -> Result<Option<Course>, RepoError> {
        self.latency.before_write().await;
        let mut rows: Vec<Course> = self.store.read(COURSES_KEY)?;
        let Some(slot) = rows.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        let merged = merge_patch(slot, patch)?;
        *slot = merged.clone();
        self.store.write(COURSES_KEY, &rows)?;
        Ok(Some(merged))
    }

    /// Idempotent: reports `true` whether or not the id existed.
    pub async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        self.latency.before_write().await;
        let mut rows: Vec<Course> = self.store.read(COURSES_KEY)?;
        rows.retain(|c| c.id != id);
        self.store.write(COURSES_KEY, &rows)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn repo() -> CourseRepo {
        let store = Arc::new(Store::in_memory().expect("open store"));
        CourseRepo::new(store, Latency::none())
    }

    fn new_course(name: &str) -> NewCourse {
        NewCourse {
            name: name.to_string(),
            code: "PSY 101".to_string(),
            instructor: "Dr. Chen".to_string(),
            schedule: "MWF 9:00".to_string(),
            credits: 3,
            color: "#7C3AED".to_string(),
            semester: "Fall 2025".to_string(),
        }
    }

    #[tokio::test]
    async fn sequential_creates_allocate_one_then_two() {
        let repo = repo();
        let first = repo.create(new_course("Psych")).await.expect("create");
        let second = repo.create(new_course("Stats")).await.expect("create");
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn next_id_tracks_the_current_max() {
        let repo = repo();
        repo.create(new_course("a")).await.expect("create");
        let b = repo.create(new_course("b")).await.expect("create");
        let c = repo.create(new_course("c")).await.expect("create");

        // Deleting below the max leaves the counter alone.
        assert!(repo.delete(b.id).await.expect("delete"));
        let d = repo.create(new_course("d")).await.expect("create");
        assert_eq!(d.id, c.id + 1);

        // Deleting the max re-derives the counter from the survivors,
        // so the freed id comes back.
        assert!(repo.delete(d.id).await.expect("delete"));
        let e = repo.create(new_course("e")).await.expect("create");
        assert_eq!(e.id, d.id);
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let repo = repo();
        let created = repo.create(new_course("Psych")).await.expect("create");
        let fetched = repo
            .get_by_id(created.id)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn update_overwrites_present_and_preserves_absent() {
        let repo = repo();
        let created = repo.create(new_course("Psych")).await.expect("create");
        let patch = json!({ "instructor": "Dr. Okafor", "credits": 4 });
        let updated = repo
            .update(created.id, patch.as_object().expect("object"))
            .await
            .expect("update")
            .expect("present");
        assert_eq!(updated.instructor, "Dr. Okafor");
        assert_eq!(updated.credits, 4);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn update_of_missing_id_is_none_not_error() {
        let repo = repo();
        let patch = json!({ "name": "x" });
        let out = repo
            .update(99, patch.as_object().expect("object"))
            .await
            .expect("update");
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn delete_twice_reports_true_both_times() {
        let repo = repo();
        let created = repo.create(new_course("Psych")).await.expect("create");
        assert!(repo.delete(created.id).await.expect("delete"));
        assert!(repo.delete(created.id).await.expect("delete again"));
        assert!(repo.get_all().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn bad_typed_patch_is_rejected_not_persisted() {
        let repo = repo();
        let created = repo.create(new_course("Psych")).await.expect("create");
        let patch = json!({ "credits": "four" });
        let err = repo
            .update(created.id, patch.as_object().expect("object"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::InvalidPatch(_)));
        let unchanged = repo
            .get_by_id(created.id)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(unchanged.credits, 3);
    }
}
