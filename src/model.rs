use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An academic unit the student is enrolled in for a semester.
///
/// Wire/document shape keeps the capitalized `Id` field the stored
/// documents have always used; everything else is camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "Id")]
    pub id: i64,
    pub name: String,
    pub code: String,
    pub instructor: String,
    pub schedule: String,
    pub credits: i64,
    pub color: String,
    pub semester: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Completed,
}

impl Default for Status {
    fn default() -> Self {
        Status::Pending
    }
}

impl Status {
    pub fn toggled(self) -> Self {
        match self {
            Status::Pending => Status::Completed,
            Status::Completed => Status::Pending,
        }
    }
}

/// A trackable task belonging to exactly one course.
///
/// `course_id` is not validated against the courses collection at write
/// time; cascade delete is what keeps it from dangling under the normal
/// deletion flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    #[serde(rename = "Id")]
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub priority: Priority,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// A weighted score entry contributing to a course's derived percentage.
///
/// `weight` is a percentage-point contribution; the set of weights for a
/// course is not required to sum to 100. `max_score > 0` is enforced at
/// entry validation, before a grade ever reaches the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    #[serde(rename = "Id")]
    pub id: i64,
    pub course_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_id: Option<i64>,
    pub score: f64,
    pub max_score: f64,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub date: DateTime<Utc>,
}

/// Create-time fields for a course. Id and createdAt are stamped by the
/// repository.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub name: String,
    pub code: String,
    pub instructor: String,
    pub schedule: String,
    pub credits: i64,
    pub color: String,
    pub semester: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssignment {
    pub course_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGrade {
    pub course_id: i64,
    #[serde(default)]
    pub assignment_id: Option<i64>,
    pub score: f64,
    pub max_score: f64,
    pub weight: f64,
    #[serde(default)]
    pub category: Option<String>,
}
