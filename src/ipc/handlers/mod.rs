pub mod assignments;
pub mod core;
pub mod courses;
pub mod grades;
