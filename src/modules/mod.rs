pub mod auth;
pub mod comments;
pub mod courses;
pub mod enrollments;
pub mod health;
pub mod lesson_plans;
pub mod lessons;
pub mod notes;
pub mod pages;
pub mod students;
