//! # Vibeflix Models
//!
//! Database entities, request DTOs and response shapes for the Vibeflix API.
//! Every type serializes with camelCase keys.
//!
//! # Modules
//!
//! - [`ids`]: strongly-typed entity ids
//! - [`users`]: users, students administration DTOs
//! - [`auth`]: login and registration payloads
//! - [`courses`], [`lessons`], [`lesson_plans`]: catalogue content
//! - [`enrollments`]: student ↔ course access rows
//! - [`notes`], [`comments`], [`completions`]: per-lesson student activity

pub mod auth;
pub mod comments;
pub mod completions;
pub mod courses;
pub mod enrollments;
pub mod ids;
pub mod lesson_plans;
pub mod lessons;
pub mod notes;
pub mod serde_helpers;
pub mod users;
pub mod validation;

pub use ids::{
    CommentId, CompletionId, CourseId, EnrollmentId, LessonId, LessonPlanId, NoteId, UserId,
};
pub use vibeflix_auth::Role;
