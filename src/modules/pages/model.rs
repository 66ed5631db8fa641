//! View models for the server-rendered pages.
//!
//! Pages answer with a JSON payload for the client to render, or with a 307
//! redirect when the viewer may not see them.

use axum::{
    Json,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};

use vibeflix_models::courses::{Course, CourseSummary, CourseWithCounts};
use vibeflix_models::enrollments::{Enrollment, EnrollmentDetail};
use vibeflix_models::lessons::Lesson;
use vibeflix_models::users::UserSummary;

pub enum PageOutcome<T> {
    Render(T),
    Redirect(String),
}

impl<T: Serialize> IntoResponse for PageOutcome<T> {
    fn into_response(self) -> Response {
        match self {
            PageOutcome::Render(view) => Json(view).into_response(),
            PageOutcome::Redirect(location) => Redirect::temporary(&location).into_response(),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LandingPage {
    pub title: &'static str,
    pub description: &'static str,
    pub login_url: &'static str,
    pub register_url: &'static str,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub min_length: Option<u32>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FormPage {
    pub title: &'static str,
    pub action: &'static str,
    pub method: &'static str,
    pub fields: Vec<FormField>,
    /// Where to go once signed in, when the gate sent the visitor here.
    pub from: Option<String>,
    pub alternate_label: &'static str,
    pub alternate_url: &'static str,
}

#[derive(Deserialize, Debug, Default)]
pub struct FromParams {
    pub from: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DashboardEnrollment {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub course: Course,
    /// First published lessons, in order.
    pub lessons: Vec<Lesson>,
    pub lesson_count: i64,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboard {
    pub enrollments: Vec<DashboardEnrollment>,
    pub courses: Vec<CourseWithCounts>,
}

#[derive(Serialize, Debug, Clone, Copy, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub student_count: i64,
    pub course_count: i64,
    pub lesson_count: i64,
    pub active_enrollment_count: i64,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AdminCourseLessons {
    pub course: Course,
    pub lessons: Vec<Lesson>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AdminEnrollmentsPage {
    pub enrollments: Vec<EnrollmentDetail>,
    /// Choices for the enrollment form.
    pub students: Vec<UserSummary>,
    pub courses: Vec<CourseSummary>,
}
