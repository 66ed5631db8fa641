use axum::{Router, routing::get};

use super::controller::{
    admin_course_lessons, admin_courses, admin_dashboard, admin_enrollments, admin_students,
    course_page, landing, lesson_page, login_page, register_page, student_dashboard,
};
use crate::state::AppState;

pub fn init_pages_router() -> Router<AppState> {
    Router::new()
        .route("/", get(landing))
        .route("/login", get(login_page))
        .route("/register", get(register_page))
        .route("/dashboard", get(student_dashboard))
        .route("/courses/{id}", get(course_page))
        .route("/courses/{id}/lessons/{lesson_id}", get(lesson_page))
        .route("/admin/dashboard", get(admin_dashboard))
        .route("/admin/courses", get(admin_courses))
        .route("/admin/courses/{id}/lessons", get(admin_course_lessons))
        .route("/admin/students", get(admin_students))
        .route("/admin/enrollments", get(admin_enrollments))
}
