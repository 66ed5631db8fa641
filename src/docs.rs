use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use vibeflix_auth::SESSION_COOKIE;
use vibeflix_models::Role;
use vibeflix_models::auth::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest};
use vibeflix_models::comments::{
    CommentAuthor, CommentDto, CommentResponse, CommentWithAuthor, CommentsResponse,
};
use vibeflix_models::completions::{CompletionResponse, LessonCompletion};
use vibeflix_models::courses::{
    Course, CourseDetail, CourseDetailResponse, CourseDto, CourseListItem, CourseResponse,
    CourseSummary, CourseWithCounts, CoursesResponse,
};
use vibeflix_models::enrollments::{
    CreateEnrollmentDto, Enrollment, EnrollmentDetail, EnrollmentDetailResponse, EnrollmentResponse,
    EnrollmentStatus, EnrollmentsResponse, UpdateEnrollmentDto,
};
use vibeflix_models::lesson_plans::{
    LessonPlan, LessonPlanDto, LessonPlanResponse, LessonPlansResponse,
};
use vibeflix_models::lessons::{
    Lesson, LessonDetail, LessonDetailResponse, LessonDto, LessonResponse, LessonsResponse,
};
use vibeflix_models::notes::{
    NoteDto, NoteResponse, NoteWithLesson, NotesResponse, StudentNote, UpdateNoteDto,
};
use vibeflix_models::users::{
    CreateStudentDto, StudentResponse, StudentWithStats, StudentsResponse, UpdateStudentDto, User,
    UserResponse, UserSummary,
};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::health::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::health,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::current_user,
        crate::modules::courses::controller::list_courses,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::lessons::controller::list_lessons,
        crate::modules::lessons::controller::create_lesson,
        crate::modules::lessons::controller::get_lesson,
        crate::modules::lessons::controller::update_lesson,
        crate::modules::lessons::controller::delete_lesson,
        crate::modules::lessons::controller::complete_lesson,
        crate::modules::lessons::controller::uncomplete_lesson,
        crate::modules::enrollments::controller::list_enrollments,
        crate::modules::enrollments::controller::upsert_enrollment,
        crate::modules::enrollments::controller::update_enrollment,
        crate::modules::enrollments::controller::delete_enrollment,
        crate::modules::notes::controller::list_notes,
        crate::modules::notes::controller::upsert_note,
        crate::modules::notes::controller::update_note,
        crate::modules::notes::controller::delete_note,
        crate::modules::comments::controller::list_comments,
        crate::modules::comments::controller::create_comment,
        crate::modules::comments::controller::delete_comment,
        crate::modules::lesson_plans::controller::list_lesson_plans,
        crate::modules::lesson_plans::controller::create_lesson_plan,
        crate::modules::lesson_plans::controller::update_lesson_plan,
        crate::modules::lesson_plans::controller::delete_lesson_plan,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            MessageResponse,
            Role,
            User,
            UserSummary,
            LoginRequest,
            RegisterRequest,
            AuthResponse,
            Course,
            CourseSummary,
            CourseWithCounts,
            CourseListItem,
            CourseDetail,
            CourseDto,
            CoursesResponse,
            CourseResponse,
            CourseDetailResponse,
            Lesson,
            LessonDetail,
            LessonDto,
            LessonsResponse,
            LessonResponse,
            LessonDetailResponse,
            LessonCompletion,
            CompletionResponse,
            LessonPlan,
            LessonPlanDto,
            LessonPlansResponse,
            LessonPlanResponse,
            Enrollment,
            EnrollmentStatus,
            EnrollmentDetail,
            CreateEnrollmentDto,
            UpdateEnrollmentDto,
            EnrollmentsResponse,
            EnrollmentResponse,
            EnrollmentDetailResponse,
            StudentNote,
            NoteWithLesson,
            NoteDto,
            UpdateNoteDto,
            NotesResponse,
            NoteResponse,
            CommentAuthor,
            CommentWithAuthor,
            CommentDto,
            CommentsResponse,
            CommentResponse,
            StudentWithStats,
            CreateStudentDto,
            UpdateStudentDto,
            StudentsResponse,
            StudentResponse,
            UserResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Authentication", description = "Cookie session login, registration and logout"),
        (name = "Courses", description = "Course catalogue and administration"),
        (name = "Lessons", description = "Lessons, playback view and completion"),
        (name = "Enrollments", description = "Student access to courses"),
        (name = "Notes", description = "Private per-lesson student notes"),
        (name = "Comments", description = "Public lesson comments"),
        (name = "Lesson plans", description = "Scheduled course outline"),
        (name = "Students", description = "Student administration")
    ),
    info(
        title = "Vibeflix API",
        version = "0.1.0",
        description = "Video course platform API built with Rust, Axum, and PostgreSQL, authenticated by a signed session cookie.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_gated_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/auth/login"));
        assert!(doc.paths.paths.contains_key("/api/enrollments"));
        assert!(doc.paths.paths.contains_key("/api/lessons/{id}/complete"));
        assert!(doc.paths.paths.contains_key("/api/admin/students/{id}"));
    }

    #[test]
    fn test_openapi_declares_cookie_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("session_cookie"));
    }

    #[test]
    fn test_openapi_registers_response_wrappers() {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.expect("components").schemas;
        for name in ["CoursesResponse", "LessonDetailResponse", "LessonPlansResponse", "UserResponse"] {
            assert!(schemas.contains_key(name), "missing schema {}", name);
        }
    }
}
