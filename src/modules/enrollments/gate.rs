//! Per-course and per-lesson authorization for signed-in users.
//!
//! Admins pass unconditionally. Students need an active enrollment in the
//! course and, for a lesson, the lesson must be published. The decision rules
//! are plain functions so handlers and page views share one policy and only
//! differ in how a denial is rendered.

use sqlx::PgPool;
use tracing::{debug, instrument};

use vibeflix_auth::Role;
use vibeflix_core::AppError;
use vibeflix_models::courses::Course;
use vibeflix_models::enrollments::Enrollment;
use vibeflix_models::lessons::Lesson;
use vibeflix_models::{CourseId, LessonId};

use super::service::EnrollmentService;
use crate::metrics::track_enrollment_denied;
use crate::middleware::auth::AuthUser;
use crate::middleware::gate::FORBIDDEN;
use crate::modules::courses::service::CourseService;
use crate::modules::lessons::service::LessonService;

pub const COURSE_NOT_FOUND: &str = "Curso não encontrado";
pub const LESSON_NOT_FOUND: &str = "Aula não encontrada";
pub const LESSON_UNAVAILABLE: &str = "Aula não disponível";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenied {
    NotFound(&'static str),
    NotEnrolled,
    Unpublished,
}

impl AccessDenied {
    fn reason(self) -> &'static str {
        match self {
            AccessDenied::NotFound(_) => "not_found",
            AccessDenied::NotEnrolled => "not_enrolled",
            AccessDenied::Unpublished => "unpublished",
        }
    }
}

#[derive(Debug)]
pub enum GateError {
    Denied(AccessDenied),
    Failed(AppError),
}

impl From<AppError> for GateError {
    fn from(err: AppError) -> Self {
        GateError::Failed(err)
    }
}

impl GateError {
    /// JSON rendering for `/api` handlers.
    ///
    /// Students never learn whether a course or lesson exists: a missing
    /// resource and a missing enrollment are both 403.
    pub fn into_api_error(self, role: Role) -> AppError {
        match self {
            GateError::Failed(err) => err,
            GateError::Denied(AccessDenied::NotFound(message)) if role.is_admin() => {
                AppError::not_found(anyhow::anyhow!(message))
            }
            GateError::Denied(AccessDenied::Unpublished) => {
                AppError::forbidden(LESSON_UNAVAILABLE.to_string())
            }
            GateError::Denied(_) => AppError::forbidden(FORBIDDEN.to_string()),
        }
    }
}

pub fn evaluate_course_access(
    role: Role,
    enrollment: Option<&Enrollment>,
) -> Result<(), AccessDenied> {
    if role.is_admin() {
        return Ok(());
    }

    match enrollment {
        Some(enrollment) if enrollment.is_active => Ok(()),
        _ => Err(AccessDenied::NotEnrolled),
    }
}

pub fn evaluate_lesson_access(
    role: Role,
    enrollment: Option<&Enrollment>,
    lesson: &Lesson,
) -> Result<(), AccessDenied> {
    evaluate_course_access(role, enrollment)?;

    if !role.is_admin() && !lesson.is_published {
        return Err(AccessDenied::Unpublished);
    }

    Ok(())
}

#[derive(Debug, Clone)]
pub struct CourseAccess {
    pub course: Course,
    pub enrollment: Option<Enrollment>,
}

#[derive(Debug, Clone)]
pub struct LessonAccess {
    pub lesson: Lesson,
    pub enrollment: Option<Enrollment>,
}

pub struct EnrollmentGate;

impl EnrollmentGate {
    #[instrument(skip(db, viewer), fields(user_id = %viewer.user_id(), role = %viewer.role()))]
    pub async fn authorize_course(
        db: &PgPool,
        viewer: &AuthUser,
        course_id: CourseId,
    ) -> Result<CourseAccess, GateError> {
        let Some(course) = CourseService::find(db, course_id).await? else {
            return Err(deny(AccessDenied::NotFound(COURSE_NOT_FOUND)));
        };

        let enrollment = Self::enrollment_for(db, viewer, course_id).await?;
        evaluate_course_access(viewer.role(), enrollment.as_ref()).map_err(deny)?;

        Ok(CourseAccess { course, enrollment })
    }

    #[instrument(skip(db, viewer), fields(user_id = %viewer.user_id(), role = %viewer.role()))]
    pub async fn authorize_lesson(
        db: &PgPool,
        viewer: &AuthUser,
        lesson_id: LessonId,
    ) -> Result<LessonAccess, GateError> {
        let Some(lesson) = LessonService::find(db, lesson_id).await? else {
            return Err(deny(AccessDenied::NotFound(LESSON_NOT_FOUND)));
        };

        let enrollment = Self::enrollment_for(db, viewer, lesson.course_id).await?;
        evaluate_lesson_access(viewer.role(), enrollment.as_ref(), &lesson).map_err(deny)?;

        Ok(LessonAccess { lesson, enrollment })
    }

    /// Same as [`authorize_lesson`](Self::authorize_lesson), rendered for `/api`.
    pub async fn require_lesson(
        db: &PgPool,
        viewer: &AuthUser,
        lesson_id: LessonId,
    ) -> Result<LessonAccess, AppError> {
        Self::authorize_lesson(db, viewer, lesson_id)
            .await
            .map_err(|e| e.into_api_error(viewer.role()))
    }

    /// Same as [`authorize_course`](Self::authorize_course), rendered for `/api`.
    pub async fn require_course(
        db: &PgPool,
        viewer: &AuthUser,
        course_id: CourseId,
    ) -> Result<CourseAccess, AppError> {
        Self::authorize_course(db, viewer, course_id)
            .await
            .map_err(|e| e.into_api_error(viewer.role()))
    }

    async fn enrollment_for(
        db: &PgPool,
        viewer: &AuthUser,
        course_id: CourseId,
    ) -> Result<Option<Enrollment>, AppError> {
        if viewer.is_admin() {
            return Ok(None);
        }
        EnrollmentService::find(db, viewer.user_id(), course_id).await
    }
}

fn deny(denied: AccessDenied) -> GateError {
    debug!(reason = denied.reason(), "Enrollment gate denied access");
    track_enrollment_denied(denied.reason());
    GateError::Denied(denied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::Utc;
    use vibeflix_models::{EnrollmentId, UserId};

    fn enrollment(is_active: bool) -> Enrollment {
        let now = Utc::now();
        Enrollment {
            id: EnrollmentId::new(),
            user_id: UserId::new(),
            course_id: CourseId::new(),
            is_active,
            enrolled_at: now,
            updated_at: now,
        }
    }

    fn lesson(is_published: bool) -> Lesson {
        let now = Utc::now();
        Lesson {
            id: LessonId::new(),
            title: "Introdução".to_string(),
            description: None,
            video_url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
            thumbnail: None,
            order: 0,
            duration: None,
            is_published,
            course_id: CourseId::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_admin_bypasses_enrollment() {
        assert!(evaluate_course_access(Role::Admin, None).is_ok());
        assert!(evaluate_lesson_access(Role::Admin, None, &lesson(false)).is_ok());
    }

    #[test]
    fn test_student_needs_active_enrollment() {
        assert_eq!(
            evaluate_course_access(Role::Student, None),
            Err(AccessDenied::NotEnrolled)
        );
        assert_eq!(
            evaluate_course_access(Role::Student, Some(&enrollment(false))),
            Err(AccessDenied::NotEnrolled)
        );
        assert!(evaluate_course_access(Role::Student, Some(&enrollment(true))).is_ok());
    }

    #[test]
    fn test_student_cannot_open_unpublished_lesson() {
        let active = enrollment(true);
        assert_eq!(
            evaluate_lesson_access(Role::Student, Some(&active), &lesson(false)),
            Err(AccessDenied::Unpublished)
        );
        assert!(evaluate_lesson_access(Role::Student, Some(&active), &lesson(true)).is_ok());
    }

    #[test]
    fn test_enrollment_checked_before_publication() {
        assert_eq!(
            evaluate_lesson_access(Role::Student, None, &lesson(false)),
            Err(AccessDenied::NotEnrolled)
        );
    }

    #[test]
    fn test_api_error_hides_missing_resources_from_students() {
        let err = GateError::Denied(AccessDenied::NotFound(COURSE_NOT_FOUND))
            .into_api_error(Role::Student);
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.error.to_string(), FORBIDDEN);

        let err = GateError::Denied(AccessDenied::NotFound(COURSE_NOT_FOUND))
            .into_api_error(Role::Admin);
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.error.to_string(), COURSE_NOT_FOUND);
    }

    #[test]
    fn test_api_error_for_unpublished_lesson() {
        let err = GateError::Denied(AccessDenied::Unpublished).into_api_error(Role::Student);
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.error.to_string(), LESSON_UNAVAILABLE);
    }

    #[test]
    fn test_api_error_passes_failures_through() {
        let err = GateError::from(AppError::internal_error("boom".to_string()))
            .into_api_error(Role::Student);
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
