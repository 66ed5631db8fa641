use std::collections::HashMap;

use anyhow::Context;
use sqlx::{FromRow, PgPool};
use tracing::{debug, instrument};

use vibeflix_core::AppError;
use vibeflix_models::courses::{CourseProgress, CourseSummary};
use vibeflix_models::enrollments::{Enrollment, EnrollmentListParams};
use vibeflix_models::lessons::{Lesson, LessonDetail};
use vibeflix_models::users::UserSummary;
use vibeflix_models::{CourseId, LessonId};

use super::model::{
    AdminCourseLessons, AdminEnrollmentsPage, AdminStats, DashboardEnrollment, PageOutcome,
    StudentDashboard,
};
use crate::middleware::auth::AuthUser;
use crate::middleware::gate::home_for;
use crate::modules::courses::service::CourseService;
use crate::modules::enrollments::gate::{EnrollmentGate, GateError};
use crate::modules::enrollments::service::EnrollmentService;
use crate::modules::lesson_plans::service::LessonPlanService;
use crate::modules::lessons::service::LessonService;

const DASHBOARD_PREVIEW_LESSONS: usize = 5;

/// Turns an enrollment gate denial into a redirect to `fallback`.
fn redirect_on_denial<T>(err: GateError, fallback: String) -> Result<PageOutcome<T>, AppError> {
    match err {
        GateError::Denied(denied) => {
            debug!(?denied, location = %fallback, "Page access denied");
            Ok(PageOutcome::Redirect(fallback))
        }
        GateError::Failed(err) => Err(err),
    }
}

#[derive(FromRow)]
struct PublishedCount {
    course_id: CourseId,
    lesson_count: i64,
}

pub struct PageService;

impl PageService {
    /// Active enrollments with a preview of each course, plus the catalogue.
    #[instrument(skip(db, viewer), fields(user_id = %viewer.user_id()))]
    pub async fn student_dashboard(
        db: &PgPool,
        viewer: &AuthUser,
    ) -> Result<StudentDashboard, AppError> {
        let active: Vec<Enrollment> = EnrollmentService::for_user(db, viewer.user_id())
            .await?
            .into_iter()
            .filter(|e| e.is_active)
            .collect();

        let course_ids: Vec<CourseId> = active.iter().map(|e| e.course_id).collect();

        let mut lessons_by_course: HashMap<CourseId, Vec<Lesson>> = HashMap::new();
        for lesson in LessonService::published_for_courses(db, &course_ids).await? {
            let preview = lessons_by_course.entry(lesson.course_id).or_default();
            if preview.len() < DASHBOARD_PREVIEW_LESSONS {
                preview.push(lesson);
            }
        }

        let counts: HashMap<CourseId, i64> = sqlx::query_as::<_, PublishedCount>(
            r#"
            SELECT course_id, COUNT(*) AS lesson_count
            FROM lessons
            WHERE course_id = ANY($1) AND is_published
            GROUP BY course_id
            "#,
        )
        .bind(&course_ids)
        .fetch_all(db)
        .await
        .context("Erro ao contar aulas")
        .map_err(AppError::database)?
        .into_iter()
        .map(|row| (row.course_id, row.lesson_count))
        .collect();

        let courses = CourseService::with_counts(db).await?;
        let mut by_id: HashMap<CourseId, _> = courses
            .iter()
            .map(|c| (c.course.id, c.course.clone()))
            .collect();

        let enrollments = active
            .into_iter()
            .filter_map(|enrollment| {
                let course = by_id.remove(&enrollment.course_id)?;
                Some(DashboardEnrollment {
                    lessons: lessons_by_course
                        .remove(&enrollment.course_id)
                        .unwrap_or_default(),
                    lesson_count: counts.get(&enrollment.course_id).copied().unwrap_or(0),
                    course,
                    enrollment,
                })
            })
            .collect();

        Ok(StudentDashboard {
            enrollments,
            courses,
        })
    }

    /// Course page for a student: any gate denial goes back to the dashboard.
    #[instrument(skip(db, viewer), fields(user_id = %viewer.user_id()))]
    pub async fn course_page(
        db: &PgPool,
        viewer: &AuthUser,
        course_id: CourseId,
    ) -> Result<PageOutcome<CourseProgress>, AppError> {
        let access = match EnrollmentGate::authorize_course(db, viewer, course_id).await {
            Ok(access) => access,
            Err(err) => return redirect_on_denial(err, home_for(viewer.role()).to_string()),
        };

        let lessons = LessonService::progress(db, viewer.user_id(), course_id).await?;
        let lesson_plans = LessonPlanService::for_course(db, course_id).await?;
        let completed_count = lessons.iter().filter(|l| l.is_completed).count();

        Ok(PageOutcome::Render(CourseProgress {
            course: access.course,
            lessons,
            lesson_plans,
            completed_count,
        }))
    }

    /// Lesson page: without course access back to the dashboard; a lesson
    /// that is missing, belongs to another course or is unpublished sends the
    /// student back to the course.
    #[instrument(skip(db, viewer), fields(user_id = %viewer.user_id()))]
    pub async fn lesson_page(
        db: &PgPool,
        viewer: &AuthUser,
        course_id: CourseId,
        lesson_id: LessonId,
    ) -> Result<PageOutcome<LessonDetail>, AppError> {
        if let Err(err) = EnrollmentGate::authorize_course(db, viewer, course_id).await {
            return redirect_on_denial(err, home_for(viewer.role()).to_string());
        }

        let course_page = format!("/courses/{}", course_id);
        let access = match EnrollmentGate::authorize_lesson(db, viewer, lesson_id).await {
            Ok(access) => access,
            Err(err) => return redirect_on_denial(err, course_page),
        };

        if access.lesson.course_id != course_id {
            return Ok(PageOutcome::Redirect(course_page));
        }

        let detail = LessonService::assemble(db, viewer, access.lesson).await?;
        Ok(PageOutcome::Render(detail))
    }

    #[instrument(skip(db))]
    pub async fn admin_stats(db: &PgPool) -> Result<AdminStats, AppError> {
        sqlx::query_as::<_, AdminStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users WHERE role = 'STUDENT') AS student_count,
                (SELECT COUNT(*) FROM courses) AS course_count,
                (SELECT COUNT(*) FROM lessons) AS lesson_count,
                (SELECT COUNT(*) FROM enrollments WHERE is_active) AS active_enrollment_count
            "#,
        )
        .fetch_one(db)
        .await
        .context("Erro ao carregar estatísticas")
        .map_err(AppError::database)
    }

    /// Every lesson of a course, drafts included. Unknown courses send the
    /// admin back to the course list.
    #[instrument(skip(db))]
    pub async fn admin_course_lessons(
        db: &PgPool,
        course_id: CourseId,
    ) -> Result<PageOutcome<AdminCourseLessons>, AppError> {
        let Some(course) = CourseService::find(db, course_id).await? else {
            return Ok(PageOutcome::Redirect("/admin/courses".to_string()));
        };

        let lessons = LessonService::for_course(db, course_id, false).await?;
        Ok(PageOutcome::Render(AdminCourseLessons { course, lessons }))
    }

    #[instrument(skip(db))]
    pub async fn admin_enrollments(
        db: &PgPool,
        params: &EnrollmentListParams,
    ) -> Result<AdminEnrollmentsPage, AppError> {
        let enrollments = EnrollmentService::list(db, params).await?;

        let students = sqlx::query_as::<_, UserSummary>(
            "SELECT id, name, email FROM users WHERE role = 'STUDENT' ORDER BY name ASC",
        )
        .fetch_all(db)
        .await
        .context("Erro ao buscar alunos")
        .map_err(AppError::database)?;

        let courses =
            sqlx::query_as::<_, CourseSummary>("SELECT id, title FROM courses ORDER BY title ASC")
                .fetch_all(db)
                .await
                .context("Erro ao buscar cursos")
                .map_err(AppError::database)?;

        Ok(AdminEnrollmentsPage {
            enrollments,
            students,
            courses,
        })
    }
}
