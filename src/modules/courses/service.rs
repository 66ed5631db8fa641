use std::collections::HashMap;

use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::{info, instrument};

use vibeflix_core::AppError;
use vibeflix_models::CourseId;
use vibeflix_models::validation::non_empty;

use super::model::{Course, CourseDetail, CourseDto, CourseListItem, CourseWithCounts};
use crate::middleware::auth::AuthUser;
use crate::modules::enrollments::gate::{COURSE_NOT_FOUND, EnrollmentGate};
use crate::modules::enrollments::service::EnrollmentService;
use crate::modules::lesson_plans::service::LessonPlanService;
use crate::modules::lessons::service::LessonService;

const COURSE_COLUMNS: &str =
    "id, title, description, thumbnail, preview_image, is_active, created_at, updated_at";

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db))]
    pub async fn find(db: &PgPool, id: CourseId) -> Result<Option<Course>, AppError> {
        sqlx::query_as::<_, Course>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Erro ao buscar curso")
            .map_err(AppError::database)
    }

    /// Every course with lesson and enrollment counts, newest first.
    #[instrument(skip(db))]
    pub async fn with_counts(db: &PgPool) -> Result<Vec<CourseWithCounts>, AppError> {
        sqlx::query_as::<_, CourseWithCounts>(
            r#"
            SELECT c.id, c.title, c.description, c.thumbnail, c.preview_image, c.is_active,
                   c.created_at, c.updated_at,
                   (SELECT COUNT(*) FROM lessons l WHERE l.course_id = c.id) AS lesson_count,
                   (SELECT COUNT(*) FROM enrollments e WHERE e.course_id = c.id) AS enrollment_count
            FROM courses c
            ORDER BY c.created_at DESC
            "#,
        )
        .fetch_all(db)
        .await
        .context("Erro ao buscar cursos")
        .map_err(AppError::database)
    }

    /// The catalogue. With `include_lessons` each course carries its
    /// published lessons; students also get their enrollment status per course.
    #[instrument(skip(db, viewer), fields(user_id = %viewer.user_id()))]
    pub async fn list(
        db: &PgPool,
        viewer: &AuthUser,
        include_lessons: bool,
    ) -> Result<Vec<CourseListItem>, AppError> {
        let courses = Self::with_counts(db).await?;

        let mut lessons_by_course = if include_lessons {
            let ids: Vec<CourseId> = courses.iter().map(|c| c.course.id).collect();
            let mut grouped: HashMap<CourseId, Vec<_>> = HashMap::new();
            for lesson in LessonService::published_for_courses(db, &ids).await? {
                grouped.entry(lesson.course_id).or_default().push(lesson);
            }
            Some(grouped)
        } else {
            None
        };

        let enrollments = if viewer.is_admin() {
            None
        } else {
            let rows = EnrollmentService::for_user(db, viewer.user_id()).await?;
            Some(
                rows.into_iter()
                    .map(|e| (e.course_id, e.status()))
                    .collect::<HashMap<_, _>>(),
            )
        };

        Ok(courses
            .into_iter()
            .map(|course| {
                let id = course.course.id;
                CourseListItem {
                    lessons: lessons_by_course
                        .as_mut()
                        .map(|grouped| grouped.remove(&id).unwrap_or_default()),
                    enrollment: enrollments.as_ref().map(|map| map.get(&id).copied()),
                    course,
                }
            })
            .collect())
    }

    /// A course with its lessons and plans, behind the enrollment gate.
    ///
    /// Admins see drafts; students only published lessons.
    #[instrument(skip(db, viewer), fields(user_id = %viewer.user_id()))]
    pub async fn detail(
        db: &PgPool,
        viewer: &AuthUser,
        id: CourseId,
    ) -> Result<CourseDetail, AppError> {
        let access = EnrollmentGate::require_course(db, viewer, id).await?;

        let lessons = LessonService::for_course(db, id, !viewer.is_admin()).await?;
        let lesson_plans = LessonPlanService::for_course(db, id).await?;

        let enrollment_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE course_id = $1")
                .bind(id)
                .fetch_one(db)
                .await
                .context("Erro ao contar matrículas")
                .map_err(AppError::database)?;

        Ok(CourseDetail {
            course: access.course,
            lessons,
            lesson_plans,
            enrollment_count,
            enrollment: access.enrollment.map(|e| e.status()),
        })
    }

    #[instrument(skip(db, dto), fields(title = %dto.title))]
    pub async fn create(db: &PgPool, dto: CourseDto) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>(&format!(
            "INSERT INTO courses (title, description, thumbnail, preview_image, is_active)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(dto.title.trim())
        .bind(non_empty(dto.description))
        .bind(non_empty(dto.thumbnail))
        .bind(non_empty(dto.preview_image))
        .bind(dto.is_active)
        .fetch_one(db)
        .await
        .context("Erro ao criar curso")
        .map_err(AppError::database)?;

        info!(course_id = %course.id, "Course created");
        Ok(course)
    }

    #[instrument(skip(db, dto))]
    pub async fn update(db: &PgPool, id: CourseId, dto: CourseDto) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(&format!(
            "UPDATE courses
             SET title = $2, description = $3, thumbnail = $4, preview_image = $5,
                 is_active = $6, updated_at = NOW()
             WHERE id = $1
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(id)
        .bind(dto.title.trim())
        .bind(non_empty(dto.description))
        .bind(non_empty(dto.thumbnail))
        .bind(non_empty(dto.preview_image))
        .bind(dto.is_active)
        .fetch_optional(db)
        .await
        .context("Erro ao atualizar curso")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!(COURSE_NOT_FOUND)))
    }

    /// Lessons, plans and enrollments go with the course.
    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: CourseId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Erro ao excluir curso")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!(COURSE_NOT_FOUND)));
        }

        info!(course_id = %id, "Course deleted");
        Ok(())
    }
}
