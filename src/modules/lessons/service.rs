use std::collections::HashSet;

use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::{info, instrument};

use vibeflix_core::AppError;
use vibeflix_models::completions::LessonCompletion;
use vibeflix_models::courses::CourseSummary;
use vibeflix_models::validation::non_empty;
use vibeflix_models::{CourseId, LessonId, UserId};

use super::model::{Lesson, LessonDetail, LessonDto, LessonListParams, LessonWithProgress};
use crate::middleware::auth::AuthUser;
use crate::modules::comments::service::CommentService;
use crate::modules::enrollments::gate::{COURSE_NOT_FOUND, EnrollmentGate, LESSON_NOT_FOUND};
use crate::modules::notes::service::NoteService;
use crate::utils::video::embed_url;

const LESSON_COLUMNS: &str = "id, title, description, video_url, thumbnail, position, duration, \
     is_published, course_id, created_at, updated_at";

fn map_write_error(e: sqlx::Error, context: &'static str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_foreign_key_violation()
    {
        return AppError::not_found(anyhow!(COURSE_NOT_FOUND));
    }
    AppError::database(anyhow::Error::from(e).context(context))
}

pub struct LessonService;

impl LessonService {
    #[instrument(skip(db))]
    pub async fn find(db: &PgPool, id: LessonId) -> Result<Option<Lesson>, AppError> {
        sqlx::query_as::<_, Lesson>(&format!("SELECT {LESSON_COLUMNS} FROM lessons WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Erro ao buscar aula")
            .map_err(AppError::database)
    }

    /// Lessons of one course in display order.
    #[instrument(skip(db))]
    pub async fn for_course(
        db: &PgPool,
        course_id: CourseId,
        published_only: bool,
    ) -> Result<Vec<Lesson>, AppError> {
        sqlx::query_as::<_, Lesson>(&format!(
            "SELECT {LESSON_COLUMNS} FROM lessons
             WHERE course_id = $1 AND (NOT $2 OR is_published)
             ORDER BY position ASC, created_at ASC"
        ))
        .bind(course_id)
        .bind(published_only)
        .fetch_all(db)
        .await
        .context("Erro ao buscar aulas")
        .map_err(AppError::database)
    }

    #[instrument(skip(db, course_ids), fields(courses = course_ids.len()))]
    pub async fn published_for_courses(
        db: &PgPool,
        course_ids: &[CourseId],
    ) -> Result<Vec<Lesson>, AppError> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, Lesson>(&format!(
            "SELECT {LESSON_COLUMNS} FROM lessons
             WHERE course_id = ANY($1) AND is_published
             ORDER BY position ASC, created_at ASC"
        ))
        .bind(course_ids)
        .fetch_all(db)
        .await
        .context("Erro ao buscar aulas")
        .map_err(AppError::database)
    }

    /// Admins see every lesson. Students see published lessons of courses
    /// they are actively enrolled in; filtering by a course they cannot open
    /// is denied like opening the course itself.
    #[instrument(skip(db, viewer), fields(user_id = %viewer.user_id()))]
    pub async fn list(
        db: &PgPool,
        viewer: &AuthUser,
        params: &LessonListParams,
    ) -> Result<Vec<Lesson>, AppError> {
        if viewer.is_admin() {
            return sqlx::query_as::<_, Lesson>(&format!(
                "SELECT {LESSON_COLUMNS} FROM lessons
                 WHERE ($1::uuid IS NULL OR course_id = $1)
                 ORDER BY course_id, position ASC, created_at ASC"
            ))
            .bind(params.course_id)
            .fetch_all(db)
            .await
            .context("Erro ao buscar aulas")
            .map_err(AppError::database);
        }

        if let Some(course_id) = params.course_id {
            EnrollmentGate::require_course(db, viewer, course_id).await?;
            return Self::for_course(db, course_id, true).await;
        }

        sqlx::query_as::<_, Lesson>(
            r#"
            SELECT l.id, l.title, l.description, l.video_url, l.thumbnail, l.position,
                   l.duration, l.is_published, l.course_id, l.created_at, l.updated_at
            FROM lessons l
            JOIN enrollments e
              ON e.course_id = l.course_id AND e.user_id = $1 AND e.is_active
            WHERE l.is_published
            ORDER BY l.course_id, l.position ASC, l.created_at ASC
            "#,
        )
        .bind(viewer.user_id())
        .fetch_all(db)
        .await
        .context("Erro ao buscar aulas")
        .map_err(AppError::database)
    }

    /// The lesson view: course, comments, embeddable video and, for students,
    /// their note and completion flag.
    #[instrument(skip(db, viewer), fields(user_id = %viewer.user_id()))]
    pub async fn detail(
        db: &PgPool,
        viewer: &AuthUser,
        id: LessonId,
    ) -> Result<LessonDetail, AppError> {
        let access = EnrollmentGate::require_lesson(db, viewer, id).await?;
        Self::assemble(db, viewer, access.lesson).await
    }

    /// Builds the lesson view for a lesson the viewer was already let into.
    pub async fn assemble(
        db: &PgPool,
        viewer: &AuthUser,
        lesson: Lesson,
    ) -> Result<LessonDetail, AppError> {
        let id = lesson.id;
        let course = sqlx::query_as::<_, CourseSummary>("SELECT id, title FROM courses WHERE id = $1")
            .bind(lesson.course_id)
            .fetch_one(db)
            .await
            .context("Erro ao buscar curso")
            .map_err(AppError::database)?;

        let comments = CommentService::for_lesson(db, id).await?;

        let (user_note, is_completed) = if viewer.is_admin() {
            (None, None)
        } else {
            let note = NoteService::find_for(db, viewer.user_id(), id).await?;
            let completed = Self::is_completed(db, viewer.user_id(), id).await?;
            (Some(note), Some(completed))
        };

        Ok(LessonDetail {
            embed_url: embed_url(&lesson.video_url),
            lesson,
            course,
            comments,
            user_note,
            is_completed,
        })
    }

    /// A course's published lessons flagged with the student's completions.
    #[instrument(skip(db))]
    pub async fn progress(
        db: &PgPool,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Vec<LessonWithProgress>, AppError> {
        let lessons = Self::for_course(db, course_id, true).await?;

        let completed: HashSet<LessonId> = sqlx::query_scalar::<_, LessonId>(
            r#"
            SELECT lc.lesson_id
            FROM lesson_completions lc
            JOIN lessons l ON l.id = lc.lesson_id
            WHERE lc.user_id = $1 AND l.course_id = $2
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_all(db)
        .await
        .context("Erro ao buscar progresso")
        .map_err(AppError::database)?
        .into_iter()
        .collect();

        Ok(lessons
            .into_iter()
            .map(|lesson| LessonWithProgress {
                is_completed: completed.contains(&lesson.id),
                lesson,
            })
            .collect())
    }

    #[instrument(skip(db, dto), fields(title = %dto.title, course_id = %dto.course_id))]
    pub async fn create(db: &PgPool, dto: LessonDto) -> Result<Lesson, AppError> {
        let lesson = sqlx::query_as::<_, Lesson>(&format!(
            "INSERT INTO lessons
                (title, description, video_url, thumbnail, position, duration, is_published, course_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {LESSON_COLUMNS}"
        ))
        .bind(dto.title.trim())
        .bind(non_empty(dto.description))
        .bind(dto.video_url.trim())
        .bind(non_empty(dto.thumbnail))
        .bind(dto.order)
        .bind(dto.duration)
        .bind(dto.is_published)
        .bind(dto.course_id)
        .fetch_one(db)
        .await
        .map_err(|e| map_write_error(e, "Erro ao criar aula"))?;

        info!(lesson_id = %lesson.id, "Lesson created");
        Ok(lesson)
    }

    #[instrument(skip(db, dto))]
    pub async fn update(db: &PgPool, id: LessonId, dto: LessonDto) -> Result<Lesson, AppError> {
        sqlx::query_as::<_, Lesson>(&format!(
            "UPDATE lessons
             SET title = $2, description = $3, video_url = $4, thumbnail = $5, position = $6,
                 duration = $7, is_published = $8, course_id = $9, updated_at = NOW()
             WHERE id = $1
             RETURNING {LESSON_COLUMNS}"
        ))
        .bind(id)
        .bind(dto.title.trim())
        .bind(non_empty(dto.description))
        .bind(dto.video_url.trim())
        .bind(non_empty(dto.thumbnail))
        .bind(dto.order)
        .bind(dto.duration)
        .bind(dto.is_published)
        .bind(dto.course_id)
        .fetch_optional(db)
        .await
        .map_err(|e| map_write_error(e, "Erro ao atualizar aula"))?
        .ok_or_else(|| AppError::not_found(anyhow!(LESSON_NOT_FOUND)))
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: LessonId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Erro ao excluir aula")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!(LESSON_NOT_FOUND)));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn is_completed(
        db: &PgPool,
        user_id: UserId,
        lesson_id: LessonId,
    ) -> Result<bool, AppError> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM lesson_completions WHERE user_id = $1 AND lesson_id = $2)",
        )
        .bind(user_id)
        .bind(lesson_id)
        .fetch_one(db)
        .await
        .context("Erro ao buscar conclusão")
        .map_err(AppError::database)
    }

    /// Marks the lesson done; repeating it only refreshes `completed_at`.
    #[instrument(skip(db, viewer), fields(user_id = %viewer.user_id()))]
    pub async fn complete(
        db: &PgPool,
        viewer: &AuthUser,
        lesson_id: LessonId,
    ) -> Result<LessonCompletion, AppError> {
        EnrollmentGate::require_lesson(db, viewer, lesson_id).await?;

        sqlx::query_as::<_, LessonCompletion>(
            r#"
            INSERT INTO lesson_completions (user_id, lesson_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, lesson_id) DO UPDATE SET completed_at = NOW()
            RETURNING id, user_id, lesson_id, completed_at
            "#,
        )
        .bind(viewer.user_id())
        .bind(lesson_id)
        .fetch_one(db)
        .await
        .context("Erro ao marcar aula como concluída")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn uncomplete(
        db: &PgPool,
        user_id: UserId,
        lesson_id: LessonId,
    ) -> Result<(), AppError> {
        let result =
            sqlx::query("DELETE FROM lesson_completions WHERE user_id = $1 AND lesson_id = $2")
                .bind(user_id)
                .bind(lesson_id)
                .execute(db)
                .await
                .context("Erro ao desmarcar conclusão")
                .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Conclusão não encontrada")));
        }

        Ok(())
    }
}
