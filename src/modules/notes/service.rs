use anyhow::{Context, anyhow};
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use vibeflix_core::AppError;
use vibeflix_models::{LessonId, NoteId, UserId};

use super::model::{NoteDto, NoteWithLesson, StudentNote};
use crate::middleware::auth::AuthUser;
use crate::middleware::gate::FORBIDDEN;
use crate::modules::enrollments::gate::EnrollmentGate;

const NOTE_NOT_FOUND: &str = "Nota não encontrada";

const NOTE_COLUMNS: &str = "id, user_id, lesson_id, content, created_at, updated_at";

#[derive(FromRow)]
struct UpsertRow {
    #[sqlx(flatten)]
    note: StudentNote,
    inserted: bool,
}

pub struct NoteService;

impl NoteService {
    /// The caller's notes, most recently edited first.
    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        user_id: UserId,
        lesson_id: Option<LessonId>,
    ) -> Result<Vec<NoteWithLesson>, AppError> {
        sqlx::query_as::<_, NoteWithLesson>(
            r#"
            SELECT n.id, n.user_id, n.lesson_id, n.content, n.created_at, n.updated_at,
                   l.title AS lesson_title, c.id AS course_id, c.title AS course_title
            FROM student_notes n
            JOIN lessons l ON l.id = n.lesson_id
            JOIN courses c ON c.id = l.course_id
            WHERE n.user_id = $1 AND ($2::uuid IS NULL OR n.lesson_id = $2)
            ORDER BY n.updated_at DESC
            "#,
        )
        .bind(user_id)
        .bind(lesson_id)
        .fetch_all(db)
        .await
        .context("Erro ao buscar notas")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn find_for(
        db: &PgPool,
        user_id: UserId,
        lesson_id: LessonId,
    ) -> Result<Option<StudentNote>, AppError> {
        sqlx::query_as::<_, StudentNote>(&format!(
            "SELECT {NOTE_COLUMNS} FROM student_notes WHERE user_id = $1 AND lesson_id = $2"
        ))
        .bind(user_id)
        .bind(lesson_id)
        .fetch_optional(db)
        .await
        .context("Erro ao buscar nota")
        .map_err(AppError::database)
    }

    /// One note per (user, lesson): writes replace the content.
    ///
    /// Returns the note and whether it was created.
    #[instrument(skip(db, viewer, dto), fields(user_id = %viewer.user_id(), lesson_id = %dto.lesson_id))]
    pub async fn upsert(
        db: &PgPool,
        viewer: &AuthUser,
        dto: NoteDto,
    ) -> Result<(StudentNote, bool), AppError> {
        EnrollmentGate::require_lesson(db, viewer, dto.lesson_id).await?;

        let row = sqlx::query_as::<_, UpsertRow>(&format!(
            "INSERT INTO student_notes (user_id, lesson_id, content)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id, lesson_id)
             DO UPDATE SET content = EXCLUDED.content, updated_at = NOW()
             RETURNING {NOTE_COLUMNS}, (xmax = 0) AS inserted"
        ))
        .bind(viewer.user_id())
        .bind(dto.lesson_id)
        .bind(&dto.content)
        .fetch_one(db)
        .await
        .context("Erro ao salvar nota")
        .map_err(AppError::database)?;

        Ok((row.note, row.inserted))
    }

    #[instrument(skip(db, content))]
    pub async fn update(
        db: &PgPool,
        user_id: UserId,
        id: NoteId,
        content: &str,
    ) -> Result<StudentNote, AppError> {
        Self::owned(db, user_id, id).await?;

        sqlx::query_as::<_, StudentNote>(&format!(
            "UPDATE student_notes SET content = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {NOTE_COLUMNS}"
        ))
        .bind(id)
        .bind(content)
        .fetch_optional(db)
        .await
        .context("Erro ao atualizar nota")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!(NOTE_NOT_FOUND)))
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, user_id: UserId, id: NoteId) -> Result<(), AppError> {
        Self::owned(db, user_id, id).await?;

        sqlx::query("DELETE FROM student_notes WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Erro ao excluir nota")
            .map_err(AppError::database)?;

        Ok(())
    }

    /// 404 when the note is gone, 403 when it belongs to someone else.
    async fn owned(db: &PgPool, user_id: UserId, id: NoteId) -> Result<StudentNote, AppError> {
        let note = sqlx::query_as::<_, StudentNote>(&format!(
            "SELECT {NOTE_COLUMNS} FROM student_notes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Erro ao buscar nota")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!(NOTE_NOT_FOUND)))?;

        if note.user_id != user_id {
            return Err(AppError::forbidden(FORBIDDEN.to_string()));
        }

        Ok(note)
    }
}
