use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::{info, instrument};

use vibeflix_core::AppError;
use vibeflix_models::{CommentId, LessonId};

use super::model::{Comment, CommentDto, CommentRow, CommentWithAuthor};
use crate::middleware::auth::AuthUser;
use crate::middleware::gate::FORBIDDEN;
use crate::modules::enrollments::gate::EnrollmentGate;

pub struct CommentService;

impl CommentService {
    /// Newest first, each with its author's name and role.
    #[instrument(skip(db))]
    pub async fn for_lesson(
        db: &PgPool,
        lesson_id: LessonId,
    ) -> Result<Vec<CommentWithAuthor>, AppError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT c.id, c.user_id, c.lesson_id, c.content, c.created_at, c.updated_at,
                   u.name AS author_name, u.role AS author_role
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.lesson_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(lesson_id)
        .fetch_all(db)
        .await
        .context("Erro ao buscar comentários")
        .map_err(AppError::database)?;

        Ok(rows.into_iter().map(CommentWithAuthor::from).collect())
    }

    #[instrument(skip(db, viewer), fields(user_id = %viewer.user_id()))]
    pub async fn list(
        db: &PgPool,
        viewer: &AuthUser,
        lesson_id: LessonId,
    ) -> Result<Vec<CommentWithAuthor>, AppError> {
        EnrollmentGate::require_lesson(db, viewer, lesson_id).await?;
        Self::for_lesson(db, lesson_id).await
    }

    #[instrument(skip(db, viewer, dto), fields(user_id = %viewer.user_id(), lesson_id = %dto.lesson_id))]
    pub async fn create(
        db: &PgPool,
        viewer: &AuthUser,
        dto: CommentDto,
    ) -> Result<CommentWithAuthor, AppError> {
        EnrollmentGate::require_lesson(db, viewer, dto.lesson_id).await?;

        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            WITH inserted AS (
                INSERT INTO comments (user_id, lesson_id, content)
                VALUES ($1, $2, $3)
                RETURNING id, user_id, lesson_id, content, created_at, updated_at
            )
            SELECT i.id, i.user_id, i.lesson_id, i.content, i.created_at, i.updated_at,
                   u.name AS author_name, u.role AS author_role
            FROM inserted i
            JOIN users u ON u.id = i.user_id
            "#,
        )
        .bind(viewer.user_id())
        .bind(dto.lesson_id)
        .bind(dto.content.trim())
        .fetch_one(db)
        .await
        .context("Erro ao criar comentário")
        .map_err(AppError::database)?;

        info!(comment_id = %row.comment.id, "Comment created");
        Ok(CommentWithAuthor::from(row))
    }

    /// Authors delete their own comments; admins delete any.
    #[instrument(skip(db, viewer), fields(user_id = %viewer.user_id()))]
    pub async fn delete(db: &PgPool, viewer: &AuthUser, id: CommentId) -> Result<(), AppError> {
        let comment = sqlx::query_as::<_, Comment>(
            "SELECT id, user_id, lesson_id, content, created_at, updated_at FROM comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Erro ao buscar comentário")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("Comentário não encontrado")))?;

        if comment.user_id != viewer.user_id() && !viewer.is_admin() {
            return Err(AppError::forbidden(FORBIDDEN.to_string()));
        }

        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Erro ao excluir comentário")
            .map_err(AppError::database)?;

        Ok(())
    }
}
