use anyhow::{Context, anyhow};
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument};

use vibeflix_core::AppError;
use vibeflix_models::{CourseId, EnrollmentId, UserId};

use super::model::{
    CreateEnrollmentDto, Enrollment, EnrollmentDetail, EnrollmentListParams, EnrollmentRow,
    EnrollmentUpsert,
};
use crate::metrics::track_enrollment_upsert;

const ENROLLMENT_NOT_FOUND: &str = "Matrícula não encontrada";

const DETAIL_SELECT: &str = r#"
    SELECT e.id, e.user_id, e.course_id, e.is_active, e.enrolled_at, e.updated_at,
           u.name AS user_name, u.email AS user_email, c.title AS course_title
    FROM enrollments e
    JOIN users u ON u.id = e.user_id
    JOIN courses c ON c.id = e.course_id
"#;

#[derive(FromRow)]
struct UpsertRow {
    #[sqlx(flatten)]
    enrollment: Enrollment,
    inserted: bool,
}

pub struct EnrollmentService;

impl EnrollmentService {
    #[instrument(skip(db))]
    pub async fn find(
        db: &PgPool,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Enrollment>, AppError> {
        sqlx::query_as::<_, Enrollment>(
            r#"
            SELECT id, user_id, course_id, is_active, enrolled_at, updated_at
            FROM enrollments
            WHERE user_id = $1 AND course_id = $2
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(db)
        .await
        .context("Erro ao buscar matrícula")
        .map_err(AppError::database)
    }

    /// All enrollments of a user, any state.
    #[instrument(skip(db))]
    pub async fn for_user(db: &PgPool, user_id: UserId) -> Result<Vec<Enrollment>, AppError> {
        sqlx::query_as::<_, Enrollment>(
            r#"
            SELECT id, user_id, course_id, is_active, enrolled_at, updated_at
            FROM enrollments
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("Erro ao buscar matrículas")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        params: &EnrollmentListParams,
    ) -> Result<Vec<EnrollmentDetail>, AppError> {
        let query = format!(
            "{DETAIL_SELECT}
            WHERE ($1::uuid IS NULL OR e.user_id = $1)
              AND ($2::uuid IS NULL OR e.course_id = $2)
            ORDER BY e.enrolled_at DESC"
        );

        let rows = sqlx::query_as::<_, EnrollmentRow>(&query)
            .bind(params.user_id)
            .bind(params.course_id)
            .fetch_all(db)
            .await
            .context("Erro ao buscar matrículas")
            .map_err(AppError::database)?;

        Ok(rows.into_iter().map(EnrollmentDetail::from).collect())
    }

    #[instrument(skip(db))]
    pub async fn detail(db: &PgPool, id: EnrollmentId) -> Result<EnrollmentDetail, AppError> {
        let query = format!("{DETAIL_SELECT} WHERE e.id = $1");

        sqlx::query_as::<_, EnrollmentRow>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Erro ao buscar matrícula")
            .map_err(AppError::database)?
            .map(EnrollmentDetail::from)
            .ok_or_else(|| AppError::not_found(anyhow!(ENROLLMENT_NOT_FOUND)))
    }

    /// Creates the (user, course) row or, when it exists, only overwrites
    /// `is_active`. Concurrent calls converge on the same row.
    #[instrument(skip(db, dto), fields(user_id = %dto.user_id, course_id = %dto.course_id, is_active = dto.is_active))]
    pub async fn upsert(db: &PgPool, dto: CreateEnrollmentDto) -> Result<EnrollmentUpsert, AppError> {
        let row = sqlx::query_as::<_, UpsertRow>(
            r#"
            INSERT INTO enrollments (user_id, course_id, is_active)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, course_id)
            DO UPDATE SET is_active = EXCLUDED.is_active, updated_at = NOW()
            RETURNING id, user_id, course_id, is_active, enrolled_at, updated_at,
                      (xmax = 0) AS inserted
            "#,
        )
        .bind(dto.user_id)
        .bind(dto.course_id)
        .bind(dto.is_active)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_foreign_key_violation()
            {
                return AppError::not_found(anyhow!("Aluno ou curso não encontrado"));
            }
            AppError::database(anyhow::Error::from(e).context("Erro ao criar matrícula"))
        })?;

        track_enrollment_upsert(row.inserted);
        info!(
            enrollment_id = %row.enrollment.id,
            created = row.inserted,
            "Enrollment saved"
        );

        Ok(EnrollmentUpsert {
            enrollment: row.enrollment,
            created: row.inserted,
        })
    }

    #[instrument(skip(db))]
    pub async fn set_active(
        db: &PgPool,
        id: EnrollmentId,
        is_active: bool,
    ) -> Result<Enrollment, AppError> {
        sqlx::query_as::<_, Enrollment>(
            r#"
            UPDATE enrollments
            SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, course_id, is_active, enrolled_at, updated_at
            "#,
        )
        .bind(id)
        .bind(is_active)
        .fetch_optional(db)
        .await
        .context("Erro ao atualizar matrícula")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!(ENROLLMENT_NOT_FOUND)))
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: EnrollmentId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Erro ao excluir matrícula")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!(ENROLLMENT_NOT_FOUND)));
        }

        Ok(())
    }
}
