use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::instrument;

use vibeflix_core::AppError;
use vibeflix_models::validation::non_empty;
use vibeflix_models::{CourseId, LessonPlanId};

use super::model::{LessonPlan, LessonPlanDto};
use crate::middleware::auth::AuthUser;
use crate::modules::enrollments::gate::{COURSE_NOT_FOUND, EnrollmentGate};

const PLAN_NOT_FOUND: &str = "Plano de aula não encontrado";

const PLAN_COLUMNS: &str =
    "id, title, description, scheduled_date, position, course_id, created_at, updated_at";

fn map_write_error(e: sqlx::Error, context: &'static str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_foreign_key_violation()
    {
        return AppError::not_found(anyhow!(COURSE_NOT_FOUND));
    }
    AppError::database(anyhow::Error::from(e).context(context))
}

pub struct LessonPlanService;

impl LessonPlanService {
    #[instrument(skip(db))]
    pub async fn for_course(db: &PgPool, course_id: CourseId) -> Result<Vec<LessonPlan>, AppError> {
        sqlx::query_as::<_, LessonPlan>(&format!(
            "SELECT {PLAN_COLUMNS} FROM lesson_plans
             WHERE course_id = $1
             ORDER BY position ASC, scheduled_date ASC NULLS LAST"
        ))
        .bind(course_id)
        .fetch_all(db)
        .await
        .context("Erro ao buscar planos de aula")
        .map_err(AppError::database)
    }

    #[instrument(skip(db, viewer), fields(user_id = %viewer.user_id()))]
    pub async fn list(
        db: &PgPool,
        viewer: &AuthUser,
        course_id: CourseId,
    ) -> Result<Vec<LessonPlan>, AppError> {
        EnrollmentGate::require_course(db, viewer, course_id).await?;
        Self::for_course(db, course_id).await
    }

    #[instrument(skip(db, dto), fields(title = %dto.title, course_id = %dto.course_id))]
    pub async fn create(db: &PgPool, dto: LessonPlanDto) -> Result<LessonPlan, AppError> {
        sqlx::query_as::<_, LessonPlan>(&format!(
            "INSERT INTO lesson_plans (title, description, scheduled_date, position, course_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {PLAN_COLUMNS}"
        ))
        .bind(dto.title.trim())
        .bind(non_empty(dto.description))
        .bind(dto.scheduled_date)
        .bind(dto.order)
        .bind(dto.course_id)
        .fetch_one(db)
        .await
        .map_err(|e| map_write_error(e, "Erro ao criar plano de aula"))
    }

    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        id: LessonPlanId,
        dto: LessonPlanDto,
    ) -> Result<LessonPlan, AppError> {
        sqlx::query_as::<_, LessonPlan>(&format!(
            "UPDATE lesson_plans
             SET title = $2, description = $3, scheduled_date = $4, position = $5,
                 course_id = $6, updated_at = NOW()
             WHERE id = $1
             RETURNING {PLAN_COLUMNS}"
        ))
        .bind(id)
        .bind(dto.title.trim())
        .bind(non_empty(dto.description))
        .bind(dto.scheduled_date)
        .bind(dto.order)
        .bind(dto.course_id)
        .fetch_optional(db)
        .await
        .map_err(|e| map_write_error(e, "Erro ao atualizar plano de aula"))?
        .ok_or_else(|| AppError::not_found(anyhow!(PLAN_NOT_FOUND)))
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: LessonPlanId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM lesson_plans WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Erro ao excluir plano de aula")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!(PLAN_NOT_FOUND)));
        }

        Ok(())
    }
}
