use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::{info, instrument};

use vibeflix_auth::Role;
use vibeflix_core::{AppError, hash_password};
use vibeflix_models::UserId;

use super::model::{CreateStudentDto, StudentWithStats, UpdateStudentDto, User};
use crate::modules::auth::service::{AuthService, EMAIL_TAKEN};

const STUDENT_NOT_FOUND: &str = "Aluno não encontrado";

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<User, AppError> {
        let user =
            AuthService::create_user(db, &dto.name, &dto.email, &dto.password, Role::Student)
                .await?;
        info!(user_id = %user.id, "Student created");
        Ok(user)
    }

    /// Students newest first, with how many courses each is enrolled in.
    #[instrument(skip(db))]
    pub async fn get_students(db: &PgPool) -> Result<Vec<StudentWithStats>, AppError> {
        sqlx::query_as::<_, StudentWithStats>(
            r#"
            SELECT u.id, u.name, u.email, u.created_at, COUNT(e.id) AS enrollment_count
            FROM users u
            LEFT JOIN enrollments e ON e.user_id = u.id
            WHERE u.role = 'STUDENT'
            GROUP BY u.id
            ORDER BY u.created_at DESC
            "#,
        )
        .fetch_all(db)
        .await
        .context("Erro ao buscar alunos")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, id: UserId) -> Result<StudentWithStats, AppError> {
        sqlx::query_as::<_, StudentWithStats>(
            r#"
            SELECT u.id, u.name, u.email, u.created_at, COUNT(e.id) AS enrollment_count
            FROM users u
            LEFT JOIN enrollments e ON e.user_id = u.id
            WHERE u.id = $1 AND u.role = 'STUDENT'
            GROUP BY u.id
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Erro ao buscar aluno")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!(STUDENT_NOT_FOUND)))
    }

    /// Partial update; absent fields keep their value. Admin rows are never
    /// touched and read as not found.
    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        id: UserId,
        dto: UpdateStudentDto,
    ) -> Result<User, AppError> {
        let hashed_password = dto.password.as_deref().map(hash_password).transpose()?;

        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                password = COALESCE($4, password),
                updated_at = NOW()
            WHERE id = $1 AND role = 'STUDENT'
            RETURNING id, email, name, role, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(dto.email.as_deref().map(str::trim))
        .bind(hashed_password)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow!(EMAIL_TAKEN));
            }
            AppError::database(anyhow::Error::from(e).context("Erro ao atualizar aluno"))
        })?
        .ok_or_else(|| AppError::not_found(anyhow!(STUDENT_NOT_FOUND)))
    }

    /// Enrollments, notes, comments and completions go with the student.
    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: UserId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role = 'STUDENT'")
            .bind(id)
            .execute(db)
            .await
            .context("Erro ao excluir aluno")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!(STUDENT_NOT_FOUND)));
        }

        info!(user_id = %id, "Student deleted");
        Ok(())
    }
}
