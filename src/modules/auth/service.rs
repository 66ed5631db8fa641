use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::instrument;

use vibeflix_auth::{Role, SessionPayload, encode_session};
use vibeflix_config::JwtConfig;
use vibeflix_core::{AppError, hash_password, verify_password};
use vibeflix_models::UserId;
use vibeflix_models::users::UserCredentials;

use super::model::{LoginRequest, RegisterRequest, User};
use crate::metrics::{
    track_session_issued, track_user_created, track_user_login_failure,
    track_user_login_success,
};

const INVALID_CREDENTIALS: &str = "Email ou senha inválidos";
pub const EMAIL_TAKEN: &str = "Email já cadastrado";

pub struct AuthService;

impl AuthService {
    /// Checks credentials and signs a fresh session token.
    ///
    /// Unknown email and wrong password fail identically.
    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<(User, String), AppError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            r#"
            SELECT id, email, name, password, role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(dto.email.trim())
        .fetch_optional(db)
        .await
        .context("Erro ao fazer login")
        .map_err(AppError::database)?;

        let Some(credentials) = credentials else {
            track_user_login_failure("unknown_email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(&dto.password, &credentials.password)? {
            track_user_login_failure("wrong_password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let user = credentials.into_user();
        let token = Self::issue_token(&user, jwt_config)?;
        track_user_login_success(user.role.as_str());

        Ok((user, token))
    }

    /// Self-service sign-up; always creates a student.
    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn register(
        db: &PgPool,
        dto: RegisterRequest,
        jwt_config: &JwtConfig,
    ) -> Result<(User, String), AppError> {
        let user = Self::create_user(db, &dto.name, &dto.email, &dto.password, Role::Student).await?;
        let token = Self::issue_token(&user, jwt_config)?;
        Ok((user, token))
    }

    /// Inserts a user, mapping a duplicate email to 400 `Email já cadastrado`.
    #[instrument(skip(db, password))]
    pub async fn create_user(
        db: &PgPool,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AppError> {
        let hashed_password = hash_password(password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, role, created_at, updated_at
            "#,
        )
        .bind(name.trim())
        .bind(email.trim())
        .bind(&hashed_password)
        .bind(role)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow!(EMAIL_TAKEN));
                }
            }
            AppError::database(anyhow::Error::from(e).context("Erro ao criar usuário"))
        })?;

        track_user_created(role.as_str());
        Ok(user)
    }

    /// Reloads the session's user; the token may outlive the account.
    #[instrument(skip(db))]
    pub async fn current_user(db: &PgPool, user_id: UserId) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("Erro ao buscar usuário")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("Usuário não encontrado")))
    }

    fn issue_token(user: &User, jwt_config: &JwtConfig) -> Result<String, AppError> {
        let payload = SessionPayload {
            user_id: user.id.into_inner(),
            email: user.email.clone(),
            role: user.role,
        };

        let token = encode_session(&payload, jwt_config)
            .map_err(|e| AppError::internal_error(format!("Failed to create session: {}", e)))?;
        track_session_issued();

        Ok(token)
    }
}
