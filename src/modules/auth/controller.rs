use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;
use tracing::instrument;
use utoipa::ToSchema;

use vibeflix_auth::{clear_session_cookie, session_cookie};
use vibeflix_core::AppError;

use super::model::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest};
use super::service::AuthService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Sign in and receive the `session` cookie
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session cookie set", body = AuthResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let (user, token) = AuthService::login(&state.db, dto, &state.jwt_config).await?;
    let jar = jar.add(session_cookie(token, &state.jwt_config));
    Ok((jar, Json(AuthResponse { user })))
}

/// Create a student account and sign it in
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, session cookie set", body = AuthResponse),
        (status = 400, description = "Invalid payload or email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), AppError> {
    let (user, token) = AuthService::register(&state.db, dto, &state.jwt_config).await?;
    let jar = jar.add(session_cookie(token, &state.jwt_config));
    Ok((StatusCode::CREATED, jar, Json(AuthResponse { user })))
}

/// Clear the session cookie
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    (
        jar.remove(clear_session_cookie()),
        Json(MessageResponse::new("Logout realizado com sucesso")),
    )
}

/// The signed-in user, freshly loaded
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = AuthResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "User no longer exists", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn current_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<AuthResponse>, AppError> {
    let user = AuthService::current_user(&state.db, auth_user.user_id()).await?;
    Ok(Json(AuthResponse { user }))
}
