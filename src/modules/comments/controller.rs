use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use tracing::instrument;

use vibeflix_core::AppError;
use vibeflix_models::CommentId;
use vibeflix_models::auth::MessageResponse;

use super::model::{CommentDto, CommentListParams, CommentResponse, CommentsResponse};
use super::service::CommentService;
use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/comments",
    params(CommentListParams),
    responses(
        (status = 200, description = "Comments of the lesson, newest first", body = CommentsResponse),
        (status = 400, description = "lessonId missing", body = ErrorResponse),
        (status = 403, description = "Lesson not accessible", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Comments"
)]
#[instrument(skip(state, params))]
pub async fn list_comments(
    State(state): State<AppState>,
    auth_user: AuthUser,
    params: Result<Query<CommentListParams>, QueryRejection>,
) -> Result<Json<CommentsResponse>, AppError> {
    let Query(params) = params
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Parâmetros inválidos: {}", e)))?;
    let lesson_id = params
        .lesson_id
        .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("lessonId é obrigatório")))?;

    let comments = CommentService::list(&state.db, &auth_user, lesson_id).await?;
    Ok(Json(CommentsResponse { comments }))
}

#[utoipa::path(
    post,
    path = "/api/comments",
    request_body = CommentDto,
    responses(
        (status = 201, description = "Comment posted", body = CommentResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 403, description = "Lesson not accessible", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Comments"
)]
#[instrument(skip(state, dto))]
pub async fn create_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CommentDto>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    let comment = CommentService::create(&state.db, &auth_user, dto).await?;
    Ok((StatusCode::CREATED, Json(CommentResponse { comment })))
}

#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    params(("id" = String, Path, description = "Comment ID (UUID)")),
    responses(
        (status = 200, description = "Comment deleted", body = MessageResponse),
        (status = 403, description = "Neither author nor admin", body = ErrorResponse),
        (status = 404, description = "Comment not found", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Comments"
)]
#[instrument(skip(state))]
pub async fn delete_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<CommentId>,
) -> Result<Json<MessageResponse>, AppError> {
    CommentService::delete(&state.db, &auth_user, id).await?;
    Ok(Json(MessageResponse::new("Comentário deletado com sucesso")))
}
