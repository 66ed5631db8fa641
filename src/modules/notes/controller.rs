use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use tracing::instrument;

use vibeflix_core::AppError;
use vibeflix_models::NoteId;
use vibeflix_models::auth::MessageResponse;

use super::model::{NoteDto, NoteListParams, NoteResponse, NotesResponse, UpdateNoteDto};
use super::service::NoteService;
use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/notes",
    params(NoteListParams),
    responses(
        (status = 200, description = "The caller's notes", body = NotesResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Notes"
)]
#[instrument(skip(state, params))]
pub async fn list_notes(
    State(state): State<AppState>,
    auth_user: AuthUser,
    params: Result<Query<NoteListParams>, QueryRejection>,
) -> Result<Json<NotesResponse>, AppError> {
    let Query(params) = params
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Parâmetros inválidos: {}", e)))?;

    let notes = NoteService::list(&state.db, auth_user.user_id(), params.lesson_id).await?;
    Ok(Json(NotesResponse { notes }))
}

/// Save the caller's note for a lesson
#[utoipa::path(
    post,
    path = "/api/notes",
    request_body = NoteDto,
    responses(
        (status = 201, description = "Note created", body = NoteResponse),
        (status = 200, description = "Existing note replaced", body = NoteResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 403, description = "Lesson not accessible", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Notes"
)]
#[instrument(skip(state, dto))]
pub async fn upsert_note(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<NoteDto>,
) -> Result<(StatusCode, Json<NoteResponse>), AppError> {
    let (note, created) = NoteService::upsert(&state.db, &auth_user, dto).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(NoteResponse { note })))
}

#[utoipa::path(
    put,
    path = "/api/notes/{id}",
    params(("id" = String, Path, description = "Note ID (UUID)")),
    request_body = UpdateNoteDto,
    responses(
        (status = 200, description = "Note updated", body = NoteResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Notes"
)]
#[instrument(skip(state, dto))]
pub async fn update_note(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<NoteId>,
    ValidatedJson(dto): ValidatedJson<UpdateNoteDto>,
) -> Result<Json<NoteResponse>, AppError> {
    let note = NoteService::update(&state.db, auth_user.user_id(), id, &dto.content).await?;
    Ok(Json(NoteResponse { note }))
}

#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    params(("id" = String, Path, description = "Note ID (UUID)")),
    responses(
        (status = 200, description = "Note deleted", body = MessageResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Notes"
)]
#[instrument(skip(state))]
pub async fn delete_note(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<NoteId>,
) -> Result<Json<MessageResponse>, AppError> {
    NoteService::delete(&state.db, auth_user.user_id(), id).await?;
    Ok(Json(MessageResponse::new("Nota deletada com sucesso")))
}
