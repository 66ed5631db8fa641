use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use tracing::instrument;

use vibeflix_core::AppError;
use vibeflix_models::LessonId;
use vibeflix_models::auth::MessageResponse;

use super::model::{
    CompletionResponse, LessonDetailResponse, LessonDto, LessonListParams, LessonResponse,
    LessonsResponse,
};
use super::service::LessonService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, RequireStudent};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/lessons",
    params(LessonListParams),
    responses(
        (status = 200, description = "Lessons visible to the caller", body = LessonsResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not enrolled in the requested course", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state, params))]
pub async fn list_lessons(
    State(state): State<AppState>,
    auth_user: AuthUser,
    params: Result<Query<LessonListParams>, QueryRejection>,
) -> Result<Json<LessonsResponse>, AppError> {
    let Query(params) = params
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Parâmetros inválidos: {}", e)))?;

    let lessons = LessonService::list(&state.db, &auth_user, &params).await?;
    Ok(Json(LessonsResponse { lessons }))
}

#[utoipa::path(
    post,
    path = "/api/lessons",
    request_body = LessonDto,
    responses(
        (status = 201, description = "Lesson created", body = LessonResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 403, description = "Admins only", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Lessons"
)]
#[instrument(skip_all, fields(admin_id = %admin.user_id()))]
pub async fn create_lesson(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<LessonDto>,
) -> Result<(StatusCode, Json<LessonResponse>), AppError> {
    let lesson = LessonService::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(LessonResponse { lesson })))
}

/// The lesson player view
#[utoipa::path(
    get,
    path = "/api/lessons/{id}",
    params(("id" = String, Path, description = "Lesson ID (UUID)")),
    responses(
        (status = 200, description = "Lesson with course, comments and the caller's progress", body = LessonDetailResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not enrolled or lesson not published", body = ErrorResponse),
        (status = 404, description = "Lesson not found (admins)", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state))]
pub async fn get_lesson(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<LessonId>,
) -> Result<Json<LessonDetailResponse>, AppError> {
    let lesson = LessonService::detail(&state.db, &auth_user, id).await?;
    Ok(Json(LessonDetailResponse { lesson }))
}

#[utoipa::path(
    put,
    path = "/api/lessons/{id}",
    params(("id" = String, Path, description = "Lesson ID (UUID)")),
    request_body = LessonDto,
    responses(
        (status = 200, description = "Lesson updated", body = LessonResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 403, description = "Admins only", body = ErrorResponse),
        (status = 404, description = "Lesson or course not found", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Lessons"
)]
#[instrument(skip_all, fields(admin_id = %admin.user_id(), lesson_id = %id))]
pub async fn update_lesson(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<LessonId>,
    ValidatedJson(dto): ValidatedJson<LessonDto>,
) -> Result<Json<LessonResponse>, AppError> {
    let lesson = LessonService::update(&state.db, id, dto).await?;
    Ok(Json(LessonResponse { lesson }))
}

#[utoipa::path(
    delete,
    path = "/api/lessons/{id}",
    params(("id" = String, Path, description = "Lesson ID (UUID)")),
    responses(
        (status = 200, description = "Lesson deleted", body = MessageResponse),
        (status = 403, description = "Admins only", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state, admin), fields(admin_id = %admin.user_id()))]
pub async fn delete_lesson(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<LessonId>,
) -> Result<Json<MessageResponse>, AppError> {
    LessonService::delete(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Aula excluída com sucesso")))
}

#[utoipa::path(
    post,
    path = "/api/lessons/{id}/complete",
    params(("id" = String, Path, description = "Lesson ID (UUID)")),
    responses(
        (status = 200, description = "Lesson marked as completed", body = CompletionResponse),
        (status = 403, description = "Students only, enrolled, lesson published", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state, student), fields(user_id = %student.user_id()))]
pub async fn complete_lesson(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    Path(id): Path<LessonId>,
) -> Result<Json<CompletionResponse>, AppError> {
    let completion = LessonService::complete(&state.db, &student, id).await?;
    Ok(Json(CompletionResponse { completion }))
}

#[utoipa::path(
    delete,
    path = "/api/lessons/{id}/complete",
    params(("id" = String, Path, description = "Lesson ID (UUID)")),
    responses(
        (status = 200, description = "Completion removed", body = MessageResponse),
        (status = 403, description = "Students only", body = ErrorResponse),
        (status = 404, description = "Lesson was not completed", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state, student), fields(user_id = %student.user_id()))]
pub async fn uncomplete_lesson(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    Path(id): Path<LessonId>,
) -> Result<Json<MessageResponse>, AppError> {
    LessonService::uncomplete(&state.db, student.user_id(), id).await?;
    Ok(Json(MessageResponse::new("Conclusão removida")))
}
