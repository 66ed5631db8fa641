use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use tracing::instrument;

use vibeflix_core::AppError;
use vibeflix_models::CourseId;
use vibeflix_models::auth::MessageResponse;

use super::model::{
    CourseDetailResponse, CourseDto, CourseListParams, CourseResponse, CoursesResponse,
};
use super::service::CourseService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireAdmin;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// The course catalogue
#[utoipa::path(
    get,
    path = "/api/courses",
    params(CourseListParams),
    responses(
        (status = 200, description = "Courses with lesson and enrollment counts", body = CoursesResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, params))]
pub async fn list_courses(
    State(state): State<AppState>,
    auth_user: AuthUser,
    params: Result<Query<CourseListParams>, QueryRejection>,
) -> Result<Json<CoursesResponse>, AppError> {
    let Query(params) = params
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Parâmetros inválidos: {}", e)))?;

    let courses = CourseService::list(&state.db, &auth_user, params.include_lessons).await?;
    Ok(Json(CoursesResponse { courses }))
}

#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CourseDto,
    responses(
        (status = 201, description = "Course created", body = CourseResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 403, description = "Admins only", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Courses"
)]
#[instrument(skip_all, fields(admin_id = %admin.user_id()))]
pub async fn create_course(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CourseDto>,
) -> Result<(StatusCode, Json<CourseResponse>), AppError> {
    let course = CourseService::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(CourseResponse { course })))
}

/// A single course. Students must hold an active enrollment.
#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(("id" = String, Path, description = "Course ID (UUID)")),
    responses(
        (status = 200, description = "Course with lessons and lesson plans", body = CourseDetailResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not enrolled", body = ErrorResponse),
        (status = 404, description = "Course not found (admins)", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<CourseId>,
) -> Result<Json<CourseDetailResponse>, AppError> {
    let course = CourseService::detail(&state.db, &auth_user, id).await?;
    Ok(Json(CourseDetailResponse { course }))
}

#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    params(("id" = String, Path, description = "Course ID (UUID)")),
    request_body = CourseDto,
    responses(
        (status = 200, description = "Course updated", body = CourseResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 403, description = "Admins only", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Courses"
)]
#[instrument(skip_all, fields(admin_id = %admin.user_id(), course_id = %id))]
pub async fn update_course(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<CourseId>,
    ValidatedJson(dto): ValidatedJson<CourseDto>,
) -> Result<Json<CourseResponse>, AppError> {
    let course = CourseService::update(&state.db, id, dto).await?;
    Ok(Json(CourseResponse { course }))
}

#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    params(("id" = String, Path, description = "Course ID (UUID)")),
    responses(
        (status = 200, description = "Course deleted with its lessons and enrollments", body = MessageResponse),
        (status = 403, description = "Admins only", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, admin), fields(admin_id = %admin.user_id()))]
pub async fn delete_course(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<CourseId>,
) -> Result<Json<MessageResponse>, AppError> {
    CourseService::delete(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Curso excluído com sucesso")))
}
