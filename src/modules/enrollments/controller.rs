use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use tracing::instrument;

use vibeflix_core::AppError;
use vibeflix_models::EnrollmentId;
use vibeflix_models::auth::MessageResponse;

use super::model::{
    CreateEnrollmentDto, EnrollmentDetailResponse, EnrollmentListParams, EnrollmentResponse,
    EnrollmentsResponse, UpdateEnrollmentDto,
};
use super::service::EnrollmentService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireAdmin;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Enrollments with their user and course. Students only ever see their own.
#[utoipa::path(
    get,
    path = "/api/enrollments",
    params(EnrollmentListParams),
    responses(
        (status = 200, description = "Enrollments, newest first", body = EnrollmentsResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Enrollments"
)]
#[instrument(skip(state, params))]
pub async fn list_enrollments(
    State(state): State<AppState>,
    auth_user: AuthUser,
    params: Result<Query<EnrollmentListParams>, QueryRejection>,
) -> Result<Json<EnrollmentsResponse>, AppError> {
    let Query(mut params) = params
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Parâmetros inválidos: {}", e)))?;

    if !auth_user.is_admin() {
        params.user_id = Some(auth_user.user_id());
    }

    let enrollments = EnrollmentService::list(&state.db, &params).await?;
    Ok(Json(EnrollmentsResponse { enrollments }))
}

/// Create or update the enrollment for a (user, course) pair.
///
/// Answers 201 when the row is new and 200 when an existing row was updated.
#[utoipa::path(
    post,
    path = "/api/enrollments",
    request_body = CreateEnrollmentDto,
    responses(
        (status = 201, description = "Enrollment created", body = EnrollmentDetailResponse),
        (status = 200, description = "Existing enrollment updated", body = EnrollmentDetailResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 403, description = "Admins only", body = ErrorResponse),
        (status = 404, description = "Unknown user or course", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Enrollments"
)]
#[instrument(skip_all, fields(admin_id = %admin.user_id()))]
pub async fn upsert_enrollment(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateEnrollmentDto>,
) -> Result<(StatusCode, Json<EnrollmentDetailResponse>), AppError> {
    let upsert = EnrollmentService::upsert(&state.db, dto).await?;
    let detail = EnrollmentService::detail(&state.db, upsert.enrollment.id).await?;

    let status = if upsert.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(EnrollmentDetailResponse { enrollment: detail })))
}

#[utoipa::path(
    put,
    path = "/api/enrollments/{id}",
    params(("id" = String, Path, description = "Enrollment ID (UUID)")),
    request_body = UpdateEnrollmentDto,
    responses(
        (status = 200, description = "Enrollment updated", body = EnrollmentResponse),
        (status = 403, description = "Admins only", body = ErrorResponse),
        (status = 404, description = "Enrollment not found", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Enrollments"
)]
#[instrument(skip_all, fields(admin_id = %admin.user_id()))]
pub async fn update_enrollment(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<EnrollmentId>,
    ValidatedJson(dto): ValidatedJson<UpdateEnrollmentDto>,
) -> Result<Json<EnrollmentResponse>, AppError> {
    let enrollment = EnrollmentService::set_active(&state.db, id, dto.is_active).await?;
    Ok(Json(EnrollmentResponse { enrollment }))
}

#[utoipa::path(
    delete,
    path = "/api/enrollments/{id}",
    params(("id" = String, Path, description = "Enrollment ID (UUID)")),
    responses(
        (status = 200, description = "Enrollment removed", body = MessageResponse),
        (status = 403, description = "Admins only", body = ErrorResponse),
        (status = 404, description = "Enrollment not found", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Enrollments"
)]
#[instrument(skip(state, admin), fields(admin_id = %admin.user_id()))]
pub async fn delete_enrollment(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<EnrollmentId>,
) -> Result<Json<MessageResponse>, AppError> {
    EnrollmentService::delete(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Matrícula removida com sucesso")))
}
