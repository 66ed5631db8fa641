use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use tracing::instrument;

use vibeflix_core::AppError;
use vibeflix_models::LessonPlanId;
use vibeflix_models::auth::MessageResponse;

use super::model::{LessonPlanDto, LessonPlanListParams, LessonPlanResponse, LessonPlansResponse};
use super::service::LessonPlanService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireAdmin;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/lesson-plans",
    params(LessonPlanListParams),
    responses(
        (status = 200, description = "Plans of the course in order", body = LessonPlansResponse),
        (status = 400, description = "courseId missing", body = ErrorResponse),
        (status = 403, description = "Course not accessible", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Lesson plans"
)]
#[instrument(skip(state, params))]
pub async fn list_lesson_plans(
    State(state): State<AppState>,
    auth_user: AuthUser,
    params: Result<Query<LessonPlanListParams>, QueryRejection>,
) -> Result<Json<LessonPlansResponse>, AppError> {
    let Query(params) = params
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Parâmetros inválidos: {}", e)))?;
    let course_id = params
        .course_id
        .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("courseId é obrigatório")))?;

    let plans = LessonPlanService::list(&state.db, &auth_user, course_id).await?;
    Ok(Json(LessonPlansResponse { lesson_plans: plans }))
}

#[utoipa::path(
    post,
    path = "/api/lesson-plans",
    request_body = LessonPlanDto,
    responses(
        (status = 201, description = "Lesson plan created", body = LessonPlanResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 403, description = "Admins only", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Lesson plans"
)]
#[instrument(skip_all, fields(admin_id = %admin.user_id()))]
pub async fn create_lesson_plan(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<LessonPlanDto>,
) -> Result<(StatusCode, Json<LessonPlanResponse>), AppError> {
    let plan = LessonPlanService::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(LessonPlanResponse { lesson_plan: plan })))
}

#[utoipa::path(
    put,
    path = "/api/lesson-plans/{id}",
    params(("id" = String, Path, description = "Lesson plan ID (UUID)")),
    request_body = LessonPlanDto,
    responses(
        (status = 200, description = "Lesson plan updated", body = LessonPlanResponse),
        (status = 403, description = "Admins only", body = ErrorResponse),
        (status = 404, description = "Lesson plan or course not found", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Lesson plans"
)]
#[instrument(skip_all, fields(admin_id = %admin.user_id(), plan_id = %id))]
pub async fn update_lesson_plan(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<LessonPlanId>,
    ValidatedJson(dto): ValidatedJson<LessonPlanDto>,
) -> Result<Json<LessonPlanResponse>, AppError> {
    let plan = LessonPlanService::update(&state.db, id, dto).await?;
    Ok(Json(LessonPlanResponse { lesson_plan: plan }))
}

#[utoipa::path(
    delete,
    path = "/api/lesson-plans/{id}",
    params(("id" = String, Path, description = "Lesson plan ID (UUID)")),
    responses(
        (status = 200, description = "Lesson plan deleted", body = MessageResponse),
        (status = 403, description = "Admins only", body = ErrorResponse),
        (status = 404, description = "Lesson plan not found", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Lesson plans"
)]
#[instrument(skip(state, admin), fields(admin_id = %admin.user_id()))]
pub async fn delete_lesson_plan(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<LessonPlanId>,
) -> Result<Json<MessageResponse>, AppError> {
    LessonPlanService::delete(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Plano de aula excluído com sucesso")))
}
