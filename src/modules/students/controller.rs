use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use vibeflix_core::AppError;
use vibeflix_models::UserId;
use vibeflix_models::auth::MessageResponse;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::students::model::{
    CreateStudentDto, StudentResponse, StudentsResponse, UpdateStudentDto, UserResponse,
};
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/admin/students",
    responses(
        (status = 200, description = "Students with enrollment counts, newest first", body = StudentsResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Admins only", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Students"
)]
#[instrument(skip_all, fields(admin_id = %auth_user.user_id()))]
pub async fn get_students(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<StudentsResponse>, AppError> {
    let students = StudentService::get_students(&state.db).await?;
    Ok(Json(StudentsResponse { students }))
}

#[utoipa::path(
    post,
    path = "/api/admin/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = UserResponse),
        (status = 400, description = "Invalid payload or email already registered", body = ErrorResponse),
        (status = 403, description = "Admins only", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Students"
)]
#[instrument(skip_all, fields(admin_id = %auth_user.user_id(), email = %dto.email))]
pub async fn create_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let student = StudentService::create_student(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(UserResponse { user: student })))
}

#[utoipa::path(
    get,
    path = "/api/admin/students/{id}",
    params(("id" = String, Path, description = "Student ID (UUID)")),
    responses(
        (status = 200, description = "Student with enrollment count", body = StudentResponse),
        (status = 403, description = "Admins only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Students"
)]
#[instrument(skip_all, fields(admin_id = %auth_user.user_id(), student_id = %id))]
pub async fn get_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<UserId>,
) -> Result<Json<StudentResponse>, AppError> {
    let student = StudentService::get_student(&state.db, id).await?;
    Ok(Json(StudentResponse { student }))
}

#[utoipa::path(
    put,
    path = "/api/admin/students/{id}",
    params(("id" = String, Path, description = "Student ID (UUID)")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = UserResponse),
        (status = 400, description = "Invalid payload or email already registered", body = ErrorResponse),
        (status = 403, description = "Admins only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Students"
)]
#[instrument(skip_all, fields(admin_id = %auth_user.user_id(), student_id = %id))]
pub async fn update_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<UserId>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<UserResponse>, AppError> {
    let student = StudentService::update_student(&state.db, id, dto).await?;
    Ok(Json(UserResponse { user: student }))
}

#[utoipa::path(
    delete,
    path = "/api/admin/students/{id}",
    params(("id" = String, Path, description = "Student ID (UUID)")),
    responses(
        (status = 200, description = "Student deleted", body = MessageResponse),
        (status = 403, description = "Admins only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("session_cookie" = [])),
    tag = "Students"
)]
#[instrument(skip_all, fields(admin_id = %auth_user.user_id(), student_id = %id))]
pub async fn delete_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<UserId>,
) -> Result<Json<MessageResponse>, AppError> {
    StudentService::delete_student(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Aluno excluído com sucesso")))
}
