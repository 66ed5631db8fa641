//! Page handlers. Role checks for `/dashboard`, `/courses` and `/admin` happen
//! in the session gate before any of these run.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use vibeflix_core::AppError;
use vibeflix_models::courses::{CourseProgress, CourseWithCounts};
use vibeflix_models::enrollments::EnrollmentListParams;
use vibeflix_models::lessons::LessonDetail;
use vibeflix_models::users::StudentWithStats;
use vibeflix_models::{CourseId, LessonId};

use super::model::{
    AdminCourseLessons, AdminEnrollmentsPage, AdminStats, FormField, FormPage, FromParams,
    LandingPage, PageOutcome, StudentDashboard,
};
use super::service::PageService;
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::middleware::gate::home_for;
use crate::modules::courses::service::CourseService;
use crate::modules::students::service::StudentService;
use crate::state::AppState;

const EMAIL_FIELD: FormField = FormField {
    name: "email",
    label: "Email",
    kind: "email",
    min_length: None,
};

const PASSWORD_FIELD: FormField = FormField {
    name: "password",
    label: "Senha",
    kind: "password",
    min_length: Some(6),
};

/// Signed-in visitors go straight to their home page.
#[instrument(skip_all)]
pub async fn landing(MaybeAuthUser(viewer): MaybeAuthUser) -> Response {
    match viewer {
        Some(viewer) => Redirect::temporary(home_for(viewer.role())).into_response(),
        None => Json(LandingPage {
            title: "Vibeflix",
            description: "Plataforma de cursos em vídeo",
            login_url: "/login",
            register_url: "/register",
        })
        .into_response(),
    }
}

#[instrument(skip_all)]
pub async fn login_page(params: Result<Query<FromParams>, QueryRejection>) -> Json<FormPage> {
    let from = params.ok().and_then(|Query(p)| p.from);

    Json(FormPage {
        title: "Entrar",
        action: "/api/auth/login",
        method: "POST",
        fields: vec![EMAIL_FIELD, PASSWORD_FIELD],
        from,
        alternate_label: "Criar conta",
        alternate_url: "/register",
    })
}

#[instrument(skip_all)]
pub async fn register_page() -> Json<FormPage> {
    Json(FormPage {
        title: "Criar conta",
        action: "/api/auth/register",
        method: "POST",
        fields: vec![
            FormField {
                name: "name",
                label: "Nome",
                kind: "text",
                min_length: Some(2),
            },
            EMAIL_FIELD,
            PASSWORD_FIELD,
        ],
        from: None,
        alternate_label: "Já tenho conta",
        alternate_url: "/login",
    })
}

#[instrument(skip(state))]
pub async fn student_dashboard(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<StudentDashboard>, AppError> {
    let dashboard = PageService::student_dashboard(&state.db, &auth_user).await?;
    Ok(Json(dashboard))
}

#[instrument(skip(state))]
pub async fn course_page(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(course_id): Path<CourseId>,
) -> Result<PageOutcome<CourseProgress>, AppError> {
    PageService::course_page(&state.db, &auth_user, course_id).await
}

#[instrument(skip(state))]
pub async fn lesson_page(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((course_id, lesson_id)): Path<(CourseId, LessonId)>,
) -> Result<PageOutcome<LessonDetail>, AppError> {
    PageService::lesson_page(&state.db, &auth_user, course_id, lesson_id).await
}

#[instrument(skip(state))]
pub async fn admin_dashboard(State(state): State<AppState>) -> Result<Json<AdminStats>, AppError> {
    let stats = PageService::admin_stats(&state.db).await?;
    Ok(Json(stats))
}

#[instrument(skip(state))]
pub async fn admin_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseWithCounts>>, AppError> {
    let courses = CourseService::with_counts(&state.db).await?;
    Ok(Json(courses))
}

#[instrument(skip(state))]
pub async fn admin_course_lessons(
    State(state): State<AppState>,
    Path(course_id): Path<CourseId>,
) -> Result<PageOutcome<AdminCourseLessons>, AppError> {
    PageService::admin_course_lessons(&state.db, course_id).await
}

#[instrument(skip(state))]
pub async fn admin_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentWithStats>>, AppError> {
    let students = StudentService::get_students(&state.db).await?;
    Ok(Json(students))
}

#[instrument(skip(state, params))]
pub async fn admin_enrollments(
    State(state): State<AppState>,
    params: Result<Query<EnrollmentListParams>, QueryRejection>,
) -> Result<Json<AdminEnrollmentsPage>, AppError> {
    let Query(params) = params
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Parâmetros inválidos: {}", e)))?;

    let page = PageService::admin_enrollments(&state.db, &params).await?;
    Ok(Json(page))
}
