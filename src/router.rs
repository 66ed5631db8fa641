use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::gate::session_gate;
use crate::middleware::role::require_admin;
use crate::modules::auth::router::init_auth_router;
use crate::modules::comments::router::init_comments_router;
use crate::modules::courses::router::init_courses_router;
use crate::modules::enrollments::router::init_enrollments_router;
use crate::modules::health::health;
use crate::modules::lesson_plans::router::init_lesson_plans_router;
use crate::modules::lessons::router::init_lessons_router;
use crate::modules::notes::router::init_notes_router;
use crate::modules::pages::router::init_pages_router;
use crate::modules::students::router::init_students_router;
use crate::state::AppState;

/// The full application.
///
/// Layers run outside-in: logging, metrics, CORS, then the session gate, so
/// every request the gate turns away is still logged and counted.
pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/health", get(health))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest("/courses", init_courses_router())
                .nest("/lessons", init_lessons_router())
                .nest("/enrollments", init_enrollments_router())
                .nest("/notes", init_notes_router())
                .nest("/comments", init_comments_router())
                .nest("/lesson-plans", init_lesson_plans_router())
                .nest(
                    "/admin/students",
                    init_students_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
                ),
        )
        .merge(init_pages_router())
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(state.clone(), session_gate))
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::COOKIE])
                .expose_headers([header::SET_COOKIE])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
