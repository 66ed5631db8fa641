mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::{body_json, get, offline_app, session_header, session_set_cookies};
use tower::ServiceExt;
use uuid::Uuid;

use vibeflix_auth::Role;

const TWO_DAYS: i64 = 2 * 86400;

fn location(response: &axum::http::Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_health_is_public() {
    let response = offline_app().oneshot(get("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_anonymous_admin_page_redirects_to_login() {
    let response = offline_app()
        .oneshot(get("/admin/dashboard", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/login?from=/admin/dashboard");
}

#[tokio::test]
async fn test_anonymous_api_is_unauthorized() {
    let response = offline_app()
        .oneshot(get("/api/courses", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Não autenticado");
}

#[tokio::test]
async fn test_tampered_cookie_is_treated_as_anonymous() {
    let mut cookie = session_header(Uuid::new_v4(), Role::Admin, 0);
    cookie.push_str("tampered");

    let response = offline_app()
        .oneshot(get("/api/admin/students", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_student_is_forbidden_from_admin_api() {
    let cookie = session_header(Uuid::new_v4(), Role::Student, 0);

    let response = offline_app()
        .oneshot(get("/api/admin/students", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "Acesso negado");
}

#[tokio::test]
async fn test_student_on_admin_page_goes_home() {
    let cookie = session_header(Uuid::new_v4(), Role::Student, 0);

    let response = offline_app()
        .oneshot(get("/admin/courses", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn test_admin_on_student_page_goes_home() {
    let cookie = session_header(Uuid::new_v4(), Role::Admin, 0);

    let response = offline_app()
        .oneshot(get("/dashboard", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/admin/dashboard");
}

#[tokio::test]
async fn test_landing_redirects_signed_in_users() {
    let cookie = session_header(Uuid::new_v4(), Role::Student, 0);

    let response = offline_app().oneshot(get("/", Some(&cookie))).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn test_login_page_echoes_from() {
    let response = offline_app()
        .oneshot(get("/login?from=/admin/students", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["from"], "/admin/students");
}

#[tokio::test]
async fn test_old_session_is_refreshed() {
    let cookie = session_header(Uuid::new_v4(), Role::Student, TWO_DAYS);

    let response = offline_app()
        .oneshot(get("/api/unknown-endpoint", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let cookies = session_set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].contains("HttpOnly"));
}

#[tokio::test]
async fn test_fresh_session_is_not_refreshed() {
    let cookie = session_header(Uuid::new_v4(), Role::Student, 60);

    let response = offline_app()
        .oneshot(get("/api/unknown-endpoint", Some(&cookie)))
        .await
        .unwrap();

    assert!(session_set_cookies(&response).is_empty());
}

#[tokio::test]
async fn test_logout_cookie_is_not_overridden_by_refresh() {
    let cookie = session_header(Uuid::new_v4(), Role::Student, TWO_DAYS);

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .header("cookie", &cookie)
        .body(Body::empty())
        .unwrap();

    let response = offline_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = session_set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("session=;"));
}

#[tokio::test]
async fn test_cors_allows_configured_origin_with_credentials() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/courses")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = offline_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
        "true"
    );

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://evil.example")
        .body(Body::empty())
        .unwrap();

    let response = offline_app().oneshot(request).await.unwrap();
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}
