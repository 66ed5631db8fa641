mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_test_user, generate_unique_email, get, json_request, session_set_cookies,
    test_app,
};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

use vibeflix_auth::Role;

fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap_or_default().to_string()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_success_sets_session_cookie(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "testpass123", Role::Student).await;

    let app = test_app(pool.clone());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": email, "password": "testpass123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = session_set_cookies(&response);
    assert_eq!(cookies.len(), 1);

    let body = body_json(response).await;
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["user"]["role"], "STUDENT");
    assert!(body["user"].get("password").is_none());

    let cookie = cookie_pair(&cookies[0]);
    let response = app
        .oneshot(get("/api/auth/me", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["user"]["email"], email);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, "testpass123", Role::Student).await;

    let response = test_app(pool)
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": email, "password": "wrongpass" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(session_set_cookies(&response).is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_unknown_email(pool: PgPool) {
    let response = test_app(pool)
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "nobody@test.com", "password": "whatever" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_invalid_payload(pool: PgPool) {
    let response = test_app(pool)
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "not-an-email", "password": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Dados inválidos");
    assert!(body.get("details").is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_creates_student(pool: PgPool) {
    let email = generate_unique_email();
    let app = test_app(pool.clone());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({ "name": "Nova Aluna", "email": email, "password": "segredo123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(session_set_cookies(&response).len(), 1);
    assert_eq!(body_json(response).await["user"]["role"], "STUDENT");

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({ "name": "Outra", "email": email, "password": "segredo123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
