mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_test_course, create_test_lesson, create_test_user, enroll,
    generate_unique_email, get, json_request, session_header, test_app,
};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use vibeflix_auth::Role;

struct Fixture {
    admin: String,
    student: String,
    student_id: Uuid,
    course_id: Uuid,
    lesson_id: Uuid,
}

async fn setup(pool: &PgPool) -> Fixture {
    let admin_id = create_test_user(pool, &generate_unique_email(), "admin123", Role::Admin).await;
    let student_id =
        create_test_user(pool, &generate_unique_email(), "student123", Role::Student).await;
    let course_id = create_test_course(pool, "Mentoria").await;
    let lesson_id = create_test_lesson(pool, course_id, 0, true).await;

    Fixture {
        admin: session_header(admin_id, Role::Admin, 0),
        student: session_header(student_id, Role::Student, 0),
        student_id,
        course_id,
        lesson_id,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_enrollment_upsert_is_idempotent(pool: PgPool) {
    let fx = setup(&pool).await;
    let app = test_app(pool.clone());

    let body = json!({ "userId": fx.student_id, "courseId": fx.course_id, "isActive": false });

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/enrollments", Some(&fx.admin), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let first = body_json(response).await;
    assert_eq!(first["enrollment"]["isActive"], false);
    assert_eq!(first["enrollment"]["course"]["title"], "Mentoria");

    let body = json!({ "userId": fx.student_id, "courseId": fx.course_id, "isActive": true });
    let response = app
        .oneshot(json_request("POST", "/api/enrollments", Some(&fx.admin), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let second = body_json(response).await;
    assert_eq!(second["enrollment"]["id"], first["enrollment"]["id"]);
    assert_eq!(second["enrollment"]["isActive"], true);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE user_id = $1")
        .bind(fx.student_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_enrollment_upsert_unknown_student(pool: PgPool) {
    let fx = setup(&pool).await;

    let body = json!({ "userId": Uuid::new_v4(), "courseId": fx.course_id, "isActive": true });
    let response = test_app(pool)
        .oneshot(json_request("POST", "/api/enrollments", Some(&fx.admin), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_cannot_manage_enrollments(pool: PgPool) {
    let fx = setup(&pool).await;

    let body = json!({ "userId": fx.student_id, "courseId": fx.course_id, "isActive": true });
    let response = test_app(pool)
        .oneshot(json_request("POST", "/api/enrollments", Some(&fx.student), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_lesson_requires_active_enrollment(pool: PgPool) {
    let fx = setup(&pool).await;
    let app = test_app(pool.clone());
    let uri = format!("/api/lessons/{}", fx.lesson_id);

    let response = app
        .clone()
        .oneshot(get(&uri, Some(&fx.student)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "Acesso negado");

    enroll(&pool, fx.student_id, fx.course_id, false).await;
    let response = app
        .clone()
        .oneshot(get(&uri, Some(&fx.student)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    enroll(&pool, fx.student_id, fx.course_id, true).await;
    let response = app.oneshot(get(&uri, Some(&fx.student))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let lesson = &body["lesson"];
    assert_eq!(lesson["id"], fx.lesson_id.to_string());
    assert_eq!(lesson["isCompleted"], false);
    assert_eq!(
        lesson["embedUrl"],
        "https://www.youtube.com/embed/dQw4w9WgXcQ"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unpublished_lesson_is_hidden_from_students(pool: PgPool) {
    let fx = setup(&pool).await;
    let draft_id = create_test_lesson(&pool, fx.course_id, 1, false).await;
    enroll(&pool, fx.student_id, fx.course_id, true).await;
    let app = test_app(pool);
    let uri = format!("/api/lessons/{}", draft_id);

    let response = app
        .clone()
        .oneshot(get(&uri, Some(&fx.student)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "Aula não disponível");

    let response = app.oneshot(get(&uri, Some(&fx.admin))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_course_page_redirects_when_not_enrolled(pool: PgPool) {
    let fx = setup(&pool).await;
    let app = test_app(pool.clone());
    let uri = format!("/courses/{}", fx.course_id);

    let response = app
        .clone()
        .oneshot(get(&uri, Some(&fx.student)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()["location"], "/dashboard");

    enroll(&pool, fx.student_id, fx.course_id, true).await;
    let response = app.oneshot(get(&uri, Some(&fx.student))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_note_upsert_keeps_one_note_per_lesson(pool: PgPool) {
    let fx = setup(&pool).await;
    enroll(&pool, fx.student_id, fx.course_id, true).await;
    let app = test_app(pool.clone());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/notes",
            Some(&fx.student),
            json!({ "lessonId": fx.lesson_id, "content": "primeira" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let first = body_json(response).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/notes",
            Some(&fx.student),
            json!({ "lessonId": fx.lesson_id, "content": "segunda" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let second = body_json(response).await;
    assert_eq!(second["note"]["id"], first["note"]["id"]);
    assert_eq!(second["note"]["content"], "segunda");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_completion_round_trip(pool: PgPool) {
    let fx = setup(&pool).await;
    enroll(&pool, fx.student_id, fx.course_id, true).await;
    let app = test_app(pool);
    let uri = format!("/api/lessons/{}/complete", fx.lesson_id);

    let response = app
        .clone()
        .oneshot(json_request("POST", &uri, Some(&fx.student), json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["completion"]["lessonId"],
        fx.lesson_id.to_string()
    );

    let response = app
        .clone()
        .oneshot(get(&format!("/api/lessons/{}", fx.lesson_id), Some(&fx.student)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["lesson"]["isCompleted"], true);

    let response = app
        .clone()
        .oneshot(json_request("DELETE", &uri, Some(&fx.student), json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(json_request("DELETE", &uri, Some(&fx.student), json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
