mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

use common::{TEST_PASSWORD, create_student, send, setup_test_app};

#[sqlx::test(migrations = "./migrations")]
async fn test_login_sets_session_cookie(pool: PgPool) {
    let student = create_student(&pool, None).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "email": student.email,
                "password": TEST_PASSWORD
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = setup_test_app(pool.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("unidesk_session="));
    assert!(cookie.contains("HttpOnly"));

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["principal"]["role"], "student");
    assert_eq!(body["principal"]["related_id"], json!(student.id));

    // The cookie alone authenticates subsequent requests.
    let session = cookie.split(';').next().unwrap().to_string();
    let request = Request::builder()
        .uri("/api/auth/me")
        .header(header::COOKIE, session)
        .body(Body::empty())
        .unwrap();
    let response = setup_test_app(pool).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    let student = create_student(&pool, None).await;

    let (status, body) = send(
        setup_test_app(pool),
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": student.email, "password": "not-the-password" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_unknown_email(pool: PgPool) {
    let (status, _) = send(
        setup_test_app(pool),
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "nobody@uni.test", "password": TEST_PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_rejects_malformed_body(pool: PgPool) {
    let (status, _) = send(
        setup_test_app(pool),
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "nobody@uni.test" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_logout_clears_cookie(pool: PgPool) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .header(header::COOKIE, "unidesk_session=stale-token")
        .body(Body::empty())
        .unwrap();

    let response = setup_test_app(pool).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("unidesk_session="));
    assert!(cookie.contains("Max-Age=0"));
}
