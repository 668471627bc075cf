mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{
    create_admin, create_notification, create_student, create_teacher, login_as, send,
    setup_test_app,
};

#[sqlx::test(migrations = "./migrations")]
async fn test_mark_all_read_touches_only_caller(pool: PgPool) {
    let alice = create_student(&pool, None).await;
    let bob = create_student(&pool, None).await;
    create_notification(&pool, alice.record_id(), false).await;
    create_notification(&pool, alice.record_id(), false).await;
    create_notification(&pool, alice.record_id(), true).await;
    create_notification(&pool, bob.record_id(), false).await;

    let token = login_as(&pool, &alice).await;
    let (status, body) = send(
        setup_test_app(pool.clone()),
        "PATCH",
        "/api/notifications/read-all",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 2);

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/notifications/unread-count",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);

    let bob_unread: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND NOT is_read",
    )
    .bind(bob.record_id())
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(bob_unread, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unread_only_filter(pool: PgPool) {
    let teacher = create_teacher(&pool, false).await;
    let unread = create_notification(&pool, teacher.record_id(), false).await;
    create_notification(&pool, teacher.record_id(), true).await;

    let token = login_as(&pool, &teacher).await;
    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/notifications",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);

    let (status, body) = send(
        setup_test_app(pool),
        "GET",
        "/api/notifications?unread_only=true",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["id"], json!(unread));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cannot_touch_foreign_notification(pool: PgPool) {
    let alice = create_student(&pool, None).await;
    let bob = create_student(&pool, None).await;
    let bobs = create_notification(&pool, bob.record_id(), false).await;

    let token = login_as(&pool, &alice).await;
    let (status, _) = send(
        setup_test_app(pool.clone()),
        "PATCH",
        &format!("/api/notifications/{}/read", bobs),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "DELETE",
        &format!("/api/notifications/{}", bobs),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let is_read: bool = sqlx::query_scalar("SELECT is_read FROM notifications WHERE id = $1")
        .bind(bobs)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(!is_read);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_mark_read_sets_timestamp(pool: PgPool) {
    let student = create_student(&pool, None).await;
    let id = create_notification(&pool, student.record_id(), false).await;

    let token = login_as(&pool, &student).await;
    let (status, body) = send(
        setup_test_app(pool),
        "PATCH",
        &format!("/api/notifications/{}/read", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_read"], true);
    assert!(body["read_at"].is_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_sends_notification(pool: PgPool) {
    let teacher = create_teacher(&pool, false).await;
    let student = create_student(&pool, None).await;

    let token = login_as(&pool, &teacher).await;
    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/notifications",
        Some(&token),
        Some(json!({
            "recipient_id": student.id,
            "title": "Exam moved",
            "message": "The exam is now on Friday"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_read"], false);

    let token = login_as(&pool, &student).await;
    let (status, body) = send(
        setup_test_app(pool),
        "POST",
        "/api/notifications",
        Some(&token),
        Some(json!({
            "recipient_id": teacher.id,
            "title": "Hi",
            "message": "Hello"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "missing permission: canCreateNotification");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_broadcast_requires_recipient(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let token = login_as(&pool, &admin).await;

    let (status, _) = send(
        setup_test_app(pool),
        "POST",
        "/api/notifications",
        Some(&token),
        Some(json!({ "title": "Notice", "message": "Body" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
