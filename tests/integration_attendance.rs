mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{
    create_attendance, create_course, create_student, create_teacher, login_as, send,
    setup_test_app,
};

#[sqlx::test(migrations = "./migrations")]
async fn test_student_attendance_listing_is_forced_to_self(pool: PgPool) {
    let course = create_course(&pool, None).await;
    let alice = create_student(&pool, None).await;
    let bob = create_student(&pool, None).await;
    let own = create_attendance(&pool, alice.record_id(), course, "2025-03-10").await;
    create_attendance(&pool, bob.record_id(), course, "2025-03-10").await;
    create_attendance(&pool, bob.record_id(), course, "2025-03-11").await;

    let token = login_as(&pool, &alice).await;
    let uri = format!("/api/attendance?student_id={}", bob.record_id());
    let (status, body) = send(setup_test_app(pool), "GET", &uri, Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["id"], json!(own));
    assert_eq!(body["data"][0]["student_id"], json!(alice.id));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_records_attendance_for_own_course(pool: PgPool) {
    let teacher = create_teacher(&pool, false).await;
    let course = create_course(&pool, teacher.id).await;
    let student = create_student(&pool, None).await;

    let token = login_as(&pool, &teacher).await;
    let (status, body) = send(
        setup_test_app(pool),
        "POST",
        "/api/attendance",
        Some(&token),
        Some(json!({
            "student_id": student.id,
            "course_id": course,
            "date": "2025-03-12",
            "status": "late"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "late");
    assert_eq!(body["recorded_by"], json!(teacher.id));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_cannot_record_attendance_for_foreign_course(pool: PgPool) {
    let teacher = create_teacher(&pool, false).await;
    let colleague = create_teacher(&pool, false).await;
    let course = create_course(&pool, colleague.id).await;
    let student = create_student(&pool, None).await;

    let token = login_as(&pool, &teacher).await;
    let (status, body) = send(
        setup_test_app(pool),
        "POST",
        "/api/attendance",
        Some(&token),
        Some(json!({
            "student_id": student.id,
            "course_id": course,
            "date": "2025-03-12",
            "status": "present"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "course is taught by another teacher");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_cannot_edit_attendance_for_foreign_course(pool: PgPool) {
    let teacher = create_teacher(&pool, false).await;
    let colleague = create_teacher(&pool, false).await;
    let course = create_course(&pool, colleague.id).await;
    let student = create_student(&pool, None).await;
    let record = create_attendance(&pool, student.record_id(), course, "2025-03-10").await;

    let token = login_as(&pool, &teacher).await;
    let (status, body) = send(
        setup_test_app(pool.clone()),
        "PUT",
        &format!("/api/attendance/{}", record),
        Some(&token),
        Some(json!({ "status": "absent" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "course is taught by another teacher");

    let stored: String = sqlx::query_scalar("SELECT status FROM attendance WHERE id = $1")
        .bind(record)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, "present");
}
