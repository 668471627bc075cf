mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use sqlx::PgPool;

use common::{
    create_admin, create_course, create_group, create_schedule, create_student, create_teacher,
    enroll, login_as, send, setup_test_app,
};

fn ids(body: &Value) -> Vec<Value> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|slot| slot["id"].clone())
        .collect()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_sees_enrolled_and_group_slots(pool: PgPool) {
    let group = create_group(&pool).await;
    let student = create_student(&pool, Some(group)).await;
    let enrolled = create_course(&pool, None).await;
    let unrelated = create_course(&pool, None).await;
    enroll(&pool, student.record_id(), enrolled).await;

    let lecture = create_schedule(&pool, enrolled, None, 1).await;
    let group_lab = create_schedule(&pool, unrelated, Some(group), 2).await;
    let other = create_schedule(&pool, unrelated, None, 3).await;

    let token = login_as(&pool, &student).await;
    let (status, body) =
        send(setup_test_app(pool.clone()), "GET", "/api/schedules", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);
    let visible = ids(&body);
    assert!(visible.contains(&json!(lecture)));
    assert!(visible.contains(&json!(group_lab)));
    assert!(!visible.contains(&json!(other)));

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "GET",
        &format!("/api/schedules/{}", group_lab),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        setup_test_app(pool),
        "GET",
        &format!("/api/schedules/{}", other),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_sees_only_taught_slots(pool: PgPool) {
    let teacher = create_teacher(&pool, false).await;
    let colleague = create_teacher(&pool, false).await;
    let taught = create_course(&pool, teacher.id).await;
    let foreign = create_course(&pool, colleague.id).await;
    let own_slot = create_schedule(&pool, taught, None, 1).await;
    let foreign_slot = create_schedule(&pool, foreign, None, 1).await;

    let token = login_as(&pool, &teacher).await;
    let (status, body) =
        send(setup_test_app(pool.clone()), "GET", "/api/schedules", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![json!(own_slot)]);

    let (status, _) = send(
        setup_test_app(pool),
        "GET",
        &format!("/api/schedules/{}", foreign_slot),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_inverted_time_range_is_rejected(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let course = create_course(&pool, None).await;
    let slot = create_schedule(&pool, course, None, 4).await;
    let token = login_as(&pool, &admin).await;

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/schedules",
        Some(&token),
        Some(json!({
            "course_id": course,
            "day_of_week": 2,
            "start_time": "14:00:00",
            "end_time": "13:00:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Stored slot runs 09:00-10:30; moving only the end before the start fails.
    let (status, body) = send(
        setup_test_app(pool.clone()),
        "PUT",
        &format!("/api/schedules/{}", slot),
        Some(&token),
        Some(json!({ "end_time": "08:30:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "end_time must be after start_time");

    let (status, body) = send(
        setup_test_app(pool),
        "PUT",
        &format!("/api/schedules/{}", slot),
        Some(&token),
        Some(json!({ "start_time": "08:00:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["start_time"], "08:00:00");
    assert_eq!(body["end_time"], "10:30:00");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_clears_nullable_fields(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let group = create_group(&pool).await;
    let course = create_course(&pool, None).await;
    let slot = create_schedule(&pool, course, Some(group), 5).await;
    let token = login_as(&pool, &admin).await;
    let uri = format!("/api/schedules/{}", slot);

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "room": "B-204" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["room"], "B-204");
    assert_eq!(body["group_id"], json!(group));

    let (status, body) = send(
        setup_test_app(pool),
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "group_id": null, "room": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["group_id"].is_null());
    assert!(body["room"].is_null());
    assert_eq!(body["day_of_week"], 5);
}
