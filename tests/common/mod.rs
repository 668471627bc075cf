use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use unidesk::router::init_router;
use unidesk::state::AppState;
use unidesk_config::{CorsConfig, JwtConfig, ServerConfig};
use unidesk_core::hash_password;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_PASSWORD: &str = "testpass123";

pub fn test_state(pool: PgPool) -> AppState {
    AppState {
        db: pool,
        jwt_config: JwtConfig::for_tests(TEST_SECRET),
        cors_config: CorsConfig::from_env(),
        server_config: ServerConfig::from_env(),
    }
}

pub fn setup_test_app(pool: PgPool) -> axum::Router {
    init_router(test_state(pool))
}

pub fn generate_unique_email() -> String {
    format!("test-{}@uni.test", Uuid::new_v4())
}

fn unique_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}

/// Inserts a login account and returns its id.
pub async fn create_account(
    pool: &PgPool,
    email: &str,
    role: &str,
    related_id: Option<Uuid>,
) -> Uuid {
    let hashed = hash_password(TEST_PASSWORD).unwrap();

    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO users (email, password, name, role, related_id)
           VALUES ($1, $2, 'Test User', $3, $4)
           RETURNING id"#,
    )
    .bind(email)
    .bind(hashed)
    .bind(role)
    .bind(related_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub struct TestPerson {
    /// Row id in `students` / `teachers`; `None` for admins
    pub id: Option<Uuid>,
    pub user_id: Uuid,
    pub email: String,
}

impl TestPerson {
    #[allow(dead_code)]
    pub fn record_id(&self) -> Uuid {
        self.id.unwrap()
    }
}

#[allow(dead_code)]
pub async fn create_admin(pool: &PgPool) -> TestPerson {
    let email = generate_unique_email();
    let user_id = create_account(pool, &email, "admin", None).await;
    TestPerson {
        id: None,
        user_id,
        email,
    }
}

#[allow(dead_code)]
pub async fn create_teacher(pool: &PgPool, can_edit_grades: bool) -> TestPerson {
    let email = generate_unique_email();
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO teachers (first_name, last_name, email, can_edit_grades)
           VALUES ('Test', 'Teacher', $1, $2)
           RETURNING id"#,
    )
    .bind(&email)
    .bind(can_edit_grades)
    .fetch_one(pool)
    .await
    .unwrap();

    let user_id = create_account(pool, &email, "teacher", Some(id)).await;
    TestPerson {
        id: Some(id),
        user_id,
        email,
    }
}

#[allow(dead_code)]
pub async fn create_student(pool: &PgPool, group_id: Option<Uuid>) -> TestPerson {
    let email = generate_unique_email();
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO students (first_name, last_name, email, student_number, group_id)
           VALUES ('Test', 'Student', $1, $2, $3)
           RETURNING id"#,
    )
    .bind(&email)
    .bind(format!("S-{}", unique_suffix()))
    .bind(group_id)
    .fetch_one(pool)
    .await
    .unwrap();

    let user_id = create_account(pool, &email, "student", Some(id)).await;
    TestPerson {
        id: Some(id),
        user_id,
        email,
    }
}

#[allow(dead_code)]
pub async fn create_group(pool: &PgPool) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO student_groups (name, year) VALUES ($1, 1) RETURNING id",
    )
    .bind(format!("G-{}", unique_suffix()))
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn create_course(pool: &PgPool, teacher_id: Option<Uuid>) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO courses (code, name, teacher_id)
           VALUES ($1, 'Test Course', $2)
           RETURNING id"#,
    )
    .bind(format!("C{}", unique_suffix()))
    .bind(teacher_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn enroll(pool: &PgPool, student_id: Uuid, course_id: Uuid) {
    sqlx::query("INSERT INTO enrollments (student_id, course_id) VALUES ($1, $2)")
        .bind(student_id)
        .bind(course_id)
        .execute(pool)
        .await
        .unwrap();
}

#[allow(dead_code)]
pub async fn create_grade(
    pool: &PgPool,
    student_id: Uuid,
    course_id: Uuid,
    teacher_id: Option<Uuid>,
    value: i32,
) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO grades (student_id, course_id, teacher_id, value)
           VALUES ($1, $2, $3, $4)
           RETURNING id"#,
    )
    .bind(student_id)
    .bind(course_id)
    .bind(teacher_id)
    .bind(value)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn create_notification(pool: &PgPool, recipient_id: Uuid, is_read: bool) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO notifications (recipient_id, title, message, is_read)
           VALUES ($1, 'Notice', 'Body', $2)
           RETURNING id"#,
    )
    .bind(recipient_id)
    .bind(is_read)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn get_auth_token(app: axum::Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

#[allow(dead_code)]
pub async fn login_as(pool: &PgPool, person: &TestPerson) -> String {
    get_auth_token(setup_test_app(pool.clone()), &person.email, TEST_PASSWORD).await
}

/// Sends a JSON request and returns the status and parsed body
/// (`Value::Null` for an empty body).
pub async fn send(
    app: axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

#[allow(dead_code)]
pub async fn create_schedule(
    pool: &PgPool,
    course_id: Uuid,
    group_id: Option<Uuid>,
    day_of_week: i16,
) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO schedules (course_id, group_id, day_of_week, start_time, end_time)
           VALUES ($1, $2, $3, '09:00', '10:30')
           RETURNING id"#,
    )
    .bind(course_id)
    .bind(group_id)
    .bind(day_of_week)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn create_attendance(
    pool: &PgPool,
    student_id: Uuid,
    course_id: Uuid,
    date: &str,
) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO attendance (student_id, course_id, date, status)
           VALUES ($1, $2, $3::date, 'present')
           RETURNING id"#,
    )
    .bind(student_id)
    .bind(course_id)
    .bind(date)
    .fetch_one(pool)
    .await
    .unwrap()
}
