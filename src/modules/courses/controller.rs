use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use unidesk_core::{AppError, PaginationParams};
use unidesk_models::{
    Course, CourseFilterParams, CreateCourseDto, EnrollStudentDto, Enrollment, MessageResponse,
    PaginatedCoursesResponse, UpdateCourseDto,
};

use super::service::CourseService;
use crate::middleware::auth::{
    RequireCreateCourse, RequireDeleteCourse, RequireEditCourse, RequireViewCourses,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::scoping::CourseScope;
use crate::validator::ValidatedJson;

/// List courses. Teachers see the courses they teach, students the courses
/// they are enrolled in.
#[utoipa::path(
    get,
    path = "/api/courses",
    params(CourseFilterParams, PaginationParams),
    responses(
        (status = 200, description = "List of courses", body = PaginatedCoursesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Caller has no linked identity", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, auth))]
pub async fn get_courses(
    State(state): State<AppState>,
    RequireViewCourses(auth): RequireViewCourses,
    Query(filter): Query<CourseFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedCoursesResponse>, AppError> {
    let scope = CourseScope::for_principal(&auth)?;
    let response = CourseService::get_courses(&state.db, filter, scope, pagination).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course details", body = Course),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, auth))]
pub async fn get_course(
    State(state): State<AppState>,
    RequireViewCourses(auth): RequireViewCourses,
    Path(id): Path<Uuid>,
) -> Result<Json<Course>, AppError> {
    let scope = CourseScope::for_principal(&auth)?;
    let course = CourseService::get_course(&state.db, id, scope).await?;
    Ok(Json(course))
}

#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn create_course(
    State(state): State<AppState>,
    RequireCreateCourse(_auth): RequireCreateCourse,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let course = CourseService::create_course(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn update_course(
    State(state): State<AppState>,
    RequireEditCourse(_auth): RequireEditCourse,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::update_course(&state.db, id, dto).await?;
    Ok(Json(course))
}

#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course deleted", body = MessageResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, _auth))]
pub async fn delete_course(
    State(state): State<AppState>,
    RequireDeleteCourse(_auth): RequireDeleteCourse,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    CourseService::delete_course(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Course deleted successfully")))
}

#[utoipa::path(
    post,
    path = "/api/courses/{id}/enrollments",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = EnrollStudentDto,
    responses(
        (status = 201, description = "Student enrolled", body = Enrollment),
        (status = 400, description = "Already enrolled", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Course or student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn enroll_student(
    State(state): State<AppState>,
    RequireEditCourse(_auth): RequireEditCourse,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<EnrollStudentDto>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    let enrollment = CourseService::enroll_student(&state.db, id, dto.student_id).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

#[utoipa::path(
    delete,
    path = "/api/courses/{id}/enrollments/{student_id}",
    params(
        ("id" = Uuid, Path, description = "Course ID"),
        ("student_id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student unenrolled", body = MessageResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Enrollment not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, _auth))]
pub async fn unenroll_student(
    State(state): State<AppState>,
    RequireEditCourse(_auth): RequireEditCourse,
    Path((id, student_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, AppError> {
    CourseService::unenroll_student(&state.db, id, student_id).await?;
    Ok(Json(MessageResponse::new("Student unenrolled successfully")))
}
