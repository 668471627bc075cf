use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use unidesk_core::{AppError, PaginationParams, Role};
use unidesk_models::{
    CreateGradeDto, Grade, GradeFilterParams, MessageResponse, PaginatedGradesResponse,
    UpdateGradeDto,
};

use super::service::GradeService;
use crate::middleware::auth::{
    RequireAdminOrTeacher, RequireAuth, RequireDeleteGrades, RequireEditGrades,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::courses::service::CourseService;
use crate::modules::teachers::service::TeacherService;
use crate::state::AppState;
use crate::utils::scoping::{
    ensure_grade_editable, scope_grade_filter, student_owns, submitting_teacher,
};
use crate::validator::ValidatedJson;

/// List grades. Students always receive their own grades; any `student_id`
/// or `course_id` they pass is ignored.
#[utoipa::path(
    get,
    path = "/api/grades",
    params(GradeFilterParams, PaginationParams),
    responses(
        (status = 200, description = "List of grades", body = PaginatedGradesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Caller has no linked identity", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Grades"
)]
#[instrument(skip(state, auth))]
pub async fn get_grades(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Query(filter): Query<GradeFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedGradesResponse>, AppError> {
    let filter = scope_grade_filter(&auth, filter)?;
    let response = GradeService::get_grades(&state.db, filter, pagination).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/grades/{id}",
    params(("id" = Uuid, Path, description = "Grade ID")),
    responses(
        (status = 200, description = "Grade details", body = Grade),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Grades"
)]
#[instrument(skip(state, auth))]
pub async fn get_grade(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Grade>, AppError> {
    let grade = GradeService::get_grade(&state.db, id).await?;
    if !student_owns(&auth, grade.student_id)? {
        return Err(AppError::not_found(anyhow::anyhow!("Grade not found")));
    }
    Ok(Json(grade))
}

/// Record a grade. Teachers submit as themselves and only for courses they
/// teach; admins may name the submitting teacher.
#[utoipa::path(
    post,
    path = "/api/grades",
    request_body = CreateGradeDto,
    responses(
        (status = 201, description = "Grade recorded", body = Grade),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Student or course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Grades"
)]
#[instrument(skip(state, auth, dto))]
pub async fn create_grade(
    State(state): State<AppState>,
    RequireAdminOrTeacher(auth): RequireAdminOrTeacher,
    ValidatedJson(dto): ValidatedJson<CreateGradeDto>,
) -> Result<(StatusCode, Json<Grade>), AppError> {
    let teacher_id = submitting_teacher(&auth, dto.teacher_id)?;
    if auth.role == Role::Teacher {
        if let Some(teacher_id) = teacher_id {
            CourseService::ensure_teaches(&state.db, teacher_id, dto.course_id).await?;
        }
    }

    let grade = GradeService::create_grade(&state.db, dto, teacher_id).await?;
    Ok((StatusCode::CREATED, Json(grade)))
}

/// Update a grade. A teacher may only change grades they submitted, and
/// only while grade editing is enabled for them.
#[utoipa::path(
    put,
    path = "/api/grades/{id}",
    params(("id" = Uuid, Path, description = "Grade ID")),
    request_body = UpdateGradeDto,
    responses(
        (status = 200, description = "Grade updated", body = Grade),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Grades"
)]
#[instrument(skip(state, auth, dto))]
pub async fn update_grade(
    State(state): State<AppState>,
    RequireEditGrades(auth): RequireEditGrades,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateGradeDto>,
) -> Result<Json<Grade>, AppError> {
    let existing = GradeService::get_grade(&state.db, id).await?;

    let teacher_override = match auth.role {
        Role::Teacher => TeacherService::grade_override(&state.db, auth.related_id()?).await?,
        Role::Admin | Role::Student => false,
    };
    ensure_grade_editable(&auth, existing.teacher_id, teacher_override)?;

    let grade = GradeService::update_grade(&state.db, existing, dto).await?;
    Ok(Json(grade))
}

#[utoipa::path(
    delete,
    path = "/api/grades/{id}",
    params(("id" = Uuid, Path, description = "Grade ID")),
    responses(
        (status = 200, description = "Grade deleted", body = MessageResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Grades"
)]
#[instrument(skip(state, _auth))]
pub async fn delete_grade(
    State(state): State<AppState>,
    RequireDeleteGrades(_auth): RequireDeleteGrades,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    GradeService::delete_grade(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Grade deleted successfully")))
}
