use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use unidesk_core::{AppError, PaginationParams};
use unidesk_db::{ensure_affected, map_db_error};
use unidesk_models::{
    CreateGradeDto, Grade, GradeFilterParams, GradeType, PaginatedGradesResponse, UpdateGradeDto,
};

const GRADE_COLUMNS: &str = "id, student_id, course_id, teacher_id, value, grade_type, comment, \
                             graded_on, created_at, updated_at";

const GRADE_FILTER: &str = "WHERE ($1::uuid IS NULL OR student_id = $1) \
                            AND ($2::uuid IS NULL OR course_id = $2)";

pub struct GradeService;

impl GradeService {
    #[instrument(skip(db))]
    pub async fn get_grades(
        db: &PgPool,
        filter: GradeFilterParams,
        pagination: PaginationParams,
    ) -> Result<PaginatedGradesResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM grades {GRADE_FILTER}"
        ))
        .bind(filter.student_id)
        .bind(filter.course_id)
        .fetch_one(db)
        .await?;

        let grades = sqlx::query_as::<_, Grade>(&format!(
            "SELECT {GRADE_COLUMNS} FROM grades {GRADE_FILTER}
             ORDER BY graded_on DESC, created_at DESC LIMIT $3 OFFSET $4"
        ))
        .bind(filter.student_id)
        .bind(filter.course_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedGradesResponse {
            data: grades,
            meta: pagination.meta(total),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_grade(db: &PgPool, id: Uuid) -> Result<Grade, AppError> {
        sqlx::query_as::<_, Grade>(&format!(
            "SELECT {GRADE_COLUMNS} FROM grades WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Grade not found")))
    }

    /// Records a grade. `teacher_id` is the already-resolved submitter.
    #[instrument(skip(db, dto), fields(student_id = %dto.student_id, course_id = %dto.course_id))]
    pub async fn create_grade(
        db: &PgPool,
        dto: CreateGradeDto,
        teacher_id: Option<Uuid>,
    ) -> Result<Grade, AppError> {
        let grade_type = dto.grade_type.unwrap_or(GradeType::Exam);
        let graded_on = dto.graded_on.unwrap_or_else(|| Utc::now().date_naive());

        sqlx::query_as::<_, Grade>(&format!(
            r#"INSERT INTO grades (student_id, course_id, teacher_id, value, grade_type, comment, graded_on)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING {GRADE_COLUMNS}"#
        ))
        .bind(dto.student_id)
        .bind(dto.course_id)
        .bind(teacher_id)
        .bind(dto.value)
        .bind(grade_type.as_str())
        .bind(&dto.comment)
        .bind(graded_on)
        .fetch_one(db)
        .await
        .map_err(|e| map_db_error(e, "Duplicate grade"))
    }

    #[instrument(skip(db, existing, dto), fields(id = %existing.id))]
    pub async fn update_grade(
        db: &PgPool,
        existing: Grade,
        dto: UpdateGradeDto,
    ) -> Result<Grade, AppError> {
        let value = dto.value.unwrap_or(existing.value);
        let grade_type = dto
            .grade_type
            .map(|t| t.as_str().to_string())
            .unwrap_or(existing.grade_type);
        let comment = dto.comment.or(existing.comment);
        let graded_on = dto.graded_on.unwrap_or(existing.graded_on);

        sqlx::query_as::<_, Grade>(&format!(
            r#"UPDATE grades
               SET value = $1, grade_type = $2, comment = $3, graded_on = $4, updated_at = NOW()
               WHERE id = $5
               RETURNING {GRADE_COLUMNS}"#
        ))
        .bind(value)
        .bind(grade_type)
        .bind(comment)
        .bind(graded_on)
        .bind(existing.id)
        .fetch_optional(db)
        .await
        .map_err(|e| map_db_error(e, "Duplicate grade"))?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Grade not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_grade(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM grades WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        ensure_affected(result.rows_affected(), "Grade")
    }
}
