use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use unidesk_core::{AppError, PaginationParams};
use unidesk_db::{ensure_affected, map_db_error};
use unidesk_models::{
    Attendance, AttendanceFilterParams, CreateAttendanceDto, PaginatedAttendanceResponse,
    UpdateAttendanceDto,
};

const ATTENDANCE_COLUMNS: &str = "id, student_id, course_id, date, status, note, recorded_by, \
                                  created_at, updated_at";

const ATTENDANCE_FILTER: &str = "WHERE ($1::uuid IS NULL OR student_id = $1) \
                                 AND ($2::uuid IS NULL OR course_id = $2) \
                                 AND ($3::date IS NULL OR date = $3)";

const DUPLICATE_ATTENDANCE: &str = "Attendance already recorded for this student, course and date";

pub struct AttendanceService;

impl AttendanceService {
    #[instrument(skip(db))]
    pub async fn get_attendance(
        db: &PgPool,
        filter: AttendanceFilterParams,
        pagination: PaginationParams,
    ) -> Result<PaginatedAttendanceResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM attendance {ATTENDANCE_FILTER}"
        ))
        .bind(filter.student_id)
        .bind(filter.course_id)
        .bind(filter.date)
        .fetch_one(db)
        .await?;

        let records = sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance {ATTENDANCE_FILTER}
             ORDER BY date DESC, created_at DESC LIMIT $4 OFFSET $5"
        ))
        .bind(filter.student_id)
        .bind(filter.course_id)
        .bind(filter.date)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedAttendanceResponse {
            data: records,
            meta: pagination.meta(total),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_record(db: &PgPool, id: Uuid) -> Result<Attendance, AppError> {
        sqlx::query_as::<_, Attendance>(&format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Attendance record not found")))
    }

    #[instrument(skip(db, dto), fields(student_id = %dto.student_id, date = %dto.date))]
    pub async fn create_record(
        db: &PgPool,
        dto: CreateAttendanceDto,
        recorded_by: Option<Uuid>,
    ) -> Result<Attendance, AppError> {
        sqlx::query_as::<_, Attendance>(&format!(
            r#"INSERT INTO attendance (student_id, course_id, date, status, note, recorded_by)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {ATTENDANCE_COLUMNS}"#
        ))
        .bind(dto.student_id)
        .bind(dto.course_id)
        .bind(dto.date)
        .bind(dto.status.as_str())
        .bind(&dto.note)
        .bind(recorded_by)
        .fetch_one(db)
        .await
        .map_err(|e| map_db_error(e, DUPLICATE_ATTENDANCE))
    }

    #[instrument(skip(db, existing, dto), fields(id = %existing.id))]
    pub async fn update_record(
        db: &PgPool,
        existing: Attendance,
        dto: UpdateAttendanceDto,
    ) -> Result<Attendance, AppError> {
        let status = dto
            .status
            .map(|s| s.as_str().to_string())
            .unwrap_or(existing.status);
        let note = dto.note.or(existing.note);

        sqlx::query_as::<_, Attendance>(&format!(
            r#"UPDATE attendance
               SET status = $1, note = $2, updated_at = NOW()
               WHERE id = $3
               RETURNING {ATTENDANCE_COLUMNS}"#
        ))
        .bind(status)
        .bind(note)
        .bind(existing.id)
        .fetch_optional(db)
        .await
        .map_err(|e| map_db_error(e, DUPLICATE_ATTENDANCE))?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Attendance record not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_record(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM attendance WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        ensure_affected(result.rows_affected(), "Attendance record")
    }
}
