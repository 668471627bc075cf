use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use unidesk_core::{AppError, PaginationParams};
use unidesk_db::{ensure_affected, map_db_error};
use unidesk_models::{
    CreateScheduleDto, PaginatedSchedulesResponse, Schedule, ScheduleFilterParams,
    UpdateScheduleDto,
};

use crate::utils::scoping::CourseScope;

const SCHEDULE_COLUMNS: &str = "s.id, s.course_id, s.group_id, s.day_of_week, s.start_time, \
                                s.end_time, s.room, s.created_at, s.updated_at";

/// A student sees slots of courses they are enrolled in plus every slot
/// booked for their group.
const SCOPED_FROM: &str = r#"FROM schedules s
      JOIN courses c ON c.id = s.course_id
      WHERE ($1::uuid IS NULL OR s.course_id = $1)
        AND ($2::uuid IS NULL OR s.group_id = $2)
        AND ($3::smallint IS NULL OR s.day_of_week = $3)
        AND ($4::uuid IS NULL OR c.teacher_id = $4)
        AND ($5::uuid IS NULL
             OR EXISTS (SELECT 1 FROM enrollments e
                        WHERE e.course_id = s.course_id AND e.student_id = $5)
             OR s.group_id = (SELECT st.group_id FROM students st WHERE st.id = $5))"#;

const TIME_ORDER_MESSAGE: &str = "end_time must be after start_time";

pub struct ScheduleService;

impl ScheduleService {
    #[instrument(skip(db))]
    pub async fn get_schedules(
        db: &PgPool,
        filter: ScheduleFilterParams,
        scope: CourseScope,
        pagination: PaginationParams,
    ) -> Result<PaginatedSchedulesResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) {SCOPED_FROM}"))
            .bind(filter.course_id)
            .bind(filter.group_id)
            .bind(filter.day_of_week)
            .bind(scope.taught_by())
            .bind(scope.enrolled_student())
            .fetch_one(db)
            .await?;

        let schedules = sqlx::query_as::<_, Schedule>(&format!(
            "SELECT {SCHEDULE_COLUMNS} {SCOPED_FROM}
             ORDER BY s.day_of_week, s.start_time LIMIT $6 OFFSET $7"
        ))
        .bind(filter.course_id)
        .bind(filter.group_id)
        .bind(filter.day_of_week)
        .bind(scope.taught_by())
        .bind(scope.enrolled_student())
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedSchedulesResponse {
            data: schedules,
            meta: pagination.meta(total),
        })
    }

    /// A slot outside the caller's scope reads as missing.
    #[instrument(skip(db))]
    pub async fn get_schedule(
        db: &PgPool,
        id: Uuid,
        scope: CourseScope,
    ) -> Result<Schedule, AppError> {
        sqlx::query_as::<_, Schedule>(&format!(
            "SELECT {SCHEDULE_COLUMNS} {SCOPED_FROM} AND s.id = $6"
        ))
        .bind(None::<Uuid>)
        .bind(None::<Uuid>)
        .bind(None::<i16>)
        .bind(scope.taught_by())
        .bind(scope.enrolled_student())
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Schedule not found")))
    }

    #[instrument(skip(db, dto), fields(course_id = %dto.course_id))]
    pub async fn create_schedule(
        db: &PgPool,
        dto: CreateScheduleDto,
    ) -> Result<Schedule, AppError> {
        if dto.end_time <= dto.start_time {
            return Err(AppError::bad_request(anyhow::anyhow!(TIME_ORDER_MESSAGE)));
        }

        sqlx::query_as::<_, Schedule>(&format!(
            r#"INSERT INTO schedules AS s (course_id, group_id, day_of_week, start_time, end_time, room)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {SCHEDULE_COLUMNS}"#
        ))
        .bind(dto.course_id)
        .bind(dto.group_id)
        .bind(dto.day_of_week)
        .bind(dto.start_time)
        .bind(dto.end_time)
        .bind(&dto.room)
        .fetch_one(db)
        .await
        .map_err(|e| map_db_error(e, "Duplicate schedule slot"))
    }

    /// Partial update. `group_id` and `room` may be cleared with `null`. The
    /// merged slot must still end after it starts.
    #[instrument(skip(db, dto))]
    pub async fn update_schedule(
        db: &PgPool,
        id: Uuid,
        dto: UpdateScheduleDto,
    ) -> Result<Schedule, AppError> {
        let existing = Self::get_schedule(db, id, CourseScope::All).await?;

        let group_id = dto.group_id.unwrap_or(existing.group_id);
        let day_of_week = dto.day_of_week.unwrap_or(existing.day_of_week);
        let start_time = dto.start_time.unwrap_or(existing.start_time);
        let end_time = dto.end_time.unwrap_or(existing.end_time);
        let room = dto.room.unwrap_or(existing.room);

        if end_time <= start_time {
            return Err(AppError::bad_request(anyhow::anyhow!(TIME_ORDER_MESSAGE)));
        }

        sqlx::query_as::<_, Schedule>(&format!(
            r#"UPDATE schedules AS s
               SET group_id = $1, day_of_week = $2, start_time = $3, end_time = $4,
                   room = $5, updated_at = NOW()
               WHERE s.id = $6
               RETURNING {SCHEDULE_COLUMNS}"#
        ))
        .bind(group_id)
        .bind(day_of_week)
        .bind(start_time)
        .bind(end_time)
        .bind(room)
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| map_db_error(e, "Duplicate schedule slot"))?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Schedule not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_schedule(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        ensure_affected(result.rows_affected(), "Schedule")
    }
}
