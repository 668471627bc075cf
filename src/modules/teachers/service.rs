use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use unidesk_core::{AppError, PaginationParams, hash_password};
use unidesk_db::{ensure_affected, map_db_error};
use unidesk_models::{
    CreateTeacherDto, GradePermissionAudit, GradePermissionState, PaginatedTeachersResponse,
    Teacher, TeacherFilterParams, UpdateTeacherDto,
};

use crate::metrics::track_grade_permission_toggle;

const TEACHER_COLUMNS: &str =
    "id, first_name, last_name, email, title, department_id, can_edit_grades, created_at, updated_at";

const DUPLICATE_TEACHER: &str = "A teacher with this email already exists";

pub struct TeacherService;

impl TeacherService {
    #[instrument(skip(db))]
    pub async fn get_teachers(
        db: &PgPool,
        filter: TeacherFilterParams,
        pagination: PaginationParams,
    ) -> Result<PaginatedTeachersResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM teachers WHERE ($1::uuid IS NULL OR department_id = $1)",
        )
        .bind(filter.department_id)
        .fetch_one(db)
        .await?;

        let teachers = sqlx::query_as::<_, Teacher>(&format!(
            r#"SELECT {TEACHER_COLUMNS} FROM teachers
               WHERE ($1::uuid IS NULL OR department_id = $1)
               ORDER BY last_name, first_name LIMIT $2 OFFSET $3"#
        ))
        .bind(filter.department_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedTeachersResponse {
            data: teachers,
            meta: pagination.meta(total),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_teacher(db: &PgPool, id: Uuid) -> Result<Teacher, AppError> {
        sqlx::query_as::<_, Teacher>(&format!(
            "SELECT {TEACHER_COLUMNS} FROM teachers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teacher not found")))
    }

    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn create_teacher(db: &PgPool, dto: CreateTeacherDto) -> Result<Teacher, AppError> {
        let mut tx = db.begin().await?;

        let teacher = sqlx::query_as::<_, Teacher>(&format!(
            r#"INSERT INTO teachers (first_name, last_name, email, title, department_id)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {TEACHER_COLUMNS}"#
        ))
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.email)
        .bind(&dto.title)
        .bind(dto.department_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_db_error(e, DUPLICATE_TEACHER))?;

        if let Some(password) = &dto.password {
            let hashed = hash_password(password)?;
            sqlx::query(
                r#"INSERT INTO users (email, password, name, role, related_id)
                   VALUES ($1, $2, $3, 'teacher', $4)"#,
            )
            .bind(&teacher.email)
            .bind(hashed)
            .bind(format!("{} {}", teacher.first_name, teacher.last_name))
            .bind(teacher.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "An account with this email already exists"))?;
        }

        tx.commit().await?;
        Ok(teacher)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_teacher(
        db: &PgPool,
        id: Uuid,
        dto: UpdateTeacherDto,
    ) -> Result<Teacher, AppError> {
        let existing = Self::get_teacher(db, id).await?;

        let first_name = dto.first_name.unwrap_or(existing.first_name);
        let last_name = dto.last_name.unwrap_or(existing.last_name);
        let email = dto.email.unwrap_or(existing.email);
        let title = dto.title.or(existing.title);
        let department_id = dto.department_id.or(existing.department_id);

        sqlx::query_as::<_, Teacher>(&format!(
            r#"UPDATE teachers
               SET first_name = $1, last_name = $2, email = $3, title = $4,
                   department_id = $5, updated_at = NOW()
               WHERE id = $6
               RETURNING {TEACHER_COLUMNS}"#
        ))
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(title)
        .bind(department_id)
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| map_db_error(e, DUPLICATE_TEACHER))?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teacher not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_teacher(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let result = sqlx::query("DELETE FROM teachers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        ensure_affected(result.rows_affected(), "Teacher")?;

        sqlx::query("DELETE FROM users WHERE role = 'teacher' AND related_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Flips the teacher's grade-edit override with a single
    /// `SET x = NOT x` statement and appends an audit row in the same
    /// transaction. Concurrent toggles serialize on the row lock.
    #[instrument(skip(db))]
    pub async fn toggle_grade_permission(
        db: &PgPool,
        teacher_id: Uuid,
        changed_by: Uuid,
    ) -> Result<GradePermissionState, AppError> {
        let mut tx = db.begin().await?;

        let state = sqlx::query_as::<_, GradePermissionState>(
            r#"UPDATE teachers
               SET can_edit_grades = NOT can_edit_grades, updated_at = NOW()
               WHERE id = $1
               RETURNING id AS teacher_id, can_edit_grades"#,
        )
        .bind(teacher_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teacher not found")))?;

        sqlx::query(
            r#"INSERT INTO grade_permission_audit (teacher_id, changed_by, new_value)
               VALUES ($1, $2, $3)"#,
        )
        .bind(teacher_id)
        .bind(changed_by)
        .bind(state.can_edit_grades)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_db_error(e, "Duplicate audit entry"))?;

        tx.commit().await?;

        track_grade_permission_toggle();
        tracing::info!(
            teacher_id = %teacher_id,
            changed_by = %changed_by,
            can_edit_grades = state.can_edit_grades,
            "grade permission toggled"
        );

        Ok(state)
    }

    /// The teacher's override, read where a grade edit is being decided.
    #[instrument(skip(db))]
    pub async fn grade_override(db: &PgPool, teacher_id: Uuid) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>("SELECT can_edit_grades FROM teachers WHERE id = $1")
            .bind(teacher_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("identity not found")))
    }

    #[instrument(skip(db))]
    pub async fn grade_permission_history(
        db: &PgPool,
        teacher_id: Uuid,
    ) -> Result<Vec<GradePermissionAudit>, AppError> {
        Self::get_teacher(db, teacher_id).await?;

        let entries = sqlx::query_as::<_, GradePermissionAudit>(
            r#"SELECT id, teacher_id, changed_by, new_value, changed_at
               FROM grade_permission_audit
               WHERE teacher_id = $1
               ORDER BY changed_at DESC, id"#,
        )
        .bind(teacher_id)
        .fetch_all(db)
        .await?;

        Ok(entries)
    }
}
