use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use unidesk_core::{AppError, PaginationParams, hash_password};
use unidesk_db::{ensure_affected, map_db_error};
use unidesk_models::{
    CreateStudentDto, PaginatedStudentsResponse, Student, StudentFilterParams, UpdateStudentDto,
};

const STUDENT_COLUMNS: &str = "id, first_name, last_name, email, student_number, group_id, \
                               enrollment_year, created_at, updated_at";

const DUPLICATE_STUDENT: &str = "A student with this email or student number already exists";

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db))]
    pub async fn get_students(
        db: &PgPool,
        filter: StudentFilterParams,
        pagination: PaginationParams,
    ) -> Result<PaginatedStudentsResponse, AppError> {
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let where_clause = r#"WHERE ($1::uuid IS NULL OR group_id = $1)
              AND ($2::text IS NULL OR first_name ILIKE $2 OR last_name ILIKE $2
                   OR email ILIKE $2 OR student_number ILIKE $2)"#;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM students {where_clause}"
        ))
        .bind(filter.group_id)
        .bind(&search)
        .fetch_one(db)
        .await?;

        let students = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students {where_clause}
             ORDER BY last_name, first_name LIMIT $3 OFFSET $4"
        ))
        .bind(filter.group_id)
        .bind(&search)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedStudentsResponse {
            data: students,
            meta: pagination.meta(total),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, id: Uuid) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))
    }

    /// Inserts the student and, when a password is supplied, its login
    /// account in the same transaction.
    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<Student, AppError> {
        let mut tx = db.begin().await?;

        let student = sqlx::query_as::<_, Student>(&format!(
            r#"INSERT INTO students (first_name, last_name, email, student_number, group_id, enrollment_year)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {STUDENT_COLUMNS}"#
        ))
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.email)
        .bind(&dto.student_number)
        .bind(dto.group_id)
        .bind(dto.enrollment_year)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_db_error(e, DUPLICATE_STUDENT))?;

        if let Some(password) = &dto.password {
            let hashed = hash_password(password)?;
            sqlx::query(
                r#"INSERT INTO users (email, password, name, role, related_id)
                   VALUES ($1, $2, $3, 'student', $4)"#,
            )
            .bind(&student.email)
            .bind(hashed)
            .bind(format!("{} {}", student.first_name, student.last_name))
            .bind(student.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "An account with this email already exists"))?;
        }

        tx.commit().await?;
        Ok(student)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        id: Uuid,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let existing = Self::get_student(db, id).await?;

        let first_name = dto.first_name.unwrap_or(existing.first_name);
        let last_name = dto.last_name.unwrap_or(existing.last_name);
        let email = dto.email.unwrap_or(existing.email);
        let student_number = dto.student_number.unwrap_or(existing.student_number);
        let group_id = dto.group_id.or(existing.group_id);
        let enrollment_year = dto.enrollment_year.or(existing.enrollment_year);

        sqlx::query_as::<_, Student>(&format!(
            r#"UPDATE students
               SET first_name = $1, last_name = $2, email = $3, student_number = $4,
                   group_id = $5, enrollment_year = $6, updated_at = NOW()
               WHERE id = $7
               RETURNING {STUDENT_COLUMNS}"#
        ))
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(student_number)
        .bind(group_id)
        .bind(enrollment_year)
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| map_db_error(e, DUPLICATE_STUDENT))?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))
    }

    /// Removes the student and any login account bound to it.
    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        ensure_affected(result.rows_affected(), "Student")?;

        sqlx::query("DELETE FROM users WHERE role = 'student' AND related_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
