use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use unidesk_core::{AppError, PaginationParams};
use unidesk_db::{ensure_affected, map_db_error};
use unidesk_models::{
    Course, CourseFilterParams, CreateCourseDto, Enrollment, PaginatedCoursesResponse,
    UpdateCourseDto,
};

use crate::utils::scoping::CourseScope;

const COURSE_COLUMNS: &str = "c.id, c.code, c.name, c.description, c.credits, c.department_id, \
                              c.teacher_id, c.created_at, c.updated_at";

const DUPLICATE_COURSE: &str = "A course with this code already exists";

const DEFAULT_CREDITS: i32 = 3;

/// `$1` department, `$2` teacher, `$3` enrolled student.
const SCOPED_WHERE: &str = r#"($1::uuid IS NULL OR c.department_id = $1)
      AND ($2::uuid IS NULL OR c.teacher_id = $2)
      AND ($3::uuid IS NULL OR EXISTS (
          SELECT 1 FROM enrollments e WHERE e.course_id = c.id AND e.student_id = $3))"#;

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db))]
    pub async fn get_courses(
        db: &PgPool,
        filter: CourseFilterParams,
        scope: CourseScope,
        pagination: PaginationParams,
    ) -> Result<PaginatedCoursesResponse, AppError> {
        let teacher_id = scope.taught_by().or(filter.teacher_id);
        let student_id = scope.enrolled_student();

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM courses c WHERE {SCOPED_WHERE}"
        ))
        .bind(filter.department_id)
        .bind(teacher_id)
        .bind(student_id)
        .fetch_one(db)
        .await?;

        let courses = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses c WHERE {SCOPED_WHERE}
             ORDER BY c.code LIMIT $4 OFFSET $5"
        ))
        .bind(filter.department_id)
        .bind(teacher_id)
        .bind(student_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedCoursesResponse {
            data: courses,
            meta: pagination.meta(total),
        })
    }

    /// A course outside the caller's scope is reported as not found.
    #[instrument(skip(db))]
    pub async fn get_course(db: &PgPool, id: Uuid, scope: CourseScope) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(&format!(
            r#"SELECT {COURSE_COLUMNS} FROM courses c
               WHERE c.id = $4 AND {SCOPED_WHERE}"#
        ))
        .bind(None::<Uuid>)
        .bind(scope.taught_by())
        .bind(scope.enrolled_student())
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))
    }

    #[instrument(skip(db, dto), fields(code = %dto.code))]
    pub async fn create_course(db: &PgPool, dto: CreateCourseDto) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(&format!(
            r#"INSERT INTO courses AS c (code, name, description, credits, department_id, teacher_id)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {COURSE_COLUMNS}"#
        ))
        .bind(dto.code.trim().to_uppercase())
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.credits.unwrap_or(DEFAULT_CREDITS))
        .bind(dto.department_id)
        .bind(dto.teacher_id)
        .fetch_one(db)
        .await
        .map_err(|e| map_db_error(e, DUPLICATE_COURSE))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_course(
        db: &PgPool,
        id: Uuid,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        let existing = Self::get_course(db, id, CourseScope::All).await?;

        let code = dto
            .code
            .map(|c| c.trim().to_uppercase())
            .unwrap_or(existing.code);
        let name = dto.name.unwrap_or(existing.name);
        let description = dto.description.unwrap_or(existing.description);
        let credits = dto.credits.unwrap_or(existing.credits);
        let department_id = dto.department_id.unwrap_or(existing.department_id);
        let teacher_id = dto.teacher_id.unwrap_or(existing.teacher_id);

        sqlx::query_as::<_, Course>(&format!(
            r#"UPDATE courses AS c
               SET code = $1, name = $2, description = $3, credits = $4,
                   department_id = $5, teacher_id = $6, updated_at = NOW()
               WHERE c.id = $7
               RETURNING {COURSE_COLUMNS}"#
        ))
        .bind(code)
        .bind(name)
        .bind(description)
        .bind(credits)
        .bind(department_id)
        .bind(teacher_id)
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| map_db_error(e, DUPLICATE_COURSE))?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_course(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        ensure_affected(result.rows_affected(), "Course")
    }

    #[instrument(skip(db))]
    pub async fn enroll_student(
        db: &PgPool,
        course_id: Uuid,
        student_id: Uuid,
    ) -> Result<Enrollment, AppError> {
        sqlx::query_as::<_, Enrollment>(
            r#"INSERT INTO enrollments (student_id, course_id)
               VALUES ($1, $2)
               RETURNING student_id, course_id, enrolled_at"#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(db)
        .await
        .map_err(|e| map_db_error(e, "Student is already enrolled in this course"))
    }

    #[instrument(skip(db))]
    pub async fn unenroll_student(
        db: &PgPool,
        course_id: Uuid,
        student_id: Uuid,
    ) -> Result<(), AppError> {
        let result =
            sqlx::query("DELETE FROM enrollments WHERE course_id = $1 AND student_id = $2")
                .bind(course_id)
                .bind(student_id)
                .execute(db)
                .await?;
        ensure_affected(result.rows_affected(), "Enrollment")
    }

    /// Fails with 403 unless `teacher_id` teaches `course_id`.
    #[instrument(skip(db))]
    pub async fn ensure_teaches(
        db: &PgPool,
        teacher_id: Uuid,
        course_id: Uuid,
    ) -> Result<(), AppError> {
        let assigned = sqlx::query_scalar::<_, Option<Uuid>>(
            "SELECT teacher_id FROM courses WHERE id = $1",
        )
        .bind(course_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))?;

        if assigned != Some(teacher_id) {
            return Err(AppError::forbidden("course is taught by another teacher"));
        }
        Ok(())
    }
}
