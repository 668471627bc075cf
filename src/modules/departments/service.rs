use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use unidesk_core::{AppError, PaginationParams};
use unidesk_db::{ensure_affected, map_db_error};
use unidesk_models::{
    CreateDepartmentDto, Department, PaginatedDepartmentsResponse, UpdateDepartmentDto,
};

const DEPARTMENT_COLUMNS: &str = "id, name, code, description, created_at, updated_at";

const DUPLICATE_DEPARTMENT: &str = "A department with this name or code already exists";

pub struct DepartmentService;

impl DepartmentService {
    #[instrument(skip(db))]
    pub async fn get_departments(
        db: &PgPool,
        pagination: PaginationParams,
    ) -> Result<PaginatedDepartmentsResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM departments")
            .fetch_one(db)
            .await?;

        let departments = sqlx::query_as::<_, Department>(&format!(
            "SELECT {DEPARTMENT_COLUMNS} FROM departments ORDER BY name LIMIT $1 OFFSET $2"
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedDepartmentsResponse {
            data: departments,
            meta: pagination.meta(total),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_department(db: &PgPool, id: Uuid) -> Result<Department, AppError> {
        sqlx::query_as::<_, Department>(&format!(
            "SELECT {DEPARTMENT_COLUMNS} FROM departments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Department not found")))
    }

    #[instrument(skip(db, dto), fields(code = %dto.code))]
    pub async fn create_department(
        db: &PgPool,
        dto: CreateDepartmentDto,
    ) -> Result<Department, AppError> {
        sqlx::query_as::<_, Department>(&format!(
            r#"INSERT INTO departments (name, code, description)
               VALUES ($1, $2, $3)
               RETURNING {DEPARTMENT_COLUMNS}"#
        ))
        .bind(&dto.name)
        .bind(dto.code.trim().to_uppercase())
        .bind(&dto.description)
        .fetch_one(db)
        .await
        .map_err(|e| map_db_error(e, DUPLICATE_DEPARTMENT))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_department(
        db: &PgPool,
        id: Uuid,
        dto: UpdateDepartmentDto,
    ) -> Result<Department, AppError> {
        let existing = Self::get_department(db, id).await?;

        let name = dto.name.unwrap_or(existing.name);
        let code = dto
            .code
            .map(|c| c.trim().to_uppercase())
            .unwrap_or(existing.code);
        let description = dto.description.or(existing.description);

        sqlx::query_as::<_, Department>(&format!(
            r#"UPDATE departments
               SET name = $1, code = $2, description = $3, updated_at = NOW()
               WHERE id = $4
               RETURNING {DEPARTMENT_COLUMNS}"#
        ))
        .bind(name)
        .bind(code)
        .bind(description)
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| map_db_error(e, DUPLICATE_DEPARTMENT))?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Department not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_department(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        ensure_affected(result.rows_affected(), "Department")
    }
}
