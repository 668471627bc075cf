use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use unidesk_core::{AppError, PaginationParams};
use unidesk_db::{ensure_affected, map_db_error};
use unidesk_models::{
    CreateGroupDto, GroupFilterParams, PaginatedGroupsResponse, StudentGroup, UpdateGroupDto,
};

const GROUP_COLUMNS: &str = "g.id, g.name, g.year, g.department_id, g.curator_id, \
                             g.created_at, g.updated_at";

const DUPLICATE_GROUP: &str = "A group with this name already exists";

pub struct GroupService;

impl GroupService {
    #[instrument(skip(db))]
    pub async fn get_groups(
        db: &PgPool,
        filter: GroupFilterParams,
        pagination: PaginationParams,
    ) -> Result<PaginatedGroupsResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM student_groups g WHERE ($1::uuid IS NULL OR g.department_id = $1)",
        )
        .bind(filter.department_id)
        .fetch_one(db)
        .await?;

        let groups = sqlx::query_as::<_, StudentGroup>(&format!(
            r#"SELECT {GROUP_COLUMNS} FROM student_groups g
               WHERE ($1::uuid IS NULL OR g.department_id = $1)
               ORDER BY g.year, g.name LIMIT $2 OFFSET $3"#
        ))
        .bind(filter.department_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedGroupsResponse {
            data: groups,
            meta: pagination.meta(total),
        })
    }

    /// Fetches a group. With `member` set, the group is only returned if that
    /// student belongs to it.
    #[instrument(skip(db))]
    pub async fn get_group(
        db: &PgPool,
        id: Uuid,
        member: Option<Uuid>,
    ) -> Result<StudentGroup, AppError> {
        sqlx::query_as::<_, StudentGroup>(&format!(
            r#"SELECT {GROUP_COLUMNS} FROM student_groups g
               WHERE g.id = $1
                 AND ($2::uuid IS NULL OR EXISTS (
                     SELECT 1 FROM students s WHERE s.id = $2 AND s.group_id = g.id))"#
        ))
        .bind(id)
        .bind(member)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Group not found")))
    }

    #[instrument(skip(db, dto), fields(name = %dto.name))]
    pub async fn create_group(db: &PgPool, dto: CreateGroupDto) -> Result<StudentGroup, AppError> {
        sqlx::query_as::<_, StudentGroup>(&format!(
            r#"INSERT INTO student_groups AS g (name, year, department_id, curator_id)
               VALUES ($1, $2, $3, $4)
               RETURNING {GROUP_COLUMNS}"#
        ))
        .bind(&dto.name)
        .bind(dto.year)
        .bind(dto.department_id)
        .bind(dto.curator_id)
        .fetch_one(db)
        .await
        .map_err(|e| map_db_error(e, DUPLICATE_GROUP))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_group(
        db: &PgPool,
        id: Uuid,
        dto: UpdateGroupDto,
    ) -> Result<StudentGroup, AppError> {
        let existing = Self::get_group(db, id, None).await?;

        let name = dto.name.unwrap_or(existing.name);
        let year = dto.year.unwrap_or(existing.year);
        let department_id = dto.department_id.or(existing.department_id);
        let curator_id = dto.curator_id.or(existing.curator_id);

        sqlx::query_as::<_, StudentGroup>(&format!(
            r#"UPDATE student_groups AS g
               SET name = $1, year = $2, department_id = $3, curator_id = $4,
                   updated_at = NOW()
               WHERE g.id = $5
               RETURNING {GROUP_COLUMNS}"#
        ))
        .bind(name)
        .bind(year)
        .bind(department_id)
        .bind(curator_id)
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| map_db_error(e, DUPLICATE_GROUP))?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Group not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_group(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM student_groups WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        ensure_affected(result.rows_affected(), "Group")
    }
}
