//! Student groups (cohorts).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use unidesk_core::PaginationMeta;
use unidesk_core::serde::deserialize_optional_uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StudentGroup {
    pub id: Uuid,
    pub name: String,
    /// Year of study, 1 to 8
    pub year: i32,
    pub department_id: Option<Uuid>,
    /// Teacher supervising the group
    pub curator_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateGroupDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 1, max = 8))]
    pub year: i32,
    pub department_id: Option<Uuid>,
    pub curator_id: Option<Uuid>,
}

#[derive(Deserialize, Debug, Default, ToSchema, Validate)]
pub struct UpdateGroupDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(range(min = 1, max = 8))]
    pub year: Option<i32>,
    pub department_id: Option<Uuid>,
    pub curator_id: Option<Uuid>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GroupFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub department_id: Option<Uuid>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedGroupsResponse {
    pub data: Vec<StudentGroup>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_year_bounds() {
        let dto = CreateGroupDto {
            name: "CS-101".to_string(),
            year: 9,
            department_id: None,
            curator_id: None,
        };
        assert!(dto.validate().is_err());

        let dto = CreateGroupDto { year: 1, ..dto };
        assert!(dto.validate().is_ok());
    }
}
