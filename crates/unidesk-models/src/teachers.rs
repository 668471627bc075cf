//! Teacher records and the per-teacher grade-edit override.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use unidesk_core::PaginationMeta;
use unidesk_core::serde::deserialize_optional_uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Teacher {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub title: Option<String>,
    pub department_id: Option<Uuid>,
    /// Admin-controlled override that augments the role's grade-edit grant
    pub can_edit_grades: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creates a teacher record, and a login account when `password` is given.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateTeacherDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 100))]
    pub title: Option<String>,
    pub department_id: Option<Uuid>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
}

#[derive(Deserialize, Debug, Default, ToSchema, Validate)]
pub struct UpdateTeacherDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 100))]
    pub title: Option<String>,
    pub department_id: Option<Uuid>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TeacherFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub department_id: Option<Uuid>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedTeachersResponse {
    pub data: Vec<Teacher>,
    pub meta: PaginationMeta,
}

/// State of a teacher's grade-edit override after a toggle.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct GradePermissionState {
    pub teacher_id: Uuid,
    pub can_edit_grades: bool,
}

/// One recorded flip of a teacher's grade-edit override.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct GradePermissionAudit {
    pub id: Uuid,
    pub teacher_id: Uuid,
    /// Account that performed the toggle
    pub changed_by: Uuid,
    pub new_value: bool,
    pub changed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_teacher_dto_validation() {
        let valid = CreateTeacherDto {
            first_name: "Alan".to_string(),
            last_name: "Turing".to_string(),
            email: "alan@uni.test".to_string(),
            title: Some("Professor".to_string()),
            department_id: None,
            password: Some("password123".to_string()),
        };
        assert!(valid.validate().is_ok());

        let invalid = CreateTeacherDto {
            first_name: String::new(),
            ..valid
        };
        assert!(invalid.validate().is_err());
    }
}
