//! Student records.
//!
//! A student row is the academic record; the optional login account lives in
//! `users` with `related_id` pointing here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use unidesk_core::PaginationMeta;
use unidesk_core::serde::deserialize_optional_uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub student_number: String,
    pub group_id: Option<Uuid>,
    pub enrollment_year: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creates a student record, and a login account when `password` is given.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateStudentDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 50))]
    pub student_number: String,
    pub group_id: Option<Uuid>,
    #[validate(range(min = 1900, max = 2200))]
    pub enrollment_year: Option<i32>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
}

#[derive(Deserialize, Debug, Default, ToSchema, Validate)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub student_number: Option<String>,
    pub group_id: Option<Uuid>,
    #[validate(range(min = 1900, max = 2200))]
    pub enrollment_year: Option<i32>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentFilterParams {
    /// Only students in this group
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub group_id: Option<Uuid>,
    /// Case-insensitive match on name, email or student number
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<Student>,
    pub meta: PaginationMeta,
}
