//! Grades.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use unidesk_core::PaginationMeta;
use unidesk_core::serde::deserialize_optional_uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GradeType {
    Exam,
    Midterm,
    Quiz,
    Assignment,
    Final,
}

impl GradeType {
    pub const fn as_str(self) -> &'static str {
        match self {
            GradeType::Exam => "exam",
            GradeType::Midterm => "midterm",
            GradeType::Quiz => "quiz",
            GradeType::Assignment => "assignment",
            GradeType::Final => "final",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Grade {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    /// Teacher who submitted the grade
    pub teacher_id: Option<Uuid>,
    pub value: i32,
    pub grade_type: String,
    pub comment: Option<String>,
    pub graded_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `teacher_id` is honoured for admins only; a teacher always records grades
/// as themself.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateGradeDto {
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub teacher_id: Option<Uuid>,
    #[validate(range(min = 0, max = 100))]
    pub value: i32,
    pub grade_type: Option<GradeType>,
    #[validate(length(max = 1000))]
    pub comment: Option<String>,
    pub graded_on: Option<NaiveDate>,
}

#[derive(Deserialize, Debug, Default, ToSchema, Validate)]
pub struct UpdateGradeDto {
    #[validate(range(min = 0, max = 100))]
    pub value: Option<i32>,
    pub grade_type: Option<GradeType>,
    #[validate(length(max = 1000))]
    pub comment: Option<String>,
    pub graded_on: Option<NaiveDate>,
}

/// Optional list filters. Ignored for students, who only ever see their own
/// grades.
#[derive(Deserialize, Debug, Default, Clone, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GradeFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub student_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub course_id: Option<Uuid>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedGradesResponse {
    pub data: Vec<Grade>,
    pub meta: PaginationMeta,
}
