//! Weekly timetable slots.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use unidesk_core::PaginationMeta;
use unidesk_core::serde::{deserialize_optional_uuid, nullable};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Schedule {
    pub id: Uuid,
    pub course_id: Uuid,
    pub group_id: Option<Uuid>,
    /// ISO weekday, 1 (Monday) to 7 (Sunday)
    pub day_of_week: i16,
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "10:30:00")]
    pub end_time: NaiveTime,
    pub room: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_slot(dto: &CreateScheduleDto) -> Result<(), ValidationError> {
    if dto.end_time <= dto.start_time {
        return Err(ValidationError::new("time_order")
            .with_message("end_time must be after start_time".into()));
    }
    Ok(())
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
#[validate(schema(function = "validate_slot"))]
pub struct CreateScheduleDto {
    pub course_id: Uuid,
    pub group_id: Option<Uuid>,
    #[validate(range(min = 1, max = 7))]
    pub day_of_week: i16,
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "10:30:00")]
    pub end_time: NaiveTime,
    #[validate(length(max = 50))]
    pub room: Option<String>,
}

/// Time ordering of a partial update is checked against the stored slot.
#[derive(Deserialize, Debug, Default, ToSchema, Validate)]
pub struct UpdateScheduleDto {
    /// `null` opens the slot to every group.
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<Uuid>)]
    pub group_id: Option<Option<Uuid>>,
    #[validate(range(min = 1, max = 7))]
    pub day_of_week: Option<i16>,
    #[schema(value_type = Option<String>)]
    pub start_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub end_time: Option<NaiveTime>,
    #[validate(length(max = 50))]
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub room: Option<Option<String>>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScheduleFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub course_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub group_id: Option<Uuid>,
    pub day_of_week: Option<i16>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedSchedulesResponse {
    pub data: Vec<Schedule>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(start: (u32, u32), end: (u32, u32)) -> CreateScheduleDto {
        CreateScheduleDto {
            course_id: Uuid::new_v4(),
            group_id: None,
            day_of_week: 2,
            start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
            room: Some("B-204".to_string()),
        }
    }

    #[test]
    fn test_slot_must_end_after_start() {
        assert!(slot((9, 0), (10, 30)).validate().is_ok());
        assert!(slot((10, 30), (9, 0)).validate().is_err());
        assert!(slot((9, 0), (9, 0)).validate().is_err());
    }

    #[test]
    fn test_day_of_week_bounds() {
        let mut dto = slot((9, 0), (10, 0));
        dto.day_of_week = 0;
        assert!(dto.validate().is_err());
        dto.day_of_week = 8;
        assert!(dto.validate().is_err());
    }
}
