use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use super::request::RequestStatus;

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CarStatus {
    Available,
    InUse,
    Maintenance,
}

impl TryFrom<String> for CarStatus {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Car {
    pub id: u64,
    #[schema(example = "ABC-1234")]
    pub plate_number: String,
    pub model: String,
    #[sqlx(try_from = "String")]
    pub status: CarStatus,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct CarUsageRequest {
    pub id: u64,
    pub employee_id: u64,
    pub car_id: u64,
    #[schema(format = "date-time", value_type = String)]
    pub start_at: DateTime<Utc>,
    #[schema(format = "date-time", value_type = String)]
    pub end_at: DateTime<Utc>,
    pub purpose: String,
    #[sqlx(try_from = "String")]
    pub status: RequestStatus,
    pub approver_id: Option<u64>,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_comment: Option<String>,
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCarUsageRequest {
    pub employee_id: u64,
    pub car_id: u64,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub purpose: String,
}
