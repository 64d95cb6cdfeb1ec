use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::attendance::CheckType;
use super::request::RequestStatus;

/// Request to retroactively insert a missed punch.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct MakeupRequest {
    pub id: u64,
    pub employee_id: u64,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub request_date: NaiveDate,
    #[schema(example = "08:55:00", format = "time", value_type = String)]
    pub request_time: NaiveTime,
    #[sqlx(try_from = "String")]
    pub check_type: CheckType,
    pub reason: String,
    #[sqlx(try_from = "String")]
    pub status: RequestStatus,
    pub reviewer_id: Option<u64>,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_comment: Option<String>,
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMakeupRequest {
    pub employee_id: u64,
    pub request_date: NaiveDate,
    pub request_time: NaiveTime,
    pub check_type: CheckType,
    pub reason: String,
}
