use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::request::RequestStatus;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = 2)]
    pub leave_type_id: u64,
    #[schema(example = "2026-01-05T01:00:00Z", format = "date-time", value_type = String)]
    pub start_at: DateTime<Utc>,
    #[schema(example = "2026-01-05T10:00:00Z", format = "date-time", value_type = String)]
    pub end_at: DateTime<Utc>,
    pub reason: String,
    /// Estimated at submission with the fixed lunch-window rule.
    #[schema(example = 8.0)]
    pub hours: f64,
    /// Vehicle reserved together with a business trip.
    pub car_id: Option<u64>,
    #[sqlx(try_from = "String")]
    pub status: RequestStatus,
    pub approver_id: Option<u64>,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub approved_at: Option<DateTime<Utc>>,
    pub review_comment: Option<String>,
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLeaveRequest {
    pub employee_id: u64,
    pub leave_type_id: u64,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub reason: String,
    pub hours: f64,
    pub car_id: Option<u64>,
}
