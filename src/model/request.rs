use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString, IntoStaticStr};
use utoipa::ToSchema;

use super::car::CarUsageRequest;
use super::leave_request::LeaveRequest;
use super::makeup_request::MakeupRequest;

/// Lifecycle shared by every request kind. `Approved` and `Rejected` are terminal.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl TryFrom<String> for RequestStatus {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum RequestKind {
    Leave,
    Makeup,
    CarUsage,
}

impl RequestKind {
    pub fn table(&self) -> &'static str {
        match self {
            RequestKind::Leave => "leave_requests",
            RequestKind::Makeup => "makeup_requests",
            RequestKind::CarUsage => "car_usage_requests",
        }
    }

    /// Column holding the reviewer's employee id.
    pub fn reviewer_column(&self) -> &'static str {
        match self {
            RequestKind::Leave | RequestKind::CarUsage => "approver_id",
            RequestKind::Makeup => "reviewer_id",
        }
    }

    pub fn reviewed_at_column(&self) -> &'static str {
        match self {
            RequestKind::Leave => "approved_at",
            RequestKind::Makeup | RequestKind::CarUsage => "reviewed_at",
        }
    }

    /// Makeup rejections must carry a reason; the other kinds accept an empty one.
    pub fn requires_rejection_comment(&self) -> bool {
        matches!(self, RequestKind::Makeup)
    }
}

/// Any request a reviewer can act on.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReviewableRequest {
    Leave(LeaveRequest),
    Makeup(MakeupRequest),
    CarUsage(CarUsageRequest),
}

impl ReviewableRequest {
    pub fn id(&self) -> u64 {
        match self {
            ReviewableRequest::Leave(r) => r.id,
            ReviewableRequest::Makeup(r) => r.id,
            ReviewableRequest::CarUsage(r) => r.id,
        }
    }

    pub fn employee_id(&self) -> u64 {
        match self {
            ReviewableRequest::Leave(r) => r.employee_id,
            ReviewableRequest::Makeup(r) => r.employee_id,
            ReviewableRequest::CarUsage(r) => r.employee_id,
        }
    }

    pub fn status(&self) -> RequestStatus {
        match self {
            ReviewableRequest::Leave(r) => r.status,
            ReviewableRequest::Makeup(r) => r.status,
            ReviewableRequest::CarUsage(r) => r.status,
        }
    }
}

/// Store-level listing filter. `manager_id` restricts to direct reports.
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub employee_id: Option<u64>,
    pub manager_id: Option<u64>,
    pub status: Option<RequestStatus>,
}

/// The write applied when a pending request reaches a terminal state.
#[derive(Debug, Clone)]
pub struct Review {
    pub status: RequestStatus,
    pub reviewer_id: u64,
    pub reviewed_at: DateTime<Utc>,
    pub comment: Option<String>,
}
