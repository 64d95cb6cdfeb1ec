use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Employee record as the attendance core sees it.
///
/// Schedule fields are all optional; `service::schedule` merges them with
/// the company defaults once, so nothing else should read them directly.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 7,
        "name": "Lin Mei",
        "department": "Engineering",
        "manager_id": 2,
        "work_start": "09:00:00",
        "work_end": "18:00:00",
        "is_active": true
    })
)]
pub struct Employee {
    pub id: u64,
    pub name: String,

    /// Six digit kiosk credential, unique among active employees.
    #[serde(skip_serializing)]
    pub pin: String,

    #[schema(nullable = true)]
    pub department: Option<String>,

    /// Direct supervisor; drives approval routing.
    #[schema(nullable = true)]
    pub manager_id: Option<u64>,

    #[schema(value_type = Option<String>, format = "time")]
    pub work_start: Option<NaiveTime>,
    #[schema(value_type = Option<String>, format = "time")]
    pub work_end: Option<NaiveTime>,

    #[schema(value_type = Option<String>, format = "time")]
    pub break1_start: Option<NaiveTime>,
    #[schema(value_type = Option<String>, format = "time")]
    pub break1_end: Option<NaiveTime>,
    #[schema(value_type = Option<String>, format = "time")]
    pub break2_start: Option<NaiveTime>,
    #[schema(value_type = Option<String>, format = "time")]
    pub break2_end: Option<NaiveTime>,
    #[schema(value_type = Option<String>, format = "time")]
    pub break3_start: Option<NaiveTime>,
    #[schema(value_type = Option<String>, format = "time")]
    pub break3_end: Option<NaiveTime>,

    pub is_active: bool,
}

impl Employee {
    pub fn reports_to(&self, supervisor_id: u64) -> bool {
        self.manager_id == Some(supervisor_id)
    }
}
