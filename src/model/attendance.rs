use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckType {
    In,
    Out,
}

impl TryFrom<String> for CheckType {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Position reported by the kiosk's geolocation provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoReading {
    #[schema(example = 25.0339)]
    pub latitude: f64,
    #[schema(example = 121.5645)]
    pub longitude: f64,
    #[schema(example = 12.5, nullable = true)]
    pub accuracy_meters: Option<f64>,
}

/// Outcome of the geofence check stored alongside a punch for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeofenceVerdict {
    #[schema(example = "Head Office")]
    pub location_name: String,
    #[schema(example = 42.0)]
    pub distance_meters: f64,
    pub in_range: bool,
}

/// A single clock-in or clock-out event. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceLog {
    pub id: u64,
    pub employee_id: u64,
    #[sqlx(try_from = "String")]
    pub check_type: CheckType,
    #[schema(example = "2026-01-05T00:58:12Z", format = "date-time", value_type = String)]
    pub checked_at: DateTime<Utc>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub accuracy_meters: Option<f64>,
    pub location_name: Option<String>,
    pub distance_meters: Option<f64>,
    pub is_in_range: Option<bool>,
    pub is_makeup: bool,
}

#[derive(Debug, Clone)]
pub struct NewAttendanceLog {
    pub employee_id: u64,
    pub check_type: CheckType,
    pub checked_at: DateTime<Utc>,
    pub reading: Option<GeoReading>,
    pub geofence: Option<GeofenceVerdict>,
    pub is_makeup: bool,
}
