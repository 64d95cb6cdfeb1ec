use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct CompanyLocation {
    pub id: u64,
    #[schema(example = "Head Office")]
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Geofence tolerance around the coordinates.
    #[schema(example = 100.0)]
    pub radius_meters: f64,
    pub is_active: bool,
}
