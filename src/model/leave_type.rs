use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveType {
    pub id: u64,
    #[schema(example = "Annual Leave")]
    pub name: String,
    /// Immutable after creation.
    #[schema(example = "ANNUAL")]
    pub code: String,
    #[schema(example = "#4caf50")]
    pub color: String,
    pub is_active: bool,
    pub sort_order: i32,
}
