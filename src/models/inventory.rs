//! Inventory model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Inventory record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Inventory {
    pub id: i64,
    pub name: String,
    /// Quantity available. No exclusivity lock: attaching an item to a
    /// booking does not decrement this.
    pub count: i64,
    pub comment: Option<String>,
}

/// Create inventory request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInventory {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(range(min = 0))]
    pub count: i64,
    pub comment: Option<String>,
}

/// Update inventory request. Only `Some(_)` fields are applied.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateInventory {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[validate(range(min = 0))]
    pub count: Option<i64>,
    pub comment: Option<String>,
}
