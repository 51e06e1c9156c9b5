//! Status model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Status record: a label attached to a booking-inventory link
/// ("Requested", "Confirmed", ...). Names are globally unique.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Status {
    pub id: i64,
    pub name: String,
    pub comment: Option<String>,
}

/// Create status request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStatus {
    #[validate(length(min = 1, max = 30))]
    pub name: String,
    pub comment: Option<String>,
}

/// Update status request. Only `Some(_)` fields are applied.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateStatus {
    #[validate(length(min = 1, max = 30))]
    pub name: Option<String>,
    pub comment: Option<String>,
}
