//! Booking models: the booking row, its inventory links, and the joined
//! detail view used for display and nested export.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Booking record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i64,
    pub coach_id: i64,
    pub user_id: i64,
    /// Opaque timestamp text. No overlap validation is performed.
    pub time_start: String,
    pub time_end: String,
    /// Caller-visible sequence number, max(existing)+1 at creation time.
    pub number_booking: i64,
}

/// Create booking request. `number_booking` is assigned by the repository
/// inside the creating transaction, never supplied by the caller.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBooking {
    pub coach_id: i64,
    pub user_id: i64,
    #[validate(length(min = 1))]
    pub time_start: String,
    #[validate(length(min = 1))]
    pub time_end: String,
}

/// Update booking request. Only `Some(_)` fields are applied.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateBooking {
    pub coach_id: Option<i64>,
    pub user_id: Option<i64>,
    #[validate(length(min = 1))]
    pub time_start: Option<String>,
    #[validate(length(min = 1))]
    pub time_end: Option<String>,
}

/// One booking-inventory link row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookingItemLink {
    pub id: i64,
    pub booking_id: i64,
    pub inventory_id: i64,
    pub status_id: i64,
}

/// Update applied to all link rows of one booking. Only `Some(_)` fields
/// are applied.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBookingLink {
    pub inventory_id: Option<i64>,
    pub status_id: Option<i64>,
}

/// Joined detail view of one booking: coach and user names resolved, linked
/// inventory items with their status names nested inside.
#[derive(Debug, Clone, Serialize)]
pub struct BookingDetails {
    pub id: i64,
    pub number_booking: i64,
    pub time_start: String,
    pub time_end: String,
    /// "Surname Name (internal_number)"
    pub coach: String,
    /// "Surname Name"
    pub user: String,
    pub items: Vec<BookingItem>,
}

/// One linked inventory item in a [`BookingDetails`] view.
#[derive(Debug, Clone, Serialize)]
pub struct BookingItem {
    pub name: String,
    pub status: String,
}
