//! Data models for CoachDesk

pub mod booking;
pub mod coach;
pub mod inventory;
pub mod role;
pub mod status;
pub mod user;

// Re-export commonly used types
pub use booking::{Booking, BookingDetails, BookingItem, BookingItemLink};
pub use coach::Coach;
pub use inventory::Inventory;
pub use role::Role;
pub use status::Status;
pub use user::User;
