//! Action catalog and role-gated authorization.
//!
//! The policy table is built once and never mutated. `authorize` rejects by
//! default: an action key absent from a role's grant list is denied even
//! though it exists in the catalog.

use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;

use crate::models::role::Role;

/// Stable identifier for one operation the menu may dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKey {
    AddCoach,
    AddUser,
    AddInventory,
    AddBooking,
    ModifyCoach,
    ModifyUser,
    ModifyInventory,
    ModifyBooking,
    DeleteRecord,
    ShowCoaches,
    ShowUsers,
    ShowBookings,
    ExportFlat,
    ExportNested,
}

impl ActionKey {
    /// The full catalog, in menu order.
    pub const ALL: [ActionKey; 14] = [
        ActionKey::AddCoach,
        ActionKey::AddUser,
        ActionKey::AddInventory,
        ActionKey::AddBooking,
        ActionKey::ModifyCoach,
        ActionKey::ModifyUser,
        ActionKey::ModifyInventory,
        ActionKey::ModifyBooking,
        ActionKey::DeleteRecord,
        ActionKey::ShowCoaches,
        ActionKey::ShowUsers,
        ActionKey::ShowBookings,
        ActionKey::ExportFlat,
        ActionKey::ExportNested,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKey::AddCoach => "add_coach",
            ActionKey::AddUser => "add_user",
            ActionKey::AddInventory => "add_inventory",
            ActionKey::AddBooking => "add_booking",
            ActionKey::ModifyCoach => "modify_coach",
            ActionKey::ModifyUser => "modify_user",
            ActionKey::ModifyInventory => "modify_inventory",
            ActionKey::ModifyBooking => "modify_booking",
            ActionKey::DeleteRecord => "delete_record",
            ActionKey::ShowCoaches => "show_coaches",
            ActionKey::ShowUsers => "show_users",
            ActionKey::ShowBookings => "show_bookings",
            ActionKey::ExportFlat => "export_flat",
            ActionKey::ExportNested => "export_nested",
        }
    }

    /// Human label shown in the menu.
    pub fn label(&self) -> &'static str {
        match self {
            ActionKey::AddCoach => "Add a coach",
            ActionKey::AddUser => "Add a user",
            ActionKey::AddInventory => "Add an inventory item",
            ActionKey::AddBooking => "Add a booking",
            ActionKey::ModifyCoach => "Modify a coach",
            ActionKey::ModifyUser => "Modify a user",
            ActionKey::ModifyInventory => "Modify an inventory item",
            ActionKey::ModifyBooking => "Modify a booking",
            ActionKey::DeleteRecord => "Delete a record",
            ActionKey::ShowCoaches => "Show coaches",
            ActionKey::ShowUsers => "Show users",
            ActionKey::ShowBookings => "Show bookings",
            ActionKey::ExportFlat => "Export a table (json/csv/yaml/xml)",
            ActionKey::ExportNested => "Export bookings, nested (json/yaml/xml)",
        }
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKey::ALL
            .iter()
            .find(|key| key.as_str() == s)
            .copied()
            .ok_or(())
    }
}

/// Immutable role-to-actions table.
struct AccessPolicy {
    administrator: Vec<ActionKey>,
    coach: Vec<ActionKey>,
    user: Vec<ActionKey>,
}

static POLICY: Lazy<AccessPolicy> = Lazy::new(|| AccessPolicy {
    administrator: ActionKey::ALL.to_vec(),
    coach: vec![ActionKey::AddBooking, ActionKey::ModifyBooking],
    user: vec![ActionKey::AddBooking],
});

/// The actions granted to `role`, in menu order.
pub fn allowed_actions(role: Role) -> &'static [ActionKey] {
    match role {
        Role::Administrator => &POLICY.administrator,
        Role::Coach => &POLICY.coach,
        Role::User => &POLICY.user,
    }
}

/// `true` only for keys explicitly granted to `role`.
pub fn authorize(role: Role, key: ActionKey) -> bool {
    allowed_actions(role).contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn administrator_gets_full_catalog() {
        assert_eq!(allowed_actions(Role::Administrator), &ActionKey::ALL);
        for key in ActionKey::ALL {
            assert!(authorize(Role::Administrator, key));
        }
    }

    #[test]
    fn user_cannot_add_coach_despite_catalog_entry() {
        // The key exists in the catalog but was never granted.
        assert!(ActionKey::ALL.contains(&ActionKey::AddCoach));
        assert!(!authorize(Role::User, ActionKey::AddCoach));
    }

    #[test]
    fn coach_is_limited_to_booking_mutations() {
        assert!(authorize(Role::Coach, ActionKey::AddBooking));
        assert!(authorize(Role::Coach, ActionKey::ModifyBooking));
        assert!(!authorize(Role::Coach, ActionKey::DeleteRecord));
        assert!(!authorize(Role::Coach, ActionKey::ShowBookings));
        assert_eq!(allowed_actions(Role::Coach).len(), 2);
    }

    #[test]
    fn user_is_limited_to_booking_creation() {
        assert_eq!(allowed_actions(Role::User), &[ActionKey::AddBooking]);
        assert!(!authorize(Role::User, ActionKey::ModifyBooking));
    }

    #[test]
    fn keys_round_trip_through_slugs() {
        for key in ActionKey::ALL {
            assert_eq!(key.as_str().parse::<ActionKey>(), Ok(key));
        }
        assert!("drop_tables".parse::<ActionKey>().is_err());
    }
}
