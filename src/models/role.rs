//! Roles resolved by authentication.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three roles a login can resolve to. Absence of a role (denied) is
/// represented as `None` by the resolver, never as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Administrator,
    Coach,
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Administrator => "Administrator",
            Role::Coach => "Coach",
            Role::User => "User",
        };
        f.write_str(name)
    }
}
