//! User model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// User record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub surname: String,
    pub name: String,
    pub password: String,
}

impl User {
    /// Display form of the password: one `*` per character.
    pub fn password_mask(&self) -> String {
        "*".repeat(self.password.chars().count())
    }
}

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 30))]
    pub surname: String,
    #[validate(length(min = 1, max = 30))]
    pub name: String,
    #[validate(length(min = 6, max = 30))]
    pub password: String,
}

/// Update user request. Only `Some(_)` fields are applied.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 30))]
    pub surname: Option<String>,
    #[validate(length(min = 1, max = 30))]
    pub name: Option<String>,
    #[validate(length(min = 6, max = 30))]
    pub password: Option<String>,
}
