//! Coach model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Coach record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Coach {
    pub id: i64,
    /// Caller-supplied business key, globally unique. The reserved row
    /// with number 999 is the administrator account.
    pub internal_number: i64,
    pub surname: String,
    pub name: String,
    /// Years of experience
    pub experience: i64,
    /// Stored in clear, compared in clear. Mask for display with
    /// [`Coach::password_mask`].
    pub password: String,
}

impl Coach {
    /// Display form of the password: one `*` per character.
    pub fn password_mask(&self) -> String {
        "*".repeat(self.password.chars().count())
    }
}

/// Create coach request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCoach {
    pub internal_number: i64,
    #[validate(length(min = 1, max = 30))]
    pub surname: String,
    #[validate(length(min = 1, max = 30))]
    pub name: String,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub experience: i64,
    #[validate(length(min = 6, max = 30))]
    pub password: String,
}

/// Update coach request. Only `Some(_)` fields are applied.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCoach {
    pub internal_number: Option<i64>,
    #[validate(length(min = 1, max = 30))]
    pub surname: Option<String>,
    #[validate(length(min = 1, max = 30))]
    pub name: Option<String>,
    #[validate(range(min = 0))]
    pub experience: Option<i64>,
    #[validate(length(min = 6, max = 30))]
    pub password: Option<String>,
}
