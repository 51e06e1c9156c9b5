//! Error types for CoachDesk

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// An id had no matching row. Recoverable: the caller reports and
    /// continues.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A uniqueness or check constraint was violated (duplicate coach
    /// internal number, duplicate status name, negative count).
    #[error("Constraint violated: {0}")]
    Constraint(String),

    /// A referenced id does not exist, or a delete is blocked by a
    /// dependent row whose foreign key does not cascade.
    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    /// Caller-supplied value out of allowed shape. Raised before any
    /// transaction is opened.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The transactional scope itself failed. Fatal to the in-progress
    /// operation (the open transaction rolls back), not to the process.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            return match db.kind() {
                ErrorKind::UniqueViolation => AppError::Constraint(db.message().to_string()),
                ErrorKind::ForeignKeyViolation => AppError::ForeignKey(db.message().to_string()),
                ErrorKind::NotNullViolation | ErrorKind::CheckViolation => {
                    AppError::Constraint(db.message().to_string())
                }
                _ => AppError::Storage(db.message().to_string()),
            };
        }
        if let sqlx::Error::RowNotFound = err {
            return AppError::NotFound("no matching row".to_string());
        }
        AppError::Storage(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Storage(format!("migration failed: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
