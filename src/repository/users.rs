//! Users repository for database operations

use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateUser, User},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: SqlitePool,
}

impl UsersRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a user
    pub async fn create(&self, data: &CreateUser) -> AppResult<i64> {
        data.validate()?;
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (surname, name, password) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&data.surname)
        .bind(&data.name)
        .bind(&data.password)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Look up a user by id. Authentication seam: absence is `None`, not an
    /// error.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// List all users, primary key ascending
    pub async fn get_all(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Apply the `Some(_)` fields of `data` to the user. Returns
    /// `Ok(false)` when no row matched the id.
    pub async fn update(&self, id: i64, data: &UpdateUser) -> AppResult<bool> {
        data.validate()?;
        let mut sets: Vec<&str> = Vec::new();

        macro_rules! add_field {
            ($field:expr, $set:expr) => {
                if $field.is_some() {
                    sets.push($set);
                }
            };
        }

        add_field!(data.surname, "surname = ?");
        add_field!(data.name, "name = ?");
        add_field!(data.password, "password = ?");

        if sets.is_empty() {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)")
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?;
            return Ok(exists);
        }

        let query = format!("UPDATE users SET {} WHERE id = ?", sets.join(", "));
        let mut builder = sqlx::query(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.surname);
        bind_field!(data.name);
        bind_field!(data.password);

        let result = builder.bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user. Blocked by an existing booking referencing the user.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
