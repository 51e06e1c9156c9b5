//! Statuses repository for database operations

use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::status::{CreateStatus, Status, UpdateStatus},
};

#[derive(Clone)]
pub struct StatusesRepository {
    pool: SqlitePool,
}

impl StatusesRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a status. Duplicate names surface as `Constraint`.
    pub async fn create(&self, data: &CreateStatus) -> AppResult<i64> {
        data.validate()?;
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO statuses (name, comment) VALUES (?, ?) RETURNING id",
        )
        .bind(&data.name)
        .bind(&data.comment)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    /// Get status by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Status> {
        sqlx::query_as::<_, Status>("SELECT * FROM statuses WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Status {} not found", id)))
    }

    /// List all statuses, primary key ascending
    pub async fn get_all(&self) -> AppResult<Vec<Status>> {
        let rows = sqlx::query_as::<_, Status>("SELECT * FROM statuses ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Apply the `Some(_)` fields of `data` to the status. Returns
    /// `Ok(false)` when no row matched the id.
    pub async fn update(&self, id: i64, data: &UpdateStatus) -> AppResult<bool> {
        data.validate()?;
        let mut sets: Vec<&str> = Vec::new();

        macro_rules! add_field {
            ($field:expr, $set:expr) => {
                if $field.is_some() {
                    sets.push($set);
                }
            };
        }

        add_field!(data.name, "name = ?");
        add_field!(data.comment, "comment = ?");

        if sets.is_empty() {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM statuses WHERE id = ?)")
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?;
            return Ok(exists);
        }

        let query = format!("UPDATE statuses SET {} WHERE id = ?", sets.join(", "));
        let mut builder = sqlx::query(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.comment);

        let result = builder.bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a status. Blocked while a booking link references it.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM statuses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn repo() -> StatusesRepository {
        let db = Database::new_in_memory().await.unwrap();
        StatusesRepository::new(db.pool().clone())
    }

    #[tokio::test]
    async fn duplicate_name_is_constraint_error() {
        let repo = repo().await;
        let data = CreateStatus {
            name: "Requested".to_string(),
            comment: None,
        };
        repo.create(&data).await.unwrap();
        let err = repo.create(&data).await.unwrap_err();
        assert!(matches!(err, AppError::Constraint(_)));
    }

    #[tokio::test]
    async fn rename_and_delete() {
        let repo = repo().await;
        let id = repo
            .create(&CreateStatus {
                name: "Requested".to_string(),
                comment: None,
            })
            .await
            .unwrap();
        repo.update(
            id,
            &UpdateStatus {
                name: Some("Booked".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(repo.get_by_id(id).await.unwrap().name, "Booked");
        assert!(repo.delete(id).await.unwrap());
    }
}
