//! Inventory repository for database operations

use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::inventory::{CreateInventory, Inventory, UpdateInventory},
};

#[derive(Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an inventory item
    pub async fn create(&self, data: &CreateInventory) -> AppResult<i64> {
        data.validate()?;
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO inventory (name, count, comment) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&data.name)
        .bind(data.count)
        .bind(&data.comment)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    /// Get inventory item by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Inventory> {
        sqlx::query_as::<_, Inventory>("SELECT * FROM inventory WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Inventory {} not found", id)))
    }

    /// List all inventory items, primary key ascending
    pub async fn get_all(&self) -> AppResult<Vec<Inventory>> {
        let rows = sqlx::query_as::<_, Inventory>("SELECT * FROM inventory ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Apply the `Some(_)` fields of `data` to the item. Returns
    /// `Ok(false)` when no row matched the id.
    pub async fn update(&self, id: i64, data: &UpdateInventory) -> AppResult<bool> {
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
        add_field!(data.count, "count = ?");
        add_field!(data.comment, "comment = ?");

        if sets.is_empty() {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM inventory WHERE id = ?)")
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?;
            return Ok(exists);
        }

        let query = format!("UPDATE inventory SET {} WHERE id = ?", sets.join(", "));
        let mut builder = sqlx::query(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.count);
        bind_field!(data.comment);

        let result = builder.bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an inventory item. Blocked while a booking link references it.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM inventory WHERE id = ?")
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

    async fn repo() -> InventoryRepository {
        let db = Database::new_in_memory().await.unwrap();
        InventoryRepository::new(db.pool().clone())
    }

    #[tokio::test]
    async fn create_allows_duplicate_names() {
        let repo = repo().await;
        let data = CreateInventory {
            name: "Yoga mat".to_string(),
            count: 20,
            comment: None,
        };
        repo.create(&data).await.unwrap();
        // Inventory names are not a uniqueness domain.
        repo.create(&data).await.unwrap();
        assert_eq!(repo.get_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn negative_count_is_rejected() {
        let repo = repo().await;
        let err = repo
            .create(&CreateInventory {
                name: "Barbell 20kg".to_string(),
                count: -1,
                comment: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn partial_update_touches_only_given_fields() {
        let repo = repo().await;
        let id = repo
            .create(&CreateInventory {
                name: "Dumbbells 5kg".to_string(),
                count: 10,
                comment: Some("pair".to_string()),
            })
            .await
            .unwrap();
        repo.update(
            id,
            &UpdateInventory {
                count: Some(8),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let item = repo.get_by_id(id).await.unwrap();
        assert_eq!(item.count, 8);
        assert_eq!(item.name, "Dumbbells 5kg");
        assert_eq!(item.comment.as_deref(), Some("pair"));
    }
}
