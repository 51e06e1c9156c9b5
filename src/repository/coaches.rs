//! Coaches repository for database operations

use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::coach::{Coach, CreateCoach, UpdateCoach},
};

#[derive(Clone)]
pub struct CoachesRepository {
    pool: SqlitePool,
}

impl CoachesRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a coach. Duplicate internal numbers surface as `Constraint`.
    pub async fn create(&self, data: &CreateCoach) -> AppResult<i64> {
        data.validate()?;
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO coaches (internal_number, surname, name, experience, password)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(data.internal_number)
        .bind(&data.surname)
        .bind(&data.name)
        .bind(data.experience)
        .bind(&data.password)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    /// Get coach by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Coach> {
        sqlx::query_as::<_, Coach>("SELECT * FROM coaches WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Coach {} not found", id)))
    }

    /// Look up a coach by internal number. Authentication seam: absence is
    /// `None`, not an error.
    pub async fn find_by_internal_number(&self, internal_number: i64) -> AppResult<Option<Coach>> {
        let coach =
            sqlx::query_as::<_, Coach>("SELECT * FROM coaches WHERE internal_number = ?")
                .bind(internal_number)
                .fetch_optional(&self.pool)
                .await?;
        Ok(coach)
    }

    /// List all coaches, primary key ascending
    pub async fn get_all(&self) -> AppResult<Vec<Coach>> {
        let rows = sqlx::query_as::<_, Coach>("SELECT * FROM coaches ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Apply the `Some(_)` fields of `data` to the coach. Returns
    /// `Ok(false)` when no row matched the id.
    pub async fn update(&self, id: i64, data: &UpdateCoach) -> AppResult<bool> {
        data.validate()?;
        let mut sets: Vec<&str> = Vec::new();

        macro_rules! add_field {
            ($field:expr, $set:expr) => {
                if $field.is_some() {
                    sets.push($set);
                }
            };
        }

        add_field!(data.internal_number, "internal_number = ?");
        add_field!(data.surname, "surname = ?");
        add_field!(data.name, "name = ?");
        add_field!(data.experience, "experience = ?");
        add_field!(data.password, "password = ?");

        if sets.is_empty() {
            // Nothing to change: report row existence without touching it.
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM coaches WHERE id = ?)")
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?;
            return Ok(exists);
        }

        let query = format!("UPDATE coaches SET {} WHERE id = ?", sets.join(", "));
        let mut builder = sqlx::query(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.internal_number);
        bind_field!(data.surname);
        bind_field!(data.name);
        bind_field!(data.experience);
        bind_field!(data.password);

        let result = builder.bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a coach. `Ok(false)` when no row matched; blocked by an
    /// existing booking referencing the coach (`ForeignKey`).
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM coaches WHERE id = ?")
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

    async fn repo() -> CoachesRepository {
        let db = Database::new_in_memory().await.unwrap();
        CoachesRepository::new(db.pool().clone())
    }

    fn sample(internal_number: i64) -> CreateCoach {
        CreateCoach {
            internal_number,
            surname: "Sidorova".to_string(),
            name: "Elena".to_string(),
            experience: 5,
            password: "pass101".to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_get() {
        let repo = repo().await;
        let id = repo.create(&sample(101)).await.unwrap();
        let coach = repo.get_by_id(id).await.unwrap();
        assert_eq!(coach.internal_number, 101);
        assert_eq!(coach.surname, "Sidorova");
        assert_eq!(coach.experience, 5);
    }

    #[tokio::test]
    async fn duplicate_internal_number_is_constraint_error() {
        let repo = repo().await;
        repo.create(&sample(101)).await.unwrap();
        let err = repo.create(&sample(101)).await.unwrap_err();
        assert!(matches!(err, AppError::Constraint(_)));
        // The first row is untouched.
        let all = repo.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].internal_number, 101);
    }

    #[tokio::test]
    async fn create_rejects_short_password_before_touching_db() {
        let repo = repo().await;
        let mut data = sample(101);
        data.password = "short".to_string();
        let err = repo.create(&data).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let repo = repo().await;
        let id = repo.create(&sample(101)).await.unwrap();
        let changed = repo
            .update(
                id,
                &UpdateCoach {
                    experience: Some(8),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(changed);
        let coach = repo.get_by_id(id).await.unwrap();
        assert_eq!(coach.experience, 8);
        assert_eq!(coach.surname, "Sidorova");
        assert_eq!(coach.password, "pass101");
    }

    #[tokio::test]
    async fn update_missing_row_returns_false() {
        let repo = repo().await;
        let changed = repo
            .update(
                42,
                &UpdateCoach {
                    name: Some("Petr".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!changed);
    }

    #[tokio::test]
    async fn empty_update_reports_row_existence() {
        let repo = repo().await;
        let id = repo.create(&sample(101)).await.unwrap();
        assert!(repo.update(id, &UpdateCoach::default()).await.unwrap());
        assert!(!repo.update(999, &UpdateCoach::default()).await.unwrap());
    }

    #[tokio::test]
    async fn delete_returns_false_for_missing_row() {
        let repo = repo().await;
        assert!(!repo.delete(42).await.unwrap());
        let id = repo.create(&sample(101)).await.unwrap();
        assert!(repo.delete(id).await.unwrap());
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn password_mask_matches_length() {
        let repo = repo().await;
        let id = repo.create(&sample(101)).await.unwrap();
        let coach = repo.get_by_id(id).await.unwrap();
        assert_eq!(coach.password_mask(), "*******");
        // Raw value stays available for authentication comparison.
        assert_eq!(coach.password, "pass101");
    }
}
