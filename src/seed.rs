//! Demo data seeding.

use chrono::{TimeZone, Utc};
use sqlx::SqlitePool;

use crate::error::AppResult;
use crate::services::auth::ADMIN_INTERNAL_NUMBER;

/// Insert the demo data set in one transaction. Idempotent: a present
/// administrator row means the database was already seeded.
///
/// "Requested" is inserted as the first status so it receives id 1, the
/// default status of new booking links.
pub async fn seed_demo_data(pool: &SqlitePool) -> AppResult<()> {
    let seeded: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM coaches WHERE internal_number = ?)")
            .bind(ADMIN_INTERNAL_NUMBER)
            .fetch_one(pool)
            .await?;
    if seeded {
        tracing::debug!("demo data already present, skipping seed");
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    let coaches: [(i64, &str, &str, i64, &str); 3] = [
        (ADMIN_INTERNAL_NUMBER, "Sysadmin", "Root", 99, "admin_pass"),
        (101, "Sidorova", "Elena", 5, "pass101"),
        (102, "Ivanov", "Petr", 3, "pass102"),
    ];
    for (number, surname, name, experience, password) in coaches {
        sqlx::query(
            r#"
            INSERT INTO coaches (internal_number, surname, name, experience, password)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(number)
        .bind(surname)
        .bind(name)
        .bind(experience)
        .bind(password)
        .execute(&mut *tx)
        .await?;
    }

    let users = [
        ("Klimov", "Alexey", "userpass1"),
        ("Smirnova", "Maria", "userpass2"),
        ("Vorobyov", "Ilya", "userpass3"),
    ];
    for (surname, name, password) in users {
        sqlx::query("INSERT INTO users (surname, name, password) VALUES (?, ?, ?)")
            .bind(surname)
            .bind(name)
            .bind(password)
            .execute(&mut *tx)
            .await?;
    }

    for status in ["Requested", "Confirmed", "Cancelled", "Completed"] {
        sqlx::query("INSERT INTO statuses (name) VALUES (?)")
            .bind(status)
            .execute(&mut *tx)
            .await?;
    }

    let inventory: [(&str, i64, &str); 3] = [
        ("Barbell 20kg", 5, "Keep clear of the rack"),
        ("Dumbbells 5kg", 10, "Sold as pairs"),
        ("Yoga mat", 20, "Wipe down after use"),
    ];
    for (name, count, comment) in inventory {
        sqlx::query("INSERT INTO inventory (name, count, comment) VALUES (?, ?, ?)")
            .bind(name)
            .bind(count)
            .bind(comment)
            .execute(&mut *tx)
            .await?;
    }

    let now = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let future = Utc
        .with_ymd_and_hms(2025, 12, 31, 15, 0, 0)
        .unwrap()
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();

    // Coach 101 with user 1, coach 102 with user 2.
    let bookings: [(i64, i64, i64); 2] = [(2, 1, 1), (3, 2, 2)];
    for (coach_id, user_id, number) in bookings {
        sqlx::query(
            r#"
            INSERT INTO bookings (coach_id, user_id, time_start, time_end, number_booking)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(coach_id)
        .bind(user_id)
        .bind(&now)
        .bind(&future)
        .bind(number)
        .execute(&mut *tx)
        .await?;
    }

    // Booking 1: barbell, Confirmed. Booking 2: yoga mat, Requested.
    let links: [(i64, i64, i64); 2] = [(1, 1, 2), (2, 3, 1)];
    for (booking_id, inventory_id, status_id) in links {
        sqlx::query(
            "INSERT INTO booking_inventory (booking_id, inventory_id, status_id) VALUES (?, ?, ?)",
        )
        .bind(booking_id)
        .bind(inventory_id)
        .bind(status_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!("demo data seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::role::Role;
    use crate::repository::Repository;
    use crate::services::auth::AuthService;

    #[tokio::test]
    async fn seed_is_idempotent() {
        let db = Database::new_in_memory().await.unwrap();
        seed_demo_data(db.pool()).await.unwrap();
        seed_demo_data(db.pool()).await.unwrap();
        let coaches: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM coaches")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(coaches, 3);
    }

    #[tokio::test]
    async fn seeded_credentials_authenticate() {
        let db = Database::new_in_memory().await.unwrap();
        seed_demo_data(db.pool()).await.unwrap();
        let auth = AuthService::new(Repository::new(db.pool().clone()));
        assert_eq!(
            auth.authenticate("admin", "admin_pass").await.unwrap(),
            Some(Role::Administrator)
        );
        assert_eq!(
            auth.authenticate("102", "pass102").await.unwrap(),
            Some(Role::Coach)
        );
        assert_eq!(
            auth.authenticate("1", "userpass1").await.unwrap(),
            Some(Role::User)
        );
    }

    #[tokio::test]
    async fn requested_status_is_id_one() {
        let db = Database::new_in_memory().await.unwrap();
        seed_demo_data(db.pool()).await.unwrap();
        let repo = Repository::new(db.pool().clone());
        let status = repo.statuses.get_by_id(1).await.unwrap();
        assert_eq!(status.name, "Requested");
    }
}
