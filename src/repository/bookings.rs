//! Bookings repository: plain CRUD on the booking row plus the
//! transactional create that attaches inventory links atomically.

use sqlx::{FromRow, SqlitePool};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::booking::{
        Booking, BookingDetails, BookingItem, BookingItemLink, CreateBooking, UpdateBooking,
        UpdateBookingLink,
    },
};

/// Status id new links are created with. The seed inserts "Requested"
/// first, so it always holds id 1.
pub const DEFAULT_LINK_STATUS_ID: i64 = 1;

#[derive(Clone)]
pub struct BookingsRepository {
    pool: SqlitePool,
}

#[derive(FromRow)]
struct DetailsRow {
    id: i64,
    number_booking: i64,
    time_start: String,
    time_end: String,
    coach_surname: String,
    coach_name: String,
    internal_number: i64,
    user_surname: String,
    user_name: String,
}

#[derive(FromRow)]
struct LinkRow {
    booking_id: i64,
    inventory_name: String,
    status_name: String,
}

impl BookingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a booking together with one link row per entry of
    /// `inventory_ids`, in a single transaction.
    ///
    /// The next `number_booking` is computed inside the same transaction as
    /// the insert, so a lost-update race needs two writers to begin with.
    /// Duplicate inventory ids are inserted as separate links, in order.
    /// Any failure rolls the whole scope back: no partial booking or
    /// partial link set persists.
    pub async fn create(&self, data: &CreateBooking, inventory_ids: &[i64]) -> AppResult<i64> {
        data.validate()?;
        let mut tx = self.pool.begin().await?;

        let next_number: i64 =
            sqlx::query_scalar("SELECT IFNULL(MAX(number_booking), 0) + 1 FROM bookings")
                .fetch_one(&mut *tx)
                .await?;

        let booking_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO bookings (coach_id, user_id, time_start, time_end, number_booking)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(data.coach_id)
        .bind(data.user_id)
        .bind(&data.time_start)
        .bind(&data.time_end)
        .bind(next_number)
        .fetch_one(&mut *tx)
        .await?;

        for inventory_id in inventory_ids {
            sqlx::query(
                "INSERT INTO booking_inventory (booking_id, inventory_id, status_id) VALUES (?, ?, ?)",
            )
            .bind(booking_id)
            .bind(inventory_id)
            .bind(DEFAULT_LINK_STATUS_ID)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(booking_id)
    }

    /// Get booking by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))
    }

    /// List all bookings, primary key ascending
    pub async fn get_all(&self) -> AppResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Link rows of one booking, primary key ascending
    pub async fn links_for(&self, booking_id: i64) -> AppResult<Vec<BookingItemLink>> {
        let rows = sqlx::query_as::<_, BookingItemLink>(
            "SELECT * FROM booking_inventory WHERE booking_id = ? ORDER BY id",
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Apply the `Some(_)` fields of `data` to the booking row. Returns
    /// `Ok(false)` when no row matched the id.
    pub async fn update(&self, id: i64, data: &UpdateBooking) -> AppResult<bool> {
        data.validate()?;
        let mut sets: Vec<&str> = Vec::new();

        macro_rules! add_field {
            ($field:expr, $set:expr) => {
                if $field.is_some() {
                    sets.push($set);
                }
            };
        }

        add_field!(data.coach_id, "coach_id = ?");
        add_field!(data.user_id, "user_id = ?");
        add_field!(data.time_start, "time_start = ?");
        add_field!(data.time_end, "time_end = ?");

        if sets.is_empty() {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM bookings WHERE id = ?)")
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?;
            return Ok(exists);
        }

        let query = format!("UPDATE bookings SET {} WHERE id = ?", sets.join(", "));
        let mut builder = sqlx::query(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.coach_id);
        bind_field!(data.user_id);
        bind_field!(data.time_start);
        bind_field!(data.time_end);

        let result = builder.bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply the `Some(_)` fields of `data` to every link row of the
    /// booking, as one statement. Returns `Ok(false)` when the booking has
    /// no link rows.
    pub async fn update_links(&self, booking_id: i64, data: &UpdateBookingLink) -> AppResult<bool> {
        let mut sets: Vec<&str> = Vec::new();

        macro_rules! add_field {
            ($field:expr, $set:expr) => {
                if $field.is_some() {
                    sets.push($set);
                }
            };
        }

        add_field!(data.inventory_id, "inventory_id = ?");
        add_field!(data.status_id, "status_id = ?");

        if sets.is_empty() {
            let exists: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM booking_inventory WHERE booking_id = ?)",
            )
            .bind(booking_id)
            .fetch_one(&self.pool)
            .await?;
            return Ok(exists);
        }

        let query = format!(
            "UPDATE booking_inventory SET {} WHERE booking_id = ?",
            sets.join(", ")
        );
        let mut builder = sqlx::query(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.inventory_id);
        bind_field!(data.status_id);

        let result = builder.bind(booking_id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a booking. The cascade rule removes its link rows.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Joined detail view of all bookings, booking id ascending. A booking
    /// with no links gets an empty item list.
    pub async fn get_all_details(&self) -> AppResult<Vec<BookingDetails>> {
        let bookings: Vec<DetailsRow> = sqlx::query_as(
            r#"
            SELECT b.id, b.number_booking, b.time_start, b.time_end,
                   c.surname AS coach_surname, c.name AS coach_name, c.internal_number,
                   u.surname AS user_surname, u.name AS user_name
            FROM bookings b
            JOIN coaches c ON b.coach_id = c.id
            JOIN users u ON b.user_id = u.id
            ORDER BY b.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let links: Vec<LinkRow> = sqlx::query_as(
            r#"
            SELECT bi.booking_id, i.name AS inventory_name, s.name AS status_name
            FROM booking_inventory bi
            JOIN inventory i ON bi.inventory_id = i.id
            JOIN statuses s ON bi.status_id = s.id
            ORDER BY bi.booking_id, bi.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut details: Vec<BookingDetails> = bookings
            .into_iter()
            .map(|row| BookingDetails {
                id: row.id,
                number_booking: row.number_booking,
                time_start: row.time_start,
                time_end: row.time_end,
                coach: format!(
                    "{} {} ({})",
                    row.coach_surname, row.coach_name, row.internal_number
                ),
                user: format!("{} {}", row.user_surname, row.user_name),
                items: Vec::new(),
            })
            .collect();

        for link in links {
            if let Some(detail) = details.iter_mut().find(|d| d.id == link.booking_id) {
                detail.items.push(BookingItem {
                    name: link.inventory_name,
                    status: link.status_name,
                });
            }
        }

        Ok(details)
    }
}
