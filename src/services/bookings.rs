//! Booking transaction coordinator

use crate::{
    error::AppResult,
    models::booking::{BookingDetails, CreateBooking, UpdateBooking, UpdateBookingLink},
    repository::Repository,
};

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
}

impl BookingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a booking with its inventory links, all-or-nothing.
    pub async fn create_booking(
        &self,
        data: &CreateBooking,
        inventory_ids: &[i64],
    ) -> AppResult<i64> {
        let id = self.repository.bookings.create(data, inventory_ids).await?;
        tracing::info!(
            booking_id = id,
            links = inventory_ids.len(),
            "booking created"
        );
        Ok(id)
    }

    /// Update a booking's core fields and its link rows as two independent
    /// statements. Each statement is atomic per table; the pair is
    /// deliberately not jointly atomic, so a failure in the link update
    /// leaves an already-applied booking update in place.
    ///
    /// Returns `(booking_changed, links_changed)`.
    pub async fn update_booking(
        &self,
        id: i64,
        booking: &UpdateBooking,
        links: &UpdateBookingLink,
    ) -> AppResult<(bool, bool)> {
        // Surface a missing booking before either statement runs.
        self.repository.bookings.get_by_id(id).await?;
        let booking_changed = self.repository.bookings.update(id, booking).await?;
        let links_changed = self.repository.bookings.update_links(id, links).await?;
        tracing::info!(booking_id = id, booking_changed, links_changed, "booking updated");
        Ok((booking_changed, links_changed))
    }

    /// Delete a booking; the cascade removes its links.
    pub async fn delete_booking(&self, id: i64) -> AppResult<bool> {
        let deleted = self.repository.bookings.delete(id).await?;
        if deleted {
            tracing::info!(booking_id = id, "booking deleted");
        }
        Ok(deleted)
    }

    /// Joined detail view for display and nested export.
    pub async fn list_details(&self) -> AppResult<Vec<BookingDetails>> {
        self.repository.bookings.get_all_details().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::error::AppError;
    use crate::models::coach::CreateCoach;
    use crate::models::inventory::CreateInventory;
    use crate::models::status::CreateStatus;
    use crate::models::user::CreateUser;

    async fn service() -> (BookingsService, Repository, i64, i64, i64) {
        let db = Database::new_in_memory().await.unwrap();
        let repo = Repository::new(db.pool().clone());
        let coach_id = repo
            .coaches
            .create(&CreateCoach {
                internal_number: 101,
                surname: "Sidorova".to_string(),
                name: "Elena".to_string(),
                experience: 5,
                password: "pass101".to_string(),
            })
            .await
            .unwrap();
        let user_id = repo
            .users
            .create(&CreateUser {
                surname: "Klimov".to_string(),
                name: "Alexey".to_string(),
                password: "userpass1".to_string(),
            })
            .await
            .unwrap();
        repo.statuses
            .create(&CreateStatus {
                name: "Requested".to_string(),
                comment: None,
            })
            .await
            .unwrap();
        let item = repo
            .inventory
            .create(&CreateInventory {
                name: "Yoga mat".to_string(),
                count: 20,
                comment: None,
            })
            .await
            .unwrap();
        (BookingsService::new(repo.clone()), repo, coach_id, user_id, item)
    }

    fn create(coach_id: i64, user_id: i64) -> CreateBooking {
        CreateBooking {
            coach_id,
            user_id,
            time_start: "2025-12-10 10:00:00".to_string(),
            time_end: "2025-12-10 11:00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn update_of_missing_booking_is_not_found() {
        let (service, _, _, _, _) = service().await;
        let err = service
            .update_booking(42, &UpdateBooking::default(), &UpdateBookingLink::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn booking_update_survives_failed_link_update() {
        let (service, repo, coach_id, user_id, item) = service().await;
        let id = service
            .create_booking(&create(coach_id, user_id), &[item])
            .await
            .unwrap();

        // Booking field update lands first, then the link update fails on
        // a dangling status id. The first update is not rolled back.
        let err = service
            .update_booking(
                id,
                &UpdateBooking {
                    time_end: Some("2025-12-10 12:00:00".to_string()),
                    ..Default::default()
                },
                &UpdateBookingLink {
                    status_id: Some(9999),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ForeignKey(_)));

        let booking = repo.bookings.get_by_id(id).await.unwrap();
        assert_eq!(booking.time_end, "2025-12-10 12:00:00");
    }

    #[tokio::test]
    async fn delete_missing_booking_returns_false() {
        let (service, _, _, _, _) = service().await;
        assert!(!service.delete_booking(42).await.unwrap());
    }
}
