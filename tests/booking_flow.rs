//! End-to-end booking flow: seed entities, create a booking with linked
//! inventory, authenticate the coach, and check the authorization gate.

use coachdesk::db::Database;
use coachdesk::models::booking::CreateBooking;
use coachdesk::models::coach::CreateCoach;
use coachdesk::models::inventory::CreateInventory;
use coachdesk::models::role::Role;
use coachdesk::models::status::CreateStatus;
use coachdesk::models::user::CreateUser;
use coachdesk::repository::bookings::DEFAULT_LINK_STATUS_ID;
use coachdesk::repository::Repository;
use coachdesk::services::access::{authorize, ActionKey};
use coachdesk::services::auth::AuthService;
use coachdesk::services::bookings::BookingsService;

#[tokio::test]
async fn booking_flow_end_to_end() {
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
    let status_id = repo
        .statuses
        .create(&CreateStatus {
            name: "Requested".to_string(),
            comment: None,
        })
        .await
        .unwrap();
    assert_eq!(status_id, DEFAULT_LINK_STATUS_ID);
    let inventory_id = repo
        .inventory
        .create(&CreateInventory {
            name: "Barbell 20kg".to_string(),
            count: 5,
            comment: None,
        })
        .await
        .unwrap();

    // Create a booking with one linked inventory item.
    let bookings = BookingsService::new(repo.clone());
    let booking_id = bookings
        .create_booking(
            &CreateBooking {
                coach_id,
                user_id,
                time_start: "2025-12-10 10:00:00".to_string(),
                time_end: "2025-12-10 11:00:00".to_string(),
            },
            &[inventory_id],
        )
        .await
        .unwrap();

    let booking = repo.bookings.get_by_id(booking_id).await.unwrap();
    assert_eq!(booking.number_booking, 1);
    assert_eq!(booking.coach_id, coach_id);
    assert_eq!(booking.user_id, user_id);

    let links = repo.bookings.links_for(booking_id).await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].inventory_id, inventory_id);
    assert_eq!(links[0].status_id, DEFAULT_LINK_STATUS_ID);

    // The coach logs in with the internal number as login.
    let auth = AuthService::new(repo.clone());
    let role = auth.authenticate("101", "pass101").await.unwrap();
    assert_eq!(role, Some(Role::Coach));

    // A coach may book, but never manage coaches.
    assert!(authorize(Role::Coach, ActionKey::AddBooking));
    assert!(!authorize(Role::Coach, ActionKey::AddCoach));

    // Deleting the booking cascades its links; the inventory row stays.
    assert!(bookings.delete_booking(booking_id).await.unwrap());
    assert!(repo.bookings.get_all().await.unwrap().is_empty());
    assert!(repo
        .bookings
        .links_for(booking_id)
        .await
        .unwrap()
        .is_empty());
    assert!(repo.inventory.get_by_id(inventory_id).await.is_ok());
}
