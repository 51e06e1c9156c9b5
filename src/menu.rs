//! Interactive session loop: login prompt, role-gated menu, dispatch.
//!
//! One authenticated role drives one menu loop at a time; the next login
//! prompt only appears after the current session logs out. Every selection
//! is re-checked against the authorization gate before dispatch.

use std::io::{self, Write};

use crate::error::{AppError, AppResult};
use crate::models::booking::{CreateBooking, UpdateBooking, UpdateBookingLink};
use crate::models::coach::{CreateCoach, UpdateCoach};
use crate::models::inventory::{CreateInventory, UpdateInventory};
use crate::models::role::Role;
use crate::models::user::{CreateUser, UpdateUser};
use crate::repository::ExportTable;
use crate::services::access::{allowed_actions, authorize, ActionKey};
use crate::services::export::ExportFormat;
use crate::services::Services;

/// Login loop. Returns when the operator declines another login.
pub async fn run(services: &Services) -> AppResult<()> {
    loop {
        println!();
        println!("========================================");
        println!(" CoachDesk - coaching session bookings");
        println!("========================================");

        let login = prompt("Login: ")?;
        let password = prompt("Password: ")?;

        match services.auth.authenticate(&login, &password).await? {
            Some(role) => {
                println!("Logged in as {}.", role);
                session(services, role).await?;
            }
            None => println!("Access denied: wrong login or password."),
        }

        let again = prompt("Log in again? (y/n): ")?;
        if !again.eq_ignore_ascii_case("y") {
            return Ok(());
        }
    }
}

/// Menu loop for one authenticated role. `0` logs out.
async fn session(services: &Services, role: Role) -> AppResult<()> {
    loop {
        let actions = allowed_actions(role);
        println!();
        println!("--- Menu ({}) ---", role);
        for (i, action) in actions.iter().enumerate() {
            println!("[{}] {}", i + 1, action.label());
        }
        println!("[0] Log out");

        let choice = prompt("Choice: ")?;
        if choice == "0" {
            return Ok(());
        }
        let action = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|n| actions.get(n).copied());
        let Some(action) = action else {
            println!("Invalid choice, pick a number from the list.");
            continue;
        };
        if !authorize(role, action) {
            println!("Action {} is not permitted for your role.", action);
            continue;
        }

        if let Err(err) = dispatch(services, action).await {
            if let AppError::Storage(_) = err {
                tracing::error!(%err, action = %action, "operation aborted");
            }
            println!("Error: {}", err);
        }
    }
}

async fn dispatch(services: &Services, action: ActionKey) -> AppResult<()> {
    match action {
        ActionKey::AddCoach => add_coach(services).await,
        ActionKey::AddUser => add_user(services).await,
        ActionKey::AddInventory => add_inventory(services).await,
        ActionKey::AddBooking => add_booking(services).await,
        ActionKey::ModifyCoach => modify_coach(services).await,
        ActionKey::ModifyUser => modify_user(services).await,
        ActionKey::ModifyInventory => modify_inventory(services).await,
        ActionKey::ModifyBooking => modify_booking(services).await,
        ActionKey::DeleteRecord => delete_record(services).await,
        ActionKey::ShowCoaches => show_coaches(services).await,
        ActionKey::ShowUsers => show_users(services).await,
        ActionKey::ShowBookings => show_bookings(services).await,
        ActionKey::ExportFlat => export_flat(services).await,
        ActionKey::ExportNested => export_nested(services).await,
    }
}

async fn add_coach(services: &Services) -> AppResult<()> {
    println!("--- Add a coach ---");
    let data = CreateCoach {
        internal_number: prompt_i64("Internal number: ")?,
        surname: prompt("Surname (1-30): ")?,
        name: prompt("Name (1-30): ")?,
        experience: prompt_optional_i64("Experience in years (empty = 0): ")?.unwrap_or(0),
        password: prompt("Password (6-30): ")?,
    };
    let id = services.repository.coaches.create(&data).await?;
    println!("Coach added with id {}.", id);
    Ok(())
}

async fn add_user(services: &Services) -> AppResult<()> {
    println!("--- Add a user ---");
    let data = CreateUser {
        surname: prompt("Surname (1-30): ")?,
        name: prompt("Name (1-30): ")?,
        password: prompt("Password (6-30): ")?,
    };
    let id = services.repository.users.create(&data).await?;
    println!("User added with id {}.", id);
    Ok(())
}

async fn add_inventory(services: &Services) -> AppResult<()> {
    println!("--- Add an inventory item ---");
    let data = CreateInventory {
        name: prompt("Name (1-50): ")?,
        count: prompt_i64("Count: ")?,
        comment: prompt_optional("Comment (optional): ")?,
    };
    let id = services.repository.inventory.create(&data).await?;
    println!("Inventory item added with id {}.", id);
    Ok(())
}

async fn add_booking(services: &Services) -> AppResult<()> {
    println!("--- Add a booking ---");
    let data = CreateBooking {
        coach_id: prompt_i64("Coach id: ")?,
        user_id: prompt_i64("User id: ")?,
        time_start: prompt("Start time (YYYY-MM-DD HH:MM:SS): ")?,
        time_end: prompt("End time (YYYY-MM-DD HH:MM:SS): ")?,
    };

    let inventory = services.repository.inventory.get_all().await?;
    if inventory.is_empty() {
        println!("No inventory available.");
    } else {
        println!("Available inventory (id | name | count):");
        for item in &inventory {
            println!("  {} | {} | x{}", item.id, item.name, item.count);
        }
    }

    // Bad numerals are a validation failure before anything is written.
    let raw = prompt("Inventory ids, comma-separated (empty = none): ")?;
    let inventory_ids = parse_id_list(&raw)?;

    let id = services.bookings.create_booking(&data, &inventory_ids).await?;
    println!("Booking added with id {}.", id);
    Ok(())
}

async fn modify_coach(services: &Services) -> AppResult<()> {
    println!("--- Modify a coach (empty input keeps the current value) ---");
    let id = prompt_i64("Coach id: ")?;
    let data = UpdateCoach {
        internal_number: prompt_optional_i64("New internal number: ")?,
        surname: prompt_optional("New surname: ")?,
        name: prompt_optional("New name: ")?,
        experience: prompt_optional_i64("New experience: ")?,
        password: prompt_optional("New password: ")?,
    };
    if services.repository.coaches.update(id, &data).await? {
        println!("Coach {} updated.", id);
    } else {
        println!("Coach {} not found.", id);
    }
    Ok(())
}

async fn modify_user(services: &Services) -> AppResult<()> {
    println!("--- Modify a user (empty input keeps the current value) ---");
    let id = prompt_i64("User id: ")?;
    let data = UpdateUser {
        surname: prompt_optional("New surname: ")?,
        name: prompt_optional("New name: ")?,
        password: prompt_optional("New password: ")?,
    };
    if services.repository.users.update(id, &data).await? {
        println!("User {} updated.", id);
    } else {
        println!("User {} not found.", id);
    }
    Ok(())
}

async fn modify_inventory(services: &Services) -> AppResult<()> {
    println!("--- Modify an inventory item (empty input keeps the current value) ---");
    let id = prompt_i64("Inventory id: ")?;
    let data = UpdateInventory {
        name: prompt_optional("New name: ")?,
        count: prompt_optional_i64("New count: ")?,
        comment: prompt_optional("New comment: ")?,
    };
    if services.repository.inventory.update(id, &data).await? {
        println!("Inventory item {} updated.", id);
    } else {
        println!("Inventory item {} not found.", id);
    }
    Ok(())
}

async fn modify_booking(services: &Services) -> AppResult<()> {
    println!("--- Modify a booking (empty input keeps the current value) ---");
    let id = prompt_i64("Booking id: ")?;
    let booking = UpdateBooking {
        coach_id: prompt_optional_i64("New coach id: ")?,
        user_id: prompt_optional_i64("New user id: ")?,
        time_start: prompt_optional("New start time: ")?,
        time_end: prompt_optional("New end time: ")?,
    };
    let links = UpdateBookingLink {
        inventory_id: prompt_optional_i64("New inventory id for its links: ")?,
        status_id: prompt_optional_i64("New status id for its links: ")?,
    };
    let (booking_changed, links_changed) =
        services.bookings.update_booking(id, &booking, &links).await?;
    println!(
        "Booking {}: booking row {}, link rows {}.",
        id,
        if booking_changed { "updated" } else { "unchanged" },
        if links_changed { "updated" } else { "unchanged" },
    );
    Ok(())
}

async fn delete_record(services: &Services) -> AppResult<()> {
    println!("--- Delete a record ---");
    println!("[1] User  [2] Coach  [3] Inventory  [4] Booking");
    let table = prompt("Table: ")?;
    let id = prompt_i64("Record id: ")?;
    let deleted = match table.as_str() {
        "1" => services.repository.users.delete(id).await?,
        "2" => services.repository.coaches.delete(id).await?,
        "3" => services.repository.inventory.delete(id).await?,
        "4" => services.bookings.delete_booking(id).await?,
        _ => {
            println!("Invalid table choice.");
            return Ok(());
        }
    };
    if deleted {
        println!("Record {} deleted.", id);
    } else {
        println!("Record {} not found.", id);
    }
    Ok(())
}

async fn show_coaches(services: &Services) -> AppResult<()> {
    println!("--- Coaches ---");
    let coaches = services.repository.coaches.get_all().await?;
    if coaches.is_empty() {
        println!("No coaches registered.");
    }
    for c in coaches {
        println!(
            "id {} | number {} | {} {} | {} years | password {}",
            c.id,
            c.internal_number,
            c.surname,
            c.name,
            c.experience,
            c.password_mask()
        );
    }
    Ok(())
}

async fn show_users(services: &Services) -> AppResult<()> {
    println!("--- Users ---");
    let users = services.repository.users.get_all().await?;
    if users.is_empty() {
        println!("No users registered.");
    }
    for u in users {
        println!(
            "id {} | {} {} | password {}",
            u.id,
            u.surname,
            u.name,
            u.password_mask()
        );
    }
    Ok(())
}

async fn show_bookings(services: &Services) -> AppResult<()> {
    println!("--- Bookings ---");
    let bookings = services.bookings.list_details().await?;
    if bookings.is_empty() {
        println!("No active bookings.");
    }
    for b in bookings {
        println!(
            "id {} | number {} | coach {} | user {}",
            b.id, b.number_booking, b.coach, b.user
        );
        println!("    time: {} - {}", b.time_start, b.time_end);
        if b.items.is_empty() {
            println!("    inventory: none");
        } else {
            let items: Vec<String> = b
                .items
                .iter()
                .map(|i| format!("{} ({})", i.name, i.status))
                .collect();
            println!("    inventory: {}", items.join(", "));
        }
    }
    Ok(())
}

async fn export_flat(services: &Services) -> AppResult<()> {
    println!("--- Export a table ---");
    let table: ExportTable = prompt("Table (coaches / users / inventory): ")?
        .parse()
        .map_err(|_| AppError::Validation("unknown table name".to_string()))?;
    let format: ExportFormat = prompt("Format (json / csv / yaml / xml): ")?
        .parse()
        .map_err(|_| AppError::Validation("unsupported format".to_string()))?;
    let path = services.export.export_table(table, format).await?;
    println!("Exported to {}.", path.display());
    Ok(())
}

async fn export_nested(services: &Services) -> AppResult<()> {
    println!("--- Export bookings (nested) ---");
    let format: ExportFormat = prompt("Format (json / yaml / xml): ")?
        .parse()
        .map_err(|_| AppError::Validation("unsupported format".to_string()))?;
    let path = services.export.export_bookings_nested(format).await?;
    println!("Exported to {}.", path.display());
    Ok(())
}

fn prompt(msg: &str) -> AppResult<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_i64(msg: &str) -> AppResult<i64> {
    let raw = prompt(msg)?;
    raw.parse()
        .map_err(|_| AppError::Validation(format!("'{}' is not a number", raw)))
}

fn prompt_optional(msg: &str) -> AppResult<Option<String>> {
    let raw = prompt(msg)?;
    Ok(if raw.is_empty() { None } else { Some(raw) })
}

fn prompt_optional_i64(msg: &str) -> AppResult<Option<i64>> {
    match prompt_optional(msg)? {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("'{}' is not a number", raw))),
    }
}

/// Parse "1, 3, 4" into ids. Empty input means no inventory.
fn parse_id_list(raw: &str) -> AppResult<Vec<i64>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    raw.split(',')
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| AppError::Validation(format!("'{}' is not a number", part.trim())))
        })
        .collect()
}
