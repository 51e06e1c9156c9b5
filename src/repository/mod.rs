//! Repository layer for database operations

pub mod bookings;
pub mod coaches;
pub mod inventory;
pub mod statuses;
pub mod users;

use indexmap::IndexMap;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::fmt;
use std::str::FromStr;

use crate::error::AppResult;

/// Main repository struct holding the database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: SqlitePool,
    pub coaches: coaches::CoachesRepository,
    pub users: users::UsersRepository,
    pub inventory: inventory::InventoryRepository,
    pub statuses: statuses::StatusesRepository,
    pub bookings: bookings::BookingsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            coaches: coaches::CoachesRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            inventory: inventory::InventoryRepository::new(pool.clone()),
            statuses: statuses::StatusesRepository::new(pool.clone()),
            bookings: bookings::BookingsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Dump one exportable table as ordered-field record mappings, primary
    /// key ascending. Flat exports show raw column values, passwords
    /// included; masking is a display concern.
    pub async fn dump_table(&self, table: ExportTable) -> AppResult<Vec<IndexMap<String, Value>>> {
        let records = match table {
            ExportTable::Coaches => self
                .coaches
                .get_all()
                .await?
                .into_iter()
                .map(|c| {
                    IndexMap::from([
                        ("id".to_string(), json!(c.id)),
                        ("internal_number".to_string(), json!(c.internal_number)),
                        ("surname".to_string(), json!(c.surname)),
                        ("name".to_string(), json!(c.name)),
                        ("experience".to_string(), json!(c.experience)),
                        ("password".to_string(), json!(c.password)),
                    ])
                })
                .collect(),
            ExportTable::Users => self
                .users
                .get_all()
                .await?
                .into_iter()
                .map(|u| {
                    IndexMap::from([
                        ("id".to_string(), json!(u.id)),
                        ("surname".to_string(), json!(u.surname)),
                        ("name".to_string(), json!(u.name)),
                        ("password".to_string(), json!(u.password)),
                    ])
                })
                .collect(),
            ExportTable::Inventory => self
                .inventory
                .get_all()
                .await?
                .into_iter()
                .map(|i| {
                    IndexMap::from([
                        ("id".to_string(), json!(i.id)),
                        ("name".to_string(), json!(i.name)),
                        ("count".to_string(), json!(i.count)),
                        ("comment".to_string(), json!(i.comment)),
                    ])
                })
                .collect(),
        };
        Ok(records)
    }
}

/// Closed set of tables the flat export may dump. Keeps table names out of
/// dynamic SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTable {
    Coaches,
    Users,
    Inventory,
}

impl ExportTable {
    pub fn table_name(&self) -> &'static str {
        match self {
            ExportTable::Coaches => "coaches",
            ExportTable::Users => "users",
            ExportTable::Inventory => "inventory",
        }
    }

    /// Element name for one record in the XML export.
    pub fn record_element(&self) -> &'static str {
        match self {
            ExportTable::Coaches => "coach",
            ExportTable::Users => "user",
            ExportTable::Inventory => "item",
        }
    }
}

impl fmt::Display for ExportTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl FromStr for ExportTable {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coaches" | "coach" => Ok(ExportTable::Coaches),
            "users" | "user" => Ok(ExportTable::Users),
            "inventory" => Ok(ExportTable::Inventory),
            _ => Err(()),
        }
    }
}
