//! CoachDesk - coaching session booking and inventory management
//!
//! Relational consistency core (repositories, booking transaction
//! coordinator, authentication and role-gated authorization) over SQLite,
//! with an interactive menu and export writers as its outer surface.

pub mod config;
pub mod db;
pub mod error;
pub mod menu;
pub mod models;
pub mod repository;
pub mod seed;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
