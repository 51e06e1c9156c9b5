//! Business logic services

pub mod access;
pub mod auth;
pub mod bookings;
pub mod export;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub auth: auth::AuthService,
    pub bookings: bookings::BookingsService,
    pub export: export::ExportService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone()),
            bookings: bookings::BookingsService::new(repository.clone()),
            export: export::ExportService::new(repository.clone(), config.export.dir.clone()),
            repository,
        }
    }
}
