//! CoachDesk binary: bootstrap and interactive session loop.

use std::path::Path;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coachdesk::{
    config::AppConfig, db::Database, menu, repository::Repository, seed, services::Services,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("coachdesk={}", config.logging.level).into());

    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting CoachDesk v{}", env!("CARGO_PKG_VERSION"));

    // Open the database and run migrations
    let db = Database::open(
        Path::new(&config.database.path),
        config.database.max_connections,
    )
    .await?;
    tracing::info!(path = %config.database.path, "database ready");

    if config.seed.demo {
        seed::seed_demo_data(db.pool()).await?;
    }

    let repository = Repository::new(db.pool().clone());
    let services = Services::new(repository, &config);

    menu::run(&services).await?;

    tracing::info!("CoachDesk shutting down");
    Ok(())
}
