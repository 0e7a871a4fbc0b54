//! SDB Sample
//!
//! A REST backend exposing CRUD over users (with their read-only posts) and a
//! client that lists, creates and deletes users while polling backend health.

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;
use tracing::info;

use api::state::AppState;
use domain::DomainError;
use infrastructure::{
    storage::{self, PostgresConfig, StorageType},
    user::{InMemoryUserRepository, PostgresUserRepository, UserService},
};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
///
/// The PostgreSQL backend connects, applies pending migrations and only then
/// hands out the state.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let backend: StorageType = config.storage.backend.parse()?;

    let state = match backend {
        StorageType::InMemory => {
            info!("Using in-memory user store");
            let repository = Arc::new(InMemoryUserRepository::new());
            AppState::new(Arc::new(UserService::new(repository)))
        }
        StorageType::Postgres => {
            let pool = connect_postgres(config).await?;
            storage::run_storage_migrations(&pool)
                .await
                .context("Failed to run storage migrations")?;

            info!("Using PostgreSQL user store");
            let repository = Arc::new(PostgresUserRepository::new(pool));
            AppState::new(Arc::new(UserService::new(repository)))
        }
    };

    Ok(state)
}

/// Open the PostgreSQL pool described by the storage settings
pub async fn connect_postgres(config: &AppConfig) -> anyhow::Result<PgPool> {
    let url = config.storage.resolved_database_url().ok_or_else(|| {
        DomainError::configuration(
            "PostgreSQL storage requires storage.database_url or DATABASE_URL",
        )
    })?;

    let pg_config = PostgresConfig::new(url).with_max_connections(config.storage.max_connections);

    Ok(storage::connect(&pg_config).await?)
}
