//! Item & User API
//!
//! A small HTTP backend exposing:
//! - An in-memory item catalogue with full CRUD
//! - PostgreSQL-backed users with registration and password login
//! - A seeding command for development databases

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use api::items::default_items;
use api::state::AppState;
use infrastructure::item::InMemoryItemRepository;
use infrastructure::storage;
use infrastructure::user::{
    Argon2Hasher, InMemoryUserRepository, PasswordHasher, PostgresUserRepository, UserService,
};

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let pool = connect_and_migrate(config).await?;

    Ok(create_app_state_with_pool(pool))
}

/// Open the connection pool and bring the schema up to date
pub async fn connect_and_migrate(config: &AppConfig) -> anyhow::Result<PgPool> {
    let pool = storage::connect(&config.database).await?;
    storage::run_migrations(&pool).await?;

    Ok(pool)
}

/// Build the state around an existing pool: persisted users, seeded items
pub fn create_app_state_with_pool(pool: PgPool) -> AppState {
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::new());
    let user_repository = Arc::new(PostgresUserRepository::new(pool, hasher.clone()));
    let user_service = Arc::new(UserService::new(user_repository, hasher));

    let items = default_items();
    info!(count = items.len(), "Item store seeded");

    AppState::new(
        user_service,
        Arc::new(InMemoryItemRepository::with_items(items)),
    )
}

/// Build a state that needs no database, with the given password hasher
pub fn create_in_memory_app_state(hasher: Arc<dyn PasswordHasher>) -> AppState {
    let user_repository = Arc::new(InMemoryUserRepository::new(hasher.clone()));
    let user_service = Arc::new(UserService::new(user_repository, hasher));

    AppState::new(
        user_service,
        Arc::new(InMemoryItemRepository::with_items(default_items())),
    )
}
