//! Storage infrastructure - connection pooling and schema migrations

pub mod migrations;
mod postgres;

pub use migrations::run_migrations;
pub use postgres::{connect, mask_database_url};
