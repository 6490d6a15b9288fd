//! CLI module for the Item & User API
//!
//! Provides subcommands:
//! - `serve`: run the HTTP server
//! - `seed`: populate the users table with generated accounts

pub mod seed;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Item & User API - in-memory items, persisted users
#[derive(Parser)]
#[command(name = "item-user-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Create generated users in the database
    Seed(seed::SeedArgs),
}

/// Load `.env`, the layered config, and install logging
fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}
