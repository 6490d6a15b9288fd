//! PostgreSQL connection pooling

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::domain::DomainError;

/// Open a connection pool sized and timed out per the database config.
///
/// Connections are checked out per query and returned when the handle drops.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    let url = config.resolve_url()?;

    info!(url = %mask_database_url(&url), "Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&url)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

    info!("PostgreSQL connection established");
    Ok(pool)
}

/// Replace the password part of a connection URL with `***` for logging
pub fn mask_database_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };

    let authority_start = scheme_end + 3;
    let rest = &url[authority_start..];

    let Some(at) = rest.rfind('@') else {
        return url.to_string();
    };

    let credentials = &rest[..at];

    match credentials.find(':') {
        Some(colon) => format!(
            "{}{}:***{}",
            &url[..authority_start],
            &credentials[..colon],
            &rest[at..]
        ),
        None => url.to_string(),
    }
}
