use serde::Deserialize;

use crate::domain::DomainError;

/// Environment variable consulted when `database.url` is not configured
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// PostgreSQL connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL; falls back to `DATABASE_URL` when unset
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl DatabaseConfig {
    /// The configured URL, else `DATABASE_URL`; an error when neither is set
    pub fn resolve_url(&self) -> Result<String, DomainError> {
        self.resolve_url_with(|key| std::env::var(key).ok())
    }

    fn resolve_url_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<String, DomainError> {
        self.url
            .clone()
            .or_else(|| lookup(DATABASE_URL_ENV))
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                DomainError::configuration(format!(
                    "{} environment variable is not set",
                    DATABASE_URL_ENV
                ))
            })
    }
}

impl AppConfig {
    /// Load from `config/default`, `config/local`, then `APP__*` environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
