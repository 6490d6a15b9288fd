mod app_config;

pub use app_config::{
    AppConfig, DatabaseConfig, LogFormat, LoggingConfig, ServerConfig, DATABASE_URL_ENV,
};
