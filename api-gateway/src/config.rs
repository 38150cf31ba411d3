//! Application configuration

use std::env;

/// Application configuration
pub struct AppConfig {
    /// API port
    pub port: u16,
    /// Database URL; when unset the gateway runs on seeded in-memory stores
    pub database_url: Option<String>,
    /// Maximum database connections per pool
    pub db_max_connections: u32,
}

impl AppConfig {
    /// Create a new configuration from environment variables
    pub fn new() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database_url: env::var("DATABASE_URL").ok(),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}
