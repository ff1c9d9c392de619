//! Application configuration loaded from environment variables.

use std::env;

use inkwell_infra::{DatabaseConfig, JwtConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` when `DATABASE_URL` is unset; the server then runs on the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|url| DatabaseConfig {
                url,
                max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(100),
                min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(10),
            });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            jwt: JwtConfig::from_env(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
