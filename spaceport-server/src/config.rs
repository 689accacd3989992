//! Server configuration loaded from the environment.

use std::str::FromStr;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_UI_ORIGINS: &str = "http://127.0.0.1:4200,http://localhost:4200";

/// Runtime settings for the HTTP server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// PostgreSQL connection string; `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Maximum pooled database connections.
    pub pool_size: u32,
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Build the configuration from process environment variables.
    #[cfg_attr(test, allow(dead_code))]
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let host = lookup("SPACEPORT_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or("SPACEPORT_PORT", lookup("SPACEPORT_PORT"), DEFAULT_PORT)?;
        let pool_size = parse_or(
            "SPACEPORT_POOL_SIZE",
            lookup("SPACEPORT_POOL_SIZE"),
            DEFAULT_POOL_SIZE,
        )?;
        if pool_size == 0 {
            return Err("SPACEPORT_POOL_SIZE must be at least 1".to_string());
        }
        let origins =
            lookup("SPACEPORT_UI_ORIGINS").unwrap_or_else(|| DEFAULT_UI_ORIGINS.to_string());
        let allowed_origins = origins
            .split(',')
            .map(|value| value.trim())
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();
        Ok(Self {
            database_url,
            host,
            port,
            pool_size,
            allowed_origins,
        })
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, String> {
    match raw {
        Some(value) => T::from_str(value.trim())
            .map_err(|_| format!("{key} must be a valid number, got {value:?}")),
        None => Ok(default),
    }
}
