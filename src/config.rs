// src/config.rs

use std::{env, fmt, net::SocketAddr, str::FromStr};

/// Default profile image assigned to every new account.
pub const DEFAULT_PROFILE_IMAGE: &str = "default.jpg";

/// Name of the cookie holding the signed session token.
pub const SESSION_COOKIE: &str = "session";

/// Name of the one-shot cookie carrying a flash message to the next page.
pub const FLASH_COOKIE: &str = "flash";

/// Startup configuration, loaded once and injected through `AppState`.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Upper bound of the connection pool.
    pub database_max_connections: u32,
    /// HMAC secret used to sign session cookies.
    pub session_secret: String,
    /// Session lifetime in seconds.
    pub session_expiration: u64,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    /// Directory served under `/static` (profile images).
    pub static_dir: String,
    pub admin_username: Option<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// Callers are expected to have loaded `.env` beforehand.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup (the environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://site.db?mode=rwc".to_string());

        let session_secret = lookup("SESSION_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("SESSION_SECRET"))?;

        let session_expiration = parse_or("SESSION_EXPIRATION", &lookup, 86_400)?;
        let database_max_connections = parse_or("DATABASE_MAX_CONNECTIONS", &lookup, 5)?;
        if database_max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }
        let bind_addr = parse_or(
            "BIND_ADDR",
            &lookup,
            SocketAddr::from(([0, 0, 0, 0], 3000)),
        )?;

        let rust_log = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());
        let static_dir = lookup("STATIC_DIR").unwrap_or_else(|| "static".to_string());

        Ok(Self {
            database_url,
            database_max_connections,
            session_secret,
            session_expiration,
            rust_log,
            bind_addr,
            static_dir,
            admin_username: lookup("ADMIN_USERNAME"),
            admin_email: lookup("ADMIN_EMAIL"),
            admin_password: lookup("ADMIN_PASSWORD"),
        })
    }
}

/// Parses an optional key, falling back to `default` when it is unset.
fn parse_or<T, F>(key: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}
