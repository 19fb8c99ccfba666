use std::env;
use std::net::SocketAddr;

use thiserror::Error;

pub mod security;

pub use security::create_security_headers_layer;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/guichet";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "1234";

/// Minimum length of `SECRET_KEY`, in bytes, for cookie signing key derivation.
pub const MIN_SECRET_KEY_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("SECRET_KEY must be at least {MIN_SECRET_KEY_LEN} bytes, got {0}")]
    SecretTooShort(usize),

    #[error("Invalid {key} value '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    pub secret_key: String,
    pub admin_username: String,
    pub admin_password: String,
    /// `RUST_ENV=production`: HSTS and `Secure` cookies.
    pub production: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| {
            tracing::info!("DATABASE_URL not set, using default: {DEFAULT_DATABASE_URL}");
            DEFAULT_DATABASE_URL.to_string()
        });

        let secret_key = lookup("SECRET_KEY").ok_or(ConfigError::Missing("SECRET_KEY"))?;
        if secret_key.len() < MIN_SECRET_KEY_LEN {
            return Err(ConfigError::SecretTooShort(secret_key.len()));
        }

        let bind_addr = parse_addr(&lookup, "BIND_ADDR", DEFAULT_BIND_ADDR)?;
        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                value,
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        // Both or neither.
        let (admin_username, admin_password) =
            match (lookup("ADMIN_USERNAME"), lookup("ADMIN_PASSWORD")) {
                (Some(username), Some(password)) => (username, password),
                (Some(_), None) => return Err(ConfigError::Missing("ADMIN_PASSWORD")),
                (None, Some(_)) => return Err(ConfigError::Missing("ADMIN_USERNAME")),
                (None, None) => {
                    tracing::warn!(
                        "ADMIN_USERNAME and ADMIN_PASSWORD not set, using built-in admin credentials"
                    );
                    (
                        DEFAULT_ADMIN_USERNAME.to_string(),
                        DEFAULT_ADMIN_PASSWORD.to_string(),
                    )
                }
            };

        let production = lookup("RUST_ENV")
            .map(|v| v.to_lowercase() == "production")
            .unwrap_or(false);

        Ok(Self {
            database_url,
            max_connections,
            bind_addr,
            secret_key,
            admin_username,
            admin_password,
            production,
        })
    }
}

fn parse_addr<F>(
    lookup: &F,
    key: &'static str,
    default: &str,
) -> Result<SocketAddr, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| default.to_string());
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}
