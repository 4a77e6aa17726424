//! Process configuration, read once at startup.

use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

use keygate_auth::{DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEV_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("BIND_ADDR is not a socket address: {0}")]
    InvalidBindAddr(String),

    #[error("TOKEN_TTL_SECS must be an integer between 1 and {MAX_TOKEN_TTL_SECS}: {0}")]
    InvalidTokenTtl(String),
}

/// Server configuration.
///
/// | variable         | default        |
/// |------------------|----------------|
/// | `JWT_SECRET`     | `dev-secret`   |
/// | `BIND_ADDR`      | `0.0.0.0:3000` |
/// | `TOKEN_TTL_SECS` | `3600`         |
#[derive(Clone)]
pub struct ServerConfig {
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    pub token_ttl: Duration,
}

impl ServerConfig {
    /// Defaults plus the given signing secret.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_SECRET.to_string()
        });

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_raw.clone()))?;

        let token_ttl = match lookup("TOKEN_TTL_SECS") {
            None => Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|secs| (1..=MAX_TOKEN_TTL_SECS).contains(secs))
                .and_then(Duration::try_seconds)
                .ok_or(ConfigError::InvalidTokenTtl(raw))?,
        };

        Ok(Self {
            jwt_secret,
            bind_addr,
            token_ttl,
        })
    }
}

impl core::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("jwt_secret", &"<redacted>")
            .field("bind_addr", &self.bind_addr)
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}
