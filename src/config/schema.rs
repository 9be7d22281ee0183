//! Configuration schema definitions

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

/// Longest token lifetime accepted (ten years)
pub const MAX_TOKEN_TTL_SECS: u64 = 10 * 365 * 24 * 3600;

/// Path value that selects an in-memory database
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

/// Server configuration for the HTTP API
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// SQLite database location
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// File path, or ":memory:" for a throwaway store
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./data.db")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl DatabaseConfig {
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::from(IN_MEMORY_PATH),
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == IN_MEMORY_PATH
    }
}

/// Password hashing and token issuance settings
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign access tokens
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Token lifetime in seconds. 0 disables expiry.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    /// bcrypt work factor
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_token_ttl_secs() -> u64 {
    3600
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_secs: default_token_ttl_secs(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl AuthConfig {
    /// Token lifetime, or `None` when expiry is disabled
    pub fn token_ttl(&self) -> Option<Duration> {
        match self.token_ttl_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// The signing secret exactly as configured. Blank values count as unset.
    pub fn secret(&self) -> Option<&str> {
        self.jwt_secret
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }
}

impl Config {
    /// Check values that serde cannot validate on its own
    pub fn validate(&self) -> Result<()> {
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(Error::Config(format!(
                "auth.bcrypt_cost must be between 4 and 31, got {}",
                self.auth.bcrypt_cost
            )));
        }
        if self.auth.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(Error::Config(format!(
                "auth.token_ttl_secs must be at most {}, got {}",
                MAX_TOKEN_TTL_SECS, self.auth.token_ttl_secs
            )));
        }
        if self.server.host.trim().is_empty() {
            return Err(Error::Config("server.host must not be empty".to_string()));
        }
        Ok(())
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
