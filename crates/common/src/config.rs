//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Authentication configuration.
    pub auth: AuthConfig,
    /// Media configuration.
    #[serde(default)]
    pub media: MediaConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign bearer tokens. Required; never hardcoded.
    pub token_secret: String,
    /// Token validity window in days.
    #[serde(default = "default_token_expiry_days")]
    pub token_expiry_days: i64,
}

/// Media configuration.
///
/// Media is stored as inline base64 data URLs inside records, so the limits
/// here bound both the request body and individual blobs.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// Maximum request body size in bytes (covers base64 uploads).
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Maximum decoded size of a single inline media blob in bytes.
    #[serde(default = "default_max_inline_bytes")]
    pub max_inline_bytes: usize,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: default_max_body_bytes(),
            max_inline_bytes: default_max_inline_bytes(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    5000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_token_expiry_days() -> i64 {
    30
}

const fn default_max_body_bytes() -> usize {
    50 * 1024 * 1024
}

const fn default_max_inline_bytes() -> usize {
    10 * 1024 * 1024
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `INKPOT_ENV`)
    /// 3. Environment variables with `INKPOT_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("INKPOT_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("INKPOT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("INKPOT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
