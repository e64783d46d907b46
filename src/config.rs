//! Application configuration.
//!
//! Values are resolved once at startup into a [`Config`] that is handed to
//! [`AppState`](crate::state::AppState). Priority per value:
//! `config.toml` > environment (including `.env`) > default. The two secrets
//! are read from the environment only.

use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ==================== Server Configuration ====================

/// Default address to bind to
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_PORT: u16 = 3020;

/// Default SQLite database location
pub const DEFAULT_DATABASE_PATH: &str = "data/app.db";

/// Default directory for static assets
pub const DEFAULT_PUBLIC_DIR: &str = "public";

// ==================== Session Configuration ====================

/// Session lifetime in hours, fixed at login/signup
pub const SESSION_EXPIRY_HOURS: i64 = 1;

/// Probability threshold for expired-session sweep (0-255, lower = rarer)
/// Value of 25 means ~10% chance (25/256) on each session load
pub const SESSION_CLEANUP_THRESHOLD: u8 = 25;

// ==================== Form Limits ====================

/// Maximum length of name, email and password form fields
pub const FIELD_MAX_LEN: u64 = 20;

// ==================== Password Hashing ====================

/// Argon2 memory cost in KiB
pub const HASH_MEMORY_KIB: u32 = 19 * 1024;

/// Argon2 iteration count
pub const HASH_ITERATIONS: u32 = 2;

/// Argon2 parallelism
pub const HASH_LANES: u32 = 1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("SESSION_STORE_SECRET and COOKIE_SECRET must differ")]
    SharedSecret,

    #[error("failed to read config.toml: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config.toml: {0}")]
    File(#[from] toml::de::Error),
}

/// Resolved application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub public_dir: PathBuf,
    /// Keys session-store row ids
    pub session_store_secret: String,
    /// Signs the session cookie
    pub cookie_secret: String,
    /// User name promoted to admin at startup, if any
    pub bootstrap_admin: Option<String>,
}

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    server: Option<ServerSection>,
    database: Option<DatabaseSection>,
    admin: Option<AdminSection>,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
    public_dir: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DatabaseSection {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AdminSection {
    bootstrap: Option<String>,
}

impl FileConfig {
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Read and parse `path`. A missing file yields the empty config.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                tracing::info!("Using {}", path.display());
                Self::parse(&contents)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Config {
    /// Load configuration from `config.toml` (if present) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let file = FileConfig::read(Path::new("config.toml"))?;

        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merge file values, an environment lookup and defaults.
    pub fn resolve(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let server = file.server;
        let (file_host, file_port, file_public) = match server {
            Some(s) => (s.host, s.port, s.public_dir),
            None => (None, None, None),
        };

        let host = file_host
            .or_else(|| env("HOST"))
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match file_port {
            Some(port) => port,
            None => match env("PORT") {
                Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                    name: "PORT",
                    value,
                })?,
                None => DEFAULT_PORT,
            },
        };

        let database_path = file
            .database
            .and_then(|d| d.path)
            .or_else(|| env("DATABASE_PATH"))
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());

        let public_dir = file_public
            .or_else(|| env("PUBLIC_DIR"))
            .unwrap_or_else(|| DEFAULT_PUBLIC_DIR.to_string());

        let bootstrap_admin = file
            .admin
            .and_then(|a| a.bootstrap)
            .or_else(|| env("BOOTSTRAP_ADMIN"))
            .filter(|name| !name.trim().is_empty());

        let session_store_secret = required(&env, "SESSION_STORE_SECRET")?;
        let cookie_secret = required(&env, "COOKIE_SECRET")?;
        if session_store_secret == cookie_secret {
            return Err(ConfigError::SharedSecret);
        }

        Ok(Config {
            host,
            port,
            database_path: PathBuf::from(database_path),
            public_dir: PathBuf::from(public_dir),
            session_store_secret,
            cookie_secret,
            bootstrap_admin,
        })
    }

    /// Get the full server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn required(
    env: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<String, ConfigError> {
    env(key)
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingVar(key))
}
