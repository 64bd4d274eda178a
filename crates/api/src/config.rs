//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Database (one of)
//! - `DATABASE_URL` - Full `PostgreSQL` connection string
//! - `DB_USER` + `DB_PASSWORD` - Credentials the connection string is assembled from
//!
//! ## Optional
//! - `DB_HOST` - Database host (default: localhost)
//! - `DB_PORT` - Database port (default: 5432)
//! - `DB_NAME` - Database name (default: `ecommerce_api`)
//! - `API_HOST` - Bind address (default: 127.0.0.1)
//! - `API_PORT` - Listen port (default: 5000)
//! - `API_RUN_MIGRATIONS` - Run embedded migrations on startup (default: false)
//! - `LOG_FORMAT` - `text` or `json` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry performance sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: &str = "5432";
const DEFAULT_DB_NAME: &str = "ecommerce_api";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Apply pending migrations before serving
    pub run_migrations: bool,
    /// Log line format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
    /// Sentry traces sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Database connection configuration.
///
/// Implements `Debug` manually so the assembled URL (which embeds the
/// password) never reaches logs.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL
    pub url: SecretString,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database = DatabaseConfig::from_env()?;
        let host = parse_env("API_HOST", "127.0.0.1")?;
        let port = parse_env("API_PORT", "5000")?;
        let run_migrations = parse_bool_env("API_RUN_MIGRATIONS")?;
        let log_format = match get_env_or_default("LOG_FORMAT", "text")
            .to_ascii_lowercase()
            .as_str()
        {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "LOG_FORMAT".to_string(),
                    format!("expected `text` or `json`, got `{other}`"),
                ));
            }
        };

        Ok(Self {
            database,
            host,
            port,
            run_migrations,
            log_format,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl DatabaseConfig {
    /// Load database settings, preferring `DATABASE_URL` over the split
    /// `DB_*` variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` when neither `DATABASE_URL` nor
    /// both `DB_USER` and `DB_PASSWORD` are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Some(url) = get_optional_env("DATABASE_URL") {
            return Ok(Self {
                url: SecretString::from(url),
            });
        }

        let user = get_required_env("DB_USER")?;
        let password = SecretString::from(get_required_env("DB_PASSWORD")?);
        let host = get_env_or_default("DB_HOST", DEFAULT_DB_HOST);
        let port: u16 = parse_env("DB_PORT", DEFAULT_DB_PORT)?;
        let name = get_env_or_default("DB_NAME", DEFAULT_DB_NAME);

        Ok(Self {
            url: assemble_database_url(&user, &password, &host, port, &name),
        })
    }
}

/// Build a `postgres://` URL from its parts, percent-encoding the credentials.
#[must_use]
pub fn assemble_database_url(
    user: &str,
    password: &SecretString,
    host: &str,
    port: u16,
    name: &str,
) -> SecretString {
    SecretString::from(format!(
        "postgres://{}:{}@{host}:{port}/{name}",
        urlencoding::encode(user),
        urlencoding::encode(password.expose_secret()),
    ))
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a boolean flag; accepts `1/0`, `true/false`, `yes/no`.
fn parse_bool_env(key: &str) -> Result<bool, ConfigError> {
    get_optional_env(key).map_or(Ok(false), |value| parse_bool(key, &value))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got `{other}`"),
        )),
    }
}
