use std::env;

use chrono::Duration;
use thiserror::Error;

/// AppConfig
///
/// Holds the application's configuration. Loaded once at startup and immutable afterwards;
/// it is pulled into handlers and extractors through `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Selects the log format.
    pub env: Env,
    // TCP port the HTTP server binds on.
    pub port: u16,
    // Secret used to sign and verify every issued token.
    pub jwt_secret: String,
    // Lifetime of access tokens.
    pub access_token_ttl: Duration,
    // Lifetime of refresh tokens.
    pub refresh_token_ttl: Duration,
    // Optional account created with the admin role at startup.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Env
///
/// Runtime context. Local gets human-readable logs, Production gets JSON logs.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// Credentials for the admin account seeded at startup.
#[derive(Clone, Debug)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Raised when the process environment cannot produce a usable configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for environment variable {key}")]
    Invalid { key: &'static str, value: String },
}

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 60 * 60;
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 7 * 24 * 60 * 60;
/// Upper bound for either token lifetime: ten years.
pub const MAX_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

impl AppConfig {
    /// with_secret
    ///
    /// Builds a configuration with every default applied and the given signing secret.
    /// Used by tests and by callers embedding the router in another process.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            env: Env::Local,
            port: DEFAULT_PORT,
            jwt_secret: secret.into(),
            access_token_ttl: Duration::seconds(DEFAULT_ACCESS_TTL_SECS),
            refresh_token_ttl: Duration::seconds(DEFAULT_REFRESH_TTL_SECS),
            bootstrap_admin: None,
        }
    }

    /// load
    ///
    /// Reads the configuration from environment variables. Fails fast on a missing signing
    /// secret in every environment: there is no compiled-in fallback.
    pub fn load() -> Result<Self, ConfigError> {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let jwt_secret = required("JWT_SECRET")?;
        let port = parsed("PORT", DEFAULT_PORT)?;
        let access_token_ttl = ttl("ACCESS_TOKEN_TTL_SECS", DEFAULT_ACCESS_TTL_SECS)?;
        let refresh_token_ttl = ttl("REFRESH_TOKEN_TTL_SECS", DEFAULT_REFRESH_TTL_SECS)?;

        let bootstrap_admin = match (optional("ADMIN_EMAIL"), optional("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(BootstrapAdmin {
                email,
                password,
                name: optional("ADMIN_NAME").unwrap_or_else(|| "Administrator".to_string()),
            }),
            (Some(_), None) => return Err(ConfigError::Missing("ADMIN_PASSWORD")),
            (None, Some(_)) => return Err(ConfigError::Missing("ADMIN_EMAIL")),
            (None, None) => None,
        };

        Ok(Self {
            env,
            port,
            jwt_secret,
            access_token_ttl,
            refresh_token_ttl,
            bootstrap_admin,
        })
    }
}

fn optional(key: &'static str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::Missing(key))
}

fn parsed<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn ttl(key: &'static str, default_secs: i64) -> Result<Duration, ConfigError> {
    let secs: i64 = parsed(key, default_secs)?;
    Some(secs)
        .filter(|secs| (1..=MAX_TTL_SECS).contains(secs))
        .and_then(Duration::try_seconds)
        .ok_or_else(|| ConfigError::Invalid {
            key,
            value: secs.to_string(),
        })
}
