use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Longest accepted session lifetime, ten years
pub const MAX_SESSION_EXPIRY_HOURS: u64 = 24 * 365 * 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: PathBuf,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub pepper: String,
    pub password_hash: String,
    pub app_secret: String,
    pub session_expiry_hours: u64,
    pub secure_cookie: bool,
}

// Secrets stay out of logs and panic messages
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("pepper", &"<redacted>")
            .field("password_hash", &"<redacted>")
            .field("app_secret", &"<redacted>")
            .field("session_expiry_hours", &self.session_expiry_hours)
            .field("secure_cookie", &self.secure_cookie)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source. The environment
    /// profile picks the defaults, then individual variables override them.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            _ => Environment::Development,
        };

        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));

        let auth = AuthConfig {
            pepper: required("pepper")?,
            password_hash: required("password_hash")?,
            app_secret: required("app_secret")?,
            session_expiry_hours: 24 * 7,
            secure_cookie: environment == Environment::Production,
        };

        let mut config = match environment {
            Environment::Production => Self::production(auth),
            Environment::Development => Self::development(auth),
        };

        if let Some(v) = lookup("PORTFOLIO_PORT").or_else(|| lookup("PORT")) {
            config.server.port = parse_var("PORTFOLIO_PORT", v)?;
        }
        if let Some(v) = lookup("PORTFOLIO_DB") {
            config.store.path = PathBuf::from(v);
        }
        if let Some(v) = lookup("SESSION_EXPIRY_HOURS") {
            let hours: u64 = parse_var("SESSION_EXPIRY_HOURS", v.clone())?;
            if !(1..=MAX_SESSION_EXPIRY_HOURS).contains(&hours) {
                return Err(ConfigError::Invalid {
                    name: "SESSION_EXPIRY_HOURS",
                    value: v,
                });
            }
            config.auth.session_expiry_hours = hours;
        }
        if let Some(v) = lookup("SESSION_COOKIE_SECURE") {
            config.auth.secure_cookie = parse_var("SESSION_COOKIE_SECURE", v)?;
        }

        Ok(config)
    }

    pub fn development(auth: AuthConfig) -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 8080 },
            store: StoreConfig {
                path: PathBuf::from("projects.json"),
            },
            auth,
        }
    }

    pub fn production(auth: AuthConfig) -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 80 },
            store: StoreConfig {
                path: PathBuf::from("projects.json"),
            },
            auth: AuthConfig {
                secure_cookie: true,
                ..auth
            },
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}
