use chrono::{Duration, Utc};
use std::env;
use std::fmt;

/// Signing secret used when running in development without one configured.
/// Never used in production: a missing secret there is a startup error.
pub const DEVELOPMENT_SECRET: &str = "tasklet-development-secret-do-not-use-in-production";

/// Default lifetime of issued access tokens: 7 days.
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 60 * 60 * 24 * 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    /// Development mode must be requested explicitly; anything else is production.
    pub fn from_env() -> Self {
        match env::var("APP_ENV")
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "development" | "dev" => Self::Development,
            _ => Self::Production,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Converts a token lifetime in seconds into a `Duration`.
///
/// `None` unless the value is positive and an expiry that far from now is representable.
pub fn token_ttl_from_seconds(seconds: i64) -> Option<Duration> {
    Duration::try_seconds(seconds)
        .filter(|ttl| *ttl > Duration::zero())
        .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Token signing settings. Shared by the server and the `mint_token` tool.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub token_ttl: Duration,
}

impl AuthConfig {
    /// Reads `BETTER_AUTH_SECRET` (or `JWT_SECRET`) and `ACCESS_TOKEN_TTL_SECONDS`.
    pub fn from_env(app_env: AppEnv) -> Result<Self, ConfigError> {
        let secret = env::var("BETTER_AUTH_SECRET")
            .or_else(|_| env::var("JWT_SECRET"))
            .ok()
            .filter(|s| !s.trim().is_empty());

        let secret = match secret {
            Some(secret) => secret,
            None if app_env.is_production() => {
                return Err(ConfigError::Missing("BETTER_AUTH_SECRET"))
            }
            None => {
                log::warn!(
                    "BETTER_AUTH_SECRET is not set; using the development signing secret"
                );
                DEVELOPMENT_SECRET.to_string()
            }
        };

        let token_ttl = match env::var("ACCESS_TOKEN_TTL_SECONDS") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(token_ttl_from_seconds)
                .ok_or(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"))?,
            Err(_) => Duration::seconds(DEFAULT_TOKEN_TTL_SECONDS),
        };

        Ok(Self { secret, token_ttl })
    }
}

pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub app_env: AppEnv,
    pub auth: AuthConfig,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let app_env = AppEnv::from_env();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let database_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("DATABASE_MAX_CONNECTIONS"))?,
            Err(_) => 5,
        };

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("SERVER_PORT"))?;

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            database_url,
            database_max_connections,
            server_port,
            server_host,
            app_env,
            auth: AuthConfig::from_env(app_env)?,
            cors_allowed_origins,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
