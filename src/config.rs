// Runtime configuration loaded once at startup

use std::fmt;

/// Default lifetime of a login token: 7 days
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 604_800;

/// Configuration errors surfaced at process start
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Token signing configuration
///
/// The secret has no default. Constructing an `AuthConfig` with an empty
/// secret is rejected so the service never signs with a guessable key.
#[derive(Clone)]
pub struct AuthConfig {
    jwt_secret: String,
    token_ttl_seconds: i64,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, token_ttl_seconds: i64) -> Result<Self, ConfigError> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if token_ttl_seconds <= 0 {
            return Err(ConfigError::Invalid {
                name: "JWT_TTL_SECONDS",
                reason: "must be a positive number of seconds".to_string(),
            });
        }

        Ok(Self {
            jwt_secret,
            token_ttl_seconds,
        })
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn token_ttl_seconds(&self) -> i64 {
        self.token_ttl_seconds
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

/// Process-wide configuration
///
/// | Variable | Description | Default |
/// |----------|-------------|---------|
/// | `DATABASE_URL` | PostgreSQL connection string | unset: in-memory store |
/// | `HOST` | Bind address | `0.0.0.0` |
/// | `PORT` | Bind port | `8080` |
/// | `JWT_SECRET` | HS256 signing secret | required |
/// | `JWT_TTL_SECONDS` | Login token lifetime | `604800` |
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub auth: AuthConfig,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let jwt_secret = non_empty("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let token_ttl_seconds = match non_empty("JWT_TTL_SECONDS") {
            Some(raw) => raw.trim().parse::<i64>().map_err(|e| ConfigError::Invalid {
                name: "JWT_TTL_SECONDS",
                reason: e.to_string(),
            })?,
            None => DEFAULT_TOKEN_TTL_SECONDS,
        };

        let port = match non_empty("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => 8080,
        };

        Ok(Self {
            database_url: non_empty("DATABASE_URL"),
            host: non_empty("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            auth: AuthConfig::new(jwt_secret, token_ttl_seconds)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
