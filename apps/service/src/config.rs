//! Service configuration module.
//!
//! Configuration is loaded from environment variables (after an optional
//! `.env` file) with fallback to defaults. An empty variable counts as unset.
//!
//! | Variable                  | Default                   |
//! |---------------------------|---------------------------|
//! | `DATABASE_URL`            | built from `POSTGRES_*`   |
//! | `POSTGRES_USER`           | `nimble`                  |
//! | `POSTGRES_PASSWORD`       | `nimble_pw`               |
//! | `POSTGRES_HOST`           | `db`                      |
//! | `POSTGRES_PORT`           | `5432`                    |
//! | `POSTGRES_DB`             | `nimble`                  |
//! | `APP_ENCRYPTION_KEY`      | **required**              |
//! | `DB_MAX_CONNECTIONS`      | `10`                      |
//! | `RATE_LIMIT_MAX_REQUESTS` | `120`                     |
//! | `RATE_LIMIT_WINDOW_SECS`  | `60`                      |
//! | `STORE_SLUG`              | `demo`                    |
//! | `STORE_NAME`              | `Demo Pet Store`          |
//! | `MERCHANT_USERNAME`       | `merchant_demo`           |
//! | `MERCHANT_PASSWORD`       | `merchant_demo_pw`        |
//! | `CUSTOMER_USERNAME`       | `customer_demo`           |
//! | `CUSTOMER_PASSWORD`       | `customer_demo_pw`        |

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use pawstore_crypto::Aes256GcmCipher;
use pawstore_db::DbConfig;

/// Service configuration.
#[derive(Clone)]
pub struct ServiceConfig {
    /// PostgreSQL connection string
    pub database_url: String,

    /// Base64 AES-256 key for the breeder email column
    pub encryption_key: String,

    /// Pool bound
    pub db_max_connections: u32,

    /// Requests allowed per client per window
    pub rate_limit_max_requests: u32,

    /// Fixed rate-limit window
    pub rate_limit_window: Duration,

    /// Demo data written by the `seed` binary
    pub demo: DemoConfig,
}

/// Demo tenant and accounts.
#[derive(Clone)]
pub struct DemoConfig {
    pub store_slug: String,
    pub store_name: String,
    pub merchant_username: String,
    pub merchant_password: String,
    pub customer_username: String,
    pub customer_password: String,
}

impl ServiceConfig {
    /// Load configuration from `.env` and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(ConfigError::InvalidValue(format!(".env ({e})")));
            }
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// ## Example
    /// ```rust
    /// use std::collections::HashMap;
    /// use pawstore_service::ServiceConfig;
    ///
    /// let env = HashMap::from([(
    ///     "APP_ENCRYPTION_KEY",
    ///     "6aQqE17SgkXypLNtAsfbntSLpl7kMP/qdRQThhCtdwE=",
    /// )]);
    /// let config = ServiceConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
    ///
    /// assert_eq!(config.database_url, "postgres://nimble:nimble_pw@db:5432/nimble?sslmode=disable");
    /// assert_eq!(config.demo.store_slug, "demo");
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let encryption_key = get("APP_ENCRYPTION_KEY")
            .ok_or_else(|| ConfigError::MissingRequired("APP_ENCRYPTION_KEY".to_string()))?;

        // Fail before serving, not on the first write
        Aes256GcmCipher::from_base64(&encryption_key)
            .map_err(|e| ConfigError::InvalidEncryptionKey(e.to_string()))?;

        let database_url = match get("DATABASE_URL") {
            Some(url) => url,
            None => {
                let port: u16 = parse(&get, "POSTGRES_PORT", 5432)?;
                format!(
                    "postgres://{}:{}@{}:{}/{}?sslmode=disable",
                    or("POSTGRES_USER", "nimble"),
                    or("POSTGRES_PASSWORD", "nimble_pw"),
                    or("POSTGRES_HOST", "db"),
                    port,
                    or("POSTGRES_DB", "nimble"),
                )
            }
        };

        let config = ServiceConfig {
            database_url,
            encryption_key,
            db_max_connections: parse(&get, "DB_MAX_CONNECTIONS", 10)?,
            rate_limit_max_requests: parse(&get, "RATE_LIMIT_MAX_REQUESTS", 120)?,
            rate_limit_window: Duration::from_secs(parse(&get, "RATE_LIMIT_WINDOW_SECS", 60)?),
            demo: DemoConfig {
                store_slug: or("STORE_SLUG", "demo"),
                store_name: or("STORE_NAME", "Demo Pet Store"),
                merchant_username: or("MERCHANT_USERNAME", "merchant_demo"),
                merchant_password: or("MERCHANT_PASSWORD", "merchant_demo_pw"),
                customer_username: or("CUSTOMER_USERNAME", "customer_demo"),
                customer_password: or("CUSTOMER_PASSWORD", "customer_demo_pw"),
            },
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }
        if config.rate_limit_max_requests == 0 || config.rate_limit_window.is_zero() {
            return Err(ConfigError::InvalidValue("RATE_LIMIT_*".to_string()));
        }

        Ok(config)
    }

    /// Builds the field cipher from the configured key.
    pub fn cipher(&self) -> Result<Aes256GcmCipher, ConfigError> {
        Aes256GcmCipher::from_base64(&self.encryption_key)
            .map_err(|e| ConfigError::InvalidEncryptionKey(e.to_string()))
    }

    /// Pool settings for [`pawstore_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_url.clone()).max_connections(self.db_max_connections)
    }
}

fn parse<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("database_url", &"<redacted>")
            .field("encryption_key", &"<redacted>")
            .field("db_max_connections", &self.db_max_connections)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window", &self.rate_limit_window)
            .field("demo", &self.demo)
            .finish()
    }
}

impl fmt::Debug for DemoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DemoConfig")
            .field("store_slug", &self.store_slug)
            .field("store_name", &self.store_name)
            .field("merchant_username", &self.merchant_username)
            .field("customer_username", &self.customer_username)
            .finish_non_exhaustive()
    }
}

/// Configuration error types.
///
/// All of them are fatal: the process must not start serving.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid APP_ENCRYPTION_KEY: {0}")]
    InvalidEncryptionKey(String),
}
