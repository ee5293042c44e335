//! # Service Error Type
//!
//! The caller-facing error taxonomy. Every lower-layer error is folded into
//! one of these codes with a coarse message; the detailed cause goes to the
//! operator log only.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidationError ────────────────────────► VALIDATION_ERROR            │
//! │  AuthError::InvalidCredentials ──────────► AUTHENTICATION_ERROR        │
//! │  role / store guard ─────────────────────► FORBIDDEN                   │
//! │  DbError::Integrity ─────────────────────► INTEGRITY_ERROR (no retry)  │
//! │  DbError (connection, pool, tx) ─────────► TRANSIENT_ERROR (retry)     │
//! │  RateLimiter ────────────────────────────► RATE_LIMITED                │
//! │  ConfigError ────────────────────────────► CONFIG_ERROR (fatal)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Per-item purchase problems are never errors; they are part of a
//! successful [`pawstore_core::PurchaseOutcome`].

use pawstore_db::DbError;
use serde::Serialize;
use tracing::{error, warn};

use crate::auth::AuthError;
use crate::config::ConfigError;
use crate::rate_limit::RateLimited;

/// Error returned from every facade operation.
///
/// ## Serialization
/// ```json
/// { "code": "AUTHENTICATION_ERROR", "message": "invalid credentials" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Coarse, tenant-safe message
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed input, nothing was written
    ValidationError,

    /// Any credential failure, cause never disclosed
    AuthenticationError,

    /// Authenticated, but wrong role or wrong store
    Forbidden,

    /// Stored data failed authentication on read
    IntegrityError,

    /// Storage or connectivity failure; the whole operation may be retried
    TransientError,

    /// Client exceeded its request budget
    RateLimited,

    /// Startup configuration is unusable
    ConfigError,
}

impl ServiceError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ServiceError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::new(ErrorCode::ValidationError, message)
    }

    pub fn authentication() -> Self {
        ServiceError::new(ErrorCode::AuthenticationError, "invalid credentials")
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ServiceError::new(ErrorCode::Forbidden, message)
    }

    pub fn transient() -> Self {
        ServiceError::new(
            ErrorCode::TransientError,
            "temporarily unavailable, please retry",
        )
    }

    /// Whether the caller may retry the same operation unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self.code, ErrorCode::TransientError | ErrorCode::RateLimited)
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ServiceError {}

/// Converts database errors to service errors.
impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Validation(e) => ServiceError::validation(e.to_string()),
            DbError::Integrity { pet_id } => {
                error!(%pet_id, "Integrity failure surfaced to caller");
                ServiceError::new(
                    ErrorCode::IntegrityError,
                    "stored data failed an integrity check",
                )
            }
            DbError::UniqueViolation { constraint } => {
                warn!(%constraint, "Unique constraint violated");
                ServiceError::validation("value already exists")
            }
            DbError::ForeignKeyViolation { message } => {
                error!("Foreign key violation: {}", message);
                ServiceError::validation("invalid reference")
            }
            other => {
                error!(error = %other, retryable = other.is_retryable(), "Storage operation failed");
                ServiceError::transient()
            }
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ServiceError::authentication(),
        }
    }
}

impl From<ConfigError> for ServiceError {
    fn from(err: ConfigError) -> Self {
        error!(error = %err, "Configuration rejected");
        ServiceError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<RateLimited> for ServiceError {
    fn from(err: RateLimited) -> Self {
        ServiceError::new(
            ErrorCode::RateLimited,
            format!("rate limit exceeded, retry in {}s", err.retry_after.as_secs().max(1)),
        )
    }
}
