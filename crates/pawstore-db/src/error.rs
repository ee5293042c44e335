//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError (core)    sqlx::Error    CipherError (crypto)         │
//! │          │                      │                 │                     │
//! │          └──────────────┬───────┴─────────────────┘                     │
//! │                         ▼                                               │
//! │  DbError (this module) ← Adds context and categorization               │
//! │                         │                                               │
//! │                         ▼                                               │
//! │  ServiceError (service) ← Coarse, caller-facing taxonomy               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pawstore_core::ValidationError;
use thiserror::Error;
use uuid::Uuid;

/// PostgreSQL SQLSTATE for `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL SQLSTATE for `foreign_key_violation`.
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Input rejected before any SQL ran.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A stored breeder email failed authenticated decryption.
    ///
    /// ## When This Occurs
    /// - Ciphertext or nonce modified at rest
    /// - Row written under a different key
    ///
    /// Never retryable. The whole read fails.
    #[error("integrity check failed for pet {pet_id}")]
    Integrity { pet_id: Uuid },

    /// Encrypting a value for storage failed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Duplicate store slug
    /// - Duplicate merchant or customer username
    #[error("Duplicate value violates {constraint}")]
    UniqueViolation { constraint: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Pet created for a store id that does not exist
    /// - Purchase recorded for an unknown customer id
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction begin/commit failed; the work was rolled back.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Whether the caller may safely retry the whole operation.
    ///
    /// ```text
    /// ConnectionFailed / TransactionFailed / PoolExhausted  → retry
    /// QueryFailed / Internal                                → retry
    /// Validation / Integrity / constraint violations        → do not
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DbError::ConnectionFailed(_)
                | DbError::TransactionFailed(_)
                | DbError::PoolExhausted
                | DbError::QueryFailed(_)
                | DbError::Internal(_)
        )
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database (23505)     → DbError::UniqueViolation
/// sqlx::Error::Database (23503)     → DbError::ForeignKeyViolation
/// sqlx::Error::Database (other)     → DbError::QueryFailed
/// sqlx::Error::PoolTimedOut         → DbError::PoolExhausted
/// sqlx::Error::Io / Tls / PoolClosed → DbError::ConnectionFailed
/// Other                             → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.into_owned());
                match code.as_deref() {
                    Some(PG_UNIQUE_VIOLATION) => DbError::UniqueViolation {
                        constraint: db_err.constraint().unwrap_or("unknown").to_string(),
                    },
                    Some(PG_FOREIGN_KEY_VIOLATION) => DbError::ForeignKeyViolation {
                        message: db_err.message().to_string(),
                    },
                    _ => DbError::QueryFailed(db_err.message().to_string()),
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::Io(e) => DbError::ConnectionFailed(e.to_string()),

            sqlx::Error::Tls(e) => DbError::ConnectionFailed(e.to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_retryable() {
        let timed_out: DbError = sqlx::Error::PoolTimedOut.into();
        let closed: DbError = sqlx::Error::PoolClosed.into();

        assert!(matches!(timed_out, DbError::PoolExhausted));
        assert!(timed_out.is_retryable());
        assert!(matches!(closed, DbError::ConnectionFailed(_)));
        assert!(closed.is_retryable());
    }

    #[test]
    fn test_integrity_and_validation_are_not_retryable() {
        assert!(!DbError::Integrity { pet_id: Uuid::nil() }.is_retryable());
        assert!(!DbError::from(ValidationError::EmptyCart).is_retryable());
    }

    #[test]
    fn test_validation_message_is_transparent() {
        let err = DbError::from(ValidationError::required("name"));
        assert_eq!(err.to_string(), "name is required");
    }
}
