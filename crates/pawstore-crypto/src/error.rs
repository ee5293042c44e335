//! Error types for the crypto services.

use pawstore_core::ValidationError;
use thiserror::Error;

/// Field cipher errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// The key is not valid base64 or not exactly 32 bytes.
    ///
    /// Raised only while building the cipher at startup; the process must
    /// not start serving with a bad key.
    #[error("invalid encryption key: {reason}")]
    InvalidKey { reason: String },

    /// Sealing failed. Does not happen for valid keys in practice.
    #[error("encryption failed")]
    Encryption,

    /// The authentication tag did not verify.
    ///
    /// ## When This Occurs
    /// - Ciphertext or nonce was modified at rest
    /// - Data was written under a different key
    /// - Stored nonce has the wrong length
    #[error("decryption failed: ciphertext could not be authenticated")]
    Decryption,
}

/// Password hashing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    /// Password rejected before hashing (too short).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The stored hash is not a parseable argon2 PHC string.
    ///
    /// Distinct from a mismatch, which is `Ok(false)`.
    #[error("password hash has invalid format")]
    InvalidFormat,

    /// The KDF itself failed (bad parameters).
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

pub type CipherResult<T> = Result<T, CipherError>;

pub type PasswordResult<T> = Result<T, PasswordError>;
