//! # Password Hashing
//!
//! Argon2id, encoded as a self-describing PHC string:
//!
//! ```text
//! $argon2id$v=19$m=65536,t=3,p=2$<salt b64>$<hash b64>
//!    │        │     │       │  │      │           │
//!    │        │     │       │  │      │           └── 32-byte output
//!    │        │     │       │  │      └── 16 random bytes per hash
//!    │        │     │       │  └── lanes
//!    │        │     │       └── passes
//!    │        │     └── memory (KiB)
//!    │        └── version 0x13
//!    └── variant
//! ```
//!
//! Verification reads the parameters back from the string, so hashes made
//! with other costs still verify.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use pawstore_core::validation::validate_password;

use crate::error::{PasswordError, PasswordResult};

pub const DEFAULT_MEMORY_KIB: u32 = 65536;
pub const DEFAULT_TIME_COST: u32 = 3;
pub const DEFAULT_PARALLELISM: u32 = 2;
pub const OUTPUT_LEN: usize = 32;

/// Checks a candidate password against a stored encoded hash.
///
/// The authenticator depends on this trait so it can be tested without
/// paying the KDF cost.
pub trait CredentialVerifier: Send + Sync {
    /// `Ok(false)` on mismatch; `Err` only when `encoded` is unusable.
    fn verify(&self, password: &str, encoded: &str) -> PasswordResult<bool>;
}

/// Argon2id hasher with configurable cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Hasher {
    memory_kib: u32,
    time_cost: u32,
    parallelism: u32,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Argon2Hasher {
            memory_kib: DEFAULT_MEMORY_KIB,
            time_cost: DEFAULT_TIME_COST,
            parallelism: DEFAULT_PARALLELISM,
        }
    }
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Custom cost, mainly for tests where 64 MiB per hash is too slow.
    pub fn with_cost(memory_kib: u32, time_cost: u32, parallelism: u32) -> Self {
        Argon2Hasher {
            memory_kib,
            time_cost,
            parallelism,
        }
    }

    fn argon2(&self) -> PasswordResult<Argon2<'static>> {
        let params = Params::new(
            self.memory_kib,
            self.time_cost,
            self.parallelism,
            Some(OUTPUT_LEN),
        )
        .map_err(|e| PasswordError::Hashing(e.to_string()))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hashes a password under a fresh random salt.
    ///
    /// Rejects passwords shorter than [`pawstore_core::MIN_PASSWORD_LENGTH`]
    /// characters before any KDF work is done.
    pub fn hash(&self, password: &str) -> PasswordResult<String> {
        validate_password(password)?;

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hashing(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Verifies `password` against `encoded` in constant time.
    pub fn verify(&self, password: &str, encoded: &str) -> PasswordResult<bool> {
        let parsed = PasswordHash::new(encoded).map_err(|_| PasswordError::InvalidFormat)?;

        // verify_password treats a missing salt or output as a mismatch
        if parsed.salt.is_none() || parsed.hash.is_none() {
            return Err(PasswordError::InvalidFormat);
        }

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(_) => Err(PasswordError::InvalidFormat),
        }
    }
}

impl CredentialVerifier for Argon2Hasher {
    fn verify(&self, password: &str, encoded: &str) -> PasswordResult<bool> {
        Argon2Hasher::verify(self, password, encoded)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pawstore_core::ValidationError;

    fn cheap() -> Argon2Hasher {
        Argon2Hasher::with_cost(1024, 1, 1)
    }

    #[test]
    fn test_default_encoding_parameters() {
        let encoded = Argon2Hasher::new().hash("correct horse").unwrap();
        assert!(encoded.starts_with("$argon2id$v=19$m=65536,t=3,p=2$"));

        let parsed = PasswordHash::new(&encoded).unwrap();
        assert_eq!(parsed.hash.unwrap().len(), OUTPUT_LEN);
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = cheap();
        let encoded = hasher.hash("correct horse").unwrap();

        assert_eq!(hasher.verify("correct horse", &encoded), Ok(true));
        assert_eq!(hasher.verify("wrong horse", &encoded), Ok(false));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let hasher = cheap();
        let first = hasher.hash("merchant_demo_pw").unwrap();
        let second = hasher.hash("merchant_demo_pw").unwrap();

        assert_ne!(first, second);
        assert_eq!(hasher.verify("merchant_demo_pw", &first), Ok(true));
        assert_eq!(hasher.verify("merchant_demo_pw", &second), Ok(true));
    }

    #[test]
    fn test_verify_uses_parameters_from_hash() {
        // Hashed cheaply, verified by a default-cost hasher
        let encoded = cheap().hash("correct horse").unwrap();
        assert_eq!(Argon2Hasher::new().verify("correct horse", &encoded), Ok(true));
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(
            cheap().hash("short"),
            Err(PasswordError::Validation(ValidationError::TooShort { min: 8, .. }))
        ));
    }

    #[test]
    fn test_malformed_hash_is_format_error() {
        let hasher = cheap();
        assert_eq!(
            hasher.verify("anything", "not-a-phc-string"),
            Err(PasswordError::InvalidFormat)
        );
        assert_eq!(hasher.verify("anything", ""), Err(PasswordError::InvalidFormat));
        assert_eq!(
            hasher.verify("anything", "$argon2id$v=19$m=1024,t=1,p=1"),
            Err(PasswordError::InvalidFormat)
        );
    }

    #[test]
    fn test_trait_object_dispatch() {
        let hasher = cheap();
        let encoded = hasher.hash("customer_demo_pw").unwrap();
        let verifier: &dyn CredentialVerifier = &hasher;

        assert_eq!(verifier.verify("customer_demo_pw", &encoded), Ok(true));
    }
}
