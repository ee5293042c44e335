//! # Authentication
//!
//! Resolves a username/password pair to a [`Principal`].
//!
//! ## Lookup Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  authenticate("  merchant_demo ", "…")                                 │
//! │       │ trim; empty ──► InvalidCredentials                             │
//! │       ▼                                                                 │
//! │  merchants ── found ──► verify ── ok ──► Principal { role: merchant }  │
//! │       │                    └── mismatch ──► InvalidCredentials         │
//! │       │                        (customers are NOT consulted)           │
//! │       ▼ not found                                                      │
//! │  customers ── found ──► verify ── ok ──► Principal { role: customer }  │
//! │       │                    └── mismatch ──► InvalidCredentials         │
//! │       ▼ not found                                                      │
//! │  verify against a throwaway hash ──► InvalidCredentials                │
//! │                                                                         │
//! │  lookup error (either space) ──► warn! with cause ──► InvalidCredentials│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure, storage errors included, is the same
//! [`AuthError::InvalidCredentials`]. The cause is only logged.

use pawstore_core::{Principal, Role};
use pawstore_crypto::CredentialVerifier;
use pawstore_db::{DbError, IdentityRecord, IdentityStore};
use tracing::{error, info, warn};

/// Verified when the username is unknown, so that path costs one KDF run
/// like every other.
const UNKNOWN_USER_HASH: &str =
    "$argon2id$v=19$m=65536,t=3,p=2$cGF3c3RvcmUtdW5rbm93bg$AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
}

/// Authenticates against merchant and customer identity spaces.
#[derive(Debug, Clone)]
pub struct Authenticator<S, V> {
    store: S,
    verifier: V,
}

impl<S: IdentityStore, V: CredentialVerifier> Authenticator<S, V> {
    pub fn new(store: S, verifier: V) -> Self {
        Authenticator { store, verifier }
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Principal, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        if let Some(record) = self.store.find_merchant(username).await.map_err(lookup_failed)? {
            return self.check(Role::Merchant, record, password);
        }

        if let Some(record) = self.store.find_customer(username).await.map_err(lookup_failed)? {
            return self.check(Role::Customer, record, password);
        }

        let _ = self.verifier.verify(password, UNKNOWN_USER_HASH);
        warn!("Login for unknown username");
        Err(AuthError::InvalidCredentials)
    }

    fn check(&self, role: Role, record: IdentityRecord, password: &str) -> Result<Principal, AuthError> {
        match self.verifier.verify(password, &record.password_hash) {
            Ok(true) => {
                info!(role = %role, user_id = record.id, store_id = record.store_id, "Authenticated");
                Ok(Principal {
                    role,
                    user_id: record.id,
                    store_id: record.store_id,
                    store_slug: record.store_slug,
                    username: record.username,
                })
            }
            Ok(false) => {
                warn!(role = %role, user_id = record.id, "Password mismatch");
                Err(AuthError::InvalidCredentials)
            }
            Err(e) => {
                error!(role = %role, user_id = record.id, error = %e, "Stored password hash is unusable");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}

fn lookup_failed(err: DbError) -> AuthError {
    warn!(error = %err, retryable = err.is_retryable(), "Identity lookup failed");
    AuthError::InvalidCredentials
}

// =============================================================================
// Unit Tests
// =============================================================================
