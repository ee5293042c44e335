//! # pawstore-crypto: Field Encryption & Password Hashing
//!
//! Two stateless services with no shared mutable state. Both are `Send +
//! Sync` and may be called concurrently without coordination.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────────────────────┐        ┌──────────────────────────────┐  │
//! │  │  cipher.rs               │        │  password.rs                 │  │
//! │  │                          │        │                              │  │
//! │  │  FieldCipher (trait)     │        │  CredentialVerifier (trait)  │  │
//! │  │  Aes256GcmCipher         │        │  Argon2Hasher                │  │
//! │  │                          │        │                              │  │
//! │  │  breeder email ──►       │        │  password ──► $argon2id$...  │  │
//! │  │    (ciphertext, nonce)   │        │                              │  │
//! │  └────────────┬─────────────┘        └──────────────┬───────────────┘  │
//! │               │                                     │                  │
//! │               ▼                                     ▼                  │
//! │         PetRepository                         Authenticator            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cipher;
pub mod error;
pub mod password;

pub use cipher::{Aes256GcmCipher, EncryptedField, FieldCipher, KEY_LEN, NONCE_LEN};
pub use error::{CipherError, CipherResult, PasswordError, PasswordResult};
pub use password::{Argon2Hasher, CredentialVerifier};
