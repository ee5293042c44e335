//! # Field Cipher
//!
//! AES-256-GCM for the single sensitive column (breeder email).
//!
//! ## Nonce Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  encrypt("jane@example.com")                                           │
//! │       │                                                                 │
//! │       ├── nonce = 12 fresh bytes from OsRng   (never a counter)        │
//! │       ├── ct    = AES-256-GCM(key, nonce, plaintext) ‖ 16-byte tag     │
//! │       ▼                                                                 │
//! │  EncryptedField { ciphertext: ct, nonce }  ──►  breeder_email_enc       │
//! │                                                 breeder_email_nonce     │
//! │                                                                         │
//! │  decrypt(ct, nonce)                                                    │
//! │       ├── tag verifies  ──► plaintext                                  │
//! │       └── tag fails     ──► CipherError::Decryption (never garbage)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{CipherError, CipherResult};

/// Required raw key length (256 bits).
pub const KEY_LEN: usize = 32;

/// AES-GCM nonce length (96 bits).
pub const NONCE_LEN: usize = 12;

/// Ciphertext (with appended tag) and the nonce it was sealed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedField {
    pub ciphertext: Vec<u8>,
    pub nonce: Vec<u8>,
}

/// Encrypt/decrypt capability for one opaque string value.
///
/// The pet repository depends on this trait rather than on a concrete
/// cipher, so tests can supply their own.
pub trait FieldCipher: Send + Sync {
    /// Encrypts `plaintext` under a freshly drawn nonce.
    fn encrypt(&self, plaintext: &str) -> CipherResult<EncryptedField>;

    /// Decrypts and authenticates. Fails with [`CipherError::Decryption`]
    /// on any tag, key or nonce mismatch.
    fn decrypt(&self, ciphertext: &[u8], nonce: &[u8]) -> CipherResult<String>;
}

/// AES-256-GCM implementation of [`FieldCipher`].
#[derive(Clone)]
pub struct Aes256GcmCipher {
    cipher: Aes256Gcm,
}

impl Aes256GcmCipher {
    /// Builds a cipher from raw key bytes.
    pub fn new(key: &[u8]) -> CipherResult<Self> {
        if key.len() != KEY_LEN {
            return Err(CipherError::InvalidKey {
                reason: format!("key must be {} bytes, got {}", KEY_LEN, key.len()),
            });
        }

        let cipher = Aes256Gcm::new_from_slice(key).map_err(|e| CipherError::InvalidKey {
            reason: e.to_string(),
        })?;

        Ok(Aes256GcmCipher { cipher })
    }

    /// Builds a cipher from a standard base64 key, as found in
    /// `APP_ENCRYPTION_KEY`.
    ///
    /// ## Example
    /// ```rust
    /// use pawstore_crypto::Aes256GcmCipher;
    ///
    /// let cipher = Aes256GcmCipher::from_base64("6aQqE17SgkXypLNtAsfbntSLpl7kMP/qdRQThhCtdwE=");
    /// assert!(cipher.is_ok());
    ///
    /// // 16 bytes is AES-128 territory and is rejected
    /// assert!(Aes256GcmCipher::from_base64("AAAAAAAAAAAAAAAAAAAAAA==").is_err());
    /// ```
    pub fn from_base64(key_b64: &str) -> CipherResult<Self> {
        let raw = STANDARD
            .decode(key_b64.trim())
            .map_err(|e| CipherError::InvalidKey {
                reason: format!("not valid base64: {e}"),
            })?;

        Self::new(&raw)
    }
}

impl fmt::Debug for Aes256GcmCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material
        f.debug_struct("Aes256GcmCipher").finish_non_exhaustive()
    }
}

impl FieldCipher for Aes256GcmCipher {
    fn encrypt(&self, plaintext: &str) -> CipherResult<EncryptedField> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CipherError::Encryption)?;

        Ok(EncryptedField {
            ciphertext,
            nonce: nonce.to_vec(),
        })
    }

    fn decrypt(&self, ciphertext: &[u8], nonce: &[u8]) -> CipherResult<String> {
        // Nonce::from_slice panics on a wrong length
        if nonce.len() != NONCE_LEN {
            return Err(CipherError::Decryption);
        }

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CipherError::Decryption)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::Decryption)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = "6aQqE17SgkXypLNtAsfbntSLpl7kMP/qdRQThhCtdwE=";
    const OTHER_KEY: &str = "AQIDBAUGBwgJCgsMDQ4PEBESExQVFhcYGRobHB0eHyA=";

    fn cipher() -> Aes256GcmCipher {
        Aes256GcmCipher::from_base64(TEST_KEY).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let cipher = cipher();
        for secret in ["breeder@example.com", "", "ünïcødé@例え.jp"] {
            let sealed = cipher.encrypt(secret).unwrap();
            assert_eq!(sealed.nonce.len(), NONCE_LEN);
            assert_eq!(cipher.decrypt(&sealed.ciphertext, &sealed.nonce).unwrap(), secret);
        }
    }

    #[test]
    fn test_ciphertext_differs_from_plaintext_and_between_calls() {
        let cipher = cipher();
        let first = cipher.encrypt("jane@example.com").unwrap();
        let second = cipher.encrypt("jane@example.com").unwrap();

        assert_ne!(first.ciphertext, b"jane@example.com".to_vec());
        assert_ne!(first.nonce, second.nonce);
        assert_ne!(first.ciphertext, second.ciphertext);
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let cipher = cipher();
        let mut sealed = cipher.encrypt("jane@example.com").unwrap();
        sealed.ciphertext[0] ^= 0x01;

        assert_eq!(
            cipher.decrypt(&sealed.ciphertext, &sealed.nonce),
            Err(CipherError::Decryption)
        );
    }

    #[test]
    fn test_tampered_nonce_fails() {
        let cipher = cipher();
        let mut sealed = cipher.encrypt("jane@example.com").unwrap();
        sealed.nonce[3] ^= 0x80;

        assert_eq!(
            cipher.decrypt(&sealed.ciphertext, &sealed.nonce),
            Err(CipherError::Decryption)
        );
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = cipher().encrypt("jane@example.com").unwrap();
        let other = Aes256GcmCipher::from_base64(OTHER_KEY).unwrap();

        assert_eq!(
            other.decrypt(&sealed.ciphertext, &sealed.nonce),
            Err(CipherError::Decryption)
        );
    }

    #[test]
    fn test_short_nonce_fails_without_panic() {
        let cipher = cipher();
        let sealed = cipher.encrypt("jane@example.com").unwrap();

        assert_eq!(
            cipher.decrypt(&sealed.ciphertext, &sealed.nonce[..8]),
            Err(CipherError::Decryption)
        );
    }

    #[test]
    fn test_key_length_is_enforced() {
        assert!(matches!(
            Aes256GcmCipher::new(&[0u8; 16]),
            Err(CipherError::InvalidKey { .. })
        ));
        assert!(matches!(
            Aes256GcmCipher::new(&[0u8; 33]),
            Err(CipherError::InvalidKey { .. })
        ));
        assert!(Aes256GcmCipher::new(&[0u8; KEY_LEN]).is_ok());
    }

    #[test]
    fn test_bad_base64_is_invalid_key() {
        assert!(matches!(
            Aes256GcmCipher::from_base64("not base64!!"),
            Err(CipherError::InvalidKey { .. })
        ));
        assert!(matches!(
            Aes256GcmCipher::from_base64(""),
            Err(CipherError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_debug_hides_key() {
        let rendered = format!("{:?}", cipher());
        assert!(!rendered.contains(TEST_KEY));
        assert!(rendered.starts_with("Aes256GcmCipher"));
    }
}
