//! # Error Types
//!
//! Domain-specific error types for pawstore-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pawstore-core errors (this file)                                      │
//! │  └── ValidationError  - Input rejected before any persistence          │
//! │                                                                         │
//! │  pawstore-crypto errors                                                │
//! │  ├── CipherError      - Key, encrypt, decrypt failures                 │
//! │  └── PasswordError    - Hashing and PHC format failures                │
//! │                                                                         │
//! │  pawstore-db errors                                                    │
//! │  └── DbError          - Storage, integrity, transaction failures       │
//! │                                                                         │
//! │  apps/service errors                                                   │
//! │  └── ServiceError     - What callers see (coarse, categorized)         │
//! │                                                                         │
//! │  Flow: ValidationError → DbError → ServiceError → request layer       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Input validation errors.
///
/// Every variant is raised before any encryption or SQL work starts, so a
/// validation failure is never partially applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value must be zero or greater.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g., an email without `@`).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Value is shorter than the minimum length.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// A purchase was requested with no pet ids.
    #[error("cart is empty")]
    EmptyCart,
}

impl ValidationError {
    /// Creates a `Required` error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Returns the field the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::Required { field }
            | ValidationError::MustBeNonNegative { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. }
            | ValidationError::TooShort { field, .. } => Some(field),
            ValidationError::EmptyCart => None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("name");
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustBeNonNegative {
            field: "age_years".to_string(),
        };
        assert_eq!(err.to_string(), "age_years must not be negative");

        assert_eq!(ValidationError::EmptyCart.to_string(), "cart is empty");
    }

    #[test]
    fn test_field_accessor() {
        let err = ValidationError::InvalidFormat {
            field: "breeder_email".to_string(),
            reason: "must contain '@'".to_string(),
        };
        assert_eq!(err.field(), Some("breeder_email"));
        assert_eq!(ValidationError::EmptyCart.field(), None);
    }
}
