//! # Validation Module
//!
//! Input validation for pet creation and purchase carts.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  └── Required fields, immediate feedback                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (Rust)                                           │
//! │  └── Ordered rules, first failure wins, no I/O                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (PostgreSQL)                                        │
//! │  ├── NOT NULL / CHECK (age_years >= 0)                                 │
//! │  └── CHECK (purchased_at and buyer set together)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rule Order for `NewPet`
//! 1. name non-empty
//! 2. age_years >= 0
//! 3. picture_url non-empty
//! 4. description non-empty
//! 5. breeder_name non-empty
//! 6. species is CAT, DOG or FROG
//! 7. breeder_email non-empty
//! 8. breeder_email contains `@`
//!
//! Whitespace-only strings count as empty.

use crate::error::ValidationError;
use crate::types::{NewPet, Species};
use crate::MIN_PASSWORD_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a text field is present.
///
/// ## Example
/// ```rust
/// use pawstore_core::validation::validate_required;
///
/// assert!(validate_required("name", "Barkley").is_ok());
/// assert!(validate_required("name", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }

    Ok(())
}

/// Validates a species code against the closed set.
pub fn validate_species(value: &str) -> ValidationResult<Species> {
    value
        .trim()
        .parse::<Species>()
        .map_err(|_| ValidationError::NotAllowed {
            field: "species".to_string(),
            allowed: Species::ALL.iter().map(|s| s.as_str().to_string()).collect(),
        })
}

/// Validates the breeder email.
///
/// Only a plausibility check: non-empty and contains `@`. Deliverability is
/// not this layer's concern.
pub fn validate_breeder_email(email: &str) -> ValidationResult<()> {
    validate_required("breeder_email", email)?;

    if !email.contains('@') {
        return Err(ValidationError::InvalidFormat {
            field: "breeder_email".to_string(),
            reason: "must contain '@'".to_string(),
        });
    }

    Ok(())
}

/// Validates a password before it is hashed.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LENGTH,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an age in years (zero is a newborn, not an error).
pub fn validate_age_years(age: i32) -> ValidationResult<()> {
    if age < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "age_years".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Aggregate Validators
// =============================================================================

/// Validates a complete `NewPet` in the documented rule order.
///
/// ## Returns
/// The parsed [`Species`], so callers never re-parse the raw string.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Merchant: Add Pet                                                      │
/// │                                                                         │
/// │  validate_new_pet(&input) ← THIS FUNCTION                              │
/// │       │                                                                 │
/// │       ├── Err(ValidationError) → nothing encrypted, nothing written    │
/// │       │                                                                 │
/// │       └── Ok(species) → encrypt breeder email → INSERT                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_new_pet(input: &NewPet) -> ValidationResult<Species> {
    validate_required("name", &input.name)?;
    validate_age_years(input.age_years)?;
    validate_required("picture_url", &input.picture_url)?;
    validate_required("description", &input.description)?;
    validate_required("breeder_name", &input.breeder_name)?;
    let species = validate_species(&input.species)?;
    validate_breeder_email(&input.breeder_email)?;

    Ok(species)
}

/// Validates that a cart names at least one pet.
pub fn validate_cart<T>(pet_ids: &[T]) -> ValidationResult<()> {
    if pet_ids.is_empty() {
        return Err(ValidationError::EmptyCart);
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
