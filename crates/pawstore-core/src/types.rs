//! # Domain Types
//!
//! Core domain types used throughout Pawstore.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Store       │   │   Principal     │   │      Pet        │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  role           │   │  id (UUID)      │       │
//! │  │  slug (unique)  │   │  user_id        │   │  store_id (FK)  │       │
//! │  │  name           │   │  store_id/slug  │   │  breeder_email  │       │
//! │  └─────────────────┘   └─────────────────┘   │  purchased_at?  │       │
//! │                                              └─────────────────┘       │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Species      │   │      Role       │   │ PurchaseOutcome │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  CAT            │   │  Merchant       │   │  purchased_ids  │       │
//! │  │  DOG            │   │  Customer       │   │  errors[]       │       │
//! │  │  FROG           │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Pet::breeder_email` is plaintext and only ever lives in memory; the
//! database layer stores it as ciphertext + nonce.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

// =============================================================================
// Store (Tenant)
// =============================================================================

/// A tenant. Owns every identity and pet transitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Store {
    pub id: i64,
    /// URL-safe unique identifier, e.g. `demo`.
    pub slug: String,
    pub name: String,
}

// =============================================================================
// Role & Principal
// =============================================================================

/// The identity space a principal was authenticated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Merchant,
    Customer,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Merchant => "merchant",
            Role::Customer => "customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated caller bound to exactly one store.
///
/// Produced only by a successful authentication and never persisted. It
/// carries both the store id and slug so the authorization layer can reject
/// cross-tenant access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Principal {
    pub role: Role,
    /// Merchant id or customer id, depending on `role`.
    pub user_id: i64,
    pub store_id: i64,
    pub store_slug: String,
    pub username: String,
}

impl Principal {
    #[inline]
    pub fn is_merchant(&self) -> bool {
        self.role == Role::Merchant
    }

    #[inline]
    pub fn is_customer(&self) -> bool {
        self.role == Role::Customer
    }

    /// Whether this principal belongs to the store identified by `slug`.
    pub fn belongs_to(&self, slug: &str) -> bool {
        self.store_slug == slug
    }
}

// =============================================================================
// Species
// =============================================================================

/// Closed set of species a store can list.
///
/// Stored and serialized in uppercase (`CAT`, `DOG`, `FROG`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum Species {
    Cat,
    Dog,
    Frog,
}

impl Species {
    /// Every accepted species, in display order.
    pub const ALL: [Species; 3] = [Species::Cat, Species::Dog, Species::Frog];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Species::Cat => "CAT",
            Species::Dog => "DOG",
            Species::Frog => "FROG",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the species codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSpecies(pub String);

impl fmt::Display for UnknownSpecies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown species: {}", self.0)
    }
}

impl std::error::Error for UnknownSpecies {}

impl FromStr for Species {
    type Err = UnknownSpecies;

    /// Parses the exact uppercase code. `cat` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CAT" => Ok(Species::Cat),
            "DOG" => Ok(Species::Dog),
            "FROG" => Ok(Species::Frog),
            other => Err(UnknownSpecies(other.to_string())),
        }
    }
}

// =============================================================================
// Pet
// =============================================================================

/// A catalog item as seen by callers, with the breeder email decrypted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Pet {
    #[ts(as = "String")]
    pub id: Uuid,

    /// Store this pet belongs to.
    pub store_id: i64,

    pub name: String,

    pub species: Species,

    /// Age in whole years, never negative.
    pub age_years: i32,

    pub picture_url: String,

    pub description: String,

    pub breeder_name: String,

    /// Plaintext, decrypted on the read path.
    pub breeder_email: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Set together with `purchased_by_customer_id`, never alone.
    #[ts(as = "Option<String>")]
    pub purchased_at: Option<DateTime<Utc>>,

    pub purchased_by_customer_id: Option<i64>,
}

impl Pet {
    /// Whether the pet can still be bought.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.purchased_at.is_none()
    }
}

/// Merchant input for creating a pet.
///
/// `species` stays a raw string so that an unknown value is reported as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewPet {
    pub name: String,
    pub species: String,
    pub age_years: i32,
    pub picture_url: String,
    pub description: String,
    pub breeder_name: String,
    pub breeder_email: String,
}

// =============================================================================
// Purchase Outcome
// =============================================================================

/// A single pet in a cart that could not be bought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PurchaseFailure {
    /// Pet name when the pet exists, otherwise the id exactly as requested.
    pub pet_ref: String,
    /// Human-readable reason, e.g. `already purchased`.
    pub message: String,
}

/// Result of a committed purchase.
///
/// A partial success (some ids bought, others rejected) is a normal value,
/// not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PurchaseOutcome {
    #[ts(as = "Vec<String>")]
    pub purchased_ids: Vec<Uuid>,
    pub errors: Vec<PurchaseFailure>,
}

impl PurchaseOutcome {
    /// True when every requested pet was bought.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty() && !self.purchased_ids.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_parse_is_exact() {
        assert_eq!("CAT".parse::<Species>(), Ok(Species::Cat));
        assert_eq!("FROG".parse::<Species>(), Ok(Species::Frog));
        assert!("cat".parse::<Species>().is_err());
        assert!("HAMSTER".parse::<Species>().is_err());
    }

    #[test]
    fn test_species_serializes_uppercase() {
        let json = serde_json::to_string(&Species::Dog).unwrap();
        assert_eq!(json, "\"DOG\"");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Merchant).unwrap();
        assert_eq!(json, "\"merchant\"");
        assert_eq!(Role::Customer.to_string(), "customer");
    }

    #[test]
    fn test_principal_store_binding() {
        let principal = Principal {
            role: Role::Customer,
            user_id: 7,
            store_id: 1,
            store_slug: "demo".to_string(),
            username: "customer_demo".to_string(),
        };
        assert!(principal.is_customer());
        assert!(!principal.is_merchant());
        assert!(principal.belongs_to("demo"));
        assert!(!principal.belongs_to("other"));
    }

    #[test]
    fn test_outcome_is_complete() {
        let mut outcome = PurchaseOutcome::default();
        assert!(!outcome.is_complete());

        outcome.purchased_ids.push(Uuid::new_v4());
        assert!(outcome.is_complete());

        outcome.errors.push(PurchaseFailure {
            pet_ref: "Miso".to_string(),
            message: "already purchased".to_string(),
        });
        assert!(!outcome.is_complete());
    }
}
