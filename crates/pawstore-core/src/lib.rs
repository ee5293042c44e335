//! # pawstore-core: Pure Domain Logic for Pawstore
//!
//! Domain types and business rules for the multi-tenant pet store, with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pawstore Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Request layer (GraphQL, not in this repo)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            apps/service (auth, config, error taxonomy)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pawstore-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌────────────┐                │   │
//! │  │   │   types   │  │ validation │  │  purchase  │                │   │
//! │  │   │    Pet    │  │   NewPet   │  │  planning  │                │   │
//! │  │   │ Principal │  │    cart    │  │ partition  │                │   │
//! │  │   └───────────┘  └────────────┘  └────────────┘                │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 pawstore-db (Database Layer)                    │   │
//! │  │        PostgreSQL queries, migrations, purchase transactions    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Pet, Principal, PurchaseOutcome, etc.)
//! - [`error`] - Validation error types
//! - [`validation`] - Pet creation and cart rules
//! - [`purchase`] - Pure partitioning of a cart against locked rows
//!
//! ## Example Usage
//!
//! ```rust
//! use pawstore_core::validation::validate_new_pet;
//! use pawstore_core::{NewPet, Species};
//!
//! let input = NewPet {
//!     name: "Miso".to_string(),
//!     species: "CAT".to_string(),
//!     age_years: 2,
//!     picture_url: "https://example.com/miso.jpg".to_string(),
//!     description: "Playful kitten".to_string(),
//!     breeder_name: "Jane Doe".to_string(),
//!     breeder_email: "jane@example.com".to_string(),
//! };
//!
//! assert_eq!(validate_new_pet(&input).unwrap(), Species::Cat);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod purchase;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use purchase::{plan_purchase, CartRequest, LockedPet, PurchasePlan};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum password length accepted for merchant and customer credentials.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Failure reason for a pet that was sold before this cart was processed.
pub const REASON_ALREADY_PURCHASED: &str = "already purchased";

/// Failure reason for an id that matches no pet in the caller's store.
pub const REASON_NOT_FOUND: &str = "not found";
