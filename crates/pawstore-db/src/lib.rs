//! # pawstore-db: Database Layer for Pawstore
//!
//! All PostgreSQL access for the pet store: the bounded pool, embedded
//! migrations, tenant-scoped repositories and the purchase transaction.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  PetStoreService (apps/service)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   pawstore-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │  Repositories      │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │    │                    │  │ (embedded) │  │   │
//! │  │   │               │    │ PetRepository<C>   │  │            │  │   │
//! │  │   │ PgPool        │◄───│ PurchaseEngine     │  │ 001_init   │  │   │
//! │  │   │ max 10 conns  │    │ IdentityRepository │  │            │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PostgreSQL (stores, merchants, customers, pets)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pawstore_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new(database_url)).await?;
//!
//! let pets = db.pets(Arc::new(cipher));
//! let shelf = pets.list_available(store_id).await?;
//!
//! let outcome = db.purchases().purchase(store_id, customer_id, &ids).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::identity::{IdentityRecord, IdentityRepository, IdentityStore};
pub use repository::pet::PetRepository;
pub use repository::purchase::PurchaseEngine;
