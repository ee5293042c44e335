//! # Repository Module
//!
//! Database repository implementations for the pet store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  PetStoreService (apps/service)                                        │
//! │       │                                                                 │
//! │       │  db.pets(cipher).list_available(store_id)                      │
//! │       ▼                                                                 │
//! │  PetRepository<C: FieldCipher>                                         │
//! │  ├── create(&self, store_id, &NewPet)      encrypt → INSERT           │
//! │  ├── list_all(&self, store_id)             SELECT → decrypt all       │
//! │  ├── list_available(&self, store_id)                                   │
//! │  └── list_purchased_by(&self, store_id, customer_id)                   │
//! │                                                                         │
//! │  PurchaseEngine                                                        │
//! │  └── purchase(&self, store_id, customer_id, ids)                       │
//! │         BEGIN → SELECT … FOR UPDATE → plan → UPDATE → COMMIT           │
//! │                                                                         │
//! │  IdentityRepository: IdentityStore                                     │
//! │  └── find_merchant / find_customer (joined with stores for the slug)  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PostgreSQL                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod identity;
pub mod pet;
pub mod purchase;
