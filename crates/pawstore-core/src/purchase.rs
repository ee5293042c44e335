//! # Purchase Planning
//!
//! Pure half of the purchase workflow. The database layer locks rows and runs
//! the UPDATE; this module decides, from what was locked, which pets are
//! eligible and which become itemized failures.
//!
//! ## Per-Item State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   requested ──┬──► locked, purchased_at IS NULL ──► eligible ──┐       │
//! │               │                                                 │       │
//! │               ├──► locked, purchased_at set ──► "already purchased"    │
//! │               │                                                 │       │
//! │               └──► no row in this store ──► "not found"         │       │
//! │                                                                 ▼       │
//! │                                    bulk UPDATE ... RETURNING id        │
//! │                                                 │                       │
//! │                      returned ──► purchased     │                       │
//! │                      missing  ──► "already purchased"                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering
//! - `purchased_ids` follow the order the ids were requested in.
//! - `errors` list "already purchased" entries first, then "not found",
//!   each group in request order.
//! - Duplicate ids are collapsed to the first occurrence before locking.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::types::{PurchaseFailure, PurchaseOutcome};
use crate::{REASON_ALREADY_PURCHASED, REASON_NOT_FOUND};

// =============================================================================
// Cart Request
// =============================================================================

/// A cart after duplicate removal and id parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartRequest {
    /// Distinct, well-formed ids in first-occurrence order.
    pub ids: Vec<Uuid>,
    /// Distinct raw values that are not UUIDs. They cannot match a row.
    pub malformed: Vec<String>,
}

impl CartRequest {
    /// Builds a request from raw ids as received from the caller.
    ///
    /// ## Example
    /// ```rust
    /// use pawstore_core::CartRequest;
    ///
    /// let id = "67e55044-10b1-426f-9247-bb680e5fe0c8".to_string();
    /// let req = CartRequest::from_raw(&[id.clone(), id, "bogus".to_string()]);
    /// assert_eq!(req.ids.len(), 1);
    /// assert_eq!(req.malformed, vec!["bogus".to_string()]);
    /// ```
    pub fn from_raw<S: AsRef<str>>(raw: &[S]) -> Self {
        let mut seen_ids = HashSet::new();
        let mut seen_malformed = HashSet::new();
        let mut request = CartRequest::default();

        for value in raw {
            let value = value.as_ref();
            match Uuid::parse_str(value.trim()) {
                Ok(id) => {
                    if seen_ids.insert(id) {
                        request.ids.push(id);
                    }
                }
                Err(_) => {
                    if seen_malformed.insert(value.to_string()) {
                        request.malformed.push(value.to_string());
                    }
                }
            }
        }

        request
    }

    /// Total number of distinct entries.
    pub fn len(&self) -> usize {
        self.ids.len() + self.malformed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Locked Rows
// =============================================================================

/// A pet row as read under `SELECT ... FOR UPDATE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedPet {
    pub id: Uuid,
    pub name: String,
    pub purchased_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Plan
// =============================================================================

/// Outcome of partitioning a cart against its locked rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurchasePlan {
    /// Eligible pets as `(id, name)` in request order.
    eligible: Vec<(Uuid, String)>,
    already_purchased: Vec<PurchaseFailure>,
    not_found: Vec<PurchaseFailure>,
}

impl PurchasePlan {
    /// Ids to hand to the bulk UPDATE.
    pub fn eligible_ids(&self) -> Vec<Uuid> {
        self.eligible.iter().map(|(id, _)| *id).collect()
    }

    pub fn has_eligible(&self) -> bool {
        !self.eligible.is_empty()
    }

    /// Builds the final outcome from the ids the UPDATE actually changed.
    ///
    /// An eligible pet missing from `updated` lost a race the row lock should
    /// have prevented; it is reported as already purchased instead of being
    /// claimed as bought.
    pub fn into_outcome(self, updated: &[Uuid]) -> PurchaseOutcome {
        let updated: HashSet<Uuid> = updated.iter().copied().collect();
        let mut purchased_ids = Vec::with_capacity(self.eligible.len());
        let mut errors = self.already_purchased;

        for (id, name) in self.eligible {
            if updated.contains(&id) {
                purchased_ids.push(id);
            } else {
                errors.push(failure(name, REASON_ALREADY_PURCHASED));
            }
        }

        errors.extend(self.not_found);

        PurchaseOutcome {
            purchased_ids,
            errors,
        }
    }
}

/// Partitions a cart against the rows locked for it.
///
/// Rows that were not requested are ignored.
pub fn plan_purchase(request: &CartRequest, locked: &[LockedPet]) -> PurchasePlan {
    let by_id: HashMap<Uuid, &LockedPet> = locked.iter().map(|pet| (pet.id, pet)).collect();
    let mut plan = PurchasePlan::default();

    for id in &request.ids {
        match by_id.get(id) {
            Some(pet) if pet.purchased_at.is_some() => {
                plan.already_purchased
                    .push(failure(pet.name.clone(), REASON_ALREADY_PURCHASED));
            }
            Some(pet) => plan.eligible.push((pet.id, pet.name.clone())),
            None => plan.not_found.push(failure(id.to_string(), REASON_NOT_FOUND)),
        }
    }

    for raw in &request.malformed {
        plan.not_found.push(failure(raw.clone(), REASON_NOT_FOUND));
    }

    plan
}

fn failure(pet_ref: String, message: &str) -> PurchaseFailure {
    PurchaseFailure {
        pet_ref,
        message: message.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
