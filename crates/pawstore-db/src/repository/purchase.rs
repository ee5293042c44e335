//! # Purchase Transaction Engine
//!
//! Buys a cart of pets for one customer in a single transaction, so that no
//! pet is ever sold twice however many carts race for it.
//!
//! ## Transaction Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  purchase(store_id, customer_id, ["A", "B", "Z"])                      │
//! │       │                                                                 │
//! │       ├── empty cart ──► ValidationError::EmptyCart (no BEGIN)         │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │  SELECT id, name, purchased_at FROM pets                               │
//! │   WHERE store_id = $1 AND id = ANY($2) ORDER BY id FOR UPDATE          │
//! │       │          ▲                                                      │
//! │       │          └── a second cart naming A waits here until COMMIT    │
//! │       ▼                                                                 │
//! │  plan_purchase  ──► eligible [A]   already purchased [B]   not found [Z]│
//! │       ▼                                                                 │
//! │  UPDATE pets SET purchased_at = NOW(), purchased_by_customer_id = $1   │
//! │   WHERE store_id = $2 AND id = ANY($3) AND purchased_at IS NULL        │
//! │   RETURNING id                                                          │
//! │       ▼                                                                 │
//! │  COMMIT ──► PurchaseOutcome   (any failure above ──► ROLLBACK and      │
//! │                                TransactionFailed)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use pawstore_core::validation::validate_cart;
use pawstore_core::{plan_purchase, CartRequest, LockedPet, PurchaseOutcome};
use sqlx::{PgConnection, PgPool};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Runs purchase transactions against the shared pool.
#[derive(Debug, Clone)]
pub struct PurchaseEngine {
    pool: PgPool,
}

impl PurchaseEngine {
    pub fn new(pool: PgPool) -> Self {
        PurchaseEngine { pool }
    }

    /// Purchases every available pet in `pet_ids` for `customer_id`.
    ///
    /// Per-item problems (sold, unknown, not a UUID) are reported in the
    /// outcome's error list and never fail the call. An empty cart is a
    /// validation error; every other `Err` is [`DbError::TransactionFailed`],
    /// meaning nothing was purchased and the whole call may be retried.
    pub async fn purchase<S: AsRef<str>>(
        &self,
        store_id: i64,
        customer_id: i64,
        pet_ids: &[S],
    ) -> DbResult<PurchaseOutcome> {
        validate_cart(pet_ids)?;
        let request = CartRequest::from_raw(pet_ids);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        match execute(&mut tx, store_id, customer_id, &request).await {
            Ok(outcome) => {
                tx.commit()
                    .await
                    .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

                info!(
                    store_id,
                    customer_id,
                    requested = request.len(),
                    purchased = outcome.purchased_ids.len(),
                    rejected = outcome.errors.len(),
                    "Purchase committed"
                );
                Ok(outcome)
            }
            Err(err) => {
                error!(store_id, customer_id, error = %err, "Purchase failed, rolling back");
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                Err(aborted(err))
            }
        }
    }
}

/// Any failure inside the transaction is reported as a failed transaction,
/// whatever the underlying cause.
fn aborted(err: DbError) -> DbError {
    match err {
        DbError::TransactionFailed(_) => err,
        other => DbError::TransactionFailed(other.to_string()),
    }
}

async fn execute(
    conn: &mut PgConnection,
    store_id: i64,
    customer_id: i64,
    request: &CartRequest,
) -> DbResult<PurchaseOutcome> {
    let locked = lock_pets(conn, store_id, &request.ids).await?;
    let plan = plan_purchase(request, &locked);

    let updated = if plan.has_eligible() {
        mark_purchased(conn, store_id, customer_id, &plan.eligible_ids()).await?
    } else {
        Vec::new()
    };

    Ok(plan.into_outcome(&updated))
}

/// Locks the requested rows of this store until the transaction ends.
async fn lock_pets(conn: &mut PgConnection, store_id: i64, ids: &[Uuid]) -> DbResult<Vec<LockedPet>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    // Fixed lock order so overlapping carts cannot deadlock
    let rows: Vec<(Uuid, String, Option<DateTime<Utc>>)> = sqlx::query_as(
        r#"
        SELECT id, name, purchased_at
        FROM pets
        WHERE store_id = $1 AND id = ANY($2)
        ORDER BY id
        FOR UPDATE
        "#,
    )
    .bind(store_id)
    .bind(ids)
    .fetch_all(&mut *conn)
    .await?;

    debug!(store_id, requested = ids.len(), locked = rows.len(), "Locked pets");

    Ok(rows
        .into_iter()
        .map(|(id, name, purchased_at)| LockedPet {
            id,
            name,
            purchased_at,
        })
        .collect())
}

/// Marks eligible pets sold. Returns the ids actually changed.
async fn mark_purchased(
    conn: &mut PgConnection,
    store_id: i64,
    customer_id: i64,
    ids: &[Uuid],
) -> DbResult<Vec<Uuid>> {
    let updated: Vec<Uuid> = sqlx::query_scalar(
        r#"
        UPDATE pets
        SET purchased_at = NOW(), purchased_by_customer_id = $1
        WHERE store_id = $2 AND id = ANY($3) AND purchased_at IS NULL
        RETURNING id
        "#,
    )
    .bind(customer_id)
    .bind(store_id)
    .bind(ids)
    .fetch_all(&mut *conn)
    .await?;

    if updated.len() != ids.len() {
        warn!(
            store_id,
            eligible = ids.len(),
            updated = updated.len(),
            "Update touched fewer pets than were locked as available"
        );
    }

    Ok(updated)
}
