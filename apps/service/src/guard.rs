//! Role and tenant checks applied before any repository call.
//!
//! | Operation              | Role     | Store slug must match |
//! |------------------------|----------|-----------------------|
//! | create / list all      | merchant | (own store implied)   |
//! | browse / history / buy | customer | yes                   |

use pawstore_core::Principal;
use tracing::warn;

use crate::error::ServiceError;

pub fn require_merchant(principal: &Principal) -> Result<(), ServiceError> {
    if !principal.is_merchant() {
        warn!(user_id = principal.user_id, role = %principal.role, "Merchant operation refused");
        return Err(ServiceError::forbidden("merchant access required"));
    }
    Ok(())
}

pub fn require_customer_of(principal: &Principal, store_slug: &str) -> Result<(), ServiceError> {
    if !principal.is_customer() {
        warn!(user_id = principal.user_id, role = %principal.role, "Customer operation refused");
        return Err(ServiceError::forbidden("customer access required"));
    }
    if !principal.belongs_to(store_slug.trim()) {
        warn!(
            user_id = principal.user_id,
            own_store = %principal.store_slug,
            requested_store = store_slug,
            "Cross-store access refused"
        );
        return Err(ServiceError::forbidden("store access denied"));
    }
    Ok(())
}
