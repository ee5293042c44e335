//! # PetStoreService
//!
//! The operations the request layer calls. Each one checks the principal's
//! role and store, then delegates to a repository. Errors come back in the
//! [`ServiceError`] taxonomy.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  admit(client)         RateLimiter                                      │
//! │  authenticate(u, p)    Authenticator ──► Principal                      │
//! │                                                                         │
//! │  create_item           merchant  ──► PetRepository::create             │
//! │  list_merchant_items   merchant  ──► PetRepository::list_all           │
//! │  list_available_items  customer + slug ──► list_available             │
//! │  list_purchased_items  customer + slug ──► list_purchased_by          │
//! │  purchase              customer + slug ──► PurchaseEngine::purchase   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use pawstore_core::{NewPet, Pet, Principal, PurchaseOutcome};
use pawstore_crypto::{Aes256GcmCipher, Argon2Hasher, CredentialVerifier, FieldCipher};
use pawstore_db::{Database, IdentityRepository, IdentityStore, PetRepository, PurchaseEngine};
use tracing::{debug, info};

use crate::auth::Authenticator;
use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::guard::{require_customer_of, require_merchant};
use crate::rate_limit::RateLimiter;

/// Request-facing facade over authentication and the repositories.
pub struct PetStoreService<C = Aes256GcmCipher, S = IdentityRepository, V = Argon2Hasher> {
    pets: PetRepository<C>,
    purchases: PurchaseEngine,
    authenticator: Authenticator<S, V>,
    limiter: Arc<RateLimiter>,
}

impl PetStoreService {
    /// Builds the production service: validates the key, connects, migrates.
    pub async fn from_config(config: &ServiceConfig) -> Result<(Self, Database), ServiceError> {
        let cipher = Arc::new(config.cipher()?);
        let db = Database::new(config.db_config()).await?;
        let limiter = Arc::new(RateLimiter::new(
            config.rate_limit_max_requests,
            config.rate_limit_window,
        ));

        info!(
            max_connections = config.db_max_connections,
            rate_limit = config.rate_limit_max_requests,
            "Pet store service ready"
        );

        let authenticator = Authenticator::new(db.identities(), Argon2Hasher::new());
        let service = PetStoreService::new(&db, cipher, authenticator, limiter);
        Ok((service, db))
    }
}

impl<C, S, V> PetStoreService<C, S, V>
where
    C: FieldCipher,
    S: IdentityStore,
    V: CredentialVerifier,
{
    pub fn new(
        db: &Database,
        cipher: Arc<C>,
        authenticator: Authenticator<S, V>,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        PetStoreService {
            pets: db.pets(cipher),
            purchases: db.purchases(),
            authenticator,
            limiter,
        }
    }

    /// Spends one request from `client`'s budget.
    pub fn admit(&self, client: &str) -> Result<(), ServiceError> {
        Ok(self.limiter.check(client)?)
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Principal, ServiceError> {
        Ok(self.authenticator.authenticate(username, password).await?)
    }

    /// Adds a pet to the merchant's own store.
    pub async fn create_item(&self, principal: &Principal, input: NewPet) -> Result<Pet, ServiceError> {
        require_merchant(principal)?;
        Ok(self.pets.create(principal.store_id, &input).await?)
    }

    /// Every pet in the merchant's store, sold or not.
    pub async fn list_merchant_items(&self, principal: &Principal) -> Result<Vec<Pet>, ServiceError> {
        require_merchant(principal)?;
        Ok(self.pets.list_all(principal.store_id).await?)
    }

    /// Pets still for sale in the customer's store.
    pub async fn list_available_items(
        &self,
        principal: &Principal,
        store_slug: &str,
    ) -> Result<Vec<Pet>, ServiceError> {
        require_customer_of(principal, store_slug)?;
        Ok(self.pets.list_available(principal.store_id).await?)
    }

    /// The customer's purchase history.
    pub async fn list_purchased_items(
        &self,
        principal: &Principal,
        store_slug: &str,
    ) -> Result<Vec<Pet>, ServiceError> {
        require_customer_of(principal, store_slug)?;
        Ok(self
            .pets
            .list_purchased_by(principal.store_id, principal.user_id)
            .await?)
    }

    /// Buys every available pet in `pet_ids` for the calling customer.
    pub async fn purchase(
        &self,
        principal: &Principal,
        store_slug: &str,
        pet_ids: &[String],
    ) -> Result<PurchaseOutcome, ServiceError> {
        require_customer_of(principal, store_slug)?;
        debug!(customer_id = principal.user_id, cart_size = pet_ids.len(), "Purchase requested");

        Ok(self
            .purchases
            .purchase(principal.store_id, principal.user_id, pet_ids)
            .await?)
    }
}
