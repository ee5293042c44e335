//! # Pet Repository
//!
//! Tenant-scoped pet persistence. The breeder email exists in plaintext only
//! in memory; on disk it is ciphertext plus the nonce it was sealed under.
//!
//! ## Read Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SELECT … WHERE store_id = $1 ORDER BY …                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PetRow { breeder_email_enc, breeder_email_nonce, … }                  │
//! │       │                                                                 │
//! │       ├── decrypt ok   ──► Pet { breeder_email: "jane@example.com" }   │
//! │       │                                                                 │
//! │       └── decrypt fails ──► DbError::Integrity { pet_id }              │
//! │                             whole list fails, nothing partial returned  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pawstore_core::validation::validate_new_pet;
use pawstore_core::{NewPet, Pet, Species};
use pawstore_crypto::FieldCipher;
use sqlx::{FromRow, PgPool};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

const PET_COLUMNS: &str = "id, store_id, name, species, age_years, picture_url, description, \
     breeder_name, breeder_email_enc, breeder_email_nonce, created_at, purchased_at, \
     purchased_by_customer_id";

/// A `pets` row before decryption.
#[derive(Debug, FromRow)]
struct PetRow {
    id: Uuid,
    store_id: i64,
    name: String,
    species: String,
    age_years: i32,
    picture_url: String,
    description: String,
    breeder_name: String,
    breeder_email_enc: Vec<u8>,
    breeder_email_nonce: Vec<u8>,
    created_at: DateTime<Utc>,
    purchased_at: Option<DateTime<Utc>>,
    purchased_by_customer_id: Option<i64>,
}

impl PetRow {
    fn into_pet<C: FieldCipher>(self, cipher: &C) -> DbResult<Pet> {
        let breeder_email = cipher
            .decrypt(&self.breeder_email_enc, &self.breeder_email_nonce)
            .map_err(|e| {
                error!(pet_id = %self.id, store_id = self.store_id, error = %e, "Breeder email failed authentication");
                DbError::Integrity { pet_id: self.id }
            })?;

        let species: Species = self.species.parse().map_err(|e| {
            error!(pet_id = %self.id, "Stored species is not recognised");
            DbError::Internal(format!("pet {}: {}", self.id, e))
        })?;

        Ok(Pet {
            id: self.id,
            store_id: self.store_id,
            name: self.name,
            species,
            age_years: self.age_years,
            picture_url: self.picture_url,
            description: self.description,
            breeder_name: self.breeder_name,
            breeder_email,
            created_at: self.created_at,
            purchased_at: self.purchased_at,
            purchased_by_customer_id: self.purchased_by_customer_id,
        })
    }
}

/// Repository for pet database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.pets(Arc::new(cipher));
///
/// let pet = repo.create(store.id, &input).await?;
/// let shelf = repo.list_available(store.id).await?;
/// ```
pub struct PetRepository<C> {
    pool: PgPool,
    cipher: Arc<C>,
}

impl<C> Clone for PetRepository<C> {
    fn clone(&self) -> Self {
        PetRepository {
            pool: self.pool.clone(),
            cipher: Arc::clone(&self.cipher),
        }
    }
}

impl<C: FieldCipher> PetRepository<C> {
    /// Creates a new PetRepository.
    pub fn new(pool: PgPool, cipher: Arc<C>) -> Self {
        PetRepository { pool, cipher }
    }

    /// Validates and stores a new pet for `store_id`.
    ///
    /// Nothing is encrypted and no SQL runs unless every rule passes.
    /// The returned pet carries the plaintext email the caller supplied.
    pub async fn create(&self, store_id: i64, input: &NewPet) -> DbResult<Pet> {
        let species = validate_new_pet(input)?;

        let sealed = self
            .cipher
            .encrypt(&input.breeder_email)
            .map_err(|e| DbError::Encryption(e.to_string()))?;

        let (id, created_at): (Uuid, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO pets (
                store_id, name, species, age_years, picture_url, description,
                breeder_name, breeder_email_enc, breeder_email_nonce
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, created_at
            "#,
        )
        .bind(store_id)
        .bind(&input.name)
        .bind(species.as_str())
        .bind(input.age_years)
        .bind(&input.picture_url)
        .bind(&input.description)
        .bind(&input.breeder_name)
        .bind(&sealed.ciphertext)
        .bind(&sealed.nonce)
        .fetch_one(&self.pool)
        .await?;

        info!(store_id, pet_id = %id, species = %species, "Pet created");

        Ok(Pet {
            id,
            store_id,
            name: input.name.clone(),
            species,
            age_years: input.age_years,
            picture_url: input.picture_url.clone(),
            description: input.description.clone(),
            breeder_name: input.breeder_name.clone(),
            breeder_email: input.breeder_email.clone(),
            created_at,
            purchased_at: None,
            purchased_by_customer_id: None,
        })
    }

    /// Every pet in the store, newest created first.
    pub async fn list_all(&self, store_id: i64) -> DbResult<Vec<Pet>> {
        let sql = format!(
            "SELECT {PET_COLUMNS} FROM pets WHERE store_id = $1 \
             ORDER BY created_at DESC, id"
        );

        let rows: Vec<PetRow> = sqlx::query_as(&sql)
            .bind(store_id)
            .fetch_all(&self.pool)
            .await?;

        debug!(store_id, count = rows.len(), "Listed all pets");
        self.decrypt_rows(rows)
    }

    /// Unsold pets in the store, newest created first.
    pub async fn list_available(&self, store_id: i64) -> DbResult<Vec<Pet>> {
        let sql = format!(
            "SELECT {PET_COLUMNS} FROM pets WHERE store_id = $1 AND purchased_at IS NULL \
             ORDER BY created_at DESC, id"
        );

        let rows: Vec<PetRow> = sqlx::query_as(&sql)
            .bind(store_id)
            .fetch_all(&self.pool)
            .await?;

        debug!(store_id, count = rows.len(), "Listed available pets");
        self.decrypt_rows(rows)
    }

    /// Pets bought by `customer_id` in the store, most recent purchase first.
    pub async fn list_purchased_by(&self, store_id: i64, customer_id: i64) -> DbResult<Vec<Pet>> {
        let sql = format!(
            "SELECT {PET_COLUMNS} FROM pets \
             WHERE store_id = $1 AND purchased_by_customer_id = $2 \
             ORDER BY purchased_at DESC, created_at DESC, id"
        );

        let rows: Vec<PetRow> = sqlx::query_as(&sql)
            .bind(store_id)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;

        debug!(store_id, customer_id, count = rows.len(), "Listed purchased pets");
        self.decrypt_rows(rows)
    }

    /// Number of pets in the store, sold or not.
    pub async fn count(&self, store_id: i64) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pets WHERE store_id = $1")
            .bind(store_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    fn decrypt_rows(&self, rows: Vec<PetRow>) -> DbResult<Vec<Pet>> {
        rows.into_iter()
            .map(|row| row.into_pet(self.cipher.as_ref()))
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
