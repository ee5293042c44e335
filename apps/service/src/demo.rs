//! # Demo Data
//!
//! Idempotent setup of one store, one merchant, one customer and, if the
//! store has no pets yet, three sample pets.
//!
//! ```text
//! upsert store (slug)            ── renames if it already exists
//! merchant missing?  ── hash ──► insert
//! customer missing?  ── hash ──► insert
//! store has 0 pets?  ──────────► Miso (CAT), Barkley (DOG), Sprout (FROG)
//! ```
//!
//! Running it twice changes nothing the second time.

use std::sync::Arc;

use pawstore_core::{NewPet, Role, Species, Store};
use pawstore_crypto::{Argon2Hasher, FieldCipher, PasswordError};
use pawstore_db::{Database, DbError};
use tracing::info;

use crate::config::DemoConfig;

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Database(#[from] DbError),

    #[error("could not hash demo password: {0}")]
    Password(#[from] PasswordError),
}

/// What a seeding run actually changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub store: Store,
    pub merchant_created: bool,
    pub customer_created: bool,
    pub pets_created: usize,
}

struct SamplePet {
    name: &'static str,
    species: Species,
    age_years: i32,
    picture_url: &'static str,
    description: &'static str,
    breeder_name: &'static str,
    breeder_email: &'static str,
}

const SAMPLE_PETS: &[SamplePet] = &[
    SamplePet {
        name: "Miso",
        species: Species::Cat,
        age_years: 2,
        picture_url: "https://images.unsplash.com/photo-1518791841217-8f162f1e1131?auto=format&fit=crop&w=900&q=80",
        description: "Playful kitten who loves strings and sunbeams.",
        breeder_name: "Jane Doe",
        breeder_email: "jane@example.com",
    },
    SamplePet {
        name: "Barkley",
        species: Species::Dog,
        age_years: 4,
        picture_url: "https://images.unsplash.com/photo-1507146426996-ef05306b995a?auto=format&fit=crop&w=900&q=80",
        description: "Friendly golden retriever who enjoys long walks.",
        breeder_name: "Tom Rivers",
        breeder_email: "tom@example.com",
    },
    SamplePet {
        name: "Sprout",
        species: Species::Frog,
        age_years: 1,
        picture_url: "https://images.unsplash.com/photo-1502786129293-79981df4e689?auto=format&fit=crop&w=900&q=80",
        description: "Tiny tree frog with a calm personality.",
        breeder_name: "Lena Moss",
        breeder_email: "lena@example.com",
    },
];

impl SamplePet {
    fn to_new_pet(&self) -> NewPet {
        NewPet {
            name: self.name.to_string(),
            species: self.species.as_str().to_string(),
            age_years: self.age_years,
            picture_url: self.picture_url.to_string(),
            description: self.description.to_string(),
            breeder_name: self.breeder_name.to_string(),
            breeder_email: self.breeder_email.to_string(),
        }
    }
}

/// Writes the demo store, accounts and pets. Safe to re-run.
pub async fn seed_demo_data<C: FieldCipher>(
    db: &Database,
    cipher: Arc<C>,
    hasher: &Argon2Hasher,
    demo: &DemoConfig,
) -> Result<SeedReport, SeedError> {
    let identities = db.identities();
    let store = identities.upsert_store(&demo.store_slug, &demo.store_name).await?;

    let merchant_created = ensure_account(
        db,
        hasher,
        Role::Merchant,
        store.id,
        &demo.merchant_username,
        &demo.merchant_password,
    )
    .await?;
    let customer_created = ensure_account(
        db,
        hasher,
        Role::Customer,
        store.id,
        &demo.customer_username,
        &demo.customer_password,
    )
    .await?;

    let pets = db.pets(cipher);
    let mut pets_created = 0;
    if pets.count(store.id).await? == 0 {
        for sample in SAMPLE_PETS {
            pets.create(store.id, &sample.to_new_pet()).await?;
            pets_created += 1;
        }
    }

    info!(
        store_id = store.id,
        slug = %store.slug,
        merchant_created,
        customer_created,
        pets_created,
        "Demo data ensured"
    );

    Ok(SeedReport {
        store,
        merchant_created,
        customer_created,
        pets_created,
    })
}

async fn ensure_account(
    db: &Database,
    hasher: &Argon2Hasher,
    role: Role,
    store_id: i64,
    username: &str,
    password: &str,
) -> Result<bool, SeedError> {
    let identities = db.identities();
    if identities.exists(role, username).await? {
        return Ok(false);
    }

    let hash = hasher.hash(password)?;
    Ok(identities
        .insert_if_absent(role, store_id, username, &hash)
        .await?)
}
