//! Shared fixtures for the PostgreSQL-backed integration tests.
//!
//! Tests run only when `TEST_DATABASE_URL` points at a disposable database.
//! Each test creates its own store with a random slug, so tests can share one
//! database and run in parallel.

#![allow(dead_code)]

use std::sync::Arc;

use pawstore_core::{NewPet, Role, Store};
use pawstore_crypto::Aes256GcmCipher;
use pawstore_db::{Database, DbConfig, PetRepository};
use uuid::Uuid;

pub const TEST_KEY: &str = "6aQqE17SgkXypLNtAsfbntSLpl7kMP/qdRQThhCtdwE=";

// Never verified by these tests; only has to satisfy NOT NULL
const PLACEHOLDER_HASH: &str = "$argon2id$v=19$m=1024,t=1,p=1$c2FsdHNhbHRzYWx0$aGFzaGhhc2hoYXNoaGFzaA";

pub struct TestContext {
    pub db: Database,
    pub store: Store,
    pub cipher: Arc<Aes256GcmCipher>,
}

impl TestContext {
    pub fn pets(&self) -> PetRepository<Aes256GcmCipher> {
        self.db.pets(Arc::clone(&self.cipher))
    }

    /// Creates a customer in this test's store and returns its id.
    pub async fn customer(&self, label: &str) -> i64 {
        let username = format!("{label}-{}", Uuid::new_v4());
        let ids = self.db.identities();

        ids.insert_if_absent(Role::Customer, self.store.id, &username, PLACEHOLDER_HASH)
            .await
            .unwrap();

        ids.find(Role::Customer, &username).await.unwrap().unwrap().id
    }

    /// Moves a pet timestamp (`created_at` or `purchased_at`) into the past,
    /// so ordering assertions do not depend on clock resolution.
    pub async fn backdate(&self, column: &str, pet_id: Uuid, minutes_ago: i32) {
        assert!(matches!(column, "created_at" | "purchased_at"));
        let sql = format!("UPDATE pets SET {column} = NOW() - make_interval(mins => $1) WHERE id = $2");

        let result = sqlx::query(&sql)
            .bind(minutes_ago)
            .bind(pet_id)
            .execute(self.db.pool())
            .await
            .unwrap();
        assert_eq!(result.rows_affected(), 1);
    }

    /// Creates an extra store, for tenant isolation checks.
    pub async fn other_store(&self) -> Store {
        let slug = format!("other-{}", Uuid::new_v4());
        self.db
            .identities()
            .upsert_store(&slug, "Other Store")
            .await
            .unwrap()
    }
}

/// Connects and migrates, or returns `None` when no test database is configured.
pub async fn setup() -> Option<TestContext> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_DATABASE_URL not set; skipping database test");
            return None;
        }
    };

    let db = Database::new(DbConfig::new(url).max_connections(5))
        .await
        .unwrap();

    let slug = format!("test-{}", Uuid::new_v4());
    let store = db.identities().upsert_store(&slug, "Test Store").await.unwrap();
    let cipher = Arc::new(Aes256GcmCipher::from_base64(TEST_KEY).unwrap());

    Some(TestContext { db, store, cipher })
}

pub fn new_pet(name: &str, species: &str, breeder_email: &str) -> NewPet {
    NewPet {
        name: name.to_string(),
        species: species.to_string(),
        age_years: 2,
        picture_url: format!("https://example.com/{}.jpg", name.to_lowercase()),
        description: format!("{name} is looking for a home"),
        breeder_name: "Jane Doe".to_string(),
        breeder_email: breeder_email.to_string(),
    }
}
