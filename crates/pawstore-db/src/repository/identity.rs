//! # Identity Repository
//!
//! Merchant and customer accounts. The two live in separate tables and a
//! username is only unique within its own table.
//!
//! Lookups join `stores` so a successful login already knows its tenant slug.

use async_trait::async_trait;
use pawstore_core::{Role, Store};
use sqlx::{FromRow, PgPool};
use tracing::{debug, info};

use crate::error::DbResult;

/// A stored account as needed for credential checks.
#[derive(Clone, FromRow)]
pub struct IdentityRecord {
    pub id: i64,
    pub store_id: i64,
    pub store_slug: String,
    pub username: String,
    pub password_hash: String,
}

impl std::fmt::Debug for IdentityRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityRecord")
            .field("id", &self.id)
            .field("store_id", &self.store_id)
            .field("store_slug", &self.store_slug)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Account lookup capability used by the authenticator.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_merchant(&self, username: &str) -> DbResult<Option<IdentityRecord>>;

    async fn find_customer(&self, username: &str) -> DbResult<Option<IdentityRecord>>;
}

/// Repository for merchant/customer accounts and their stores.
#[derive(Debug, Clone)]
pub struct IdentityRepository {
    pool: PgPool,
}

fn table_for(role: Role) -> &'static str {
    match role {
        Role::Merchant => "merchants",
        Role::Customer => "customers",
    }
}

impl IdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        IdentityRepository { pool }
    }

    /// Looks up an account by exact username within one identity space.
    pub async fn find(&self, role: Role, username: &str) -> DbResult<Option<IdentityRecord>> {
        let sql = format!(
            "SELECT a.id, a.store_id, s.slug AS store_slug, a.username, a.password_hash \
             FROM {} a JOIN stores s ON s.id = a.store_id \
             WHERE a.username = $1",
            table_for(role)
        );

        let record = sqlx::query_as::<_, IdentityRecord>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        debug!(role = %role, found = record.is_some(), "Identity lookup");
        Ok(record)
    }

    /// Creates the store or renames it if the slug already exists.
    pub async fn upsert_store(&self, slug: &str, name: &str) -> DbResult<Store> {
        let (id, slug, name): (i64, String, String) = sqlx::query_as(
            r#"
            INSERT INTO stores (slug, name)
            VALUES ($1, $2)
            ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, slug, name
            "#,
        )
        .bind(slug)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        info!(store_id = id, slug = %slug, "Store upserted");
        Ok(Store { id, slug, name })
    }

    /// Whether an account with this username exists in the identity space.
    pub async fn exists(&self, role: Role, username: &str) -> DbResult<bool> {
        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE username = $1)",
            table_for(role)
        );

        let exists: bool = sqlx::query_scalar(&sql)
            .bind(username)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Inserts an account unless the username is taken.
    ///
    /// Returns `true` if a row was created. `password_hash` must already be
    /// an encoded PHC string.
    pub async fn insert_if_absent(
        &self,
        role: Role,
        store_id: i64,
        username: &str,
        password_hash: &str,
    ) -> DbResult<bool> {
        let sql = format!(
            "INSERT INTO {} (store_id, username, password_hash) VALUES ($1, $2, $3) \
             ON CONFLICT (username) DO NOTHING",
            table_for(role)
        );

        let result = sqlx::query(&sql)
            .bind(store_id)
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        let created = result.rows_affected() == 1;
        if created {
            info!(role = %role, store_id, username, "Identity created");
        }
        Ok(created)
    }
}

#[async_trait]
impl IdentityStore for IdentityRepository {
    async fn find_merchant(&self, username: &str) -> DbResult<Option<IdentityRecord>> {
        self.find(Role::Merchant, username).await
    }

    async fn find_customer(&self, username: &str) -> DbResult<Option<IdentityRecord>> {
        self.find(Role::Customer, username).await
    }
}
