//! # Seed Demo Data
//!
//! Creates the demo store, its merchant and customer accounts and three
//! sample pets. Idempotent.
//!
//! ## Usage
//! ```bash
//! # Reads .env, then the environment (APP_ENCRYPTION_KEY is required)
//! cargo run -p pawstore-service --bin seed
//!
//! # Custom store
//! STORE_SLUG=uptown STORE_NAME="Uptown Pets" cargo run -p pawstore-service --bin seed
//! ```

use std::sync::Arc;

use anyhow::Context;
use pawstore_crypto::Argon2Hasher;
use pawstore_db::Database;
use pawstore_service::{init_tracing, seed_demo_data, ServiceConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ServiceConfig::load().context("loading configuration")?;
    let cipher = Arc::new(config.cipher().context("building field cipher")?);

    let db = Database::new(config.db_config())
        .await
        .context("connecting to database")?;

    let report = seed_demo_data(&db, cipher, &Argon2Hasher::new(), &config.demo)
        .await
        .context("seeding demo data")?;

    info!(
        store = %report.store.slug,
        merchant = %config.demo.merchant_username,
        customer = %config.demo.customer_username,
        pets_created = report.pets_created,
        "Seed complete"
    );

    db.close().await;
    Ok(())
}
