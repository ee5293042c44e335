//! # pawstore-service
//!
//! Authentication, authorization and the request-facing facade of the pet
//! store, plus the configuration and demo-data tooling around them.
//!
//! ## Module Organization
//!
//! - [`config`] - Environment configuration (`ServiceConfig`)
//! - [`auth`] - Merchant/customer authentication
//! - [`guard`] - Role and store checks
//! - [`service`] - `PetStoreService` facade
//! - [`rate_limit`] - Per-client request budgets (governor)
//! - [`error`] - Caller-facing error taxonomy
//! - [`demo`] - Idempotent demo data used by the `seed` binary

pub mod auth;
pub mod config;
pub mod demo;
pub mod error;
pub mod guard;
pub mod rate_limit;
pub mod service;

pub use auth::{AuthError, Authenticator};
pub use config::{ConfigError, DemoConfig, ServiceConfig};
pub use demo::{seed_demo_data, SeedError, SeedReport};
pub use error::{ErrorCode, ServiceError};
pub use rate_limit::{RateLimited, RateLimiter};
pub use service::PetStoreService;

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=pawstore_db=trace` - Trace one crate only
/// - Default: `info,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
