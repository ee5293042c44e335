//! # Rate Limiter
//!
//! Per-client request budget (typically keyed by remote IP), backed by a
//! keyed `governor` limiter.
//!
//! ```text
//!   quota: max_requests per window, burst = max_requests
//!
//!   client "10.0.0.1"   req 1 … req 120 ✓   req 121 ✗ (retry in window/120)
//!                       one request replenished every window / max_requests
//!
//!   every PRUNE_EVERY checks: retain_recent() + shrink_to_fit()
//!                             (fully replenished clients are forgotten)
//! ```
//!
//! The limiter is an explicit shared object handed around as
//! `Arc<RateLimiter>`; there is no process-wide instance.

use std::fmt;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota};
use tracing::{debug, warn};

/// How many checks pass between two sweeps of idle clients.
pub const PRUNE_EVERY: u64 = 1024;

/// Rejection returned when a client has spent its budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rate limit exceeded")]
pub struct RateLimited {
    /// Time until the next request would be admitted.
    pub retry_after: Duration,
}

pub struct RateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
    max_requests: NonZeroU32,
    window: Duration,
    prune_every: u64,
    checks: AtomicU64,
}

impl RateLimiter {
    /// Allows `max_requests` per `window` per client, all of them usable in
    /// one burst. A zero `max_requests` is treated as one.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        let max_requests = NonZeroU32::new(max_requests).unwrap_or(NonZeroU32::MIN);
        let period = (window / max_requests.get()).max(Duration::from_nanos(1));

        let quota = Quota::with_period(period)
            .map(|q| q.allow_burst(max_requests))
            .unwrap_or_else(|| Quota::per_second(max_requests));

        RateLimiter {
            limiter: governor::RateLimiter::keyed(quota),
            max_requests,
            window,
            prune_every: PRUNE_EVERY,
            checks: AtomicU64::new(0),
        }
    }

    /// Sweeps idle clients every `checks` calls instead of [`PRUNE_EVERY`].
    pub fn with_prune_every(mut self, checks: u64) -> Self {
        self.prune_every = checks.max(1);
        self
    }

    /// Spends one request from `client`'s budget.
    pub fn check(&self, client: &str) -> Result<(), RateLimited> {
        let result = self.limiter.check_key(&client.to_string());

        let seen = self.checks.fetch_add(1, Ordering::Relaxed) + 1;
        if seen % self.prune_every == 0 {
            self.prune();
        }

        match result {
            Ok(()) => {
                debug!(client, "Request admitted");
                Ok(())
            }
            Err(not_until) => {
                let retry_after = not_until.wait_time_from(DefaultClock::default().now());
                warn!(client, retry_after_ms = retry_after.as_millis() as u64, "Rate limit exceeded");
                Err(RateLimited { retry_after })
            }
        }
    }

    /// Forgets clients whose budget is fully replenished.
    pub fn prune(&self) {
        let before = self.limiter.len();
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        debug!(before, after = self.limiter.len(), "Pruned idle rate limit clients");
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter")
            .field("max_requests", &self.max_requests)
            .field("window", &self.window)
            .field("tracked_clients", &self.tracked_clients())
            .finish_non_exhaustive()
    }
}
