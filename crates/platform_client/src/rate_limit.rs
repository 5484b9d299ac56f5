//! Client-side rate limiter for the platform API.
//!
//! The backend proxies every call to an upstream payments API with its own
//! quota, so the console throttles itself: separate budgets for reads and
//! for mutating calls.

use governor::{Quota, RateLimiter as GovLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

type DirectLimiter =
    GovLimiter<governor::state::NotKeyed, governor::state::InMemoryState, governor::clock::DefaultClock>;

/// Dual rate limiter — separate buckets for reads and writes.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    read_limiter: Arc<DirectLimiter>,
    write_limiter: Arc<DirectLimiter>,
}

impl RateLimiter {
    /// Create with the default console budgets (20 reads/sec, 10 writes/sec).
    pub fn new() -> Self {
        Self::with_limits(20, 10)
    }

    /// Create with custom per-second limits. Zero is clamped to one.
    pub fn with_limits(reads_per_sec: u32, writes_per_sec: u32) -> Self {
        let read_quota = Quota::per_second(NonZeroU32::new(reads_per_sec.max(1)).unwrap());
        let write_quota = Quota::per_second(NonZeroU32::new(writes_per_sec.max(1)).unwrap());

        Self {
            read_limiter: Arc::new(GovLimiter::direct(read_quota)),
            write_limiter: Arc::new(GovLimiter::direct(write_quota)),
        }
    }

    /// Wait until a read slot is available.
    pub async fn wait_read(&self) {
        self.read_limiter.until_ready().await;
    }

    /// Wait until a write slot is available.
    pub async fn wait_write(&self) {
        self.write_limiter.until_ready().await;
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_limits_are_clamped() {
        // Must not panic on NonZeroU32 construction.
        let _ = RateLimiter::with_limits(0, 0);
    }

    #[tokio::test]
    async fn first_slot_is_immediate() {
        let limiter = RateLimiter::with_limits(1, 1);
        tokio::time::timeout(std::time::Duration::from_millis(50), limiter.wait_read())
            .await
            .expect("first read slot should not block");
    }
}
