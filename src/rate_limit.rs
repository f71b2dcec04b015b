//! Fixed-window request counter keyed by `<endpoint>:<client>`.
//!
//! Each key gets a window that opens on its first request. Up to `limit`
//! requests are admitted until the window has been open for `window_ms`; the
//! next request after that opens a fresh window. Because windows are fixed, a
//! client can land `limit` requests at the end of one window and `limit` more
//! right after it rolls over, so up to twice the limit can pass in a short
//! span around a boundary. A sliding-window or token-bucket limiter can sit
//! behind the same `check_rate_limit` signature if that ever matters.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::metrics::RATE_LIMIT_KEYS;
use crate::store::{InMemoryStore, RateLimitStore};

// Rate limit entry - tracks requests per client key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub window_start: u64,
    pub count: u32,
}

impl RateLimitEntry {
    pub fn new(now_ms: u64) -> Self {
        Self {
            window_start: now_ms,
            count: 0,
        }
    }

    pub fn is_expired(&self, now_ms: u64, window_ms: u64) -> bool {
        now_ms.saturating_sub(self.window_start) >= window_ms
    }

    /// Whole seconds until this window closes, at least 1 and never more than
    /// the window itself (a clock that stepped backwards is clamped).
    pub fn retry_after_secs(&self, now_ms: u64, window_ms: u64) -> u64 {
        let remaining = self
            .window_start
            .saturating_add(window_ms)
            .saturating_sub(now_ms)
            .min(window_ms);
        remaining.div_ceil(1000).max(1)
    }
}

/// Outcome of a single admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitResult {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl RateLimitResult {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            retry_after: None,
        }
    }

    pub fn rejected(retry_after: u64) -> Self {
        Self {
            allowed: false,
            retry_after: Some(retry_after),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub limit: u32,
    pub window: Duration,
}

impl RateLimitPolicy {
    pub const fn new(limit: u32, window: Duration) -> Self {
        Self { limit, window }
    }

    pub fn window_ms(&self) -> u64 {
        duration_ms(self.window)
    }
}

// Durations past u64::MAX milliseconds saturate
fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    clock: Arc<dyn Clock>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    /// Limiter backed by a process-local map and the wall clock.
    ///
    /// The in-memory store only coordinates callers inside one process; run a
    /// shared [`RateLimitStore`] when the gateway is scaled out.
    pub fn new() -> Self {
        Self::with_store_and_clock(Arc::new(InMemoryStore::new()), Arc::new(SystemClock))
    }

    pub fn with_store_and_clock(store: Arc<dyn RateLimitStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Admit or reject one request for `key`.
    ///
    /// The read, reset and increment all happen inside a single
    /// [`RateLimitStore::update`], so two callers racing for the last slot
    /// cannot both be admitted. A rejected call leaves the count untouched.
    pub fn check_rate_limit(&self, key: &str, limit: u32, window_ms: u64) -> RateLimitResult {
        let now = self.clock.now_ms();
        let mut result = RateLimitResult::allowed();

        self.store
            .update(key, &mut |slot: &mut Option<RateLimitEntry>| {
                let fresh = match slot {
                    Some(entry) => entry.is_expired(now, window_ms),
                    None => true,
                };
                if fresh {
                    *slot = Some(RateLimitEntry::new(now));
                }

                if let Some(entry) = slot.as_mut() {
                    if entry.count >= limit {
                        result = RateLimitResult::rejected(entry.retry_after_secs(now, window_ms));
                    } else {
                        entry.count += 1;
                    }
                }
            });

        if !result.allowed {
            debug!(key, limit, window_ms, retry_after = ?result.retry_after, "rate limit saturated");
        }
        result
    }

    pub fn check(&self, key: &str, policy: RateLimitPolicy) -> RateLimitResult {
        self.check_rate_limit(key, policy.limit, policy.window_ms())
    }

    /// Remove entries whose window opened at least `retention` ago.
    ///
    /// With `retention` at or above the longest window in use, every removed
    /// entry would have been reset on its next access anyway.
    pub fn sweep(&self, retention: Duration) -> usize {
        let now = self.clock.now_ms();
        let retention_ms = duration_ms(retention);
        self.store
            .retain(&mut |_: &str, entry: &RateLimitEntry| !entry.is_expired(now, retention_ms))
    }

    pub fn tracked_keys(&self) -> usize {
        self.store.len()
    }

    pub fn entry(&self, key: &str) -> Option<RateLimitEntry> {
        self.store.get(key)
    }
}

// Sweeper - runs every `every`, drops keys idle for at least `retention`
pub async fn run_sweeper(limiter: RateLimiter, every: Duration, retention: Duration) {
    let mut interval = interval(every);

    debug!(?every, ?retention, "rate limit sweeper started");

    loop {
        interval.tick().await;

        let removed = limiter.sweep(retention);
        let tracked = limiter.tracked_keys();
        RATE_LIMIT_KEYS.set(tracked as f64);

        if removed > 0 {
            debug!(removed, tracked, "swept expired rate limit entries");
        }
    }
}
