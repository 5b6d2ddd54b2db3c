use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::debug;

use crate::metrics::RATE_LIMIT_CLIENTS;

// Rate limit entry - tracks requests per client id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    pub window_start: Instant,
}

impl RateLimitEntry {
    fn fresh(now: Instant) -> Self {
        Self {
            count: 1,
            window_start: now,
        }
    }

    fn expired(&self, now: Instant, window: Duration) -> bool {
        now.saturating_duration_since(self.window_start) > window
    }
}

// Fixed-window request counter keyed by client id. A window opens on a
// client's first request and closes `window` later, so a burst across the
// boundary can get up to 2x max_requests through.
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    max_requests: u32, // max requests allowed per window
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_requests,
            window,
        }
    }

    // Admit using the current time
    pub fn check(&self, client_id: &str) -> bool {
        self.admit(client_id, Instant::now())
    }

    // Count one request at `now`, false if the client is over its limit.
    // The entry guard holds the shard lock from read to write.
    pub fn admit(&self, client_id: &str, now: Instant) -> bool {
        match self.entries.entry(client_id.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(RateLimitEntry::fresh(now));
                true
            }
            Entry::Occupied(mut slot) => {
                let entry = slot.get_mut();

                // window expired..? start a new one
                if entry.expired(now, self.window) {
                    *entry = RateLimitEntry::fresh(now);
                    return true;
                }

                // over limit, leave the record alone
                if entry.count >= self.max_requests {
                    return false;
                }

                entry.count += 1;
                true
            }
        }
    }

    pub fn entry(&self, client_id: &str) -> Option<RateLimitEntry> {
        self.entries.get(client_id).map(|e| *e)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // Drop records whose window has run out, returns how many went
    pub fn sweep(&self, now: Instant) -> usize {
        let window = self.window;
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = !entry.expired(now, window);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }
}

// Background sweep of expired records
pub async fn sweeper(limiter: Arc<RateLimiter>, every: Duration) {
    let mut interval = interval(every);

    debug!(interval = ?every, "rate limit sweeper started");

    loop {
        interval.tick().await;

        let removed = limiter.sweep(Instant::now());
        RATE_LIMIT_CLIENTS.set(limiter.len() as f64);
        if removed > 0 {
            debug!(removed, remaining = limiter.len(), "swept expired rate limit records");
        }
    }
}
