use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct Window {
    started: Instant,
    hits: u32,
}

/// Fixed-window counter per key: at most `limit` hits per `window`, with the
/// count reset when the key's window expires.
#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

const PRUNE_THRESHOLD: usize = 4096;

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit: limit.max(1),
            window: window.max(Duration::from_secs(1)),
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub async fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now()).await
    }

    pub(crate) async fn allow_at(&self, key: &str, now: Instant) -> bool {
        let mut lock = self.windows.lock().await;

        if lock.len() >= PRUNE_THRESHOLD {
            let window = self.window;
            lock.retain(|_, w| now.saturating_duration_since(w.started) < window);
        }

        let entry = lock.entry(key.to_string()).or_insert(Window {
            started: now,
            hits: 0,
        });
        if now.saturating_duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.hits = 0;
        }

        if entry.hits < self.limit {
            entry.hits += 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blocks_after_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(900));
        let t0 = Instant::now();
        for _ in 0..3 {
            assert!(limiter.allow_at("10.0.0.1", t0).await);
        }
        assert!(!limiter.allow_at("10.0.0.1", t0).await);
        assert!(limiter.allow_at("10.0.0.2", t0).await);
    }

    #[tokio::test]
    async fn stays_closed_until_window_ends() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let t0 = Instant::now();
        assert!(limiter.allow_at("k", t0).await);
        assert!(limiter.allow_at("k", t0 + Duration::from_secs(1)).await);

        // no trickle of extra hits inside the window
        assert!(!limiter.allow_at("k", t0 + Duration::from_secs(31)).await);
        assert!(!limiter.allow_at("k", t0 + Duration::from_secs(59)).await);

        assert!(limiter.allow_at("k", t0 + Duration::from_secs(60)).await);
        assert!(limiter.allow_at("k", t0 + Duration::from_secs(61)).await);
        assert!(!limiter.allow_at("k", t0 + Duration::from_secs(62)).await);
    }
}
