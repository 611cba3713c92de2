//! Sliding window rate limiting per client

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// Window and budget applied to every client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
        }
    }
}

impl RateLimitPolicy {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }
}

/// Result of a rate limit check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Requests left in the current window
    pub remaining: u32,
    pub limit: u32,
    /// Seconds until the oldest request in the window expires
    pub reset_in_seconds: u64,
}

/// In-process sliding window limiter keyed by client identifier
#[derive(Debug)]
pub struct RateLimiter {
    policy: RateLimitPolicy,
    requests: Arc<RwLock<HashMap<String, Vec<Instant>>>>,
    cleanup_interval: Duration,
    last_cleanup: Arc<RwLock<Instant>>,
}

impl RateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            requests: Arc::new(RwLock::new(HashMap::new())),
            cleanup_interval: Duration::from_secs(300),
            last_cleanup: Arc::new(RwLock::new(Instant::now())),
        }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Checks the client's window and records the request when allowed
    pub async fn check_and_record(&self, client: &str) -> RateLimitDecision {
        self.maybe_cleanup().await;

        let now = Instant::now();
        let window_start = now.checked_sub(self.policy.window);
        let mut requests = self.requests.write().await;
        let history = requests.entry(client.to_string()).or_default();

        history.retain(|t| window_start.is_none_or(|start| *t > start));

        let reset_in_seconds = history
            .first()
            .map(|oldest| {
                self.policy
                    .window
                    .saturating_sub(now.duration_since(*oldest))
                    .as_secs_f64()
                    .ceil() as u64
            })
            .unwrap_or(0);

        let used = history.len() as u32;
        if used >= self.policy.max_requests {
            return RateLimitDecision {
                allowed: false,
                remaining: 0,
                limit: self.policy.max_requests,
                reset_in_seconds,
            };
        }

        history.push(now);

        RateLimitDecision {
            allowed: true,
            remaining: self.policy.max_requests - used - 1,
            limit: self.policy.max_requests,
            reset_in_seconds: if used == 0 {
                self.policy.window.as_secs()
            } else {
                reset_in_seconds
            },
        }
    }

    pub async fn reset(&self, client: &str) {
        self.requests.write().await.remove(client);
    }

    async fn maybe_cleanup(&self) {
        let should_cleanup = {
            let last = self.last_cleanup.read().await;
            last.elapsed() >= self.cleanup_interval
        };

        if should_cleanup {
            let mut last = self.last_cleanup.write().await;
            *last = Instant::now();

            let now = Instant::now();
            let Some(cutoff) = now.checked_sub(self.policy.window) else {
                return;
            };

            let mut requests = self.requests.write().await;
            for history in requests.values_mut() {
                history.retain(|t| *t > cutoff);
            }
            requests.retain(|_, v| !v.is_empty());
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitPolicy::default())
    }
}
