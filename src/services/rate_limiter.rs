use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Sliding-window limiter for login attempts, keyed by client address.
///
/// Each client may make `max_attempts` attempts within any `window`; older attempts age out.
#[derive(Clone)]
pub struct LoginRateLimiter {
    attempts: Arc<Mutex<HashMap<String, Vec<Instant>>>>,
    max_attempts: usize,
    window: Duration,
}

impl Default for LoginRateLimiter {
    /// Five attempts per fifteen minutes.
    fn default() -> Self {
        Self::new(5, Duration::from_secs(15 * 60))
    }
}

impl LoginRateLimiter {
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            attempts: Arc::new(Mutex::new(HashMap::new())),
            max_attempts,
            window,
        }
    }

    /// Record an attempt for `client` and return whether it is allowed.
    pub fn check(&self, client: &str) -> bool {
        self.check_at(client, Instant::now())
    }

    pub fn check_at(&self, client: &str, now: Instant) -> bool {
        let mut attempts = self.attempts.lock();
        let recent = attempts.entry(client.to_string()).or_default();

        recent.retain(|&attempt| now.saturating_duration_since(attempt) < self.window);

        if recent.len() >= self.max_attempts {
            return false;
        }

        recent.push(now);
        true
    }

    /// Forget clients with no attempts inside the window.
    pub fn cleanup_expired(&self) {
        let now = Instant::now();
        self.attempts.lock().retain(|_, recent| {
            recent.retain(|&attempt| now.saturating_duration_since(attempt) < self.window);
            !recent.is_empty()
        });
    }
}
