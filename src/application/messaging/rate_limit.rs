//! Fixed-window rate limiting for inbound updates

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Per-user fixed-window rate limiter. Over-limit updates are dropped
/// before they reach the router.
pub struct RateLimiter {
    requests: Mutex<HashMap<String, Vec<Instant>>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            requests: Mutex::new(HashMap::new()),
            max_requests,
            window,
        }
    }

    /// Returns true if this request is within the window's budget.
    pub fn check(&self, key: &str) -> bool {
        let mut requests = match self.requests.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let now = Instant::now();
        let times = requests.entry(key.to_string()).or_default();

        // Remove requests outside the window
        times.retain(|&t| now.duration_since(t) < self.window);

        if times.len() >= self.max_requests as usize {
            return false;
        }

        times.push(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_limit_then_blocks() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        assert!(limiter.check("user"));
        assert!(limiter.check("user"));
        assert!(limiter.check("user"));
        assert!(!limiter.check("user"));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.check("a"));
        assert!(!limiter.check("a"));
        assert!(limiter.check("b"));
    }

    #[test]
    fn budget_recovers_after_window() {
        let limiter = RateLimiter::new(1, Duration::from_millis(30));
        assert!(limiter.check("user"));
        assert!(!limiter.check("user"));
        std::thread::sleep(Duration::from_millis(40));
        assert!(limiter.check("user"));
    }
}
