//! Application state and rate limiting.

use std::collections::HashMap;
use std::net::IpAddr;
use std::time::Instant;

use loom_agent::Orchestrator;
use tokio::sync::Mutex;

use super::RATE_LIMIT_WINDOW_SECS;

/// Per-IP request tracker: (request count, window start time).
type IpTracker = HashMap<IpAddr, (u64, Instant)>;

/// In-memory per-IP rate limiter.
pub(crate) struct RateLimiter {
    tracker: Mutex<IpTracker>,
    /// Maximum requests per window.
    max_requests: u64,
    window_secs: u64,
}

impl RateLimiter {
    pub(crate) fn new(max_requests: u64) -> Self {
        Self {
            tracker: Mutex::new(HashMap::new()),
            max_requests,
            window_secs: RATE_LIMIT_WINDOW_SECS,
        }
    }

    #[cfg(test)]
    fn with_window(max_requests: u64, window_secs: u64) -> Self {
        Self {
            window_secs,
            ..Self::new(max_requests)
        }
    }

    /// Ok(()) if allowed, Err(retry_after_secs) if rate limited.
    ///
    /// Entries whose window has expired are dropped first, so the tracker
    /// only holds addresses seen within the last window.
    pub(crate) async fn check(&self, ip: IpAddr) -> Result<(), u64> {
        let mut tracker = self.tracker.lock().await;
        let now = Instant::now();
        let window = self.window_secs;

        tracker.retain(|_, (_, start)| now.duration_since(*start).as_secs() < window);

        let entry = tracker.entry(ip).or_insert((0, now));
        entry.0 += 1;
        if entry.0 > self.max_requests {
            let elapsed = now.duration_since(entry.1).as_secs();
            Err(window.saturating_sub(elapsed))
        } else {
            Ok(())
        }
    }

    #[cfg(test)]
    async fn tracked_ips(&self) -> usize {
        self.tracker.lock().await.len()
    }
}

/// Application state shared across request handlers.
///
/// Holds no per-conversation data: history travels with each request.
pub(crate) struct AppState {
    pub(crate) orchestrator: Orchestrator,
    pub(crate) rate_limiter: RateLimiter,
    /// Optional API key for authentication. None = no auth required.
    pub(crate) api_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[tokio::test]
    async fn limits_per_ip() {
        let limiter = RateLimiter::new(2);
        let a = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let b = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

        assert!(limiter.check(a).await.is_ok());
        assert!(limiter.check(a).await.is_ok());
        let retry = limiter.check(a).await.unwrap_err();
        assert!(retry <= RATE_LIMIT_WINDOW_SECS);

        assert!(limiter.check(b).await.is_ok());
    }

    #[tokio::test]
    async fn expired_entries_are_dropped() {
        let limiter = RateLimiter::with_window(1, 0);
        for last in 1..=50u8 {
            let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 1, last));
            assert!(limiter.check(ip).await.is_ok());
        }
        assert_eq!(limiter.tracked_ips().await, 1);
    }

    #[tokio::test]
    async fn live_entries_are_kept() {
        let limiter = RateLimiter::new(5);
        for last in 1..=3u8 {
            limiter
                .check(IpAddr::V4(Ipv4Addr::new(10, 0, 2, last)))
                .await
                .unwrap();
        }
        assert_eq!(limiter.tracked_ips().await, 3);
    }
}
