//! Per-IP sliding-window rate limiting.
//!
//! The limiter is an injected capability so the in-memory implementation can
//! be swapped for one backed by a shared store without touching the intake
//! workflow.

use std::collections::HashMap;
use std::net::IpAddr;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

/// Capability for checking and recording submission attempts per client IP.
#[async_trait]
pub trait RateLimit: Send + Sync {
    /// Returns `true` when the submission is allowed.
    ///
    /// An allowed call records the attempt against the IP; a rejected call
    /// does not. Never fails: an IP with no history has zero prior attempts.
    async fn check_and_record(&self, ip: IpAddr) -> bool;
}

/// In-memory sliding-window limiter.
///
/// Keeps, per IP, the timestamps of submissions within the trailing window.
/// Timestamps older than the window are pruned lazily on the next check.
/// Entries for idle IPs are never evicted, so the map grows with the number
/// of distinct client IPs seen over the process lifetime.
pub struct SlidingWindowLimiter {
    max_per_window: u32,
    window: Duration,
    entries: Mutex<HashMap<IpAddr, Vec<Instant>>>,
}

impl SlidingWindowLimiter {
    /// Create a limiter allowing `max_per_window` submissions per IP within
    /// the trailing `window`.
    pub fn new(max_per_window: u32, window: Duration) -> Self {
        Self {
            max_per_window,
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RateLimit for SlidingWindowLimiter {
    async fn check_and_record(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let stamps = entries.entry(ip).or_default();

        stamps.retain(|t| now.duration_since(*t) < self.window);

        if stamps.len() >= self.max_per_window as usize {
            debug!(%ip, count = stamps.len(), "rate_limit_exceeded");
            return false;
        }

        stamps.push(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn ip(last_octet: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last_octet))
    }

    #[tokio::test]
    async fn test_allows_up_to_max_then_rejects() {
        let limiter = SlidingWindowLimiter::new(5, Duration::from_secs(60));

        for _ in 0..5 {
            assert!(limiter.check_and_record(ip(1)).await);
        }

        assert!(!limiter.check_and_record(ip(1)).await);
    }

    #[tokio::test]
    async fn test_rejected_attempts_are_not_recorded() {
        let limiter = SlidingWindowLimiter::new(1, Duration::from_millis(40));

        assert!(limiter.check_and_record(ip(2)).await);
        assert!(!limiter.check_and_record(ip(2)).await);
        assert!(!limiter.check_and_record(ip(2)).await);

        // Only the single allowed attempt occupies the window; once it ages
        // out, the IP is clean again no matter how many rejections happened.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(limiter.check_and_record(ip(2)).await);
    }

    #[tokio::test]
    async fn test_window_elapse_readmits_ip() {
        let limiter = SlidingWindowLimiter::new(2, Duration::from_millis(40));

        assert!(limiter.check_and_record(ip(3)).await);
        assert!(limiter.check_and_record(ip(3)).await);
        assert!(!limiter.check_and_record(ip(3)).await);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(limiter.check_and_record(ip(3)).await);
    }

    #[tokio::test]
    async fn test_ips_are_counted_independently() {
        let limiter = SlidingWindowLimiter::new(1, Duration::from_secs(60));

        assert!(limiter.check_and_record(ip(4)).await);
        assert!(!limiter.check_and_record(ip(4)).await);
        assert!(limiter.check_and_record(ip(5)).await);
    }

    #[tokio::test]
    async fn test_counters_are_process_local() {
        // Each limiter instance owns its own counters. A deployment running
        // multiple server processes therefore multiplies the effective limit
        // by the process count; this is an accepted limitation, not a bug.
        let a = SlidingWindowLimiter::new(1, Duration::from_secs(60));
        let b = SlidingWindowLimiter::new(1, Duration::from_secs(60));

        assert!(a.check_and_record(ip(6)).await);
        assert!(b.check_and_record(ip(6)).await);
    }
}
