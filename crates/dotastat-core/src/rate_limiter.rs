//! Sliding-window limiter for outbound calls.
//!
//! Every permitted call is recorded in a timestamp log. A caller that would
//! push the log past the quota is suspended until the oldest entry leaves the
//! window; nothing is ever rejected.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;
use tracing::warn;

use crate::config::RatePolicy;

#[derive(Debug)]
pub struct RateLimiter {
    policy: RatePolicy,
    log: Mutex<VecDeque<Instant>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RatePolicy::default())
    }
}

impl RateLimiter {
    pub fn new(policy: RatePolicy) -> Self {
        let policy = RatePolicy {
            quota_limit: policy.quota_limit.max(1),
            ..policy
        };
        Self {
            log: Mutex::new(VecDeque::with_capacity(policy.quota_limit as usize)),
            policy,
        }
    }

    pub fn policy(&self) -> &RatePolicy {
        &self.policy
    }

    /// Waits until one more call fits in the trailing window, then records it.
    ///
    /// The window is re-checked after every suspension, so concurrent callers
    /// woken together cannot overshoot the quota.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut log = self.lock();
                let now = Instant::now();
                self.prune(&mut log, now);

                if log.len() < self.policy.quota_limit as usize {
                    log.push_back(now);
                    return;
                }

                match log.front() {
                    Some(&oldest) => self.wait_for(oldest, now),
                    None => Duration::ZERO,
                }
            };

            if wait.is_zero() {
                continue;
            }

            warn!(
                wait_secs = wait.as_secs_f64(),
                quota = self.policy.quota_limit,
                "rate limit approaching, waiting {:.2} seconds",
                wait.as_secs_f64()
            );
            tokio::time::sleep(wait).await;
        }
    }

    /// Number of calls recorded inside the trailing window.
    pub fn in_window(&self) -> usize {
        let mut log = self.lock();
        self.prune(&mut log, Instant::now());
        log.len()
    }

    fn wait_for(&self, oldest: Instant, now: Instant) -> Duration {
        (self.policy.quota_window + self.policy.boundary_buffer)
            .saturating_sub(now.duration_since(oldest))
    }

    fn prune(&self, log: &mut VecDeque<Instant>, now: Instant) {
        while let Some(&oldest) = log.front() {
            if now.duration_since(oldest) < self.policy.quota_window {
                break;
            }
            log.pop_front();
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Instant>> {
        self.log
            .lock()
            .expect("rate limiter log lock is not poisoned")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn policy(quota_limit: u32, window_secs: u64) -> RatePolicy {
        RatePolicy {
            quota_limit,
            quota_window: Duration::from_secs(window_secs),
            boundary_buffer: Duration::from_millis(100),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn calls_within_quota_are_not_delayed() {
        let limiter = RateLimiter::new(policy(3, 60));
        let start = Instant::now();

        for _ in 0..3 {
            limiter.acquire().await;
        }

        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(limiter.in_window(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn call_over_quota_waits_for_the_window_to_roll() {
        let limiter = RateLimiter::new(policy(60, 60));
        let start = Instant::now();

        for _ in 0..60 {
            limiter.acquire().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);

        tokio::time::advance(Duration::from_secs(20)).await;
        let before_extra = Instant::now();
        limiter.acquire().await;
        let waited = before_extra.elapsed();

        assert!(waited >= Duration::from_secs(40), "waited {waited:?}");
        assert!(waited <= Duration::from_millis(40_200), "waited {waited:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn evenly_spaced_calls_are_never_delayed() {
        let limiter = RateLimiter::new(policy(3, 3));

        for _ in 0..12 {
            let before = Instant::now();
            limiter.acquire().await;
            assert_eq!(before.elapsed(), Duration::ZERO);
            tokio::time::advance(Duration::from_millis(1_100)).await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_never_exceed_quota_per_window() {
        let limiter = Arc::new(RateLimiter::new(policy(2, 10)));
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..5 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move {
                limiter.acquire().await;
                Instant::now()
            }));
        }

        let mut granted = Vec::new();
        for handle in handles {
            granted.push(handle.await.expect("task completes"));
        }
        granted.sort();

        for pair in granted.windows(3) {
            assert!(pair[2].duration_since(pair[0]) >= Duration::from_secs(10));
        }
        assert!(granted[4].duration_since(start) >= Duration::from_secs(20));
    }

    #[test]
    fn zero_quota_is_raised_to_one() {
        let limiter = RateLimiter::new(policy(0, 60));

        assert_eq!(limiter.policy().quota_limit, 1);
    }
}
