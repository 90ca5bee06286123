//! Sliding-window rate limiter for the prediction endpoint
//!
//! A single budget is shared by every caller. The limiter records the time of
//! each admitted call; a call is admitted while fewer than `max_calls` of them
//! fall inside the trailing window.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::service::{config::RateLimitConfig, types::ServiceError};

/// Process-wide sliding-window call counter
#[derive(Debug)]
pub struct SlidingWindowRateLimiter {
    max_calls: usize,
    window: Duration,
    /// Admission times, oldest first
    calls: Mutex<VecDeque<Instant>>,
}

impl SlidingWindowRateLimiter {
    pub fn new(max_calls: usize, window: Duration) -> Self {
        Self {
            max_calls,
            window,
            calls: Mutex::new(VecDeque::with_capacity(max_calls)),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_calls, Duration::from_secs(config.window_seconds))
    }

    pub fn max_calls(&self) -> usize {
        self.max_calls
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admit one call, or return how long until the oldest call leaves the window
    pub async fn try_acquire(&self) -> Result<(), Duration> {
        let now = Instant::now();
        // Prune, check and append under one lock
        let mut calls = self.calls.lock().await;
        self.prune(&mut calls, now);

        if calls.len() >= self.max_calls {
            let retry_after = calls
                .front()
                .map(|&oldest| self.window.saturating_sub(now.duration_since(oldest)))
                .unwrap_or(self.window);
            return Err(retry_after);
        }

        calls.push_back(now);
        Ok(())
    }

    /// Admit one call or fail with [`ServiceError::RateLimited`]
    pub async fn check(&self) -> Result<(), ServiceError> {
        self.try_acquire().await.map_err(|retry_after| {
            tracing::warn!(
                "Rate limit exceeded ({} calls per {}s), retry in {:.1}s",
                self.max_calls,
                self.window.as_secs(),
                retry_after.as_secs_f64()
            );
            ServiceError::RateLimited { retry_after }
        })
    }

    /// Calls still available in the current window
    pub async fn remaining(&self) -> usize {
        let mut calls = self.calls.lock().await;
        self.prune(&mut calls, Instant::now());
        self.max_calls.saturating_sub(calls.len())
    }

    fn prune(&self, calls: &mut VecDeque<Instant>, now: Instant) {
        while let Some(&oldest) = calls.front() {
            if now.duration_since(oldest) >= self.window {
                calls.pop_front();
            } else {
                break;
            }
        }
    }
}

impl Default for SlidingWindowRateLimiter {
    fn default() -> Self {
        Self::from_config(&RateLimitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::time::advance;

    #[tokio::test(start_paused = true)]
    async fn test_admits_up_to_max_calls() {
        let limiter = SlidingWindowRateLimiter::default();
        for _ in 0..5 {
            assert!(limiter.try_acquire().await.is_ok());
        }
        assert_eq!(limiter.remaining().await, 0);
        assert!(limiter.try_acquire().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_calls_are_not_recorded() {
        let limiter = SlidingWindowRateLimiter::new(1, Duration::from_secs(10));
        assert!(limiter.try_acquire().await.is_ok());

        advance(Duration::from_secs(5)).await;
        assert!(limiter.try_acquire().await.is_err());

        // Only the first call counts, so it expires at t=10
        advance(Duration::from_secs(5)).await;
        assert!(limiter.try_acquire().await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_expiry_is_exact() {
        let limiter = SlidingWindowRateLimiter::new(2, Duration::from_secs(60));
        assert!(limiter.try_acquire().await.is_ok());
        advance(Duration::from_secs(30)).await;
        assert!(limiter.try_acquire().await.is_ok());

        advance(Duration::from_secs(29)).await;
        let retry_after = limiter.try_acquire().await.unwrap_err();
        assert_eq!(retry_after, Duration::from_secs(1));

        advance(Duration::from_secs(1)).await;
        assert!(limiter.try_acquire().await.is_ok());
        assert!(limiter.try_acquire().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_maps_to_service_error() {
        let limiter = SlidingWindowRateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.check().await.is_ok());
        let err = limiter.check().await.unwrap_err();
        assert_eq!(err.status_code(), 429);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_share_one_budget() {
        let limiter = Arc::new(SlidingWindowRateLimiter::new(5, Duration::from_secs(60)));

        let mut tasks = Vec::new();
        for _ in 0..64 {
            let limiter = Arc::clone(&limiter);
            tasks.push(tokio::spawn(async move { limiter.try_acquire().await.is_ok() }));
        }

        let mut admitted = 0;
        for task in tasks {
            if task.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 5);
    }
}
