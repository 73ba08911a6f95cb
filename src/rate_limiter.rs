// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Dual-window rate limiting for search requests

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::types::SearchError;

const SECOND_WINDOW: Duration = Duration::from_millis(1000);

/// Mutable counters guarded by the limiter's mutex
#[derive(Debug)]
struct RateLimitState {
    per_second_count: u32,
    per_month_count: u32,
    last_second_reset: Instant,
}

/// Rate limiter enforcing a per-second and a per-month request budget.
///
/// The per-second window resets lazily on the first check after the 1000ms
/// boundary; there is no background timer. The per-month counter never
/// resets within the process (approximates the provider billing window, not
/// calendar-accurate). A burst spaced exactly at window boundaries can admit
/// slightly more than the nominal per-second ceiling; accepted approximation.
pub struct RateLimiter {
    state: Mutex<RateLimitState>,
    per_second_ceiling: u32,
    per_month_ceiling: u32,
}

impl RateLimiter {
    /// Create a new rate limiter with both counters at zero
    pub fn new(per_second_ceiling: u32, per_month_ceiling: u32) -> Self {
        Self {
            state: Mutex::new(RateLimitState {
                per_second_count: 0,
                per_month_count: 0,
                last_second_reset: Instant::now(),
            }),
            per_second_ceiling,
            per_month_ceiling,
        }
    }

    /// Check whether a request is allowed right now
    ///
    /// Returns Ok(()) and counts the request, or `SearchError::RateLimitExceeded`
    /// without touching either counter.
    pub fn check(&self) -> Result<(), SearchError> {
        self.check_at(Instant::now())
    }

    /// Reset all counters and restart the per-second window
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.per_second_count = 0;
        state.per_month_count = 0;
        state.last_second_reset = Instant::now();
    }

    /// Requests left in the month budget
    pub fn remaining_month(&self) -> u32 {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        self.per_month_ceiling.saturating_sub(state.per_month_count)
    }

    // Clock-injected core so tests control the window without sleeping.
    fn check_at(&self, now: Instant) -> Result<(), SearchError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        if now.duration_since(state.last_second_reset) > SECOND_WINDOW {
            state.per_second_count = 0;
            state.last_second_reset = now;
        }

        // Ceilings are evaluated before incrementing either counter
        if state.per_second_count >= self.per_second_ceiling {
            return Err(SearchError::RateLimitExceeded {
                window: "per-second",
            });
        }
        if state.per_month_count >= self.per_month_ceiling {
            return Err(SearchError::RateLimitExceeded { window: "per-month" });
        }

        state.per_second_count += 1;
        state.per_month_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_second_ceiling() {
        let limiter = RateLimiter::new(3, 100);
        let now = Instant::now();

        for _ in 0..3 {
            assert!(limiter.check_at(now).is_ok());
        }
        let err = limiter.check_at(now).unwrap_err();
        assert!(matches!(
            err,
            SearchError::RateLimitExceeded { window: "per-second" }
        ));
    }

    #[test]
    fn test_second_window_resets_lazily() {
        let limiter = RateLimiter::new(1, 100);
        let now = Instant::now();

        assert!(limiter.check_at(now).is_ok());
        assert!(limiter.check_at(now).is_err());

        // First check past the boundary zeroes the window
        let later = now + Duration::from_millis(1001);
        assert!(limiter.check_at(later).is_ok());
    }

    #[test]
    fn test_month_ceiling_is_monotonic() {
        let limiter = RateLimiter::new(100, 2);
        let mut now = Instant::now();

        assert!(limiter.check_at(now).is_ok());
        assert!(limiter.check_at(now).is_ok());

        // Elapsed time resets the second window but never the month counter
        now += Duration::from_secs(10);
        let err = limiter.check_at(now).unwrap_err();
        assert!(matches!(
            err,
            SearchError::RateLimitExceeded { window: "per-month" }
        ));
    }

    #[test]
    fn test_failed_check_does_not_consume_budget() {
        let limiter = RateLimiter::new(1, 3);
        let now = Instant::now();

        assert!(limiter.check_at(now).is_ok());
        // Two rejected checks
        assert!(limiter.check_at(now).is_err());
        assert!(limiter.check_at(now).is_err());
        assert_eq!(limiter.remaining_month(), 2);
    }

    #[test]
    fn test_reset() {
        let limiter = RateLimiter::new(1, 1);
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_err());

        limiter.reset();
        assert!(limiter.check().is_ok());
    }
}
