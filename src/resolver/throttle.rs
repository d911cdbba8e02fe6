//! Fixed pause between NASA/ADS lookups.
//!
//! The pause is taken after every lookup, successful or not. ADS throttles
//! per token, so a failed request still counts against the budget.

use std::time::Duration;

use tracing::debug;

/// Default pause after each lookup.
pub const DEFAULT_QUERY_DELAY: Duration = Duration::from_millis(200);

/// Sequential throttle for lookup requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryThrottle {
    delay: Duration,
}

impl QueryThrottle {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        debug!(?delay, "creating query throttle");
        Self { delay }
    }

    /// A throttle that never waits (for `--query-delay-ms 0` and tests).
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.delay.is_zero()
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Waits out the configured delay.
    pub async fn pause(&self) {
        if self.is_disabled() {
            return;
        }
        tokio::time::sleep(self.delay).await;
    }
}

impl Default for QueryThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_QUERY_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delay_is_200ms() {
        assert_eq!(QueryThrottle::default().delay(), Duration::from_millis(200));
        assert!(!QueryThrottle::default().is_disabled());
    }

    #[test]
    fn test_zero_delay_is_disabled() {
        assert!(QueryThrottle::new(Duration::ZERO).is_disabled());
        assert!(QueryThrottle::disabled().is_disabled());
    }

    #[tokio::test]
    async fn test_pause_waits_for_delay() {
        let throttle = QueryThrottle::new(Duration::from_millis(30));
        let start = std::time::Instant::now();
        throttle.pause().await;
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_disabled_pause_returns_immediately() {
        let start = std::time::Instant::now();
        QueryThrottle::disabled().pause().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
