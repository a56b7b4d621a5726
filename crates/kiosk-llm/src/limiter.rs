use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

/// Enforces a minimum spacing between outbound generation calls.
///
/// The chat flow holds the limiter mutably, so no two in-flight requests
/// for the same session contend for it. The timestamp is stamped by the
/// caller via [`record`](Self::record) after a call has actually gone out,
/// not when throttling.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: None,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Sleep until `min_interval` has passed since the last recorded call.
    /// Returns immediately when no call has been recorded yet.
    pub async fn throttle(&mut self) {
        if let Some(last) = self.last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!(wait_secs = wait.as_secs_f64(), "throttling generation call");
                tokio::time::sleep(wait).await;
            }
        }
    }

    /// Stamp the moment a call was issued.
    pub fn record(&mut self) {
        self.last_call = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_call_is_not_throttled() {
        let mut limiter = RateLimiter::new(Duration::from_secs(2));
        let start = Instant::now();
        limiter.throttle().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_call_waits_out_the_interval() {
        let mut limiter = RateLimiter::new(Duration::from_secs(2));
        limiter.record();

        let start = Instant::now();
        limiter.throttle().await;
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_after_interval_elapsed() {
        let mut limiter = RateLimiter::new(Duration::from_secs(2));
        limiter.record();
        tokio::time::advance(Duration::from_secs(3)).await;

        let start = Instant::now();
        limiter.throttle().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_wait() {
        let mut limiter = RateLimiter::new(Duration::from_secs(2));
        limiter.record();
        tokio::time::advance(Duration::from_millis(1500)).await;

        let start = Instant::now();
        limiter.throttle().await;
        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }
}
