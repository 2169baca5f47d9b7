//! Fixed-interval pacing between probe issuances.

use std::time::Duration;

/// Suspends the issuing flow for a fixed interval.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    interval: Duration,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait one pacing interval. A zero interval returns immediately.
    pub async fn wait(&self) {
        if self.interval.is_zero() {
            return;
        }
        tokio::time::sleep(self.interval).await;
    }
}
