//! Minimum spacing between tile query calls
//!
//! The tile service is rate-limited globally, so successive bearing
//! estimations are spaced by a minimum interval. This is a pure delay
//! primitive: it never retries and never affects correctness.

use std::time::Duration;
use tokio::time::Instant;

pub struct Throttle {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl Throttle {
    pub fn new(min_interval_ms: u64) -> Self {
        Self { min_interval: Duration::from_millis(min_interval_ms), last_call: None }
    }

    /// Sleep out the remainder of the minimum interval since the
    /// previous call. The first call never waits.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        self.last_call = Some(Instant::now());
    }
}
