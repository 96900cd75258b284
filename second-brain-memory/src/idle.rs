//! Idle-reconnect tracking shared by every `MemoryService` provider (§4.1.2).

use parking_lot::Mutex;
use second_brain_core::clock::Clock;
use std::sync::Arc;
use std::time::Duration;

/// Tracks the timestamp of the last call into a provider and reports
/// whether enough idle time has elapsed that the next call should force a
/// reconnect before doing its real work.
pub struct IdleTracker {
    clock: Arc<dyn Clock>,
    threshold: Duration,
    last_activity: Mutex<chrono::DateTime<chrono::Utc>>,
}

impl IdleTracker {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, threshold: Duration) -> Self {
        let now = clock.now();
        Self {
            clock,
            threshold,
            last_activity: Mutex::new(now),
        }
    }

    /// Record activity now, clearing the idle window.
    pub fn touch(&self) {
        *self.last_activity.lock() = self.clock.now();
    }

    /// Whether the elapsed time since the last recorded activity exceeds
    /// the configured idle threshold.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        let elapsed = self.clock.now() - *self.last_activity.lock();
        elapsed
            .to_std()
            .map(|d| d >= self.threshold)
            .unwrap_or(false)
    }

    /// Check idleness and touch in one step, returning whether the caller
    /// went idle and must reconstruct its client before proceeding (§4.1.2).
    pub fn check_and_touch(&self) -> bool {
        let was_idle = self.is_idle();
        self.touch();
        was_idle
    }
}
