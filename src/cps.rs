use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const CPS_WINDOW: Duration = Duration::from_secs(1);
pub const CPS_REFRESH: Duration = Duration::from_millis(100);

/// Timestamps of recent clicks. CPS is the number of clicks in the trailing second,
/// a plain rolling count rather than an averaged rate.
#[derive(Debug, Default)]
pub struct CpsWindow {
    stamps: VecDeque<Instant>,
}

impl CpsWindow {
    pub fn new() -> Self { Self::default() }

    pub fn record(&mut self, now: Instant) {
        self.prune(now);
        self.stamps.push_back(now);
    }

    /// Drops everything older than the window and returns what is left.
    pub fn cps(&mut self, now: Instant) -> usize {
        self.prune(now);
        self.stamps.len()
    }

    fn prune(&mut self, now: Instant) {
        while let Some(&oldest) = self.stamps.front() {
            if now.saturating_duration_since(oldest) <= CPS_WINDOW { break; }
            self.stamps.pop_front();
        }
    }
}
