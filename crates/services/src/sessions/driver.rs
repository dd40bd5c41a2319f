use chrono::{DateTime, TimeDelta, Utc};
use tokio::time::Instant;

use finlit_core::quiz::Tick;

/// Draws whatever the phase engine declares.
pub trait PresentationDriver {
    fn present(&mut self, tick: &Tick);
}

/// Wall-clock reading derived from tokio's monotonic timer.
///
/// Anchoring on `tokio::time::Instant` keeps the quiz in step with the
/// runtime's sleeps, including when tokio time is paused.
#[derive(Debug, Clone, Copy)]
pub struct LoopClock {
    origin: DateTime<Utc>,
    started: Instant,
}

impl LoopClock {
    #[must_use]
    pub fn start(origin: DateTime<Utc>) -> Self {
        Self {
            origin,
            started: Instant::now(),
        }
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        let elapsed = TimeDelta::from_std(self.started.elapsed()).unwrap_or(TimeDelta::zero());
        self.origin + elapsed
    }
}
