//! Fixed-rate frame pacing.

use std::time::{Duration, Instant};

/// Sleeps just long enough to hold the loop at a fixed tick rate.
#[derive(Debug, Clone)]
pub struct FrameClock {
    interval: Duration,
    last_tick: Option<Instant>,
}

impl FrameClock {
    pub fn new(ticks_per_second: u64) -> Self {
        Self {
            interval: Duration::from_millis(1000 / ticks_per_second.max(1)),
            last_tick: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Block until one interval has passed since the previous call.
    ///
    /// The first call returns immediately. Returns the time actually elapsed
    /// since the previous tick.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = match self.last_tick {
            Some(last) => {
                let since = now.duration_since(last);
                if since < self.interval {
                    std::thread::sleep(self.interval - since);
                }
                last.elapsed()
            }
            None => Duration::ZERO,
        };
        self.last_tick = Some(Instant::now());
        elapsed
    }
}
