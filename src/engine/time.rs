use std::time::{Duration, Instant};

/// Wall-clock frame timer. `dt` is the seconds between the last two ticks and
/// `now` the time since the timer was created; timed actions run on `now`.
pub struct FrameTimer {
    start: Instant,
    last: Instant,
    pub dt: f32,
    pub now: Duration,
}

impl FrameTimer {
    pub fn new() -> Self {
        let start = Instant::now();
        Self {
            start,
            last: start,
            dt: 0.0,
            now: Duration::ZERO,
        }
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        self.dt = now.duration_since(self.last).as_secs_f32();
        self.now = now.duration_since(self.start);
        self.last = now;
    }

    /// Time since start, read between ticks (used to stamp input events).
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}
