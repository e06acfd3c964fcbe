use std::{thread::sleep, time::{Duration, Instant}};

pub trait Clock {
    /// Blocks until the next frame boundary at `rate` frames per second and
    /// returns the time since the previous boundary.
    fn tick(&mut self, rate: f64) -> Duration;

    /// Monotonic milliseconds since the clock was created.
    fn now_ms(&self) -> u64;
}

pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        FrameClock { start: now, last_frame: now }
    }
}

impl Clock for FrameClock {
    fn tick(&mut self, rate: f64) -> Duration {
        if rate > 0.0 && rate.is_finite() {
            let frame = Duration::from_secs_f64(1.0 / rate);
            let spent = self.last_frame.elapsed();
            if spent < frame {
                sleep(frame - spent);
            }
        }

        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;
        delta
    }

    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Turns elapsed play time into points, one per `interval_ms`.
///
/// Time only accumulates while the game is active; leftover time carries over
/// to the next interval.
pub struct ScoreTimer {
    interval_ms: u64,
    last_seen: Option<u64>,
    accumulated: u64,
}

impl ScoreTimer {
    pub fn new(interval_ms: u64) -> Self {
        ScoreTimer { interval_ms, last_seen: None, accumulated: 0 }
    }

    pub fn reset(&mut self) {
        self.last_seen = None;
        self.accumulated = 0;
    }

    /// Records the current time and returns the points earned since the last call.
    pub fn advance(&mut self, now_ms: u64, active: bool) -> u32 {
        let elapsed = match self.last_seen {
            Some(last) => now_ms.saturating_sub(last),
            None => 0,
        };
        self.last_seen = Some(now_ms);

        if !active {
            return 0;
        }

        self.accumulated += elapsed;
        let points = self.accumulated / self.interval_ms;
        self.accumulated %= self.interval_ms;
        points as u32
    }
}
