//! Frame pacing
//!
//! Fixed-interval deadlines for whoever drives the render tick. The bridge
//! itself has no scheduler; this only serves the host loop.

use std::time::{Duration, Instant};

/// Frame interval for a target rate. Zero is clamped to 1 Hz.
pub fn frame_duration(fps: u32) -> Duration {
    Duration::from_secs(1) / fps.max(1)
}

/// Frame counter with deadline pacing
pub struct FrameClock {
    frame_count: u64,
    interval: Duration,
    next_deadline: Instant,
}

impl FrameClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            frame_count: 0,
            interval,
            next_deadline: Instant::now() + interval,
        }
    }

    pub fn with_fps(fps: u32) -> Self {
        Self::new(frame_duration(fps))
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Time left until the next frame is due, as seen at `now`.
    pub fn until_next(&self, now: Instant) -> Duration {
        self.next_deadline.saturating_duration_since(now)
    }

    /// Counts a frame and moves the deadline forward. A frame that overran
    /// by more than one interval resets the deadline instead of bursting to
    /// catch up.
    pub fn advance(&mut self, now: Instant) {
        self.frame_count += 1;
        self.next_deadline += self.interval;
        if self.next_deadline + self.interval < now {
            self.next_deadline = now + self.interval;
        }
    }
}
