use std::time::{Duration, Instant};

/// Display refresh period the frame loop aims for.
pub const FRAME_INTERVAL: Duration = Duration::from_micros(1_000_000 / 60);

/// Repeating timer. Dropping it cancels it.
#[derive(Debug)]
pub struct Interval {
    period: Duration,
    next: Instant,
}

impl Interval {
    pub fn start(period: Duration, now: Instant) -> Self {
        Interval { period, next: now + period }
    }

    /// Returns true once per elapsed period. A caller that fell behind gets
    /// a single firing and the timer re-anchors on `now`.
    pub fn fire(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }

        self.next += self.period;
        if self.next <= now {
            self.next = now + self.period;
        }
        true
    }
}

/// One-shot request for the next display frame. Dropping it cancels it.
#[derive(Debug)]
pub struct FrameRequest {
    due: Instant,
}

impl FrameRequest {
    pub fn request(now: Instant) -> Self {
        FrameRequest { due: now + FRAME_INTERVAL }
    }

    /// A frame asked for right away, used for the first draw.
    pub fn immediate(now: Instant) -> Self {
        FrameRequest { due: now }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }
}
