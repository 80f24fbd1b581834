use std::time::{Duration, Instant};

/// Snapshot taken when a frame is started.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Monotonic timestamp of the tick.
    pub now: Instant,

    /// Monotonic frame counter, starting at 0.
    pub frame_index: u64,
}

/// Fixed-interval frame scheduler.
///
/// A clock that has never ticked is always due. After each tick the next
/// deadline is one interval after the previous one; if the loop fell more than
/// a full interval behind, the schedule restarts from `now` instead of
/// bursting to catch up.
#[derive(Debug, Clone)]
pub struct FrameClock {
    interval: Duration,
    next_due: Option<Instant>,
    frame_index: u64,
}

impl FrameClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
            frame_index: 0,
        }
    }

    /// Clock targeting `frames_per_second`.
    ///
    /// Rates that do not yield a representable interval (non-positive,
    /// non-finite, or so small the interval overflows) produce an unpaced
    /// clock.
    pub fn from_rate(frames_per_second: f64) -> Self {
        if !(frames_per_second.is_finite() && frames_per_second > 0.0) {
            return Self::unpaced();
        }
        Duration::try_from_secs_f64(1.0 / frames_per_second)
            .map_or_else(|_| Self::unpaced(), Self::new)
    }

    /// Clock that is due on every check.
    ///
    /// Presentation may still be throttled by the surface (e.g. FIFO vsync).
    pub fn unpaced() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of ticks so far.
    pub fn frames(&self) -> u64 {
        self.frame_index
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.next_due.is_none_or(|due| now >= due)
    }

    /// Instant at which the next frame becomes due; `None` if due already.
    pub fn deadline(&self) -> Option<Instant> {
        self.next_due
    }

    /// Forgets the schedule so the next check is due immediately.
    ///
    /// Useful after the surface was unavailable for a while.
    pub fn reset(&mut self) {
        self.next_due = None;
    }

    /// Records a frame start at `now` and schedules the next one.
    pub fn tick(&mut self, now: Instant) -> FrameTime {
        let next = match self.next_due {
            Some(due) if now.saturating_duration_since(due) < self.interval => due + self.interval,
            _ => now + self.interval,
        };
        self.next_due = Some(next);

        let ft = FrameTime {
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::from_rate(60.0)
    }
}
