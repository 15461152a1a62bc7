use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots and pacing redraws.
///
/// With a target rate set, [`next_deadline`](Self::next_deadline) tells the
/// runtime when the next tick is due. Delta time is clamped to avoid
/// pathological values when the application is paused by the debugger,
/// minimized, or stalls.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    interval: Duration,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates an unpaced clock: every frame is due immediately.
    pub fn new() -> Self {
        Self::with_interval(Duration::ZERO)
    }

    /// Creates a clock paced at `fps` ticks per second. `0` disables pacing.
    pub fn with_target_fps(fps: u32) -> Self {
        if fps == 0 {
            return Self::new();
        }
        Self::with_interval(Duration::from_secs(1) / fps)
    }

    fn with_interval(interval: Duration) -> Self {
        Self {
            last: Instant::now(),
            frame_index: 0,
            interval,
            dt_min: Duration::from_micros(100),
            dt_max: Duration::from_millis(250),
        }
    }

    /// Target time between ticks.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Resets the clock baseline.
    ///
    /// Useful when rendering starts or resumes after suspension.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Instant at which the next tick is due.
    pub fn next_deadline(&self) -> Instant {
        self.last + self.interval
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_deadline()
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
