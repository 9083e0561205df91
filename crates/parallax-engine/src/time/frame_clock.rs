use std::time::Instant;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the clock started.
    pub elapsed: f32,

    /// Seconds since the previous tick.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Reports unclamped time: the scene's easing and rotation are scaled by the
/// real elapsed time, so a stall shows up as one large step.
///
/// A clock built with [`FrameClock::new`] starts on its first tick, which
/// reports zero elapsed time. Setup work done between construction and the
/// first frame is not counted.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Option<Instant>,
    last: Option<Instant>,
    frame_index: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { start: None, last: None, frame_index: 0 }
    }

    /// Creates a clock whose time zero is `start`.
    pub fn starting_at(start: Instant) -> Self {
        Self { start: Some(start), last: Some(start), frame_index: 0 }
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`. Times earlier than the last tick count
    /// as zero progress.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let start = *self.start.get_or_insert(now);
        let last = self.last.unwrap_or(start);

        let now = now.max(last);
        let dt = now.saturating_duration_since(last);
        self.last = Some(now);

        let ft = FrameTime {
            elapsed: now.saturating_duration_since(start).as_secs_f32(),
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

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn elapsed_accumulates_and_dt_is_per_tick() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);

        let a = clock.tick_at(t0 + Duration::from_millis(16));
        let b = clock.tick_at(t0 + Duration::from_millis(50));

        assert!((a.elapsed - 0.016).abs() < 1e-6);
        assert!((b.elapsed - 0.050).abs() < 1e-6);
        assert!((b.dt - 0.034).abs() < 1e-6);
        assert_eq!((a.frame_index, b.frame_index), (0, 1));
    }

    #[test]
    fn long_stall_is_not_clamped() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        let ft = clock.tick_at(t0 + Duration::from_secs(3));
        assert!((ft.dt - 3.0).abs() < 1e-6);
    }

    #[test]
    fn time_never_runs_backwards() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        clock.tick_at(t0 + Duration::from_millis(20));
        let ft = clock.tick_at(t0 + Duration::from_millis(10));
        assert_eq!(ft.dt, 0.0);
        assert!((ft.elapsed - 0.020).abs() < 1e-6);
    }

    #[test]
    fn first_tick_starts_the_clock() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new();

        // Window and device setup happen before the first frame.
        let first = clock.tick_at(t0 + Duration::from_millis(450));
        assert_eq!((first.elapsed, first.dt), (0.0, 0.0));

        let second = clock.tick_at(t0 + Duration::from_millis(466));
        assert!((second.elapsed - 0.016).abs() < 1e-6);
        assert!((second.dt - 0.016).abs() < 1e-6);
        assert_eq!(second.frame_index, 1);
    }
}
