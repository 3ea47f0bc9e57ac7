use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Time elapsed since the clock was created or last reset, in seconds.
    pub total: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

impl FrameTime {
    /// A zero-length frame at `now`; handy for driving cameras before the first tick.
    pub fn zero() -> Self {
        Self {
            dt: 0.0,
            total: 0.0,
            now: Instant::now(),
            frame_index: 0,
        }
    }

    /// Seconds since the previous frame.
    #[inline]
    pub fn elapsed_seconds(&self) -> f32 {
        self.dt
    }

    /// Seconds since the clock started.
    #[inline]
    pub fn total_elapsed_seconds(&self) -> f32 {
        self.total
    }
}

/// Frame clock producing `FrameTime` snapshots.
///
/// One clock per window so that multi-window applications do not share
/// delta-time state.
///
/// Delta time is clamped to avoid pathological values when the application is paused
/// by the debugger, minimized, or stalls. The running total accumulates the clamped
/// deltas, so animations driven by it never jump.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    total: Duration,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock with default clamps (0.1 ms .. 250 ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            total: Duration::ZERO,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the clock baseline and the running total.
    pub fn reset(&mut self) {
        self.last = Instant::now();
        self.total = Duration::ZERO;
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = self.clamp(now.saturating_duration_since(self.last));

        self.last = now;
        self.total += dt;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            total: self.total.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }

    fn clamp(&self, dt: Duration) -> Duration {
        dt.clamp(self.dt_min, self.dt_max)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_clamped_and_indexed_zero() {
        let mut clock = FrameClock::new();
        let ft = clock.tick();
        assert_eq!(ft.frame_index, 0);
        assert!(ft.dt >= 0.0001 && ft.dt <= 0.25);
    }

    #[test]
    fn total_accumulates_deltas() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(10), Duration::from_millis(10));
        clock.tick();
        clock.tick();
        let ft = clock.tick();
        assert_eq!(ft.frame_index, 2);
        assert!((ft.total_elapsed_seconds() - 0.03).abs() < 1e-4);
        assert!((ft.elapsed_seconds() - 0.01).abs() < 1e-6);
    }

    #[test]
    fn reset_clears_total() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(5), Duration::from_millis(5));
        clock.tick();
        clock.reset();
        let ft = clock.tick();
        assert!((ft.total - 0.005).abs() < 1e-5);
    }
}
