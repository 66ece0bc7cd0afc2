//! Render-loop time helpers.
//!
//! - `FrameClock`: per-frame `dt` with a clamp, so a stalled frame (breakpoint, window
//!   drag on some platforms) does not jump animations.
//! - `ping_pong_01`: maps a monotonically increasing time onto an auto-reversing cycle.

use std::time::Instant;

/// Tracks time since the last `tick()`.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    /// Max dt returned from `tick()` (seconds).
    max_dt: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            max_dt: 0.1,
        }
    }

    #[inline]
    pub fn with_max_dt(mut self, max_dt: f32) -> Self {
        self.max_dt = max_dt.max(0.0);
        self
    }

    /// Restart from now, e.g. when resuming after the loop idled.
    #[inline]
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advance the clock and return `dt` in seconds, clamped to `[0, max_dt]`.
    #[inline]
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last).as_secs_f32();
        self.last = now;
        dt.clamp(0.0, self.max_dt)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Ping-pong `t` over `[0, 1]`: 0 -> 1 in one period, back to 0 in the next.
#[inline]
pub fn ping_pong_01(t: f32, period_s: f32) -> f32 {
    let p = if period_s <= 0.0 { 1.0 } else { period_s };
    let x = (t.max(0.0) / p) % 2.0;
    if x <= 1.0 { x } else { 2.0 - x }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ping_pong_reverses_each_period() {
        assert_relative_eq!(ping_pong_01(0.0, 2.0), 0.0);
        assert_relative_eq!(ping_pong_01(1.0, 2.0), 0.5);
        assert_relative_eq!(ping_pong_01(2.0, 2.0), 1.0);
        assert_relative_eq!(ping_pong_01(3.0, 2.0), 0.5);
        assert_relative_eq!(ping_pong_01(4.0, 2.0), 0.0);
    }

    #[test]
    fn ping_pong_tolerates_bad_period() {
        assert_relative_eq!(ping_pong_01(0.5, 0.0), 0.5);
        assert_relative_eq!(ping_pong_01(-3.0, 1.0), 0.0);
    }

    #[test]
    fn tick_is_clamped() {
        let mut clock = FrameClock::new().with_max_dt(0.0);
        assert_eq!(clock.tick(), 0.0);
    }
}
