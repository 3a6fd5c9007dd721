//! Simulation clock.
//!
//! Bonus expiry is measured in simulation seconds, not wall time, so a paused or
//! slowed simulation keeps its timers in step with what the player sees.

/// Accumulates simulation time from per-frame deltas.
#[derive(Clone, Debug, Default)]
pub struct SimClock {
    /// Elapsed simulation seconds. f64 so long sessions keep sub-frame precision.
    elapsed: f64,
    tick_count: u64,
}

impl SimClock {
    /// Create a clock at t = 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt_seconds`. Negative or non-finite deltas are ignored.
    ///
    /// Returns whether the clock moved.
    pub fn advance(&mut self, dt_seconds: f32) -> bool {
        if !dt_seconds.is_finite() || dt_seconds < 0.0 {
            return false;
        }
        self.elapsed += dt_seconds as f64;
        self.tick_count += 1;
        true
    }

    /// Elapsed simulation seconds.
    #[inline]
    pub fn now(&self) -> f64 {
        self.elapsed
    }

    /// Number of accepted `advance` calls.
    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
