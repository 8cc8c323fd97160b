//! Frame-driven tick gate.
//!
//! Callers poll the clock with a monotonic timestamp once per rendered
//! frame. At most one tick fires per poll, and time beyond one tick is not
//! carried over: a slow frame never triggers catch-up ticks.

/// Fixed-timestep gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimulationClock {
    tick_ms: u32,
    last_ms: u64,
    running: bool,
}

impl SimulationClock {
    /// Create a stopped clock.
    #[must_use]
    pub const fn new(tick_ms: u32) -> Self {
        Self {
            tick_ms,
            last_ms: 0,
            running: false,
        }
    }

    /// Start counting from `now_ms`.
    pub fn start(&mut self, now_ms: u64) {
        self.running = true;
        self.last_ms = now_ms;
    }

    /// Stop the clock. Polls return `false` until restarted.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Whether the clock is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Configured tick duration.
    #[must_use]
    pub const fn tick_ms(&self) -> u32 {
        self.tick_ms
    }

    /// Returns `true` if a tick is due at `now_ms`.
    ///
    /// While stopped the reference time follows `now_ms`, so the first tick
    /// after a start waits a full period.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if !self.running {
            self.last_ms = now_ms;
            return false;
        }
        if now_ms.saturating_sub(self.last_ms) >= u64::from(self.tick_ms) {
            self.last_ms = now_ms;
            return true;
        }
        false
    }
}
