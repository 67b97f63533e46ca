//! Extended placement lockdown.
//!
//! A grounded piece locks once its timer runs out. Successful moves and
//! rotations while grounded restart the timer, up to `max_resets` times per
//! piece; reaching a new lowest row restores the whole reset budget. Once the
//! budget is spent, touching the ground locks on the next tick.

use tracing::trace;

use crate::types::{LOCK_DELAY_MS, LOCK_RESET_LIMIT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockdownConfig {
    pub lock_delay_ms: u32,
    pub max_resets: u8,
}

impl Default for LockdownConfig {
    fn default() -> Self {
        Self {
            lock_delay_ms: LOCK_DELAY_MS,
            max_resets: LOCK_RESET_LIMIT,
        }
    }
}

/// Per-piece lockdown state, driven by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockdownTimer {
    config: LockdownConfig,
    grounded: bool,
    time_left_ms: u32,
    resets_used: u8,
    /// Deepest row the anchor reached since spawn (y grows downward).
    lowest_y: i8,
}

impl LockdownTimer {
    pub fn new(config: LockdownConfig) -> Self {
        Self {
            config,
            grounded: false,
            time_left_ms: 0,
            resets_used: 0,
            lowest_y: 0,
        }
    }

    pub fn config(&self) -> LockdownConfig {
        self.config
    }

    pub fn grounded(&self) -> bool {
        self.grounded
    }

    pub fn time_left_ms(&self) -> u32 {
        self.time_left_ms
    }

    pub fn resets_used(&self) -> u8 {
        self.resets_used
    }

    pub fn lowest_y(&self) -> i8 {
        self.lowest_y
    }

    pub fn budget_exhausted(&self) -> bool {
        self.resets_used >= self.config.max_resets
    }

    /// Fresh state for a newly spawned piece.
    pub fn on_spawn(&mut self, y: i8) {
        self.grounded = false;
        self.time_left_ms = 0;
        self.resets_used = 0;
        self.lowest_y = y;
    }

    /// Record the anchor row after a downward move.
    pub fn on_fell_to_y(&mut self, y: i8) {
        if y > self.lowest_y {
            trace!(y, resets_used = self.resets_used, "lockdown: new lowest row");
            self.lowest_y = y;
            self.resets_used = 0;
        }
    }

    /// Sync with the piece's grounded state after any change.
    pub fn update_grounded(&mut self, is_grounded: bool) {
        match (self.grounded, is_grounded) {
            (false, true) => {
                self.time_left_ms = if self.budget_exhausted() {
                    0
                } else {
                    self.config.lock_delay_ms
                };
                trace!(time_left_ms = self.time_left_ms, "lockdown: grounded");
            }
            (true, false) => {
                self.time_left_ms = 0;
                trace!("lockdown: airborne");
            }
            _ => {}
        }
        self.grounded = is_grounded;
    }

    /// A move or rotation succeeded.
    pub fn on_successful_move_or_rotate(&mut self) {
        if !self.grounded || self.budget_exhausted() {
            return;
        }
        self.resets_used += 1;
        self.time_left_ms = self.config.lock_delay_ms;
        trace!(resets_used = self.resets_used, "lockdown: reset");
    }

    /// Advance the timer. Returns true when the piece should lock.
    pub fn tick(&mut self, delta_ms: u32) -> bool {
        if !self.grounded {
            return false;
        }
        self.time_left_ms = self.time_left_ms.saturating_sub(delta_ms);
        self.time_left_ms == 0
    }
}

impl Default for LockdownTimer {
    fn default() -> Self {
        Self::new(LockdownConfig::default())
    }
}
