//! Combo tracking.
//!
//! A combo is a streak of consecutive perfect inputs. It breaks on any
//! non-perfect input, and decays once no perfect input arrives within
//! the combo window.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::CombatConfig;
use crate::events::{CombatEvent, EventBus};

/// Snapshot of the combo state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ComboState {
    /// Consecutive perfect inputs.
    pub count: u32,
    /// Time since the last perfect input.
    pub decay_timer: Duration,
}

/// Tracks consecutive perfect inputs and their decay window.
#[derive(Clone, Debug)]
pub struct ComboTracker {
    count: u32,
    decay_timer: Duration,
    window: Duration,
    step_bonus: f64,
    max_combo: u32,
}

impl ComboTracker {
    /// Create a tracker with the given window and per-step bonus.
    #[must_use]
    pub fn new(window: Duration, step_bonus: f64) -> Self {
        Self {
            count: 0,
            decay_timer: Duration::ZERO,
            window,
            step_bonus,
            max_combo: 0,
        }
    }

    #[must_use]
    pub fn from_config(config: &CombatConfig) -> Self {
        Self::new(config.combo_window(), config.combo_step_bonus)
    }

    /// Current combo count.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Highest combo reached since the last reset.
    #[must_use]
    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    #[must_use]
    pub fn state(&self) -> ComboState {
        ComboState {
            count: self.count,
            decay_timer: self.decay_timer,
        }
    }

    /// Damage/charge multiplier: `1 + count × step_bonus`.
    #[must_use]
    pub fn multiplier(&self) -> f64 {
        1.0 + f64::from(self.count) * self.step_bonus
    }

    /// Register one input and return the new combo count.
    ///
    /// A perfect input within the window extends the combo; a perfect input
    /// after the window elapsed starts a new combo at 1. Any non-perfect
    /// input drops the combo to 0.
    pub fn register_input(
        &mut self,
        is_perfect: bool,
        elapsed_since_last: Duration,
        events: &mut EventBus,
    ) -> u32 {
        let previous = self.count;

        if is_perfect {
            self.count = if self.count > 0 && elapsed_since_last <= self.window {
                self.count.saturating_add(1)
            } else {
                1
            };
            self.max_combo = self.max_combo.max(self.count);
        } else {
            self.count = 0;
        }
        self.decay_timer = Duration::ZERO;

        self.notify(previous, events);
        self.count
    }

    /// Advance the decay timer by `dt`. Breaks the combo once the time since
    /// the last perfect input exceeds the window.
    pub fn update(&mut self, dt: Duration, events: &mut EventBus) {
        if self.count == 0 {
            return;
        }
        self.decay_timer = self.decay_timer.saturating_add(dt);
        if self.decay_timer > self.window {
            let previous = self.count;
            tracing::debug!(combo = previous, "combo decayed");
            self.count = 0;
            self.decay_timer = Duration::ZERO;
            self.notify(previous, events);
        }
    }

    /// Reset to a fresh combat: count, timer and max combo go to zero.
    pub fn reset(&mut self, events: &mut EventBus) {
        let previous = self.count;
        self.count = 0;
        self.decay_timer = Duration::ZERO;
        self.max_combo = 0;
        self.notify(previous, events);
    }

    fn notify(&self, previous: u32, events: &mut EventBus) {
        if previous != self.count {
            tracing::trace!(from = previous, to = self.count, "combo changed");
            events.emit(CombatEvent::ComboChanged { combo: self.count });
        }
    }
}

impl Default for ComboTracker {
    fn default() -> Self {
        Self::from_config(&CombatConfig::default())
    }
}
