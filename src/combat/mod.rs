//! Typing combat: combo tracking, word processing, and the engine facade.
//!
//! ## Key Types
//!
//! - [`ComboTracker`]: Consecutive perfect inputs and their decay window
//! - [`ChargeAccumulator`]: Word + timing → damage, charge, perfect flag
//! - [`CombatEngine`]: Owns everything and enforces per-tick ordering

mod charge;
mod combo;
mod engine;

pub use charge::{
    speed_bonus, ChargeAccumulator, TypingResult, SPEED_BONUS_PER_SEC, SPEED_BONUS_THRESHOLD_SECS,
};
pub use combo::{ComboState, ComboTracker};
pub use engine::{CombatEngine, WordOutcome};
