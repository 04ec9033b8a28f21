//! Word-to-damage/charge conversion.
//!
//! - Base damage: `len × hero_attack × combo_multiplier`, rounded half
//!   away from zero. The combo multiplier is the one in effect *before*
//!   this word is registered.
//! - Charge gain: `round((len + speed_bonus) × deck_charge_efficiency)`
//!   with `speed_bonus = max(0, 2 - input_secs) × 2`.
//! - A word is perfect when typed in at most `len × seconds_per_character`.

use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::CombatConfig;
use crate::events::EventBus;
use crate::providers::{CombatProviders, DeckProvider, HeroStatProvider, RelicProvider};

use super::combo::ComboTracker;

/// Typing faster than this earns bonus charge.
pub const SPEED_BONUS_THRESHOLD_SECS: f64 = 2.0;

/// Bonus charge per second under the threshold.
pub const SPEED_BONUS_PER_SEC: f64 = 2.0;

/// Outcome of one word submission. Not persisted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypingResult {
    /// Characters in the word.
    pub word_length: usize,
    pub base_damage: i64,
    pub charge_gain: u32,
    /// Aggregate relic/buff multiplier on typing output.
    pub efficiency_multiplier: f64,
    pub is_perfect: bool,
    /// Combo multiplier used for `base_damage`.
    pub combo_multiplier: f64,
    /// Combo count after this word was registered.
    pub combo: u32,
}

impl TypingResult {
    /// Base damage scaled by the efficiency multiplier.
    #[must_use]
    pub fn final_damage(&self) -> i64 {
        round_half_away(self.base_damage as f64 * self.efficiency_multiplier)
    }
}

/// `f64::round` already rounds half away from zero; this only pins the
/// cast for non-finite values.
fn round_half_away(value: f64) -> i64 {
    if value.is_finite() {
        value.round() as i64
    } else {
        0
    }
}

/// Bonus charge for typing a word in `input_secs`.
#[must_use]
pub fn speed_bonus(input_secs: f64) -> f64 {
    (SPEED_BONUS_THRESHOLD_SECS - input_secs).max(0.0) * SPEED_BONUS_PER_SEC
}

/// Converts typed words into damage and charge.
///
/// Reads hero attack, deck charge efficiency and relic typing multipliers
/// from injected providers. Owns the combo tracker so that the combo
/// state and each returned result always agree.
pub struct ChargeAccumulator {
    combo: ComboTracker,
    seconds_per_character: f64,
    hero: Rc<dyn HeroStatProvider>,
    deck: Rc<dyn DeckProvider>,
    relics: Rc<dyn RelicProvider>,
}

impl ChargeAccumulator {
    #[must_use]
    pub fn new(config: &CombatConfig, providers: &CombatProviders) -> Self {
        Self {
            combo: ComboTracker::from_config(config),
            seconds_per_character: config.seconds_per_character,
            hero: Rc::clone(&providers.hero),
            deck: Rc::clone(&providers.deck),
            relics: Rc::clone(&providers.relics),
        }
    }

    #[must_use]
    pub fn combo(&self) -> &ComboTracker {
        &self.combo
    }

    pub fn combo_mut(&mut self) -> &mut ComboTracker {
        &mut self.combo
    }

    /// Target time for a perfect word of `len` characters.
    #[must_use]
    pub fn perfect_target(&self, len: usize) -> Duration {
        Duration::try_from_secs_f64(len as f64 * self.seconds_per_character).unwrap_or(Duration::MAX)
    }

    /// Is `input_time` fast enough for a word of `len` characters?
    ///
    /// Empty words are never perfect.
    #[must_use]
    pub fn is_perfect(&self, len: usize, input_time: Duration) -> bool {
        len > 0 && input_time <= self.perfect_target(len)
    }

    /// Turn one typed word into a [`TypingResult`].
    ///
    /// `input_time` is how long the word took to type; it also counts as
    /// the time since the previous input for the combo window. The combo
    /// is updated before this returns. An empty word deals no damage,
    /// gains no charge and breaks the combo.
    pub fn process_word_input(
        &mut self,
        word: &str,
        input_time: Duration,
        events: &mut EventBus,
    ) -> TypingResult {
        let len = word.chars().count();
        let input_secs = input_time.as_secs_f64();
        let stats = self.hero.final_stats();
        let combo_multiplier = self.combo.multiplier();
        let efficiency_multiplier = self.relics.typing_multiplier();

        let (base_damage, charge_gain) = if len == 0 {
            (0, 0)
        } else {
            let damage = round_half_away(len as f64 * stats.attack * combo_multiplier);
            let raw_gain = (len as f64 + speed_bonus(input_secs)) * self.deck.charge_efficiency();
            let gain = if raw_gain.is_finite() {
                raw_gain.round().clamp(0.0, f64::from(u32::MAX)) as u32
            } else {
                0
            };
            (damage, gain)
        };

        let is_perfect = self.is_perfect(len, input_time);
        let combo = self.combo.register_input(is_perfect, input_time, events);

        tracing::debug!(
            len,
            input_secs,
            base_damage,
            charge_gain,
            is_perfect,
            combo,
            "word processed"
        );

        TypingResult {
            word_length: len,
            base_damage,
            charge_gain,
            efficiency_multiplier,
            is_perfect,
            combo_multiplier,
            combo,
        }
    }
}

impl std::fmt::Debug for ChargeAccumulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChargeAccumulator")
            .field("combo", &self.combo)
            .field("seconds_per_character", &self.seconds_per_character)
            .finish_non_exhaustive()
    }
}
