//! Read-only collaborators injected into the combat engine.
//!
//! The engine never reaches for global state. Hero stats, deck charge
//! efficiency and relic modifiers are handed in at construction as
//! `Rc<dyn ...>` handles; the engine only reads them. The skill source and
//! effect executors are owned by the track manager because drawing and
//! executing are inherently mutable.
//!
//! [`basic`] has small ready-made implementations used by tests and
//! prototypes.

pub mod basic;
mod executor;

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::skills::{SkillCard, SkillType};

pub use basic::{FixedDeck, FixedEfficiency, RelicSet, ShuffledDeck, StaticHero};
pub use executor::{EffectExecutor, ExecutionOutcome, ExecutorRegistry};

/// Final (post-equipment) hero stats.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeroStats {
    pub attack: f64,
    pub defense: f64,
    pub max_health: f64,
    /// Typing speed multiplier (1.0 = baseline).
    pub typing_speed: f64,
}

impl Default for HeroStats {
    fn default() -> Self {
        Self {
            attack: 10.0,
            defense: 5.0,
            max_health: 100.0,
            typing_speed: 1.0,
        }
    }
}

impl HeroStats {
    /// Stats with the given attack and defaults elsewhere.
    #[must_use]
    pub fn with_attack(attack: f64) -> Self {
        Self {
            attack,
            ..Self::default()
        }
    }
}

/// Source of the active hero's final stats.
pub trait HeroStatProvider {
    fn final_stats(&self) -> HeroStats;
}

/// Deck-level modifiers.
pub trait DeckProvider {
    /// Multiplier applied to typed charge gain (1.0 = neutral).
    fn charge_efficiency(&self) -> f64;
}

/// Where new skills come from when a track rotates.
pub trait SkillSource {
    /// Draw the next skill, or `None` when the source is exhausted.
    fn draw(&mut self) -> Option<Rc<SkillCard>>;

    /// Give back a skill that left a track.
    fn recycle(&mut self, skill: Rc<SkillCard>);

    /// Number of skills that can still be drawn.
    fn remaining(&self) -> usize;
}

/// Bonuses granted by one active relic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelicModifiers {
    pub name: String,
    pub attack_bonus: f64,
    pub defense_bonus: f64,
    /// Added to 1.0 in the rotation efficiency formula.
    pub rotation_speed_bonus: f64,
    /// Multiplier on typing output (1.0 = neutral).
    pub typing_multiplier: f64,
    /// Skill types this relic synergizes with.
    pub synergy_tags: SmallVec<[SkillType; 2]>,
    /// Synergy bonus granted while a tagged skill type is equipped.
    pub synergy_bonus: f64,
}

impl RelicModifiers {
    /// A relic with no bonuses.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attack_bonus: 0.0,
            defense_bonus: 0.0,
            rotation_speed_bonus: 0.0,
            typing_multiplier: 1.0,
            synergy_tags: SmallVec::new(),
            synergy_bonus: 0.0,
        }
    }

    #[must_use]
    pub fn with_attack_bonus(mut self, bonus: f64) -> Self {
        self.attack_bonus = bonus;
        self
    }

    #[must_use]
    pub fn with_defense_bonus(mut self, bonus: f64) -> Self {
        self.defense_bonus = bonus;
        self
    }

    #[must_use]
    pub fn with_rotation_speed_bonus(mut self, bonus: f64) -> Self {
        self.rotation_speed_bonus = bonus;
        self
    }

    #[must_use]
    pub fn with_typing_multiplier(mut self, multiplier: f64) -> Self {
        self.typing_multiplier = multiplier;
        self
    }

    /// Add a synergy tag and set the bonus it grants.
    #[must_use]
    pub fn with_synergy(mut self, tag: SkillType, bonus: f64) -> Self {
        if !self.synergy_tags.contains(&tag) {
            self.synergy_tags.push(tag);
        }
        self.synergy_bonus = bonus;
        self
    }

    /// Does this relic synergize with the given skill type?
    #[must_use]
    pub fn has_tag(&self, tag: SkillType) -> bool {
        self.synergy_tags.contains(&tag)
    }
}

/// Source of the currently active relics.
pub trait RelicProvider {
    fn active_relics(&self) -> Vec<RelicModifiers>;

    /// Aggregate multiplier on typing output: the product of every relic's
    /// `typing_multiplier`.
    fn typing_multiplier(&self) -> f64 {
        self.active_relics()
            .iter()
            .map(|r| r.typing_multiplier)
            .product()
    }
}

/// The read-only provider handles the combat engine is built with.
#[derive(Clone)]
pub struct CombatProviders {
    pub hero: Rc<dyn HeroStatProvider>,
    pub deck: Rc<dyn DeckProvider>,
    pub relics: Rc<dyn RelicProvider>,
}

impl CombatProviders {
    pub fn new(
        hero: Rc<dyn HeroStatProvider>,
        deck: Rc<dyn DeckProvider>,
        relics: Rc<dyn RelicProvider>,
    ) -> Self {
        Self { hero, deck, relics }
    }

    /// Fixed hero stats, neutral deck efficiency, no relics.
    #[must_use]
    pub fn basic(stats: HeroStats) -> Self {
        Self::new(
            Rc::new(StaticHero::new(stats)),
            Rc::new(FixedEfficiency::default()),
            Rc::new(RelicSet::default()),
        )
    }
}

impl std::fmt::Debug for CombatProviders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatProviders")
            .field("hero", &self.hero.final_stats())
            .field("charge_efficiency", &self.deck.charge_efficiency())
            .field("relics", &self.relics.active_relics().len())
            .finish()
    }
}
