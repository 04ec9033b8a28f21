//! Skill cards - static skill data.
//!
//! A `SkillCard` is owned by whoever loads skill content. Tracks only
//! hold a shared handle (`Rc<SkillCard>`) to it.

use serde::{Deserialize, Serialize};

use super::params::{ParamKey, ParamValue, Params};

/// Unique identifier for a skill card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SkillId(pub u32);

impl SkillId {
    /// Create a new skill ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SkillId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Skill({})", self.0)
    }
}

/// Broad category of a skill. Effect executors are keyed by this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillType {
    Attack,
    Defense,
    Utility,
    /// Skills that help the player type (slow time, highlight words).
    TypingEnhancement,
}

impl SkillType {
    /// All skill types, in declaration order.
    pub const ALL: [SkillType; 4] = [
        SkillType::Attack,
        SkillType::Defense,
        SkillType::Utility,
        SkillType::TypingEnhancement,
    ];
}

/// Opaque effect description handed to the effect executor.
///
/// `kind` names the effect ("strike", "shield", "slow_time"); `params`
/// carries its numbers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectDescriptor {
    pub kind: String,
    pub params: Params,
}

impl EffectDescriptor {
    /// Create a descriptor with no parameters.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: Params::default(),
        }
    }

    /// Add a parameter (builder pattern).
    #[must_use]
    pub fn with_param(mut self, key: impl Into<ParamKey>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Get a parameter value.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(&ParamKey::new(key))
    }

    /// Get a float parameter with a default value.
    #[must_use]
    pub fn get_float(&self, key: &str, default: f64) -> f64 {
        self.param(key).and_then(ParamValue::as_float).unwrap_or(default)
    }

    /// Get an integer parameter with a default value.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.param(key).and_then(ParamValue::as_int).unwrap_or(default)
    }
}

/// A skill that can be equipped to a track.
///
/// ## Example
///
/// ```
/// use typecharge::skills::{EffectDescriptor, SkillCard, SkillId, SkillType};
///
/// let fireball = SkillCard::new(SkillId::new(1), "Fireball", SkillType::Attack, 10)
///     .with_effect(EffectDescriptor::new("strike").with_param("damage_multiplier", 1.5));
///
/// assert_eq!(fireball.cost, 10);
/// assert_eq!(fireball.effect.get_float("damage_multiplier", 1.0), 1.5);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkillCard {
    pub id: SkillId,

    /// Display name.
    pub name: String,

    pub skill_type: SkillType,

    /// Charge needed to activate.
    pub cost: u32,

    pub effect: EffectDescriptor,
}

impl SkillCard {
    /// Create a new skill card with an empty effect.
    #[must_use]
    pub fn new(id: SkillId, name: impl Into<String>, skill_type: SkillType, cost: u32) -> Self {
        Self {
            id,
            name: name.into(),
            skill_type,
            cost,
            effect: EffectDescriptor::default(),
        }
    }

    /// Set the effect descriptor (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: EffectDescriptor) -> Self {
        self.effect = effect;
        self
    }
}
