//! Build efficiency metrics.
//!
//! Read-only summaries of how well the current hero, equipped skills and
//! relics fit together. Recomputed on demand and never cached; nothing in
//! the real-time combat path reads them.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::providers::{
    CombatProviders, DeckProvider, HeroStatProvider, HeroStats, RelicModifiers, RelicProvider,
};
use crate::skills::{SkillCard, SkillType};

/// Attack synergy added per equipped typing-enhancement skill.
pub const TYPING_SYNERGY_PER_SKILL: f64 = 0.15;

/// Survivability added per equipped utility skill.
pub const UTILITY_SURVIVABILITY_PER_SKILL: f64 = 0.10;

/// Skill cost that counts as 1.0 cost efficiency.
pub const REFERENCE_SKILL_COST: f64 = 10.0;

pub const ATTACK_WEIGHT: f64 = 0.5;
pub const DEFENSE_WEIGHT: f64 = 0.3;
pub const ROTATION_WEIGHT: f64 = 0.2;

/// Rotation efficiency hovers around 1.0; this puts it on the same scale
/// as attack and defense before weighting.
pub const ROTATION_POWER_SCALE: f64 = 100.0;

/// Snapshot of build quality.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildEfficiency {
    pub attack: f64,
    pub defense: f64,
    pub rotation: f64,
    /// `0.5 × attack + 0.3 × defense + 0.2 × (100 × rotation)`.
    pub overall_power: f64,
}

/// Counts of equipped skill types plus the averages the formulas need.
#[derive(Clone, Copy, Debug, Default)]
struct SkillMix {
    total: usize,
    attack: usize,
    defense: usize,
    utility: usize,
    typing: usize,
    damage_multiplier_sum: f64,
    defense_multiplier_sum: f64,
    cost_sum: f64,
}

impl SkillMix {
    fn from_skills<'a>(skills: impl IntoIterator<Item = &'a SkillCard>) -> Self {
        let mut mix = Self::default();
        for skill in skills {
            mix.total += 1;
            mix.cost_sum += f64::from(skill.cost.max(1));
            match skill.skill_type {
                SkillType::Attack => {
                    mix.attack += 1;
                    mix.damage_multiplier_sum += skill.effect.get_float("damage_multiplier", 1.0);
                }
                SkillType::Defense => {
                    mix.defense += 1;
                    mix.defense_multiplier_sum += skill.effect.get_float("defense_multiplier", 1.0);
                }
                SkillType::Utility => mix.utility += 1,
                SkillType::TypingEnhancement => mix.typing += 1,
            }
        }
        mix
    }

    fn has(&self, skill_type: SkillType) -> bool {
        let count = match skill_type {
            SkillType::Attack => self.attack,
            SkillType::Defense => self.defense,
            SkillType::Utility => self.utility,
            SkillType::TypingEnhancement => self.typing,
        };
        count > 0
    }

    fn ratio(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64
        }
    }

    fn average(sum: f64, count: usize) -> f64 {
        if count == 0 {
            1.0
        } else {
            sum / count as f64
        }
    }
}

/// Sum of synergy bonuses from relics tagged with any of `tags` that the
/// build actually uses.
fn relic_synergy(relics: &[RelicModifiers], mix: &SkillMix, tags: &[SkillType]) -> f64 {
    relics
        .iter()
        .filter(|r| tags.iter().any(|&t| r.has_tag(t) && mix.has(t)))
        .map(|r| r.synergy_bonus)
        .sum()
}

/// Compute build efficiency from explicit inputs.
pub fn compute_build_efficiency<'a>(
    stats: &HeroStats,
    charge_efficiency: f64,
    skills: impl IntoIterator<Item = &'a SkillCard>,
    relics: &[RelicModifiers],
) -> BuildEfficiency {
    let mix = SkillMix::from_skills(skills);

    let relic_attack: f64 = relics.iter().map(|r| r.attack_bonus).sum();
    let typing_synergy = 1.0
        + TYPING_SYNERGY_PER_SKILL * mix.typing as f64
        + relic_synergy(relics, &mix, &[SkillType::Attack, SkillType::TypingEnhancement]);
    let attack = (stats.attack
        * mix.ratio(mix.attack)
        * SkillMix::average(mix.damage_multiplier_sum, mix.attack)
        + relic_attack)
        * typing_synergy;

    let relic_defense: f64 = relics.iter().map(|r| r.defense_bonus).sum();
    let survivability = 1.0
        + UTILITY_SURVIVABILITY_PER_SKILL * mix.utility as f64
        + relic_synergy(relics, &mix, &[SkillType::Defense]);
    let defense = (stats.defense
        * mix.ratio(mix.defense)
        * SkillMix::average(mix.defense_multiplier_sum, mix.defense)
        + relic_defense)
        * survivability;

    let cost_efficiency = if mix.total == 0 {
        0.0
    } else {
        REFERENCE_SKILL_COST / (mix.cost_sum / mix.total as f64)
    };
    let rotation_bonus: f64 = relics.iter().map(|r| r.rotation_speed_bonus).sum();
    let rotation = charge_efficiency * cost_efficiency * (1.0 + rotation_bonus) * stats.typing_speed;

    let overall_power = ATTACK_WEIGHT * attack
        + DEFENSE_WEIGHT * defense
        + ROTATION_WEIGHT * (ROTATION_POWER_SCALE * rotation);

    BuildEfficiency {
        attack,
        defense,
        rotation,
        overall_power,
    }
}

/// Computes [`BuildEfficiency`] from the injected providers.
pub struct EfficiencyCalculator {
    hero: Rc<dyn HeroStatProvider>,
    deck: Rc<dyn DeckProvider>,
    relics: Rc<dyn RelicProvider>,
}

impl EfficiencyCalculator {
    #[must_use]
    pub fn new(providers: &CombatProviders) -> Self {
        Self {
            hero: Rc::clone(&providers.hero),
            deck: Rc::clone(&providers.deck),
            relics: Rc::clone(&providers.relics),
        }
    }

    /// Compute metrics for the given equipped skills.
    pub fn compute<'a>(&self, skills: impl IntoIterator<Item = &'a SkillCard>) -> BuildEfficiency {
        let relics = self.relics.active_relics();
        compute_build_efficiency(
            &self.hero.final_stats(),
            self.deck.charge_efficiency(),
            skills,
            &relics,
        )
    }
}

impl std::fmt::Debug for EfficiencyCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EfficiencyCalculator").finish_non_exhaustive()
    }
}
