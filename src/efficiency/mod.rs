//! Build efficiency metrics for UI and analytics display.

mod calculator;

pub use calculator::{
    compute_build_efficiency, BuildEfficiency, EfficiencyCalculator, ATTACK_WEIGHT,
    DEFENSE_WEIGHT, REFERENCE_SKILL_COST, ROTATION_POWER_SCALE, ROTATION_WEIGHT,
    TYPING_SYNERGY_PER_SKILL, UTILITY_SURVIVABILITY_PER_SKILL,
};
