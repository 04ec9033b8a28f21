//! Skill data: cards, types, and effect descriptors.
//!
//! ## Key Types
//!
//! - `SkillId`: Identifier for a skill card
//! - `SkillType`: Attack / Defense / Utility / TypingEnhancement
//! - `SkillCard`: Cost, type and effect of one skill
//! - `EffectDescriptor`: Opaque effect data read by the effect executor

pub mod card;
pub mod params;

pub use card::{EffectDescriptor, SkillCard, SkillId, SkillType};
pub use params::{ParamKey, ParamValue, Params};
