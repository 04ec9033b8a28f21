//! Skill tracks: the fixed combat slots and their manager.
//!
//! ## Key Types
//!
//! - `TrackState`: Empty / Charging / Ready / Activating
//! - `SkillTrack`: One slot's skill and charge (read-only outside this module)
//! - `SkillTrackManager`: Equip, charge, activate, rotate and clear tracks

pub mod manager;
pub mod track;

pub use manager::{
    ActivationReport, ChargeDistribution, NextActivation, RotationOutcome, SkillTrackManager,
};
pub use track::{SkillTrack, TrackState};
