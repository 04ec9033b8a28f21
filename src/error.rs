//! Error types for combat operations.
//!
//! All of these are local, recoverable conditions. Callers typically log
//! them and move on (a blocked hotkey does nothing this tick).

use thiserror::Error;

use crate::skills::SkillId;
use crate::tracks::TrackState;

/// Errors returned by track and engine operations.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CombatError {
    #[error("invalid track index {index} (track count is {track_count})")]
    InvalidIndex { index: usize, track_count: usize },

    #[error("track {index} is occupied by {skill}; clear it before equipping")]
    SlotOccupied { index: usize, skill: SkillId },

    #[error("track {index} is not ready (state: {state})")]
    NotReady { index: usize, state: TrackState },

    #[error("track {index} has {charge} charge but its skill costs {cost}")]
    InsufficientCharge { index: usize, charge: u32, cost: u32 },

    #[error("invalid combat configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, CombatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CombatError::InvalidIndex { index: 7, track_count: 5 };
        assert_eq!(err.to_string(), "invalid track index 7 (track count is 5)");

        let err = CombatError::NotReady { index: 1, state: TrackState::Charging };
        assert_eq!(err.to_string(), "track 1 is not ready (state: Charging)");

        let err = CombatError::SlotOccupied { index: 0, skill: SkillId::new(3) };
        assert!(err.to_string().contains("Skill(3)"));
    }
}
