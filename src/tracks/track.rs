//! A single skill track.
//!
//! ```text
//! Empty --equip--> Charging --charge >= cost--> Ready --activate--> Activating
//!   ^                  ^                                               |
//!   |                  +------------- recharge in place ---------------+
//!   +-------------------------- vacate / clear ------------------------+
//! ```
//!
//! `clear` forces `Empty` from any state. Only the track manager mutates
//! tracks; everything else reads them.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{CombatError, Result};
use crate::skills::SkillCard;

/// Lifecycle state of a track.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackState {
    /// No skill equipped.
    #[default]
    Empty,
    /// Skill equipped, accumulating charge.
    Charging,
    /// Fully charged, waiting for activation.
    Ready,
    /// Effect is executing.
    Activating,
}

impl std::fmt::Display for TrackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TrackState::Empty => "Empty",
            TrackState::Charging => "Charging",
            TrackState::Ready => "Ready",
            TrackState::Activating => "Activating",
        };
        f.write_str(label)
    }
}

/// One combat slot: at most one skill and its charge.
///
/// Invariants: charge is 0 when no skill is equipped, and never exceeds the
/// equipped skill's cost.
#[derive(Clone, Debug, PartialEq)]
pub struct SkillTrack {
    index: usize,
    skill: Option<Rc<SkillCard>>,
    charge: u32,
    state: TrackState,
}

impl SkillTrack {
    /// Create an empty track.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self {
            index,
            skill: None,
            charge: 0,
            state: TrackState::Empty,
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn skill(&self) -> Option<&Rc<SkillCard>> {
        self.skill.as_ref()
    }

    #[must_use]
    pub fn charge(&self) -> u32 {
        self.charge
    }

    /// Cost of the equipped skill, or 0 when empty.
    #[must_use]
    pub fn max_charge(&self) -> u32 {
        self.skill.as_ref().map_or(0, |s| s.cost)
    }

    #[must_use]
    pub fn state(&self) -> TrackState {
        self.state
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state == TrackState::Empty
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state == TrackState::Ready
    }

    /// Charge progress in `[0, 1]`. Zero-cost skills count as full.
    #[must_use]
    pub fn progress(&self) -> f64 {
        match self.max_charge() {
            0 if self.skill.is_some() => 1.0,
            0 => 0.0,
            max => f64::from(self.charge) / f64::from(max),
        }
    }

    /// Room left before the track is full.
    #[must_use]
    pub fn missing_charge(&self) -> u32 {
        self.max_charge().saturating_sub(self.charge)
    }

    /// Equip a skill onto an empty track. Zero-cost skills go straight to
    /// `Ready`.
    pub(crate) fn equip(&mut self, skill: Rc<SkillCard>) -> Result<()> {
        if let Some(current) = &self.skill {
            return Err(CombatError::SlotOccupied {
                index: self.index,
                skill: current.id,
            });
        }
        self.state = if skill.cost == 0 {
            TrackState::Ready
        } else {
            TrackState::Charging
        };
        self.charge = 0;
        self.skill = Some(skill);
        Ok(())
    }

    /// Add charge to a charging track and return what did not fit.
    ///
    /// Tracks that are not `Charging` absorb nothing.
    pub(crate) fn add_charge(&mut self, amount: u32) -> u32 {
        if self.state != TrackState::Charging {
            return amount;
        }
        let taken = amount.min(self.missing_charge());
        self.charge += taken;
        if self.charge >= self.max_charge() {
            self.state = TrackState::Ready;
        }
        amount - taken
    }

    /// `Ready` → `Activating`. Charge is spent.
    pub(crate) fn begin_activation(&mut self) -> Result<Rc<SkillCard>> {
        if self.state != TrackState::Ready {
            return Err(CombatError::NotReady {
                index: self.index,
                state: self.state,
            });
        }
        let skill = match &self.skill {
            Some(skill) => Rc::clone(skill),
            None => {
                return Err(CombatError::NotReady {
                    index: self.index,
                    state: self.state,
                })
            }
        };
        if self.charge < skill.cost {
            return Err(CombatError::InsufficientCharge {
                index: self.index,
                charge: self.charge,
                cost: skill.cost,
            });
        }
        self.state = TrackState::Activating;
        self.charge = 0;
        Ok(skill)
    }

    /// Restart charging the equipped skill from zero. Empty tracks stay empty.
    pub(crate) fn recharge(&mut self) {
        let Some(skill) = &self.skill else {
            return;
        };
        self.charge = 0;
        self.state = if skill.cost == 0 {
            TrackState::Ready
        } else {
            TrackState::Charging
        };
    }

    /// Remove the skill, returning it. Always leaves the track `Empty`.
    pub(crate) fn clear(&mut self) -> Option<Rc<SkillCard>> {
        self.charge = 0;
        self.state = TrackState::Empty;
        self.skill.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::{SkillId, SkillType};

    fn skill(cost: u32) -> Rc<SkillCard> {
        Rc::new(SkillCard::new(SkillId::new(1), "Strike", SkillType::Attack, cost))
    }

    #[test]
    fn test_new_track_is_empty() {
        let track = SkillTrack::new(3);
        assert_eq!(track.index(), 3);
        assert_eq!(track.state(), TrackState::Empty);
        assert_eq!(track.charge(), 0);
        assert_eq!(track.max_charge(), 0);
        assert_eq!(track.progress(), 0.0);
    }

    #[test]
    fn test_equip_and_charge_to_ready() {
        let mut track = SkillTrack::new(0);
        track.equip(skill(10)).unwrap();
        assert_eq!(track.state(), TrackState::Charging);

        assert_eq!(track.add_charge(4), 0);
        assert_eq!(track.add_charge(4), 0);
        assert_eq!(track.progress(), 0.8);
        assert_eq!(track.add_charge(4), 2);
        assert_eq!(track.charge(), 10);
        assert_eq!(track.state(), TrackState::Ready);

        // Ready tracks absorb nothing.
        assert_eq!(track.add_charge(5), 5);
        assert_eq!(track.charge(), 10);
    }

    #[test]
    fn test_equip_occupied_fails() {
        let mut track = SkillTrack::new(1);
        track.equip(skill(5)).unwrap();
        let err = track.equip(skill(5)).unwrap_err();
        assert_eq!(err, CombatError::SlotOccupied { index: 1, skill: SkillId::new(1) });
    }

    #[test]
    fn test_zero_cost_is_ready_on_equip() {
        let mut track = SkillTrack::new(0);
        track.equip(skill(0)).unwrap();
        assert!(track.is_ready());
        assert_eq!(track.progress(), 1.0);
    }

    #[test]
    fn test_activation_requires_ready() {
        let mut track = SkillTrack::new(2);
        assert_eq!(
            track.begin_activation().unwrap_err(),
            CombatError::NotReady { index: 2, state: TrackState::Empty }
        );

        track.equip(skill(3)).unwrap();
        assert!(matches!(
            track.begin_activation(),
            Err(CombatError::NotReady { state: TrackState::Charging, .. })
        ));

        track.add_charge(3);
        let fired = track.begin_activation().unwrap();
        assert_eq!(fired.cost, 3);
        assert_eq!(track.state(), TrackState::Activating);
        assert_eq!(track.charge(), 0);

        track.recharge();
        assert_eq!(track.state(), TrackState::Charging);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut track = SkillTrack::new(0);
        track.equip(skill(4)).unwrap();
        track.add_charge(2);

        assert!(track.clear().is_some());
        let after_first = track.clone();
        assert!(track.clear().is_none());
        assert_eq!(track, after_first);
        assert_eq!(track.state(), TrackState::Empty);
        assert_eq!(track.charge(), 0);
    }

    #[test]
    fn test_recharge_on_empty_is_noop() {
        let mut track = SkillTrack::new(0);
        track.recharge();
        assert!(track.is_empty());
    }
}
