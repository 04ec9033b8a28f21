//! Combat event types.
//!
//! Events describe state changes that UI, achievement and analytics
//! collaborators care about. Each state change emits at most one event.

use serde::{Deserialize, Serialize};

use crate::skills::{SkillId, SkillType};

/// Where a charge gain came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChargeSource {
    /// A submitted word.
    Typing,
    /// A skill effect that grants charge.
    Skill(SkillId),
    /// Anything else (relic procs, debug tools).
    External,
}

/// Discriminant of [`CombatEvent`], used for filtered subscriptions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    TrackCharged,
    ChargeUpdated,
    SkillActivated,
    ComboChanged,
    ChargeGained,
}

/// An observable combat event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// A track filled up and is now `Ready`.
    TrackCharged { track: usize, skill: SkillId },

    /// A track's charge changed (including equip, clear and reset).
    /// `max` is 0 for an empty track.
    ChargeUpdated { track: usize, current: u32, max: u32 },

    /// A skill fired from a track.
    SkillActivated {
        skill: SkillId,
        skill_type: SkillType,
        track: usize,
    },

    /// The combo counter changed value.
    ComboChanged { combo: u32 },

    /// Charge entered the track system.
    ChargeGained { amount: u32, source: ChargeSource },
}

impl CombatEvent {
    /// Get the event's kind.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            CombatEvent::TrackCharged { .. } => EventKind::TrackCharged,
            CombatEvent::ChargeUpdated { .. } => EventKind::ChargeUpdated,
            CombatEvent::SkillActivated { .. } => EventKind::SkillActivated,
            CombatEvent::ComboChanged { .. } => EventKind::ComboChanged,
            CombatEvent::ChargeGained { .. } => EventKind::ChargeGained,
        }
    }

    /// The track this event concerns, if any.
    #[must_use]
    pub fn track(&self) -> Option<usize> {
        match self {
            CombatEvent::TrackCharged { track, .. }
            | CombatEvent::ChargeUpdated { track, .. }
            | CombatEvent::SkillActivated { track, .. } => Some(*track),
            CombatEvent::ComboChanged { .. } | CombatEvent::ChargeGained { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        let event = CombatEvent::ComboChanged { combo: 3 };
        assert_eq!(event.kind(), EventKind::ComboChanged);

        let event = CombatEvent::ChargeGained { amount: 7, source: ChargeSource::Typing };
        assert_eq!(event.kind(), EventKind::ChargeGained);
    }

    #[test]
    fn test_track() {
        let event = CombatEvent::ChargeUpdated { track: 2, current: 4, max: 10 };
        assert_eq!(event.track(), Some(2));

        let event = CombatEvent::SkillActivated {
            skill: SkillId::new(1),
            skill_type: SkillType::Attack,
            track: 0,
        };
        assert_eq!(event.track(), Some(0));
        assert_eq!(CombatEvent::ComboChanged { combo: 1 }.track(), None);
    }

    #[test]
    fn test_event_serialization() {
        let event = CombatEvent::ChargeGained {
            amount: 5,
            source: ChargeSource::Skill(SkillId::new(9)),
        };
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: CombatEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }
}
