//! Combat engine facade.
//!
//! Ties the accumulator, track manager and event bus together and fixes
//! the per-tick ordering: a word is fully processed (combo included)
//! before its charge is distributed, and charge-driven transitions are
//! resolved before any activation in the same tick can see `Ready`.

use std::rc::Rc;
use std::time::Duration;

use crate::core::CombatConfig;
use crate::efficiency::{BuildEfficiency, EfficiencyCalculator};
use crate::error::Result;
use crate::events::{ChargeSource, EventBus};
use crate::providers::{CombatProviders, ExecutorRegistry, SkillSource};
use crate::skills::SkillCard;
use crate::tracks::{
    ActivationReport, ChargeDistribution, NextActivation, RotationOutcome, SkillTrack,
    SkillTrackManager,
};

use super::charge::{ChargeAccumulator, TypingResult};
use super::combo::ComboTracker;

/// Everything one submitted word produced.
#[derive(Clone, Debug, PartialEq)]
pub struct WordOutcome {
    pub typing: TypingResult,
    pub distribution: ChargeDistribution,
}

/// The charge-based combat engine.
///
/// ## Example
///
/// ```
/// use std::rc::Rc;
/// use std::time::Duration;
/// use typecharge::combat::CombatEngine;
/// use typecharge::core::CombatConfig;
/// use typecharge::providers::{CombatProviders, ExecutorRegistry, FixedDeck, HeroStats};
/// use typecharge::skills::{SkillCard, SkillId, SkillType};
///
/// let mut engine = CombatEngine::new(
///     CombatConfig::default(),
///     CombatProviders::basic(HeroStats::with_attack(20.0)),
///     Box::new(FixedDeck::empty()),
///     ExecutorRegistry::new(),
/// )
/// .unwrap();
///
/// let bolt = Rc::new(SkillCard::new(SkillId::new(1), "Bolt", SkillType::Attack, 7));
/// engine.equip_skill(bolt, 0).unwrap();
///
/// let outcome = engine.submit_word("HELLO", Duration::from_secs(1));
/// assert_eq!(outcome.typing.base_damage, 100);
/// assert!(engine.tracks()[0].is_ready());
/// ```
pub struct CombatEngine {
    config: CombatConfig,
    events: EventBus,
    accumulator: ChargeAccumulator,
    tracks: SkillTrackManager,
    efficiency: EfficiencyCalculator,
}

impl CombatEngine {
    pub fn new(
        config: CombatConfig,
        providers: CombatProviders,
        source: Box<dyn SkillSource>,
        executors: ExecutorRegistry,
    ) -> Result<Self> {
        Self::with_events(config, providers, source, executors, EventBus::new())
    }

    /// Create an engine that emits on an existing bus.
    pub fn with_events(
        config: CombatConfig,
        providers: CombatProviders,
        source: Box<dyn SkillSource>,
        executors: ExecutorRegistry,
        events: EventBus,
    ) -> Result<Self> {
        let tracks = SkillTrackManager::new(&config, source, executors)?;
        tracing::debug!(
            track_count = config.track_count,
            distribution = ?config.distribution,
            post_activation = ?config.post_activation,
            overflow = ?config.overflow,
            "combat engine created"
        );
        Ok(Self {
            accumulator: ChargeAccumulator::new(&config, &providers),
            efficiency: EfficiencyCalculator::new(&providers),
            config,
            events,
            tracks,
        })
    }

    #[must_use]
    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Subscribe, unsubscribe or read history.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    #[must_use]
    pub fn combo(&self) -> &ComboTracker {
        self.accumulator.combo()
    }

    #[must_use]
    pub fn tracks(&self) -> &[SkillTrack] {
        self.tracks.tracks()
    }

    #[must_use]
    pub fn track_manager(&self) -> &SkillTrackManager {
        &self.tracks
    }

    /// Process a word and distribute its charge.
    pub fn submit_word(&mut self, word: &str, input_time: Duration) -> WordOutcome {
        let typing = self
            .accumulator
            .process_word_input(word, input_time, &mut self.events);
        let distribution =
            self.tracks
                .start_charging(typing.charge_gain, ChargeSource::Typing, &mut self.events);
        WordOutcome {
            typing,
            distribution,
        }
    }

    /// Add charge from a non-typing source.
    pub fn grant_charge(&mut self, amount: u32, source: ChargeSource) -> ChargeDistribution {
        self.tracks.start_charging(amount, source, &mut self.events)
    }

    /// Advance time (combo decay).
    pub fn update(&mut self, dt: Duration) {
        self.accumulator.combo_mut().update(dt, &mut self.events);
    }

    pub fn equip_skill(&mut self, skill: Rc<SkillCard>, index: usize) -> Result<()> {
        self.tracks.equip_skill_to_track(skill, index, &mut self.events)
    }

    pub fn clear_track(&mut self, index: usize) -> Result<Option<Rc<SkillCard>>> {
        self.tracks.clear_track(index, &mut self.events)
    }

    pub fn rotate_skill_track(&mut self, index: usize) -> Result<RotationOutcome> {
        self.tracks.rotate_skill_track(index, &mut self.events)
    }

    /// Deal skills from the skill source into empty tracks.
    pub fn fill_empty_tracks(&mut self) -> Result<usize> {
        self.tracks.fill_empty_tracks(&mut self.events)
    }

    #[must_use]
    pub fn next_skill_activation(&self) -> Option<NextActivation> {
        self.tracks.get_next_skill_activation()
    }

    pub fn activate_skill(&mut self, index: usize) -> Result<ActivationReport> {
        self.tracks.activate_skill(index, &mut self.events)
    }

    /// Activate the lowest-index ready track, if there is one.
    pub fn activate_next_ready(&mut self) -> Option<ActivationReport> {
        let next = self.next_skill_activation()?;
        self.try_activate(next.index)
    }

    /// Activate a track, logging and swallowing any failure. This is what
    /// a hotkey handler calls: a blocked activation just does nothing.
    pub fn try_activate(&mut self, index: usize) -> Option<ActivationReport> {
        match self.activate_skill(index) {
            Ok(report) => Some(report),
            Err(err) => {
                tracing::warn!(track = index, error = %err, "activation ignored");
                None
            }
        }
    }

    /// Current build metrics for display.
    #[must_use]
    pub fn build_efficiency(&self) -> BuildEfficiency {
        self.efficiency.compute(self.tracks.equipped_skills())
    }

    /// Clear all tracks and the combo.
    pub fn reset(&mut self) {
        tracing::debug!("combat reset");
        self.tracks.reset(&mut self.events);
        self.accumulator.combo_mut().reset(&mut self.events);
    }
}

impl std::fmt::Debug for CombatEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatEngine")
            .field("config", &self.config)
            .field("accumulator", &self.accumulator)
            .field("tracks", &self.tracks)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PostActivationPolicy;
    use crate::error::CombatError;
    use crate::events::CombatEvent;
    use crate::providers::{ExecutionOutcome, FixedDeck, HeroStats};
    use crate::skills::{SkillId, SkillType};

    fn skill(id: u32, cost: u32) -> Rc<SkillCard> {
        Rc::new(SkillCard::new(SkillId::new(id), format!("S{id}"), SkillType::Attack, cost))
    }

    fn engine(config: CombatConfig) -> CombatEngine {
        let executors = ExecutorRegistry::new()
            .with(SkillType::Attack, |_: &SkillCard, _: usize| ExecutionOutcome::Applied);
        CombatEngine::with_events(
            config,
            CombatProviders::basic(HeroStats::with_attack(20.0)),
            Box::new(FixedDeck::empty()),
            executors,
            EventBus::with_history(),
        )
        .unwrap()
    }

    #[test]
    fn test_word_charges_before_activation() {
        let mut e = engine(CombatConfig::default());
        e.equip_skill(skill(1, 7), 0).unwrap();
        assert!(e.try_activate(0).is_none());

        let outcome = e.submit_word("HELLO", Duration::from_secs(1));
        assert_eq!(outcome.distribution.for_track(0), 7);

        let report = e.activate_next_ready().unwrap();
        assert_eq!(report.index, 0);
        assert!(report.outcome.is_applied());
        assert_eq!(report.rotation, RotationOutcome::Recharging(SkillId::new(1)));
        assert_eq!(e.tracks()[0].charge(), 0);
    }

    #[test]
    fn test_event_order_for_one_word() {
        let mut e = engine(CombatConfig::default());
        e.equip_skill(skill(1, 7), 0).unwrap();
        e.events_mut().take_history();

        e.submit_word("HELLO", Duration::from_secs(1));
        assert_eq!(
            e.events().history(),
            &[
                CombatEvent::ComboChanged { combo: 1 },
                CombatEvent::ChargeGained { amount: 7, source: ChargeSource::Typing },
                CombatEvent::ChargeUpdated { track: 0, current: 7, max: 7 },
                CombatEvent::TrackCharged { track: 0, skill: SkillId::new(1) },
            ]
        );
    }

    #[test]
    fn test_activate_not_ready() {
        let mut e = engine(CombatConfig::default());
        e.equip_skill(skill(1, 50), 1).unwrap();
        assert!(matches!(
            e.activate_skill(1),
            Err(CombatError::NotReady { index: 1, .. })
        ));
        assert!(e.activate_next_ready().is_none());
    }

    #[test]
    fn test_update_decays_combo() {
        let mut e = engine(CombatConfig::default());
        e.submit_word("hi", Duration::from_millis(300));
        assert_eq!(e.combo().count(), 1);
        e.update(Duration::from_secs(4));
        assert_eq!(e.combo().count(), 0);
    }

    #[test]
    fn test_redraw_returns_skill_to_source() {
        let mut e = engine(
            CombatConfig::default().with_post_activation(PostActivationPolicy::RedrawFromDeck),
        );
        e.equip_skill(skill(1, 2), 0).unwrap();
        e.grant_charge(2, ChargeSource::External);

        let report = e.activate_skill(0).unwrap();
        assert_eq!(
            report.rotation,
            RotationOutcome::Redrawn {
                returned: Some(SkillId::new(1)),
                drawn: SkillId::new(1),
            }
        );
        // The returned skill was the only card in the source, so it comes straight back.
        assert_eq!(e.track_manager().skill_source().remaining(), 0);
    }

    #[test]
    fn test_reset() {
        let mut e = engine(CombatConfig::default());
        e.equip_skill(skill(1, 5), 0).unwrap();
        e.submit_word("go", Duration::from_millis(200));
        e.reset();
        assert!(e.tracks().iter().all(SkillTrack::is_empty));
        assert_eq!(e.combo().count(), 0);
    }
}
