//! Combat engine integration tests.
//!
//! These tests play short combats through `CombatEngine`: typing words,
//! charging tracks, firing skills and rotating them.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use typecharge::combat::CombatEngine;
use typecharge::core::{CombatConfig, PostActivationPolicy};
use typecharge::events::{ChargeSource, CombatEvent, EventBus, EventKind};
use typecharge::providers::{
    CombatProviders, ExecutionOutcome, ExecutorRegistry, FixedDeck, FixedEfficiency, HeroStats,
    RelicModifiers, RelicSet, ShuffledDeck, SkillSource, StaticHero,
};
use typecharge::skills::{SkillCard, SkillId, SkillType};
use typecharge::tracks::{RotationOutcome, TrackState};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn card(id: u32, skill_type: SkillType, cost: u32) -> SkillCard {
    SkillCard::new(SkillId::new(id), format!("Skill{id}"), skill_type, cost)
}

fn all_applied() -> ExecutorRegistry {
    let mut registry = ExecutorRegistry::new();
    for skill_type in SkillType::ALL {
        registry.register(skill_type, |_: &SkillCard, _: usize| ExecutionOutcome::Applied);
    }
    registry
}

fn engine(config: CombatConfig, providers: CombatProviders, source: impl SkillSource + 'static) -> CombatEngine {
    init_tracing();
    CombatEngine::with_events(
        config,
        providers,
        Box::new(source),
        all_applied(),
        EventBus::with_history(),
    )
    .unwrap()
}

fn hero_20() -> CombatProviders {
    CombatProviders::basic(HeroStats::with_attack(20.0))
}

// =============================================================================
// Typing
// =============================================================================

/// HELLO in one second: 100 damage, 7 charge, combo 1.
#[test]
fn test_hello() {
    let mut e = engine(CombatConfig::default(), hero_20(), FixedDeck::empty());
    let outcome = e.submit_word("HELLO", Duration::from_secs(1));

    assert_eq!(outcome.typing.word_length, 5);
    assert_eq!(outcome.typing.base_damage, 100);
    assert_eq!(outcome.typing.charge_gain, 7);
    assert!(outcome.typing.is_perfect);
    assert_eq!(outcome.typing.combo, 1);
    assert_eq!(e.combo().count(), 1);
}

/// Five perfect words in a row put the sixth at a 1.5× multiplier.
#[test]
fn test_combo_multiplier_applies_to_next_word() {
    let mut e = engine(CombatConfig::default(), hero_20(), FixedDeck::empty());
    for expected in 1..=5 {
        let outcome = e.submit_word("HELLO", Duration::from_secs(1));
        assert_eq!(outcome.typing.combo, expected);
    }

    let sixth = e.submit_word("HELLO", Duration::from_secs(1));
    assert_eq!(sixth.typing.combo_multiplier, 1.5);
    assert_eq!(sixth.typing.base_damage, 150);
    assert_eq!(sixth.typing.combo, 6);
    assert_eq!(e.combo().max_combo(), 6);
}

/// A slow word drops the combo to zero but still deals damage.
#[test]
fn test_slow_word_breaks_combo() {
    let mut e = engine(CombatConfig::default(), hero_20(), FixedDeck::empty());
    e.submit_word("HELLO", Duration::from_secs(1));
    e.submit_word("HELLO", Duration::from_secs(1));

    let slow = e.submit_word("HELLO", Duration::from_secs(3));
    assert!(!slow.typing.is_perfect);
    assert_eq!(slow.typing.base_damage, 120);
    assert_eq!(slow.typing.charge_gain, 5);
    assert_eq!(e.combo().count(), 0);
    assert_eq!(e.combo().max_combo(), 2);
}

/// A perfect word that arrives after the window restarts the combo at 1.
#[test]
fn test_perfect_after_window_restarts_combo() {
    let mut e = engine(CombatConfig::default(), hero_20(), FixedDeck::empty());
    e.submit_word("HELLO", Duration::from_secs(1));
    e.submit_word("HELLO", Duration::from_secs(1));
    assert_eq!(e.combo().count(), 2);

    // 20 characters allow 6 seconds, longer than the 3 second window.
    let outcome = e.submit_word("abcdefghijklmnopqrst", Duration::from_secs(4));
    assert!(outcome.typing.is_perfect);
    assert_eq!(outcome.typing.combo, 1);
}

/// An empty word does nothing but break the combo.
#[test]
fn test_empty_word() {
    let mut e = engine(CombatConfig::default(), hero_20(), FixedDeck::empty());
    e.equip_skill(Rc::new(card(1, SkillType::Attack, 5)), 0).unwrap();
    e.submit_word("HELLO", Duration::from_secs(1));
    e.events_mut().take_history();

    let outcome = e.submit_word("", Duration::from_millis(100));
    assert_eq!(outcome.typing.base_damage, 0);
    assert_eq!(outcome.typing.charge_gain, 0);
    assert!(outcome.distribution.allocations.is_empty());
    assert_eq!(e.events().history(), &[CombatEvent::ComboChanged { combo: 0 }]);
}

/// Relic typing multipliers scale final damage but not base damage.
#[test]
fn test_relic_typing_multiplier() {
    let relics = Rc::new(RelicSet::default());
    relics.add(RelicModifiers::new("Quill").with_typing_multiplier(1.5));
    let providers = CombatProviders::new(
        Rc::new(StaticHero::new(HeroStats::with_attack(20.0))),
        Rc::new(FixedEfficiency::default()),
        relics.clone(),
    );
    let mut e = engine(CombatConfig::default(), providers, FixedDeck::empty());

    let outcome = e.submit_word("HELLO", Duration::from_secs(1));
    assert_eq!(outcome.typing.base_damage, 100);
    assert_eq!(outcome.typing.final_damage(), 150);

    relics.remove("Quill");
    let outcome = e.submit_word("HELLO", Duration::from_secs(1));
    assert_eq!(outcome.typing.final_damage(), outcome.typing.base_damage);
}

/// Provider changes between words are picked up immediately.
#[test]
fn test_providers_read_live() {
    let hero = Rc::new(StaticHero::new(HeroStats::with_attack(10.0)));
    let deck = Rc::new(FixedEfficiency::new(1.0));
    let providers = CombatProviders::new(hero.clone(), deck.clone(), Rc::new(RelicSet::default()));
    let mut e = engine(CombatConfig::default(), providers, FixedDeck::empty());

    let before = e.submit_word("abc", Duration::from_secs(3));
    hero.set_attack(30.0);
    deck.set(2.0);
    let after = e.submit_word("abc", Duration::from_secs(3));

    assert_eq!(before.typing.base_damage, 30);
    assert_eq!(before.typing.charge_gain, 3);
    assert_eq!(after.typing.base_damage, 90);
    assert_eq!(after.typing.charge_gain, 6);
}

// =============================================================================
// Combat flow
// =============================================================================

/// Subscribers see each activation with the track it fired from.
#[test]
fn test_subscriber_sees_activations() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);

    let mut e = engine(CombatConfig::default(), hero_20(), FixedDeck::empty());
    e.events_mut().subscribe_kind(EventKind::SkillActivated, move |event| {
        if let CombatEvent::SkillActivated { skill, track, .. } = event {
            sink.borrow_mut().push((*skill, *track));
        }
    });

    e.equip_skill(Rc::new(card(1, SkillType::Attack, 7)), 0).unwrap();
    e.equip_skill(Rc::new(card(2, SkillType::Defense, 7)), 1).unwrap();
    e.submit_word("HELLO", Duration::from_secs(1));
    e.submit_word("HELLO", Duration::from_secs(1));
    while e.activate_next_ready().is_some() {}

    assert_eq!(
        *seen.borrow(),
        vec![(SkillId::new(1), 0), (SkillId::new(2), 1)]
    );
}

/// Skill-granted charge is tagged with its source.
#[test]
fn test_grant_charge_from_skill() {
    let mut e = engine(CombatConfig::default(), hero_20(), FixedDeck::empty());
    e.equip_skill(Rc::new(card(1, SkillType::Attack, 10)), 3).unwrap();
    e.events_mut().take_history();

    let d = e.grant_charge(4, ChargeSource::Skill(SkillId::new(9)));
    assert_eq!(d.for_track(3), 4);
    assert_eq!(
        e.events().history()[0],
        CombatEvent::ChargeGained {
            amount: 4,
            source: ChargeSource::Skill(SkillId::new(9)),
        }
    );
}

/// Activation without an executor still spends the charge.
#[test]
fn test_missing_executor_still_rotates() {
    init_tracing();
    let mut e = CombatEngine::new(
        CombatConfig::default(),
        hero_20(),
        Box::new(FixedDeck::empty()),
        ExecutorRegistry::new(),
    )
    .unwrap();
    e.equip_skill(Rc::new(card(1, SkillType::Utility, 3)), 0).unwrap();
    e.grant_charge(3, ChargeSource::External);

    let report = e.activate_skill(0).unwrap();
    assert_eq!(
        report.outcome,
        ExecutionOutcome::Failed("no executor registered for Utility".to_string())
    );
    assert_eq!(e.tracks()[0].state(), TrackState::Charging);
}

/// A redraw combat keeps every track filled while the deck cycles.
#[test]
fn test_shuffled_deck_cycles_through_combat() {
    let skills: Vec<_> = (0..6)
        .map(|i| card(i, SkillType::ALL[i as usize % 4], 3 + i))
        .collect();
    let config = CombatConfig::default()
        .with_track_count(3)
        .with_post_activation(PostActivationPolicy::RedrawFromDeck);
    let mut e = engine(config, hero_20(), ShuffledDeck::new(skills, 7));

    assert_eq!(e.fill_empty_tracks().unwrap(), 3);
    assert_eq!(e.fill_empty_tracks().unwrap(), 0);

    let mut activations = 0;
    for _ in 0..20 {
        e.submit_word("HELLO", Duration::from_secs(1));
        while let Some(report) = e.activate_next_ready() {
            assert!(matches!(report.rotation, RotationOutcome::Redrawn { .. }));
            activations += 1;
        }
        assert_eq!(e.track_manager().equipped_skills().count(), 3);
        assert_eq!(e.track_manager().skill_source().remaining(), 3);
    }
    assert!(activations > 0);
}

/// Build efficiency follows the equipped skills.
#[test]
fn test_build_efficiency_tracks_equipment() {
    let mut e = engine(CombatConfig::default(), hero_20(), FixedDeck::empty());
    assert_eq!(e.build_efficiency().overall_power, 0.0);

    e.equip_skill(Rc::new(card(1, SkillType::Attack, 10)), 0).unwrap();
    let eff = e.build_efficiency();
    assert!((eff.attack - 20.0).abs() < 1e-9);
    assert!((eff.rotation - 1.0).abs() < 1e-9);

    e.clear_track(0).unwrap();
    assert_eq!(e.build_efficiency().attack, 0.0);
}

/// Reset returns the engine to a fresh combat.
#[test]
fn test_reset_mid_combat() {
    let mut e = engine(CombatConfig::default(), hero_20(), FixedDeck::empty());
    e.equip_skill(Rc::new(card(1, SkillType::Attack, 20)), 0).unwrap();
    e.submit_word("HELLO", Duration::from_secs(1));
    e.submit_word("HELLO", Duration::from_secs(1));

    e.reset();
    assert!(e.tracks().iter().all(|t| t.is_empty() && t.charge() == 0));
    assert_eq!(e.combo().count(), 0);
    assert_eq!(e.combo().max_combo(), 0);
    assert_eq!(e.tracks().len(), 5);
}
