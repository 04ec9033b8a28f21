//! Basic provider implementations.
//!
//! Interior mutability lets the owning game change stats between ticks
//! while the engine holds read-only `Rc` handles.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::core::DeckRng;
use crate::skills::SkillCard;

use super::{DeckProvider, HeroStatProvider, HeroStats, RelicModifiers, RelicProvider, SkillSource};

/// Hero with stats set directly by the game.
#[derive(Debug, Default)]
pub struct StaticHero {
    stats: Cell<HeroStats>,
}

impl StaticHero {
    #[must_use]
    pub fn new(stats: HeroStats) -> Self {
        Self { stats: Cell::new(stats) }
    }

    pub fn set_stats(&self, stats: HeroStats) {
        self.stats.set(stats);
    }

    pub fn set_attack(&self, attack: f64) {
        let mut stats = self.stats.get();
        stats.attack = attack;
        self.stats.set(stats);
    }
}

impl HeroStatProvider for StaticHero {
    fn final_stats(&self) -> HeroStats {
        self.stats.get()
    }
}

/// Deck with a fixed charge efficiency.
#[derive(Debug)]
pub struct FixedEfficiency(Cell<f64>);

impl FixedEfficiency {
    #[must_use]
    pub fn new(efficiency: f64) -> Self {
        Self(Cell::new(efficiency))
    }

    pub fn set(&self, efficiency: f64) {
        self.0.set(efficiency);
    }
}

impl Default for FixedEfficiency {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl DeckProvider for FixedEfficiency {
    fn charge_efficiency(&self) -> f64 {
        self.0.get()
    }
}

/// Draw pile in a fixed order. Recycled skills go to the bottom.
#[derive(Debug, Default)]
pub struct FixedDeck {
    pile: VecDeque<Rc<SkillCard>>,
}

impl FixedDeck {
    /// Create a deck; the first skill is drawn first.
    pub fn new(skills: impl IntoIterator<Item = SkillCard>) -> Self {
        Self {
            pile: skills.into_iter().map(Rc::new).collect(),
        }
    }

    /// A deck with nothing in it.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

impl SkillSource for FixedDeck {
    fn draw(&mut self) -> Option<Rc<SkillCard>> {
        self.pile.pop_front()
    }

    fn recycle(&mut self, skill: Rc<SkillCard>) {
        self.pile.push_back(skill);
    }

    fn remaining(&self) -> usize {
        self.pile.len()
    }
}

/// Shuffled draw pile with a discard pile.
///
/// Recycled skills go to the discard pile. When the draw pile runs out,
/// the discard pile is shuffled back in.
#[derive(Debug)]
pub struct ShuffledDeck {
    draw_pile: Vec<Rc<SkillCard>>,
    discard: Vec<Rc<SkillCard>>,
    rng: DeckRng,
}

impl ShuffledDeck {
    /// Create and shuffle a deck with the given seed.
    pub fn new(skills: impl IntoIterator<Item = SkillCard>, seed: u64) -> Self {
        let mut rng = DeckRng::new(seed);
        let mut draw_pile: Vec<_> = skills.into_iter().map(Rc::new).collect();
        rng.shuffle(&mut draw_pile);
        Self {
            draw_pile,
            discard: Vec::new(),
            rng,
        }
    }

    /// Skills waiting in the discard pile.
    #[must_use]
    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    fn reshuffle(&mut self) {
        tracing::debug!(count = self.discard.len(), "reshuffling discard into draw pile");
        self.draw_pile.append(&mut self.discard);
        self.rng.shuffle(&mut self.draw_pile);
    }
}

impl SkillSource for ShuffledDeck {
    fn draw(&mut self) -> Option<Rc<SkillCard>> {
        if self.draw_pile.is_empty() && !self.discard.is_empty() {
            self.reshuffle();
        }
        self.draw_pile.pop()
    }

    fn recycle(&mut self, skill: Rc<SkillCard>) {
        self.discard.push(skill);
    }

    fn remaining(&self) -> usize {
        self.draw_pile.len() + self.discard.len()
    }
}

/// A plain list of active relics.
#[derive(Debug, Default)]
pub struct RelicSet {
    relics: RefCell<Vec<RelicModifiers>>,
}

impl RelicSet {
    #[must_use]
    pub fn new(relics: Vec<RelicModifiers>) -> Self {
        Self { relics: RefCell::new(relics) }
    }

    pub fn add(&self, relic: RelicModifiers) {
        self.relics.borrow_mut().push(relic);
    }

    /// Remove every relic with the given name. Returns how many were removed.
    pub fn remove(&self, name: &str) -> usize {
        let mut relics = self.relics.borrow_mut();
        let before = relics.len();
        relics.retain(|r| r.name != name);
        before - relics.len()
    }
}

impl RelicProvider for RelicSet {
    fn active_relics(&self) -> Vec<RelicModifiers> {
        self.relics.borrow().clone()
    }
}
