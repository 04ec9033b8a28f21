//! # typecharge
//!
//! Charge-based combat resolution for typing-driven roguelikes.
//!
//! Typed words become damage and charge. Charge fills a fixed set of skill
//! tracks; full tracks fire their skill and then rotate.
//!
//! ## Design Principles
//!
//! 1. **Explicit Dependencies**: Hero stats, deck efficiency and relics are
//!    injected at construction. No global state.
//!
//! 2. **Explicit Policies**: Charge distribution, overflow handling and
//!    post-activation rotation are configuration, not hidden behavior.
//!
//! 3. **Synchronous Events**: State changes are reported on an observer
//!    list in emission order, decoupled from any renderer.
//!
//! ## Modules
//!
//! - `core`: Configuration and deterministic RNG
//! - `skills`: Skill cards, types and effect descriptors
//! - `events`: Combat events and the event bus
//! - `providers`: Hero/deck/relic providers, skill sources, effect executors
//! - `combat`: Combo tracking, word processing, engine facade
//! - `tracks`: Skill track state machine and manager
//! - `efficiency`: Build quality metrics for display

pub mod core;
pub mod error;
pub mod skills;
pub mod events;
pub mod providers;
pub mod combat;
pub mod tracks;
pub mod efficiency;

// Re-export commonly used types
pub use crate::core::{
    CombatConfig, DeckRng, DeckRngState, DistributionPolicy, OverflowPolicy, PostActivationPolicy,
};

pub use crate::error::{CombatError, Result};

pub use crate::skills::{EffectDescriptor, ParamKey, ParamValue, Params, SkillCard, SkillId, SkillType};

pub use crate::events::{ChargeSource, CombatEvent, EventBus, EventKind, SubscriberId};

pub use crate::providers::{
    CombatProviders, DeckProvider, EffectExecutor, ExecutionOutcome, ExecutorRegistry,
    HeroStatProvider, HeroStats, RelicModifiers, RelicProvider, SkillSource,
    FixedDeck, FixedEfficiency, RelicSet, ShuffledDeck, StaticHero,
};

pub use crate::combat::{
    ChargeAccumulator, CombatEngine, ComboState, ComboTracker, TypingResult, WordOutcome,
};

pub use crate::tracks::{
    ActivationReport, ChargeDistribution, NextActivation, RotationOutcome,
    SkillTrack, SkillTrackManager, TrackState,
};

pub use crate::efficiency::{compute_build_efficiency, BuildEfficiency, EfficiencyCalculator};
