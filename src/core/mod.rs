//! Core engine types: configuration and deterministic RNG.

pub mod config;
pub mod rng;

pub use config::{CombatConfig, DistributionPolicy, OverflowPolicy, PostActivationPolicy};
pub use rng::{DeckRng, DeckRngState};
