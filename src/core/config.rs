//! Combat configuration.
//!
//! Games configure the engine at startup with a `CombatConfig`:
//! - Track count and combo tuning
//! - How typed charge is spread across tracks (`DistributionPolicy`)
//! - What a track does after its skill fires (`PostActivationPolicy`)
//! - What happens to charge a full track cannot hold (`OverflowPolicy`)
//!
//! The config is `serde` friendly; missing fields take their defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CombatError, Result};

/// How charge gain is spread across `Charging` tracks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistributionPolicy {
    /// Each distribution goes entirely to the next charging track after
    /// the cursor, then the cursor moves past it.
    #[default]
    RoundRobin,
    /// Every charging track receives the full amount.
    Broadcast,
}

/// What a track does after its skill activates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostActivationPolicy {
    /// Keep the skill equipped and start charging it again.
    #[default]
    RechargeInPlace,
    /// Return the skill to the skill source and equip the next draw.
    RedrawFromDeck,
}

/// What happens to charge that a track cannot hold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Clamp at the skill cost and drop the excess.
    #[default]
    Discard,
    /// Pass the excess on to the next charging track (ascending index,
    /// wrapping). Whatever no track can absorb is dropped.
    Redirect,
}

/// Complete combat configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Number of skill tracks (must be positive).
    pub track_count: usize,

    /// Seconds a combo survives without a perfect input.
    pub combo_window_secs: f64,

    /// Damage multiplier added per combo step.
    pub combo_step_bonus: f64,

    /// Typing-speed baseline: a word is perfect when typed in at most
    /// `len × seconds_per_character` seconds.
    pub seconds_per_character: f64,

    /// Charge distribution across charging tracks.
    pub distribution: DistributionPolicy,

    /// Track behavior after activation.
    pub post_activation: PostActivationPolicy,

    /// Handling of excess charge on full tracks.
    pub overflow: OverflowPolicy,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            track_count: 5,
            combo_window_secs: 3.0,
            combo_step_bonus: 0.10,
            seconds_per_character: 0.30,
            distribution: DistributionPolicy::default(),
            post_activation: PostActivationPolicy::default(),
            overflow: OverflowPolicy::default(),
        }
    }
}

impl CombatConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the track count.
    #[must_use]
    pub fn with_track_count(mut self, count: usize) -> Self {
        self.track_count = count;
        self
    }

    /// Set the combo window in seconds.
    #[must_use]
    pub fn with_combo_window(mut self, secs: f64) -> Self {
        self.combo_window_secs = secs;
        self
    }

    /// Set the per-step combo bonus.
    #[must_use]
    pub fn with_combo_step_bonus(mut self, bonus: f64) -> Self {
        self.combo_step_bonus = bonus;
        self
    }

    /// Set the perfect-input baseline.
    #[must_use]
    pub fn with_seconds_per_character(mut self, secs: f64) -> Self {
        self.seconds_per_character = secs;
        self
    }

    /// Set the distribution policy.
    #[must_use]
    pub fn with_distribution(mut self, policy: DistributionPolicy) -> Self {
        self.distribution = policy;
        self
    }

    /// Set the post-activation policy.
    #[must_use]
    pub fn with_post_activation(mut self, policy: PostActivationPolicy) -> Self {
        self.post_activation = policy;
        self
    }

    /// Set the overflow policy.
    #[must_use]
    pub fn with_overflow(mut self, policy: OverflowPolicy) -> Self {
        self.overflow = policy;
        self
    }

    /// Combo window as a `Duration`. Values `validate` would reject
    /// collapse to zero.
    #[must_use]
    pub fn combo_window(&self) -> Duration {
        Duration::try_from_secs_f64(self.combo_window_secs).unwrap_or(Duration::ZERO)
    }

    /// Check the configuration for values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.track_count == 0 {
            return Err(CombatError::InvalidConfig(
                "track_count must be at least 1".to_string(),
            ));
        }
        if !self.combo_window_secs.is_finite() || self.combo_window_secs < 0.0 {
            return Err(CombatError::InvalidConfig(format!(
                "combo_window_secs must be a non-negative number, got {}",
                self.combo_window_secs
            )));
        }
        if !self.combo_step_bonus.is_finite() || self.combo_step_bonus < 0.0 {
            return Err(CombatError::InvalidConfig(format!(
                "combo_step_bonus must be a non-negative number, got {}",
                self.combo_step_bonus
            )));
        }
        if !self.seconds_per_character.is_finite() || self.seconds_per_character <= 0.0 {
            return Err(CombatError::InvalidConfig(format!(
                "seconds_per_character must be positive, got {}",
                self.seconds_per_character
            )));
        }
        Ok(())
    }
}
