//! Skill track manager.
//!
//! Owns the fixed array of tracks and is the only thing that mutates them.
//! Every mutating operation reports what changed on the caller's
//! [`EventBus`].
//!
//! ## Policies
//!
//! - **Distribution** (`DistributionPolicy`): round-robin hands each charge
//!   gain to the next charging track after the cursor; broadcast gives every
//!   charging track the full amount.
//! - **Overflow** (`OverflowPolicy`): under round-robin, charge a track
//!   cannot hold is either dropped or passed to the next charging tracks.
//!   Broadcast always drops overflow, since every track already got the
//!   full amount.
//! - **Post-activation** (`PostActivationPolicy`): the fired skill either
//!   recharges in place or goes back to the skill source while the track
//!   takes the next draw.

use std::rc::Rc;

use smallvec::SmallVec;

use crate::core::{CombatConfig, DistributionPolicy, OverflowPolicy, PostActivationPolicy};
use crate::error::{CombatError, Result};
use crate::events::{ChargeSource, CombatEvent, EventBus};
use crate::providers::{ExecutionOutcome, ExecutorRegistry, SkillSource};
use crate::skills::{SkillCard, SkillId};

use super::track::{SkillTrack, TrackState};

/// Where one distribution of charge ended up.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChargeDistribution {
    /// Amount offered.
    pub amount: u32,
    /// `(track index, charge absorbed)`, in the order it was applied.
    pub allocations: SmallVec<[(usize, u32); 4]>,
    /// Charge no track could hold.
    pub discarded: u32,
}

impl ChargeDistribution {
    fn new(amount: u32) -> Self {
        Self {
            amount,
            ..Self::default()
        }
    }

    /// Total charge absorbed by tracks.
    #[must_use]
    pub fn absorbed(&self) -> u32 {
        self.allocations.iter().map(|&(_, c)| c).sum()
    }

    /// Charge absorbed by one track.
    #[must_use]
    pub fn for_track(&self, index: usize) -> u32 {
        self.allocations
            .iter()
            .filter(|&&(i, _)| i == index)
            .map(|&(_, c)| c)
            .sum()
    }
}

/// The next track that can fire.
#[derive(Clone, Debug, PartialEq)]
pub struct NextActivation {
    pub index: usize,
    pub skill: Rc<SkillCard>,
    /// Whether the track's charge covers the skill cost.
    pub affordable: bool,
}

/// What rotation did to a track.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RotationOutcome {
    /// The same skill is charging again.
    Recharging(SkillId),
    /// The old skill (if any) went back to the source and a new one was equipped.
    Redrawn {
        returned: Option<SkillId>,
        drawn: SkillId,
    },
    /// The track is empty.
    Vacant,
}

/// Result of a successful activation.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivationReport {
    pub index: usize,
    pub skill: Rc<SkillCard>,
    /// What the effect executor reported.
    pub outcome: ExecutionOutcome,
    /// What happened to the track afterwards.
    pub rotation: RotationOutcome,
}

/// Owns and orchestrates the skill tracks.
pub struct SkillTrackManager {
    tracks: SmallVec<[SkillTrack; 8]>,
    distribution: DistributionPolicy,
    overflow: OverflowPolicy,
    post_activation: PostActivationPolicy,
    source: Box<dyn SkillSource>,
    executors: ExecutorRegistry,
    /// Next track index round-robin distribution looks at.
    cursor: usize,
}

impl SkillTrackManager {
    /// Create `config.track_count` empty tracks.
    pub fn new(
        config: &CombatConfig,
        source: Box<dyn SkillSource>,
        executors: ExecutorRegistry,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tracks: (0..config.track_count).map(SkillTrack::new).collect(),
            distribution: config.distribution,
            overflow: config.overflow,
            post_activation: config.post_activation,
            source,
            executors,
            cursor: 0,
        })
    }

    /// All tracks, in index order.
    #[must_use]
    pub fn tracks(&self) -> &[SkillTrack] {
        &self.tracks
    }

    #[must_use]
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn track(&self, index: usize) -> Result<&SkillTrack> {
        self.check_index(index)?;
        Ok(&self.tracks[index])
    }

    /// Skills currently equipped, in track order.
    pub fn equipped_skills(&self) -> impl Iterator<Item = &SkillCard> + '_ {
        self.tracks.iter().filter_map(|t| t.skill().map(|s| s.as_ref()))
    }

    #[must_use]
    pub fn skill_source(&self) -> &dyn SkillSource {
        self.source.as_ref()
    }

    pub fn executors_mut(&mut self) -> &mut ExecutorRegistry {
        &mut self.executors
    }

    #[must_use]
    pub fn post_activation(&self) -> PostActivationPolicy {
        self.post_activation
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.tracks.len() {
            Ok(())
        } else {
            Err(CombatError::InvalidIndex {
                index,
                track_count: self.tracks.len(),
            })
        }
    }

    /// Equip a skill onto an empty track.
    ///
    /// Fails with `SlotOccupied` if the track holds a skill; clear it first.
    pub fn equip_skill_to_track(
        &mut self,
        skill: Rc<SkillCard>,
        index: usize,
        events: &mut EventBus,
    ) -> Result<()> {
        self.check_index(index)?;
        self.equip_at(index, skill, events)
    }

    fn equip_at(&mut self, index: usize, skill: Rc<SkillCard>, events: &mut EventBus) -> Result<()> {
        let track = &mut self.tracks[index];
        let id = skill.id;
        track.equip(skill)?;
        tracing::debug!(track = index, skill = %id, state = %track.state(), "skill equipped");

        events.emit(CombatEvent::ChargeUpdated {
            track: index,
            current: 0,
            max: track.max_charge(),
        });
        if track.is_ready() {
            events.emit(CombatEvent::TrackCharged { track: index, skill: id });
        }
        Ok(())
    }

    /// Distribute `amount` charge across charging tracks per the configured
    /// policies.
    pub fn start_charging(
        &mut self,
        amount: u32,
        source: ChargeSource,
        events: &mut EventBus,
    ) -> ChargeDistribution {
        let mut dist = ChargeDistribution::new(amount);
        if amount == 0 {
            return dist;
        }
        events.emit(CombatEvent::ChargeGained { amount, source });

        match self.distribution {
            DistributionPolicy::RoundRobin => self.distribute_round_robin(amount, &mut dist, events),
            DistributionPolicy::Broadcast => self.distribute_broadcast(amount, &mut dist, events),
        }

        if dist.discarded > 0 {
            tracing::debug!(discarded = dist.discarded, "charge overflow discarded");
        }
        dist
    }

    fn distribute_round_robin(
        &mut self,
        amount: u32,
        dist: &mut ChargeDistribution,
        events: &mut EventBus,
    ) {
        let n = self.tracks.len();
        let Some(target) = (0..n)
            .map(|offset| (self.cursor + offset) % n)
            .find(|&i| self.tracks[i].state() == TrackState::Charging)
        else {
            dist.discarded = amount;
            return;
        };
        self.cursor = (target + 1) % n;

        let mut leftover = self.charge_track(target, amount, dist, events);
        if self.overflow == OverflowPolicy::Redirect {
            for offset in 1..n {
                if leftover == 0 {
                    break;
                }
                let i = (target + offset) % n;
                if self.tracks[i].state() == TrackState::Charging {
                    leftover = self.charge_track(i, leftover, dist, events);
                }
            }
        }
        dist.discarded = leftover;
    }

    fn distribute_broadcast(
        &mut self,
        amount: u32,
        dist: &mut ChargeDistribution,
        events: &mut EventBus,
    ) {
        let mut any = false;
        for i in 0..self.tracks.len() {
            if self.tracks[i].state() == TrackState::Charging {
                any = true;
                let leftover = self.charge_track(i, amount, dist, events);
                dist.discarded += leftover;
            }
        }
        if !any {
            dist.discarded = amount;
        }
    }

    /// Charge one track, emit what changed, and return the leftover.
    fn charge_track(
        &mut self,
        index: usize,
        amount: u32,
        dist: &mut ChargeDistribution,
        events: &mut EventBus,
    ) -> u32 {
        let track = &mut self.tracks[index];
        let leftover = track.add_charge(amount);
        let gained = amount - leftover;
        if gained == 0 {
            return leftover;
        }
        dist.allocations.push((index, gained));
        events.emit(CombatEvent::ChargeUpdated {
            track: index,
            current: track.charge(),
            max: track.max_charge(),
        });
        if track.is_ready() {
            if let Some(skill) = track.skill() {
                tracing::debug!(track = index, skill = %skill.id, "track ready");
                events.emit(CombatEvent::TrackCharged {
                    track: index,
                    skill: skill.id,
                });
            }
        }
        leftover
    }

    /// The lowest-index `Ready` track, if any.
    #[must_use]
    pub fn get_next_skill_activation(&self) -> Option<NextActivation> {
        self.tracks.iter().find(|t| t.is_ready()).and_then(|t| {
            t.skill().map(|skill| NextActivation {
                index: t.index(),
                skill: Rc::clone(skill),
                affordable: t.charge() >= skill.cost,
            })
        })
    }

    /// Fire the skill on a `Ready` track, run its effect, then rotate.
    ///
    /// The charge is spent and the track rotates whether or not the
    /// executor succeeds.
    pub fn activate_skill(&mut self, index: usize, events: &mut EventBus) -> Result<ActivationReport> {
        self.check_index(index)?;
        let skill = self.tracks[index].begin_activation()?;
        tracing::info!(track = index, skill = %skill.id, kind = ?skill.skill_type, "activating skill");

        let outcome = self.executors.execute(&skill, index);
        if let ExecutionOutcome::Failed(reason) = &outcome {
            tracing::warn!(track = index, skill = %skill.id, %reason, "skill effect failed");
        }
        events.emit(CombatEvent::SkillActivated {
            skill: skill.id,
            skill_type: skill.skill_type,
            track: index,
        });

        let rotation = self.rotate(index, events)?;
        Ok(ActivationReport {
            index,
            skill,
            outcome,
            rotation,
        })
    }

    /// Apply the post-activation policy to a track.
    ///
    /// Under `RechargeInPlace` an equipped skill restarts from zero charge.
    /// Under `RedrawFromDeck` the equipped skill (if any) returns to the
    /// skill source and the next draw is equipped.
    pub fn rotate_skill_track(&mut self, index: usize, events: &mut EventBus) -> Result<RotationOutcome> {
        self.check_index(index)?;
        self.rotate(index, events)
    }

    fn rotate(&mut self, index: usize, events: &mut EventBus) -> Result<RotationOutcome> {
        match self.post_activation {
            PostActivationPolicy::RechargeInPlace => {
                let track = &mut self.tracks[index];
                let Some(id) = track.skill().map(|s| s.id) else {
                    return Ok(RotationOutcome::Vacant);
                };
                track.recharge();
                events.emit(CombatEvent::ChargeUpdated {
                    track: index,
                    current: 0,
                    max: track.max_charge(),
                });
                if track.is_ready() {
                    events.emit(CombatEvent::TrackCharged { track: index, skill: id });
                }
                tracing::debug!(track = index, skill = %id, "recharging in place");
                Ok(RotationOutcome::Recharging(id))
            }
            PostActivationPolicy::RedrawFromDeck => {
                let returned = self.tracks[index].clear();
                let returned_id = returned.as_ref().map(|s| s.id);
                if let Some(skill) = returned {
                    self.source.recycle(skill);
                }

                match self.source.draw() {
                    Some(next) => {
                        let drawn = next.id;
                        self.equip_at(index, next, events)?;
                        tracing::debug!(track = index, ?returned_id, skill = %drawn, "redrawn");
                        Ok(RotationOutcome::Redrawn {
                            returned: returned_id,
                            drawn,
                        })
                    }
                    None => {
                        if returned_id.is_some() {
                            events.emit(CombatEvent::ChargeUpdated {
                                track: index,
                                current: 0,
                                max: 0,
                            });
                        }
                        tracing::debug!(track = index, "skill source exhausted, track vacant");
                        Ok(RotationOutcome::Vacant)
                    }
                }
            }
        }
    }

    /// Force a track back to `Empty`, returning the skill it held.
    ///
    /// Safe in any state; clearing an empty track changes nothing and emits
    /// nothing.
    pub fn clear_track(&mut self, index: usize, events: &mut EventBus) -> Result<Option<Rc<SkillCard>>> {
        self.check_index(index)?;
        let removed = self.tracks[index].clear();
        if let Some(skill) = &removed {
            tracing::debug!(track = index, skill = %skill.id, "track cleared");
            events.emit(CombatEvent::ChargeUpdated {
                track: index,
                current: 0,
                max: 0,
            });
        }
        Ok(removed)
    }

    /// Draw from the skill source into every empty track, lowest index
    /// first. Returns how many tracks were filled.
    pub fn fill_empty_tracks(&mut self, events: &mut EventBus) -> Result<usize> {
        let mut filled = 0;
        for index in 0..self.tracks.len() {
            if !self.tracks[index].is_empty() {
                continue;
            }
            let Some(skill) = self.source.draw() else {
                break;
            };
            self.equip_at(index, skill, events)?;
            filled += 1;
        }
        Ok(filled)
    }

    /// Clear every track and rewind the round-robin cursor.
    pub fn reset(&mut self, events: &mut EventBus) {
        for index in 0..self.tracks.len() {
            if let Some(skill) = self.tracks[index].clear() {
                tracing::trace!(track = index, skill = %skill.id, "cleared on reset");
                events.emit(CombatEvent::ChargeUpdated {
                    track: index,
                    current: 0,
                    max: 0,
                });
            }
        }
        self.cursor = 0;
    }
}

impl std::fmt::Debug for SkillTrackManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillTrackManager")
            .field("tracks", &self.tracks)
            .field("distribution", &self.distribution)
            .field("overflow", &self.overflow)
            .field("post_activation", &self.post_activation)
            .field("source_remaining", &self.source.remaining())
            .field("executors", &self.executors)
            .field("cursor", &self.cursor)
            .finish()
    }
}
