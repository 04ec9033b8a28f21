//! Effect executors keyed by skill type.
//!
//! Executors apply gameplay effects (damage, buffs, time scale, input
//! assistance). From the engine's side they are fire-and-forget: only a
//! success/failure signal comes back.

use rustc_hash::FxHashMap;

use crate::skills::{SkillCard, SkillType};

/// Result of executing a skill's effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Effect applied.
    Applied,
    /// Effect could not be applied (e.g., no valid target).
    Failed(String),
}

impl ExecutionOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, ExecutionOutcome::Applied)
    }
}

/// Applies a skill's effect to the game.
pub trait EffectExecutor {
    /// Execute `skill` fired from track `track`.
    fn execute(&mut self, skill: &SkillCard, track: usize) -> ExecutionOutcome;
}

impl<F> EffectExecutor for F
where
    F: FnMut(&SkillCard, usize) -> ExecutionOutcome,
{
    fn execute(&mut self, skill: &SkillCard, track: usize) -> ExecutionOutcome {
        self(skill, track)
    }
}

/// Executors registered per skill type.
#[derive(Default)]
pub struct ExecutorRegistry {
    executors: FxHashMap<SkillType, Box<dyn EffectExecutor>>,
}

impl ExecutorRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an executor for a skill type, replacing any previous one.
    pub fn register(&mut self, skill_type: SkillType, executor: impl EffectExecutor + 'static) {
        self.executors.insert(skill_type, Box::new(executor));
    }

    /// Register an executor (builder pattern).
    #[must_use]
    pub fn with(mut self, skill_type: SkillType, executor: impl EffectExecutor + 'static) -> Self {
        self.register(skill_type, executor);
        self
    }

    /// Is there an executor for this type?
    #[must_use]
    pub fn has(&self, skill_type: SkillType) -> bool {
        self.executors.contains_key(&skill_type)
    }

    /// Run the executor for the skill's type.
    pub fn execute(&mut self, skill: &SkillCard, track: usize) -> ExecutionOutcome {
        match self.executors.get_mut(&skill.skill_type) {
            Some(executor) => executor.execute(skill, track),
            None => ExecutionOutcome::Failed(format!(
                "no executor registered for {:?}",
                skill.skill_type
            )),
        }
    }
}

impl std::fmt::Debug for ExecutorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutorRegistry")
            .field("types", &self.executors.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::skills::SkillId;

    #[test]
    fn test_dispatch_by_type() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&hits);
        let mut registry = ExecutorRegistry::new().with(
            SkillType::Attack,
            move |skill: &SkillCard, track: usize| {
                sink.borrow_mut().push((skill.id, track));
                ExecutionOutcome::Applied
            },
        );

        let strike = SkillCard::new(SkillId::new(1), "Strike", SkillType::Attack, 5);
        assert_eq!(registry.execute(&strike, 2), ExecutionOutcome::Applied);
        assert_eq!(*hits.borrow(), vec![(SkillId::new(1), 2)]);
    }

    #[test]
    fn test_missing_executor_fails() {
        let mut registry = ExecutorRegistry::new();
        let ward = SkillCard::new(SkillId::new(2), "Ward", SkillType::Defense, 5);

        assert!(!registry.has(SkillType::Defense));
        let outcome = registry.execute(&ward, 0);
        assert!(!outcome.is_applied());
    }
}
