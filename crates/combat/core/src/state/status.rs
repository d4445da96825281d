use arrayvec::ArrayVec;

use crate::config::EngineConfig;
use crate::ids::StatusId;
use crate::registry::StatusEffectDefinition;

/// One active effect on a combatant. `remaining >= 1` and `stacks >= 1`
/// while the instance is held.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusInstance {
    pub effect: StatusId,
    pub remaining: u32,
    pub stacks: u32,
}

/// What [`StatusEffects::apply`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApplyOutcome {
    /// New instance with one stack.
    Applied,
    /// Existing stackable instance gained a stack; duration refreshed.
    Stacked(u32),
    /// Existing non-stackable instance had its duration refreshed.
    Refreshed,
    /// No free slot.
    Rejected,
}

/// Ordered collection of active effects, in application order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    active: ArrayVec<StatusInstance, { EngineConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn apply(&mut self, definition: &StatusEffectDefinition, duration: u32) -> ApplyOutcome {
        let duration = duration.max(1);
        if let Some(existing) = self.active.iter_mut().find(|s| s.effect == definition.id) {
            existing.remaining = duration;
            if definition.stackable {
                existing.stacks = existing.stacks.saturating_add(1);
                return ApplyOutcome::Stacked(existing.stacks);
            }
            return ApplyOutcome::Refreshed;
        }

        let instance = StatusInstance {
            effect: definition.id.clone(),
            remaining: duration,
            stacks: 1,
        };
        match self.active.try_push(instance) {
            Ok(()) => ApplyOutcome::Applied,
            Err(_) => ApplyOutcome::Rejected,
        }
    }

    pub fn get(&self, effect: &str) -> Option<&StatusInstance> {
        self.active.iter().find(|s| s.effect.as_str() == effect)
    }

    pub fn contains(&self, effect: &str) -> bool {
        self.get(effect).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusInstance> {
        self.active.iter()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Decrements every duration and drops the instances that reach zero.
    ///
    /// Returns the removed effects in application order.
    pub fn decay(&mut self) -> Vec<StatusId> {
        let mut expired = Vec::new();
        self.active.retain(|instance| {
            instance.remaining = instance.remaining.saturating_sub(1);
            if instance.remaining == 0 {
                expired.push(instance.effect.clone());
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::EffectCategory;

    #[test]
    fn stackable_effects_gain_stacks_and_refresh() {
        let poison = StatusEffectDefinition::new("poison", "Poison", EffectCategory::Debuff).stackable();
        let mut effects = StatusEffects::default();

        assert_eq!(effects.apply(&poison, 2), ApplyOutcome::Applied);
        effects.decay();
        assert_eq!(effects.apply(&poison, 3), ApplyOutcome::Stacked(2));

        let instance = effects.get("poison").unwrap();
        assert_eq!((instance.remaining, instance.stacks), (3, 2));
    }

    #[test]
    fn non_stackable_effects_only_refresh() {
        let stun = StatusEffectDefinition::new("stun", "Stun", EffectCategory::Debuff).preventing_action();
        let mut effects = StatusEffects::default();

        effects.apply(&stun, 1);
        assert_eq!(effects.apply(&stun, 2), ApplyOutcome::Refreshed);
        assert_eq!(effects.get("stun").unwrap().stacks, 1);
        assert_eq!(effects.get("stun").unwrap().remaining, 2);
    }

    #[test]
    fn full_slots_reject_new_effects() {
        let mut effects = StatusEffects::default();
        for i in 0..EngineConfig::MAX_STATUS_EFFECTS {
            let def = StatusEffectDefinition::new(format!("e{i}"), "E", EffectCategory::Buff);
            assert_eq!(effects.apply(&def, 1), ApplyOutcome::Applied);
        }
        let extra = StatusEffectDefinition::new("extra", "Extra", EffectCategory::Buff);
        assert_eq!(effects.apply(&extra, 1), ApplyOutcome::Rejected);
    }

    #[test]
    fn decay_removes_expired_in_order() {
        let a = StatusEffectDefinition::new("a", "A", EffectCategory::Buff);
        let b = StatusEffectDefinition::new("b", "B", EffectCategory::Buff);
        let mut effects = StatusEffects::default();
        effects.apply(&a, 1);
        effects.apply(&b, 2);

        assert_eq!(effects.decay(), vec![StatusId::from("a")]);
        assert_eq!(effects.decay(), vec![StatusId::from("b")]);
        assert!(effects.is_empty());
    }
}
