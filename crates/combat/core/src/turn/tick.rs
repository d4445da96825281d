//! Start-of-turn status processing.

use crate::ids::StatusId;
use crate::registry::Registry;
use crate::state::Combatant;

/// What happened when a combatant's effects ticked.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickReport {
    /// Damage dealt by each ticking effect, after clamping to remaining health.
    pub damage: Vec<(StatusId, u32)>,
    /// Healing restored by each ticking effect, after clamping to max health.
    pub healing: Vec<(StatusId, u32)>,
    /// Effects removed after this pass.
    pub expired: Vec<StatusId>,
    /// Effects referenced by the combatant but missing from the registry.
    pub unknown: Vec<StatusId>,
    /// The combatant may not act this turn.
    pub prevented: bool,
    /// The ticks reduced health to zero.
    pub defeated: bool,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.damage.is_empty()
            && self.healing.is_empty()
            && self.expired.is_empty()
            && self.unknown.is_empty()
            && !self.prevented
    }
}

/// Applies every active effect of `combatant` once, then decays durations.
///
/// Damage and healing scale with stacks. Once health reaches zero the
/// remaining effects no longer apply, though durations still decay. Action prevention is judged before
/// expired effects are removed, so an effect ticking for the last time still
/// costs the bearer this turn.
pub fn process_turn_start(combatant: &mut Combatant, registry: &Registry) -> TickReport {
    let mut report = TickReport {
        prevented: combatant.prevents_action(registry),
        ..TickReport::default()
    };

    let was_alive = combatant.is_alive();
    let instances: Vec<(StatusId, u32)> = combatant
        .statuses
        .iter()
        .map(|instance| (instance.effect.clone(), instance.stacks))
        .collect();

    for (effect, stacks) in instances {
        let Some(definition) = registry.status(effect.as_str()) else {
            report.unknown.push(effect);
            continue;
        };
        if !combatant.is_alive() {
            continue;
        }

        if let Some(per_tick) = definition.damage_per_tick {
            let dealt = combatant.health.deplete(per_tick.saturating_mul(stacks));
            report.damage.push((effect.clone(), dealt));
        }
        if let Some(per_tick) = definition.heal_per_tick {
            let restored = combatant.health.restore(per_tick.saturating_mul(stacks));
            report.healing.push((effect.clone(), restored));
        }
    }

    report.expired = combatant.statuses.decay();
    report.defeated = was_alive && !combatant.is_alive();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::CombatantId;
    use crate::registry::{EffectCategory, StatusEffectDefinition};
    use crate::state::Faction;
    use crate::stats::{ResourceMeter, StatBlock};

    fn registry() -> Registry {
        Registry::builder()
            .status(StatusEffectDefinition::new("burn", "Burn", EffectCategory::Debuff).with_damage_per_tick(8))
            .status(
                StatusEffectDefinition::new("poison", "Poison", EffectCategory::Debuff)
                    .with_damage_per_tick(3)
                    .stackable(),
            )
            .status(StatusEffectDefinition::new("regen", "Regen", EffectCategory::Buff).with_heal_per_tick(5))
            .status(StatusEffectDefinition::new("stun", "Stun", EffectCategory::Debuff).preventing_action())
            .build()
            .unwrap()
    }

    fn dummy() -> Combatant {
        Combatant::new(CombatantId(0), "Dummy", Faction::Enemy, StatBlock::uniform(5.0))
            .with_health(ResourceMeter::full(100))
    }

    #[test]
    fn burn_ticks_exactly_three_times() {
        let registry = registry();
        let mut target = dummy();
        target.statuses.apply(registry.status("burn").unwrap(), 3);

        let mut total = 0;
        for turn in 1..=3 {
            let report = process_turn_start(&mut target, &registry);
            assert_eq!(report.damage, vec![(StatusId::from("burn"), 8)]);
            total += 8;
            assert_eq!(report.expired.is_empty(), turn < 3);
        }
        assert_eq!(total, 24);
        assert_eq!(target.health.current(), 76);

        let fourth = process_turn_start(&mut target, &registry);
        assert!(fourth.damage.is_empty());
        assert_eq!(target.health.current(), 76);
    }

    #[test]
    fn stacks_multiply_tick_damage() {
        let registry = registry();
        let poison = registry.status("poison").unwrap().clone();
        let mut target = dummy();
        target.statuses.apply(&poison, 2);
        target.statuses.apply(&poison, 2);

        let report = process_turn_start(&mut target, &registry);
        assert_eq!(report.damage, vec![(StatusId::from("poison"), 6)]);
    }

    #[test]
    fn healing_is_capped_at_max() {
        let registry = registry();
        let mut target = dummy().with_health(ResourceMeter::new(98, 100));
        target.statuses.apply(registry.status("regen").unwrap(), 2);

        let report = process_turn_start(&mut target, &registry);
        assert_eq!(report.healing, vec![(StatusId::from("regen"), 2)]);
        assert_eq!(target.health.current(), 100);
    }

    #[test]
    fn stun_prevents_action_on_its_final_tick() {
        let registry = registry();
        let mut target = dummy();
        target.statuses.apply(registry.status("stun").unwrap(), 1);

        let report = process_turn_start(&mut target, &registry);
        assert!(report.prevented);
        assert_eq!(report.expired, vec![StatusId::from("stun")]);
        assert!(!process_turn_start(&mut target, &registry).prevented);
    }

    #[test]
    fn lethal_tick_marks_defeat_and_floors_at_zero() {
        let registry = registry();
        let mut target = dummy().with_health(ResourceMeter::new(5, 100));
        target.statuses.apply(registry.status("burn").unwrap(), 2);

        let report = process_turn_start(&mut target, &registry);
        assert_eq!(report.damage, vec![(StatusId::from("burn"), 5)]);
        assert!(report.defeated);
        assert_eq!(target.health.current(), 0);
    }

    #[test]
    fn healing_after_a_lethal_tick_does_not_revive() {
        let registry = registry();
        let mut target = dummy().with_health(ResourceMeter::new(5, 100));
        target.statuses.apply(registry.status("burn").unwrap(), 2);
        target.statuses.apply(registry.status("regen").unwrap(), 2);

        let report = process_turn_start(&mut target, &registry);
        assert_eq!(report.damage, vec![(StatusId::from("burn"), 5)]);
        assert!(report.healing.is_empty());
        assert!(report.defeated);
        assert!(!target.is_alive());
        assert!(report.expired.is_empty());
        assert_eq!(target.statuses.iter().count(), 2);
    }
}
