//! Skill availability checks.

use crate::registry::{Registry, SkillDefinition};
use crate::state::Combatant;

use super::error::ActionError;

/// Checks that `actor` may use `skill` right now.
///
/// Passing this check guarantees the resolution pipeline will not reject the
/// skill for cost, health or cooldown reasons.
pub fn check_skill(actor: &Combatant, skill: &SkillDefinition) -> Result<(), ActionError> {
    if !actor.is_alive() {
        return Err(ActionError::ActorDefeated(actor.id));
    }
    if !skill.is_basic_attack() && !actor.knows(skill.id.as_str()) {
        return Err(ActionError::SkillNotKnown {
            actor: actor.id,
            skill: skill.id.clone(),
        });
    }
    if skill.resource_cost > actor.resource.current() {
        return Err(ActionError::InsufficientResource {
            skill: skill.id.clone(),
            required: skill.resource_cost,
            available: actor.resource.current(),
        });
    }
    if skill.health_cost > 0 && actor.health.current() <= skill.health_cost {
        return Err(ActionError::InsufficientHealth {
            skill: skill.id.clone(),
            cost: skill.health_cost,
            current: actor.health.current(),
        });
    }
    let remaining = actor.cooldowns.remaining(skill.id.as_str());
    if remaining > 0 {
        return Err(ActionError::OnCooldown {
            skill: skill.id.clone(),
            remaining,
        });
    }
    Ok(())
}

pub fn can_use_skill(actor: &Combatant, skill: &SkillDefinition) -> bool {
    check_skill(actor, skill).is_ok()
}

/// Skills `actor` can use this turn: the basic attack first, then known skills
/// in the order the actor lists them. Ids missing from the registry are skipped.
pub fn usable_skills<'r>(actor: &Combatant, registry: &'r Registry) -> Vec<&'r SkillDefinition> {
    let basic = registry.basic_attack();
    let known = actor
        .skills
        .iter()
        .filter(|id| id.as_str() != basic.id.as_str())
        .filter_map(|id| registry.skill(id.as_str()));

    std::iter::once(basic)
        .chain(known)
        .filter(|skill| can_use_skill(actor, skill))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Formula;
    use crate::ids::{CombatantId, SkillId};
    use crate::registry::TargetingMode;
    use crate::state::Faction;
    use crate::stats::{ResourceMeter, StatBlock};

    fn registry() -> Registry {
        Registry::builder()
            .skill(
                SkillDefinition::new("fireball", "Fireball", TargetingMode::SingleEnemy)
                    .with_damage(Formula::parse("intelligence * 2").unwrap())
                    .with_cost(20),
            )
            .skill(
                SkillDefinition::new("blood_pact", "Blood Pact", TargetingMode::SelfOnly)
                    .with_healing(Formula::constant(1.0))
                    .with_health_cost(30),
            )
            .build()
            .unwrap()
    }

    fn mage() -> Combatant {
        Combatant::new(CombatantId(0), "Mage", Faction::Player, StatBlock::uniform(10.0))
            .with_resource(ResourceMeter::new(20, 50))
            .with_health(ResourceMeter::new(30, 100))
            .with_skills(["fireball", "blood_pact", "ghost_skill"].map(SkillId::from))
    }

    #[test]
    fn cost_equal_to_resource_is_affordable() {
        let registry = registry();
        assert!(can_use_skill(&mage(), registry.skill("fireball").unwrap()));
    }

    #[test]
    fn health_cost_needs_strictly_more_health() {
        let registry = registry();
        let err = check_skill(&mage(), registry.skill("blood_pact").unwrap()).unwrap_err();
        assert!(matches!(err, ActionError::InsufficientHealth { cost: 30, current: 30, .. }));
    }

    #[test]
    fn usable_list_starts_with_basic_attack_and_skips_unknown_ids() {
        let registry = registry();
        let mut mage = mage();
        let ids: Vec<&str> = usable_skills(&mage, &registry).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["basic_attack", "fireball"]);

        mage.cooldowns.start(&SkillId::from("fireball"), 1);
        let ids: Vec<&str> = usable_skills(&mage, &registry).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["basic_attack"]);
    }
}
