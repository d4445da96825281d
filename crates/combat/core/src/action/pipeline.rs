//! Skill resolution pipeline.
//!
//! For each resolved target the RNG is drawn in a fixed order: accuracy, then
//! the critical roll (damage skills only), then one proc roll per status
//! application (only while the target is still standing). Replaying the same
//! draws replays the same outcome.

use crate::combat::{DamageRoll, check_critical, check_hit, check_proc};
use crate::config::EngineConfig;
use crate::formula::{AmountKind, Evaluated, Formula};
use crate::ids::CombatantId;
use crate::registry::{Registry, SkillDefinition};
use crate::rng::RngOracle;
use crate::state::{ApplyOutcome, ChangeSet, CombatantFields, Roster};
use crate::stats::StatBlock;

use super::available::check_skill;
use super::error::ActionError;
use super::outcome::{ActionOutcome, DamageDealt, StatusProc, TargetOutcome};
use super::targeting::resolve_targets;

/// Caster values frozen before any target is processed.
struct Caster {
    stats: StatBlock,
    accuracy_bonus: f64,
}

/// Resolves skill uses against a roster.
#[derive(Clone, Copy, Debug)]
pub struct Resolver<'a> {
    registry: &'a Registry,
    config: &'a EngineConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a Registry, config: &'a EngineConfig) -> Self {
        Self { registry, config }
    }

    /// Resolves `skill` used by `actor`.
    ///
    /// Availability and targeting are validated first; on error nothing has
    /// been mutated. A cast with no valid target still pays its costs and
    /// starts its cooldown.
    pub fn resolve(
        &self,
        roster: &mut Roster,
        rng: &mut dyn RngOracle,
        actor: CombatantId,
        skill: &SkillDefinition,
        explicit_target: Option<CombatantId>,
    ) -> Result<ActionOutcome, ActionError> {
        let caster = roster.get(actor).ok_or(ActionError::ActorNotFound(actor))?;
        check_skill(caster, skill)?;
        let targets = resolve_targets(roster, caster, skill, explicit_target)?;
        let frozen = Caster {
            stats: caster.effective_stats(self.registry),
            accuracy_bonus: caster.accuracy_bonus(self.registry),
        };

        let mut outcome = ActionOutcome {
            actor,
            skill: skill.id.clone(),
            resource_spent: 0,
            health_spent: 0,
            targets: Vec::with_capacity(targets.len()),
            warnings: Vec::new(),
            changes: ChangeSet::default(),
        };

        if let Some(caster) = roster.get_mut(actor) {
            outcome.resource_spent = caster.resource.deplete(skill.resource_cost);
            outcome.health_spent = caster.health.deplete(skill.health_cost);
            caster.cooldowns.start(&skill.id, skill.cooldown);

            let mut fields = CombatantFields::empty();
            fields.set(CombatantFields::RESOURCE, outcome.resource_spent > 0);
            fields.set(CombatantFields::HEALTH, outcome.health_spent > 0);
            fields.set(CombatantFields::COOLDOWNS, skill.cooldown > 0);
            outcome.changes.mark(actor, fields);
        }

        for target in targets {
            if let Some(result) =
                self.resolve_target(roster, rng, skill, &frozen, target, &mut outcome.warnings)
            {
                outcome.changes.mark(target, changed_fields(&result));
                outcome.targets.push(result);
            }
        }

        Ok(outcome)
    }

    fn resolve_target(
        &self,
        roster: &mut Roster,
        rng: &mut dyn RngOracle,
        skill: &SkillDefinition,
        caster: &Caster,
        target_id: CombatantId,
        warnings: &mut Vec<String>,
    ) -> Option<TargetOutcome> {
        let target = roster.get_mut(target_id)?;

        let hit = check_hit(rng, skill.accuracy, caster.accuracy_bonus);
        let mut result = TargetOutcome {
            target: target_id,
            hit,
            damage: None,
            healing: None,
            statuses: Vec::new(),
            defeated: false,
        };
        if !hit.success {
            return Some(result);
        }

        if let Some(formula) = &skill.damage {
            let base = self.evaluate(formula, &caster.stats, skill, "damage", warnings);
            let critical = check_critical(rng, skill.critical_chance);
            let roll = DamageRoll::new(base)
                .with_affinity(target.affinities.multiplier(skill.damage_type))
                .with_critical(critical.success.then_some(skill.critical_multiplier))
                .with_reduction(target.damage_reduction(self.registry));

            let amount = target.health.deplete(roll.total());
            result.defeated = !target.is_alive();
            result.damage = Some(DamageDealt { roll, amount });
        }

        if result.defeated {
            return Some(result);
        }

        if let Some(formula) = &skill.healing {
            let raw = self.evaluate(formula, &caster.stats, skill, "healing", warnings);
            let amount = crate::formula::floor_amount(raw, AmountKind::Healing);
            result.healing = Some(target.health.restore(amount));
        }

        for application in &skill.status_effects {
            let roll = check_proc(rng, application.chance);
            let applied = if roll.success {
                match self.registry.status(application.effect.as_str()) {
                    Some(definition) => Some(target.statuses.apply(definition, application.duration)),
                    None => {
                        warnings.push(format!(
                            "skill '{}' references unknown status effect '{}'",
                            skill.id, application.effect
                        ));
                        None
                    }
                }
            } else {
                None
            };

            if applied == Some(ApplyOutcome::Rejected) {
                warnings.push(format!(
                    "{} has no free status slot for '{}'",
                    target.name, application.effect
                ));
            }
            result.statuses.push(StatusProc {
                effect: application.effect.clone(),
                roll,
                applied,
            });
        }

        Some(result)
    }

    fn evaluate(
        &self,
        formula: &Formula,
        stats: &StatBlock,
        skill: &SkillDefinition,
        context: &str,
        warnings: &mut Vec<String>,
    ) -> f64 {
        let evaluated = Evaluated::soft(formula, stats, self.config.formula_fallback);
        if let Some(error) = &evaluated.error {
            warnings.push(format!(
                "{context} formula '{formula}' of skill '{}' failed: {error}; using {}",
                skill.id, self.config.formula_fallback
            ));
        }
        evaluated.raw
    }
}

fn changed_fields(result: &TargetOutcome) -> CombatantFields {
    let mut fields = CombatantFields::empty();
    let damaged = result.damage.as_ref().is_some_and(|d| d.amount > 0);
    let healed = result.healing.is_some_and(|h| h > 0);
    let afflicted = result
        .statuses
        .iter()
        .any(|s| matches!(s.applied, Some(outcome) if outcome != ApplyOutcome::Rejected));

    fields.set(CombatantFields::HEALTH, damaged || healed);
    fields.set(CombatantFields::STATUSES, afflicted);
    fields.set(CombatantFields::DEFEATED, result.defeated);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{Affinities, DamageType};
    use crate::ids::SkillId;
    use crate::registry::{EffectCategory, StatusApplication, StatusEffectDefinition, TargetingMode};
    use crate::rng::ScriptedRng;
    use crate::state::{Combatant, Faction};
    use crate::stats::{ResourceMeter, StatKind};

    const HIT: f64 = 0.0;
    const MISS: f64 = 0.99;
    const CRIT: f64 = 0.0;
    const NO_CRIT: f64 = 0.99;

    fn registry() -> Registry {
        Registry::builder()
            .status(StatusEffectDefinition::new("burn", "Burn", EffectCategory::Debuff).with_damage_per_tick(8))
            .status(
                StatusEffectDefinition::new("might", "Might", EffectCategory::Buff)
                    .with_stat_modifier(StatKind::Strength, 10.0),
            )
            .status(
                StatusEffectDefinition::new("guard", "Guard", EffectCategory::Buff)
                    .with_damage_reduction(0.5),
            )
            .skill(
                SkillDefinition::new("fireball", "Fireball", TargetingMode::SingleEnemy)
                    .with_damage(Formula::parse("intelligence * 2").unwrap())
                    .with_damage_type(DamageType::Fire)
                    .with_cost(15)
                    .with_cooldown(2)
                    .with_status(StatusApplication::new("burn", 50.0, 3)),
            )
            .skill(
                SkillDefinition::new("quake", "Quake", TargetingMode::AllEnemies)
                    .with_damage(Formula::constant(10.0))
                    .with_damage_type(DamageType::Earth)
                    .with_accuracy(100.0),
            )
            .skill(
                SkillDefinition::new("mend", "Mend", TargetingMode::SingleAlly)
                    .with_healing(Formula::parse("intelligence * 3").unwrap())
                    .with_accuracy(100.0),
            )
            .skill(
                SkillDefinition::new("glitch", "Glitch", TargetingMode::SingleEnemy)
                    .with_damage(Formula::parse("strength / luck").unwrap()),
            )
            .build()
            .unwrap()
    }

    fn roster() -> Roster {
        let skills = ["fireball", "quake", "mend", "glitch"].map(SkillId::from);
        Roster::new(vec![
            Combatant::new(
                CombatantId(0),
                "Hero",
                Faction::Player,
                StatBlock::new(10.0, 12.0, 10.0, 10.0, 0.0),
            )
            .with_resource(ResourceMeter::full(30))
            .with_skills(skills),
            Combatant::new(CombatantId(1), "Orc", Faction::Enemy, StatBlock::uniform(8.0))
                .with_health(ResourceMeter::full(60)),
            Combatant::new(CombatantId(2), "Imp", Faction::Enemy, StatBlock::uniform(8.0))
                .with_health(ResourceMeter::full(60))
                .with_affinities(Affinities::default().resist(DamageType::Earth, 0.5)),
        ])
    }

    fn resolve(
        roster: &mut Roster,
        rng: &mut ScriptedRng,
        skill: &str,
        target: Option<u32>,
    ) -> Result<ActionOutcome, ActionError> {
        let registry = registry();
        let config = EngineConfig::default();
        let skill = registry.skill(skill).unwrap().clone();
        Resolver::new(&registry, &config).resolve(roster, rng, CombatantId(0), &skill, target.map(CombatantId))
    }

    #[test]
    fn basic_attack_with_strength_10_deals_22() {
        let mut roster = roster();
        let mut rng = ScriptedRng::new([HIT, NO_CRIT]);
        let outcome = resolve(&mut roster, &mut rng, "basic_attack", Some(1)).unwrap();

        assert_eq!(outcome.total_damage(), 22);
        assert_eq!(roster.get(CombatantId(1)).unwrap().health.current(), 38);
    }

    #[test]
    fn critical_hit_doubles_damage() {
        let mut roster = roster();
        let mut rng = ScriptedRng::new([HIT, CRIT]);
        let outcome = resolve(&mut roster, &mut rng, "basic_attack", Some(1)).unwrap();

        assert!(outcome.targets[0].is_critical());
        assert_eq!(outcome.total_damage(), 44);
    }

    #[test]
    fn miss_skips_damage_and_crit_roll() {
        let mut roster = roster();
        let mut rng = ScriptedRng::new([MISS, 0.5, 0.5]);
        let outcome = resolve(&mut roster, &mut rng, "basic_attack", Some(1)).unwrap();

        assert!(!outcome.targets[0].is_hit());
        assert_eq!(outcome.total_damage(), 0);
        assert_eq!(rng.remaining(), 2);
    }

    #[test]
    fn skill_pays_cost_starts_cooldown_and_procs_status() {
        let mut roster = roster();
        // accuracy, crit, burn proc
        let mut rng = ScriptedRng::new([HIT, NO_CRIT, 0.1]);
        let outcome = resolve(&mut roster, &mut rng, "fireball", Some(1)).unwrap();

        assert_eq!(outcome.total_damage(), 24);
        assert_eq!(outcome.resource_spent, 15);
        let hero = roster.get(CombatantId(0)).unwrap();
        assert_eq!(hero.resource.current(), 15);
        assert_eq!(hero.cooldowns.remaining("fireball"), 2);

        let orc = roster.get(CombatantId(1)).unwrap();
        assert!(orc.statuses.contains("burn"));
        assert!(outcome.changes.get(CombatantId(1)).contains(CombatantFields::STATUSES));
    }

    #[test]
    fn cooldown_rejects_before_any_mutation() {
        let mut roster = roster();
        roster
            .get_mut(CombatantId(0))
            .unwrap()
            .cooldowns
            .start(&SkillId::from("fireball"), 1);
        let before = roster.clone();

        let mut rng = ScriptedRng::constant(HIT);
        let err = resolve(&mut roster, &mut rng, "fireball", Some(1)).unwrap_err();
        assert!(matches!(err, ActionError::OnCooldown { remaining: 1, .. }));
        assert_eq!(roster, before);
    }

    #[test]
    fn group_skill_applies_affinities_per_target() {
        let mut roster = roster();
        let mut rng = ScriptedRng::new([HIT, NO_CRIT]);
        let outcome = resolve(&mut roster, &mut rng, "quake", None).unwrap();

        let dealt: Vec<u32> = outcome
            .targets
            .iter()
            .map(|t| t.damage.as_ref().unwrap().amount)
            .collect();
        assert_eq!(dealt, vec![10, 5]);
    }

    #[test]
    fn stat_modifiers_and_damage_reduction_apply() {
        let registry = registry();
        let mut roster = roster();
        let might = registry.status("might").unwrap().clone();
        let guard = registry.status("guard").unwrap().clone();
        roster.get_mut(CombatantId(0)).unwrap().statuses.apply(&might, 2);
        roster.get_mut(CombatantId(1)).unwrap().statuses.apply(&guard, 2);

        // (20 * 1.2 + 10) * 0.5 = 17
        let mut rng = ScriptedRng::new([HIT, NO_CRIT]);
        let outcome = resolve(&mut roster, &mut rng, "basic_attack", Some(1)).unwrap();
        assert_eq!(outcome.total_damage(), 17);
    }

    #[test]
    fn healing_is_capped_at_max_health() {
        let mut roster = roster();
        roster.get_mut(CombatantId(0)).unwrap().health.deplete(20);
        let mut rng = ScriptedRng::constant(HIT);
        let outcome = resolve(&mut roster, &mut rng, "mend", Some(0)).unwrap();

        assert_eq!(outcome.total_healing(), 20);
        assert_eq!(roster.get(CombatantId(0)).unwrap().health.current(), 100);
    }

    #[test]
    fn failing_formula_falls_back_with_warning() {
        let mut roster = roster();
        let mut rng = ScriptedRng::new([HIT, NO_CRIT]);
        let outcome = resolve(&mut roster, &mut rng, "glitch", Some(1)).unwrap();

        assert_eq!(outcome.total_damage(), EngineConfig::DEFAULT_FORMULA_FALLBACK);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn no_target_cast_still_spends_resource_and_cooldown() {
        let mut roster = roster();
        for id in [1, 2] {
            roster.get_mut(CombatantId(id)).unwrap().health.deplete(u32::MAX);
        }
        let mut rng = ScriptedRng::constant(HIT);
        let outcome = resolve(&mut roster, &mut rng, "fireball", None).unwrap();

        assert!(outcome.is_no_op());
        let hero = roster.get(CombatantId(0)).unwrap();
        assert_eq!(hero.resource.current(), 15);
        assert_eq!(hero.cooldowns.remaining("fireball"), 2);
    }

    #[test]
    fn lethal_damage_reports_defeat_and_skips_status() {
        let mut roster = roster();
        roster.get_mut(CombatantId(1)).unwrap().health = ResourceMeter::new(5, 60);
        let mut rng = ScriptedRng::new([HIT, NO_CRIT, 0.0]);
        let outcome = resolve(&mut roster, &mut rng, "fireball", Some(1)).unwrap();

        let target = &outcome.targets[0];
        assert!(target.defeated);
        assert_eq!(target.damage.as_ref().unwrap().amount, 5);
        assert!(target.statuses.is_empty());
        assert_eq!(outcome.defeated().collect::<Vec<_>>(), vec![CombatantId(1)]);
    }
}
