//! Candidate enumeration, selection and targeting.

use crate::action::{target_pool, usable_skills};
use crate::ids::{CombatantId, SkillId};
use crate::registry::{Registry, SkillDefinition};
use crate::rng::RngOracle;
use crate::session::Weather;
use crate::state::{Combatant, Roster};

use super::profile::TargetPreference;
use super::scoring::{Score, score_skill};

/// Read-only view the decision engine works from.
#[derive(Clone, Copy)]
pub struct AiContext<'a> {
    pub actor: &'a Combatant,
    pub roster: &'a Roster,
    pub registry: &'a Registry,
    pub weather: Weather,
}

impl AiContext<'_> {
    pub fn enemies_alive(&self) -> bool {
        self.roster.living_enemies_of(self.actor.faction).next().is_some()
    }

    /// Whether any combatant the skill could reach is missing health.
    pub fn anyone_hurt(&self, skill: &SkillDefinition) -> bool {
        target_pool(self.roster, self.actor, skill.targeting)
            .into_iter()
            .filter_map(|id| self.roster.get(id))
            .any(|c| c.health.missing() > 0)
    }
}

/// The chosen action and how it was reached.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision {
    pub skill: SkillId,
    pub target: Option<CombatantId>,
    pub score: Score,
    /// Every candidate in enumeration order with its score.
    pub candidates: Vec<(SkillId, Score)>,
}

/// Picks the best usable skill and its target.
///
/// Draws one noise value per candidate in enumeration order, then at most one
/// more draw for a random target. Returns `None` when nothing is usable.
pub fn choose_action(ctx: &AiContext<'_>, rng: &mut dyn RngOracle, noise_span: f64) -> Option<Decision> {
    let mut best: Option<(&SkillDefinition, Score)> = None;
    let mut candidates = Vec::new();

    for skill in usable_skills(ctx.actor, ctx.registry) {
        let mut score = score_skill(skill, ctx);
        score.noise = rng.uniform(0.0, noise_span);
        candidates.push((skill.id.clone(), score));

        // Strictly greater: the first candidate wins ties
        let better = best.is_none_or(|(_, top)| score.value() > top.value());
        if better {
            best = Some((skill, score));
        }
    }

    let (skill, score) = best?;
    let target = if skill.targeting.requires_target() {
        let pool = target_pool(ctx.roster, ctx.actor, skill.targeting);
        select_target(&pool, ctx.roster, ctx.actor.profile.target_preference, rng)
    } else {
        None
    };

    Some(Decision {
        skill: skill.id.clone(),
        target,
        score,
        candidates,
    })
}

/// Applies a target preference to a pool. Ties go to the earlier entry.
pub fn select_target(
    pool: &[CombatantId],
    roster: &Roster,
    preference: TargetPreference,
    rng: &mut dyn RngOracle,
) -> Option<CombatantId> {
    let members: Vec<&Combatant> = pool.iter().filter_map(|&id| roster.get(id)).collect();
    if members.is_empty() {
        return None;
    }

    let chosen = match preference {
        TargetPreference::First => members[0],
        TargetPreference::Random => members[rng.index(members.len())],
        TargetPreference::LowestHealth => first_best(&members, |c| -(c.health.current() as f64)),
        TargetPreference::HighestHealth => first_best(&members, |c| c.health.current() as f64),
        TargetPreference::Strongest => first_best(&members, |c| c.stats.offense()),
        TargetPreference::Strategic => first_best(&members, |c| -c.health.ratio()),
    };
    Some(chosen.id)
}

fn first_best<'a>(members: &[&'a Combatant], key: impl Fn(&Combatant) -> f64) -> &'a Combatant {
    let mut best = members[0];
    let mut best_key = key(best);
    for &candidate in &members[1..] {
        let candidate_key = key(candidate);
        if candidate_key > best_key {
            best = candidate;
            best_key = candidate_key;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{BehaviorProfile, ProfileKind};
    use crate::combat::DamageType;
    use crate::formula::Formula;
    use crate::registry::{EffectCategory, StatusApplication, StatusEffectDefinition, TargetingMode};
    use crate::rng::ScriptedRng;
    use crate::state::Faction;
    use crate::stats::{ResourceMeter, StatBlock};

    fn registry() -> Registry {
        Registry::builder()
            .status(
                StatusEffectDefinition::new("barrier", "Barrier", EffectCategory::Buff)
                    .with_damage_reduction(0.5),
            )
            .skill(
                SkillDefinition::new("heal", "Heal", TargetingMode::SingleAlly)
                    .with_healing(Formula::parse("intelligence * 2").unwrap())
                    .with_cost(10),
            )
            .skill(
                SkillDefinition::new("spark", "Spark", TargetingMode::SingleEnemy)
                    .with_damage(Formula::parse("intelligence").unwrap())
                    .with_damage_type(DamageType::Lightning),
            )
            .skill(
                SkillDefinition::new("barrier", "Barrier", TargetingMode::SelfOnly)
                    .with_status(StatusApplication::new("barrier", 100.0, 2)),
            )
            .build()
            .unwrap()
    }

    fn roster(actor_health: u32, profile: ProfileKind, skills: &[&str]) -> Roster {
        Roster::new(vec![
            Combatant::new(CombatantId(0), "Hero", Faction::Player, StatBlock::uniform(10.0))
                .with_health(ResourceMeter::new(40, 100)),
            Combatant::new(CombatantId(1), "Knight", Faction::Player, StatBlock::uniform(10.0))
                .with_health(ResourceMeter::new(90, 100)),
            Combatant::new(CombatantId(2), "Shaman", Faction::Enemy, StatBlock::uniform(10.0))
                .with_health(ResourceMeter::new(actor_health, 100))
                .with_profile(BehaviorProfile::preset(profile))
                .with_skills(skills.iter().map(|&s| SkillId::from(s))),
            Combatant::new(CombatantId(3), "Totem", Faction::Enemy, StatBlock::uniform(1.0))
                .with_health(ResourceMeter::new(100, 100)),
        ])
    }

    fn decide(roster: &Roster, weather: Weather, rng: &mut ScriptedRng) -> Decision {
        let registry = registry();
        let ctx = AiContext {
            actor: roster.get(CombatantId(2)).unwrap(),
            roster,
            registry: &registry,
            weather,
        };
        choose_action(&ctx, rng, 10.0).unwrap()
    }

    #[test]
    fn aggressive_actor_attacks_lowest_health_enemy() {
        let roster = roster(100, ProfileKind::Aggressive, &["heal"]);
        let decision = decide(&roster, Weather::Clear, &mut ScriptedRng::constant(0.0));

        assert_eq!(decision.skill.as_str(), "basic_attack");
        assert_eq!(decision.target, Some(CombatantId(0)));
        assert_eq!(decision.candidates.len(), 2);
    }

    #[test]
    fn wounded_support_actor_heals() {
        let roster = roster(20, ProfileKind::Support, &["heal"]);
        let decision = decide(&roster, Weather::Clear, &mut ScriptedRng::constant(0.0));

        assert_eq!(decision.skill.as_str(), "heal");
        assert_eq!(decision.target, Some(CombatantId(2)));
    }

    #[test]
    fn equal_scores_keep_the_first_candidate() {
        let roster = roster(100, ProfileKind::Balanced, &["spark"]);
        // basic attack and spark score identically without weather
        let decision = decide(&roster, Weather::Clear, &mut ScriptedRng::constant(0.5));
        assert_eq!(decision.skill.as_str(), "basic_attack");

        let decision = decide(&roster, Weather::Storm, &mut ScriptedRng::constant(0.5));
        assert_eq!(decision.skill.as_str(), "spark");
    }

    #[test]
    fn defensive_profile_values_protective_buffs() {
        let roster = roster(100, ProfileKind::Defensive, &["barrier"]);
        let decision = decide(&roster, Weather::Clear, &mut ScriptedRng::constant(0.0));
        let barrier = decision
            .candidates
            .iter()
            .find(|(id, _)| id.as_str() == "barrier")
            .map(|(_, score)| *score)
            .unwrap();
        assert!(barrier.intent > 0.0);
    }

    #[test]
    fn target_preferences() {
        let roster = roster(100, ProfileKind::Balanced, &[]);
        let pool = [CombatantId(0), CombatantId(1)];
        let mut rng = ScriptedRng::constant(0.9);

        assert_eq!(
            select_target(&pool, &roster, TargetPreference::HighestHealth, &mut rng),
            Some(CombatantId(1))
        );
        assert_eq!(
            select_target(&pool, &roster, TargetPreference::LowestHealth, &mut rng),
            Some(CombatantId(0))
        );
        assert_eq!(
            select_target(&pool, &roster, TargetPreference::Random, &mut rng),
            Some(CombatantId(1))
        );
        // Equal offense: first wins
        assert_eq!(
            select_target(&pool, &roster, TargetPreference::Strongest, &mut rng),
            Some(CombatantId(0))
        );
        assert_eq!(select_target(&[], &roster, TargetPreference::First, &mut rng), None);
    }
}
