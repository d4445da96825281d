use crate::ai::BehaviorProfile;
use crate::combat::Affinities;
use crate::ids::{CombatantId, SkillId};
use crate::registry::Registry;
use crate::stats::{ResourceMeter, StatBlock};

use super::cooldown::Cooldowns;
use super::status::StatusEffects;

/// Side a combatant fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Faction {
    Player,
    Enemy,
    Ally,
}

impl Faction {
    /// Players and allies fight together.
    pub const fn is_party(self) -> bool {
        matches!(self, Faction::Player | Faction::Ally)
    }

    pub const fn is_hostile_to(self, other: Faction) -> bool {
        self.is_party() != other.is_party()
    }
}

/// Who picks the actions of a combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Controller {
    Human,
    #[default]
    Ai,
}

/// Runtime record of one participant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub faction: Faction,
    pub controller: Controller,
    pub stats: StatBlock,
    pub health: ResourceMeter,
    pub resource: ResourceMeter,
    pub statuses: StatusEffects,
    pub cooldowns: Cooldowns,
    /// Known skills, registry-validated at session start.
    pub skills: Vec<SkillId>,
    pub affinities: Affinities,
    pub profile: BehaviorProfile,
}

impl Combatant {
    pub fn new(id: CombatantId, name: impl Into<String>, faction: Faction, stats: StatBlock) -> Self {
        Self {
            id,
            name: name.into(),
            faction,
            controller: Controller::Ai,
            stats,
            health: ResourceMeter::full(100),
            resource: ResourceMeter::full(50),
            statuses: StatusEffects::default(),
            cooldowns: Cooldowns::default(),
            skills: Vec::new(),
            affinities: Affinities::default(),
            profile: BehaviorProfile::default(),
        }
    }

    pub fn with_health(mut self, health: ResourceMeter) -> Self {
        self.health = health;
        self
    }

    pub fn with_resource(mut self, resource: ResourceMeter) -> Self {
        self.resource = resource;
        self
    }

    pub fn with_controller(mut self, controller: Controller) -> Self {
        self.controller = controller;
        self
    }

    pub fn with_skills(mut self, skills: impl IntoIterator<Item = SkillId>) -> Self {
        self.skills = skills.into_iter().collect();
        self
    }

    pub fn with_affinities(mut self, affinities: Affinities) -> Self {
        self.affinities = affinities;
        self
    }

    pub fn with_profile(mut self, profile: BehaviorProfile) -> Self {
        self.profile = profile;
        self
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.health.is_empty()
    }

    pub fn is_human(&self) -> bool {
        self.controller == Controller::Human
    }

    pub fn knows(&self, skill: &str) -> bool {
        self.skills.iter().any(|known| known.as_str() == skill)
    }

    /// Base stats with every active stat modifier applied (per stack).
    pub fn effective_stats(&self, registry: &Registry) -> StatBlock {
        let deltas = self
            .statuses
            .iter()
            .filter_map(|instance| {
                registry
                    .status(instance.effect.as_str())
                    .map(|def| (def, instance.stacks as f64))
            })
            .flat_map(|(definition, stacks)| {
                definition
                    .stat_modifiers
                    .iter()
                    .map(move |(&stat, &delta)| (stat, delta * stacks))
            });
        self.stats.modified(deltas)
    }

    /// Sum of accuracy bonuses from active effects.
    pub fn accuracy_bonus(&self, registry: &Registry) -> f64 {
        self.statuses
            .iter()
            .filter_map(|instance| registry.status(instance.effect.as_str()))
            .filter_map(|def| def.accuracy_bonus)
            .sum()
    }

    /// Combined damage reduction from active effects, in `[0, 1]`.
    ///
    /// Independent reductions compound: two 50% shields block 75%.
    pub fn damage_reduction(&self, registry: &Registry) -> f64 {
        let passthrough: f64 = self
            .statuses
            .iter()
            .filter_map(|instance| registry.status(instance.effect.as_str()))
            .filter_map(|def| def.damage_reduction)
            .map(|reduction| 1.0 - reduction.clamp(0.0, 1.0))
            .product();
        (1.0 - passthrough).clamp(0.0, 1.0)
    }

    pub fn prevents_action(&self, registry: &Registry) -> bool {
        self.statuses
            .iter()
            .filter_map(|instance| registry.status(instance.effect.as_str()))
            .any(|def| def.prevents_action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{EffectCategory, StatusEffectDefinition};
    use crate::stats::StatKind;

    fn registry() -> Registry {
        Registry::builder()
            .status(
                StatusEffectDefinition::new("rage", "Rage", EffectCategory::Buff)
                    .with_stat_modifier(StatKind::Strength, 5.0)
                    .stackable(),
            )
            .status(
                StatusEffectDefinition::new("weaken", "Weaken", EffectCategory::Debuff)
                    .with_stat_modifier(StatKind::Strength, -8.0),
            )
            .status(
                StatusEffectDefinition::new("shield", "Shield", EffectCategory::Buff)
                    .with_damage_reduction(0.5),
            )
            .status(
                StatusEffectDefinition::new("ward", "Ward", EffectCategory::Buff)
                    .with_damage_reduction(0.5)
                    .with_accuracy_bonus(10.0),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn factions_split_into_two_sides() {
        assert!(Faction::Player.is_hostile_to(Faction::Enemy));
        assert!(!Faction::Player.is_hostile_to(Faction::Ally));
        assert!(Faction::Enemy.is_hostile_to(Faction::Ally));
    }

    #[test]
    fn stat_modifiers_scale_with_stacks() {
        let registry = registry();
        let rage = registry.status("rage").unwrap().clone();
        let mut hero = Combatant::new(CombatantId(0), "Hero", Faction::Player, StatBlock::uniform(10.0));
        hero.statuses.apply(&rage, 2);
        hero.statuses.apply(&rage, 2);

        assert_eq!(hero.effective_stats(&registry).strength, 20.0);
        assert_eq!(hero.stats.strength, 10.0);
    }

    #[test]
    fn modifier_order_does_not_change_effective_stats() {
        let registry = registry();
        let weaken = registry.status("weaken").unwrap();
        let rage = registry.status("rage").unwrap();
        let base = StatBlock::uniform(5.0);

        let mut first = Combatant::new(CombatantId(0), "First", Faction::Player, base);
        first.statuses.apply(weaken, 2);
        first.statuses.apply(rage, 2);
        let mut second = Combatant::new(CombatantId(1), "Second", Faction::Player, base);
        second.statuses.apply(rage, 2);
        second.statuses.apply(weaken, 2);

        assert_eq!(first.effective_stats(&registry).strength, 2.0);
        assert_eq!(
            first.effective_stats(&registry),
            second.effective_stats(&registry)
        );
    }

    #[test]
    fn reductions_compound() {
        let registry = registry();
        let mut hero = Combatant::new(CombatantId(0), "Hero", Faction::Player, StatBlock::uniform(10.0));
        hero.statuses.apply(registry.status("shield").unwrap(), 2);
        hero.statuses.apply(registry.status("ward").unwrap(), 2);

        assert_eq!(hero.damage_reduction(&registry), 0.75);
        assert_eq!(hero.accuracy_bonus(&registry), 10.0);
    }
}
