//! Immutable skill and status-effect lookup tables.
//!
//! A [`Registry`] is built once before any encounter starts and shared
//! read-only (usually behind an `Arc`) by every session. All cross references
//! are checked in [`RegistryBuilder::build`], so a session never meets a skill
//! that applies an unknown status effect.

mod error;
mod skill;
mod status;

pub use error::RegistryError;
pub use skill::{SkillDefinition, StatusApplication, TargetingMode};
pub use status::{EffectCategory, StatusEffectDefinition};

use std::collections::BTreeMap;

use crate::ids::{SkillId, StatusId};

/// Validated skill and status-effect definitions.
#[derive(Clone, Debug)]
pub struct Registry {
    skills: BTreeMap<SkillId, SkillDefinition>,
    statuses: BTreeMap<StatusId, StatusEffectDefinition>,
    basic_attack: SkillDefinition,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Builds a registry from definition lists.
    pub fn from_definitions(
        skills: impl IntoIterator<Item = SkillDefinition>,
        statuses: impl IntoIterator<Item = StatusEffectDefinition>,
    ) -> Result<Self, RegistryError> {
        let mut builder = Self::builder();
        builder.skills.extend(skills);
        builder.statuses.extend(statuses);
        builder.build()
    }

    /// Looks up a skill. The basic attack is always present.
    pub fn skill(&self, id: &str) -> Option<&SkillDefinition> {
        if id == self.basic_attack.id.as_str() {
            return Some(&self.basic_attack);
        }
        self.skills.get(id)
    }

    pub fn status(&self, id: &str) -> Option<&StatusEffectDefinition> {
        self.statuses.get(id)
    }

    /// The attack every combatant can fall back to.
    pub fn basic_attack(&self) -> &SkillDefinition {
        &self.basic_attack
    }

    pub fn contains_skill(&self, id: &str) -> bool {
        self.skill(id).is_some()
    }

    /// Registered skills, basic attack excluded, in id order.
    pub fn skills(&self) -> impl Iterator<Item = &SkillDefinition> {
        self.skills.values()
    }

    pub fn statuses(&self) -> impl Iterator<Item = &StatusEffectDefinition> {
        self.statuses.values()
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    pub fn status_count(&self) -> usize {
        self.statuses.len()
    }
}

impl Default for Registry {
    /// An empty registry holding only the built-in basic attack.
    fn default() -> Self {
        Self {
            skills: BTreeMap::new(),
            statuses: BTreeMap::new(),
            basic_attack: SkillDefinition::basic_attack(),
        }
    }
}

/// Collects definitions and validates them into a [`Registry`].
#[derive(Clone, Debug, Default)]
pub struct RegistryBuilder {
    skills: Vec<SkillDefinition>,
    statuses: Vec<StatusEffectDefinition>,
}

impl RegistryBuilder {
    pub fn skill(mut self, skill: SkillDefinition) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn status(mut self, status: StatusEffectDefinition) -> Self {
        self.statuses.push(status);
        self
    }

    /// Validates every definition and cross reference.
    ///
    /// A skill with the id `basic_attack` replaces the built-in attack.
    pub fn build(self) -> Result<Registry, RegistryError> {
        let mut statuses = BTreeMap::new();
        for status in self.statuses {
            validate_status(&status)?;
            if statuses.contains_key(&status.id) {
                return Err(RegistryError::DuplicateStatus(status.id));
            }
            statuses.insert(status.id.clone(), status);
        }

        let mut skills = BTreeMap::new();
        let mut basic_attack = SkillDefinition::basic_attack();
        let mut basic_overridden = false;
        for skill in self.skills {
            validate_skill(&skill, &statuses)?;
            if skill.is_basic_attack() {
                if basic_overridden {
                    return Err(RegistryError::DuplicateSkill(skill.id));
                }
                basic_overridden = true;
                basic_attack = skill;
                continue;
            }
            if skills.contains_key(&skill.id) {
                return Err(RegistryError::DuplicateSkill(skill.id));
            }
            skills.insert(skill.id.clone(), skill);
        }

        Ok(Registry {
            skills,
            statuses,
            basic_attack,
        })
    }
}

fn validate_percentage(skill: &SkillDefinition, field: &'static str, value: f64) -> Result<(), RegistryError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(RegistryError::InvalidPercentage {
            skill: skill.id.clone(),
            field,
            value,
        })
    }
}

fn validate_skill(
    skill: &SkillDefinition,
    statuses: &BTreeMap<StatusId, StatusEffectDefinition>,
) -> Result<(), RegistryError> {
    validate_percentage(skill, "accuracy", skill.accuracy)?;
    validate_percentage(skill, "critical chance", skill.critical_chance)?;

    // NaN fails this comparison too
    if !(skill.critical_multiplier >= 1.0) {
        return Err(RegistryError::InvalidCriticalMultiplier {
            skill: skill.id.clone(),
            value: skill.critical_multiplier,
        });
    }

    for application in &skill.status_effects {
        if !statuses.contains_key(&application.effect) {
            return Err(RegistryError::UnknownStatusEffect {
                skill: skill.id.clone(),
                effect: application.effect.clone(),
            });
        }
        validate_percentage(skill, "status chance", application.chance)?;
        if application.duration == 0 {
            return Err(RegistryError::ZeroDuration {
                skill: skill.id.clone(),
                effect: application.effect.clone(),
            });
        }
    }

    Ok(())
}

fn validate_status(status: &StatusEffectDefinition) -> Result<(), RegistryError> {
    if let Some(value) = status.damage_reduction
        && !(0.0..=1.0).contains(&value)
    {
        return Err(RegistryError::InvalidDamageReduction {
            effect: status.id.clone(),
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Formula;

    fn burn() -> StatusEffectDefinition {
        StatusEffectDefinition::new("burn", "Burn", EffectCategory::Debuff).with_damage_per_tick(8)
    }

    fn fireball() -> SkillDefinition {
        SkillDefinition::new("fireball", "Fireball", TargetingMode::SingleEnemy)
            .with_damage(Formula::parse("intelligence * 2").unwrap())
            .with_status(StatusApplication::new("burn", 30.0, 3))
    }

    #[test]
    fn builds_and_looks_up_definitions() {
        let registry = Registry::builder()
            .status(burn())
            .skill(fireball())
            .build()
            .unwrap();

        assert_eq!(registry.skill_count(), 1);
        assert!(registry.skill("fireball").is_some());
        assert!(registry.status("burn").is_some());
        assert!(registry.skill(SkillDefinition::BASIC_ATTACK).is_some());
        assert!(registry.skill("missing").is_none());
    }

    #[test]
    fn rejects_unknown_status_reference() {
        let err = Registry::builder().skill(fireball()).build().unwrap_err();
        assert_eq!(
            err,
            RegistryError::UnknownStatusEffect {
                skill: "fireball".into(),
                effect: "burn".into(),
            }
        );
    }

    #[test]
    fn rejects_duplicates() {
        let err = Registry::builder()
            .status(burn())
            .status(burn())
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateStatus("burn".into()));
    }

    #[test]
    fn rejects_out_of_range_numbers() {
        let skill = fireball().with_accuracy(140.0);
        let err = Registry::builder().status(burn()).skill(skill).build().unwrap_err();
        assert!(matches!(err, RegistryError::InvalidPercentage { field: "accuracy", .. }));

        let skill = fireball().with_critical(5.0, 0.5);
        let err = Registry::builder().status(burn()).skill(skill).build().unwrap_err();
        assert!(matches!(err, RegistryError::InvalidCriticalMultiplier { .. }));
    }

    #[test]
    fn custom_basic_attack_replaces_builtin() {
        let custom = SkillDefinition::new(SkillDefinition::BASIC_ATTACK, "Strike", TargetingMode::SingleEnemy)
            .with_damage(Formula::constant(5.0));
        let registry = Registry::builder().skill(custom).build().unwrap();
        assert_eq!(registry.basic_attack().name, "Strike");
        assert_eq!(registry.skill_count(), 0);
    }
}
