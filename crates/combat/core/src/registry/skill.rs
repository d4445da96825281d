use crate::combat::DamageType;
use crate::config::EngineConfig;
use crate::formula::Formula;
use crate::ids::{SkillId, StatusId};

/// Which combatants a skill can affect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TargetingMode {
    /// The caster only.
    #[cfg_attr(feature = "serde", serde(rename = "self"))]
    SelfOnly,
    SingleAlly,
    #[default]
    SingleEnemy,
    AllAllies,
    AllEnemies,
    All,
}

impl TargetingMode {
    /// Single-target modes need an explicit target from the caller.
    pub const fn requires_target(self) -> bool {
        matches!(self, TargetingMode::SingleAlly | TargetingMode::SingleEnemy)
    }

    /// Modes whose pool is the caster's opponents.
    pub const fn targets_enemies(self) -> bool {
        matches!(
            self,
            TargetingMode::SingleEnemy | TargetingMode::AllEnemies | TargetingMode::All
        )
    }

    /// Modes whose pool is the caster's own side (self included).
    pub const fn targets_allies(self) -> bool {
        matches!(
            self,
            TargetingMode::SelfOnly
                | TargetingMode::SingleAlly
                | TargetingMode::AllAllies
                | TargetingMode::All
        )
    }
}

/// A status effect a skill may apply on hit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusApplication {
    pub effect: StatusId,
    /// Proc chance, 0-100.
    #[cfg_attr(feature = "serde", serde(default = "full_chance"))]
    pub chance: f64,
    /// Duration in rounds, at least 1.
    pub duration: u32,
}

#[cfg(feature = "serde")]
fn full_chance() -> f64 {
    100.0
}

impl StatusApplication {
    pub fn new(effect: impl Into<StatusId>, chance: f64, duration: u32) -> Self {
        Self {
            effect: effect.into(),
            chance,
            duration,
        }
    }
}

/// Immutable rule data for one skill.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub id: SkillId,
    pub name: String,

    #[cfg_attr(feature = "serde", serde(default))]
    pub resource_cost: u32,

    /// Health paid on use (0 = none). The caster must have strictly more.
    #[cfg_attr(feature = "serde", serde(default))]
    pub health_cost: u32,

    #[cfg_attr(feature = "serde", serde(default))]
    pub targeting: TargetingMode,

    #[cfg_attr(feature = "serde", serde(default))]
    pub damage: Option<Formula>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_type: DamageType,

    /// Hit chance, 0-100.
    #[cfg_attr(feature = "serde", serde(default = "default_accuracy"))]
    pub accuracy: f64,

    /// Critical chance, 0-100.
    #[cfg_attr(feature = "serde", serde(default = "default_critical_chance"))]
    pub critical_chance: f64,

    #[cfg_attr(feature = "serde", serde(default = "default_critical_multiplier"))]
    pub critical_multiplier: f64,

    #[cfg_attr(feature = "serde", serde(default))]
    pub healing: Option<Formula>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub status_effects: Vec<StatusApplication>,

    /// Turns of the caster during which the skill stays unavailable (0 = none).
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: u32,
}

#[cfg(feature = "serde")]
fn default_accuracy() -> f64 {
    SkillDefinition::DEFAULT_ACCURACY
}

#[cfg(feature = "serde")]
fn default_critical_chance() -> f64 {
    SkillDefinition::DEFAULT_CRITICAL_CHANCE
}

#[cfg(feature = "serde")]
fn default_critical_multiplier() -> f64 {
    EngineConfig::DEFAULT_CRITICAL_MULTIPLIER
}

impl SkillDefinition {
    pub const BASIC_ATTACK: &'static str = "basic_attack";
    pub const DEFAULT_ACCURACY: f64 = 95.0;
    pub const DEFAULT_CRITICAL_CHANCE: f64 = 5.0;

    pub fn new(id: impl Into<SkillId>, name: impl Into<String>, targeting: TargetingMode) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            resource_cost: 0,
            health_cost: 0,
            targeting,
            damage: None,
            damage_type: DamageType::Physical,
            accuracy: Self::DEFAULT_ACCURACY,
            critical_chance: Self::DEFAULT_CRITICAL_CHANCE,
            critical_multiplier: EngineConfig::DEFAULT_CRITICAL_MULTIPLIER,
            healing: None,
            status_effects: Vec::new(),
            cooldown: 0,
        }
    }

    /// The always-available fallback attack: `strength * 1.2 + 10`.
    pub fn basic_attack() -> Self {
        Self::new(Self::BASIC_ATTACK, "Attack", TargetingMode::SingleEnemy)
            .with_damage(Formula::basic_attack())
    }

    pub fn with_damage(mut self, formula: Formula) -> Self {
        self.damage = Some(formula);
        self
    }

    pub fn with_damage_type(mut self, damage_type: DamageType) -> Self {
        self.damage_type = damage_type;
        self
    }

    pub fn with_healing(mut self, formula: Formula) -> Self {
        self.healing = Some(formula);
        self
    }

    pub fn with_cost(mut self, resource_cost: u32) -> Self {
        self.resource_cost = resource_cost;
        self
    }

    pub fn with_health_cost(mut self, health_cost: u32) -> Self {
        self.health_cost = health_cost;
        self
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    pub fn with_critical(mut self, chance: f64, multiplier: f64) -> Self {
        self.critical_chance = chance;
        self.critical_multiplier = multiplier;
        self
    }

    pub fn with_status(mut self, application: StatusApplication) -> Self {
        self.status_effects.push(application);
        self
    }

    pub fn with_cooldown(mut self, cooldown: u32) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn deals_damage(&self) -> bool {
        self.damage.is_some()
    }

    pub fn heals(&self) -> bool {
        self.healing.is_some()
    }

    pub fn applies_status(&self) -> bool {
        !self.status_effects.is_empty()
    }

    /// Damage only: no healing, no status applications.
    pub fn is_pure_attack(&self) -> bool {
        self.deals_damage() && !self.heals() && !self.applies_status()
    }

    pub fn is_basic_attack(&self) -> bool {
        self.id.as_str() == Self::BASIC_ATTACK
    }
}
