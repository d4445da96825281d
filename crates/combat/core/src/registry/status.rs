use std::collections::BTreeMap;

use crate::ids::StatusId;
use crate::stats::StatKind;

/// Whether an effect helps or hinders its bearer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EffectCategory {
    Buff,
    Debuff,
}

/// Immutable rule data for one status effect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectDefinition {
    pub id: StatusId,
    pub name: String,
    pub category: EffectCategory,

    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_per_tick: Option<u32>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub heal_per_tick: Option<u32>,

    /// Additive stat deltas while the effect is active (per stack).
    #[cfg_attr(feature = "serde", serde(default))]
    pub stat_modifiers: BTreeMap<StatKind, f64>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub prevents_action: bool,

    /// Fraction of incoming damage removed, 0-1.
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_reduction: Option<f64>,

    /// Added to the accuracy of the bearer's skills.
    #[cfg_attr(feature = "serde", serde(default))]
    pub accuracy_bonus: Option<f64>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub stackable: bool,
}

impl StatusEffectDefinition {
    pub fn new(id: impl Into<StatusId>, name: impl Into<String>, category: EffectCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            damage_per_tick: None,
            heal_per_tick: None,
            stat_modifiers: BTreeMap::new(),
            prevents_action: false,
            damage_reduction: None,
            accuracy_bonus: None,
            stackable: false,
        }
    }

    pub fn with_damage_per_tick(mut self, amount: u32) -> Self {
        self.damage_per_tick = Some(amount);
        self
    }

    pub fn with_heal_per_tick(mut self, amount: u32) -> Self {
        self.heal_per_tick = Some(amount);
        self
    }

    pub fn with_stat_modifier(mut self, stat: StatKind, delta: f64) -> Self {
        self.stat_modifiers.insert(stat, delta);
        self
    }

    pub fn preventing_action(mut self) -> Self {
        self.prevents_action = true;
        self
    }

    pub fn with_damage_reduction(mut self, fraction: f64) -> Self {
        self.damage_reduction = Some(fraction);
        self
    }

    pub fn with_accuracy_bonus(mut self, bonus: f64) -> Self {
        self.accuracy_bonus = Some(bonus);
        self
    }

    pub fn stackable(mut self) -> Self {
        self.stackable = true;
        self
    }

    pub fn is_buff(&self) -> bool {
        self.category == EffectCategory::Buff
    }

    /// A buff that reduces incoming damage.
    pub fn is_protective(&self) -> bool {
        self.is_buff() && self.damage_reduction.is_some_and(|r| r > 0.0)
    }
}
