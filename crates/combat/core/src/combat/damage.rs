use std::collections::BTreeMap;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::formula::{AmountKind, floor_amount};

/// Elemental tag carried by skills and hazards.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DamageType {
    #[default]
    Physical,
    Fire,
    Ice,
    Lightning,
    Water,
    Earth,
    Wind,
    Poison,
    Holy,
    Dark,
    Arcane,
    /// Ignores resistances and weaknesses.
    True,
}

/// Per-combatant resistance and weakness fractions keyed by damage type.
///
/// A resistance of `0.25` multiplies incoming damage by `0.75`; a weakness of
/// `0.5` multiplies it by `1.5`. Both apply when present.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Affinities {
    pub resistances: BTreeMap<DamageType, f64>,
    pub weaknesses: BTreeMap<DamageType, f64>,
}

impl Affinities {
    pub fn resist(mut self, damage_type: DamageType, fraction: f64) -> Self {
        self.resistances.insert(damage_type, fraction);
        self
    }

    pub fn weak(mut self, damage_type: DamageType, fraction: f64) -> Self {
        self.weaknesses.insert(damage_type, fraction);
        self
    }

    /// Combined multiplier for incoming damage of `damage_type`, never negative.
    pub fn multiplier(&self, damage_type: DamageType) -> f64 {
        if damage_type == DamageType::True {
            return 1.0;
        }
        let resistance = self.resistances.get(&damage_type).copied().unwrap_or(0.0);
        let weakness = self.weaknesses.get(&damage_type).copied().unwrap_or(0.0);
        ((1.0 - resistance) * (1.0 + weakness)).max(0.0)
    }
}

/// Multiplicative breakdown of one damage application.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRoll {
    /// Formula result against the attacker's effective stats.
    pub base: f64,
    /// Resistance/weakness multiplier of the target.
    pub affinity: f64,
    /// Critical multiplier when the crit roll succeeded.
    pub critical: Option<f64>,
    /// Fraction removed by the target's protective effects, in `[0, 1]`.
    pub reduction: f64,
}

impl DamageRoll {
    pub fn new(base: f64) -> Self {
        Self {
            base,
            affinity: 1.0,
            critical: None,
            reduction: 0.0,
        }
    }

    pub fn with_affinity(mut self, affinity: f64) -> Self {
        self.affinity = affinity;
        self
    }

    pub fn with_critical(mut self, multiplier: Option<f64>) -> Self {
        self.critical = multiplier;
        self
    }

    pub fn with_reduction(mut self, reduction: f64) -> Self {
        self.reduction = reduction.clamp(0.0, 1.0);
        self
    }

    pub fn is_critical(&self) -> bool {
        self.critical.is_some()
    }

    /// Final damage: floored, at least 1.
    pub fn total(&self) -> u32 {
        let critical = self.critical.unwrap_or(1.0).max(1.0);
        let raw = self.base * self.affinity * critical * (1.0 - self.reduction);
        floor_amount(raw, AmountKind::Damage)
    }
}
