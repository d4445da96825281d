//! Behavior profiles for AI-controlled combatants.

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Named profile presets.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ProfileKind {
    Aggressive,
    Defensive,
    Support,
    Tactical,
    Berserker,
    #[default]
    Balanced,
}

/// How a chosen skill picks its target from the valid pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TargetPreference {
    LowestHealth,
    HighestHealth,
    Random,
    /// Highest offensive stat.
    Strongest,
    /// Lowest health ratio, so wounded targets finish first.
    Strategic,
    First,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RiskTolerance {
    Low,
    Medium,
    High,
    Extreme,
}

/// Weights that steer the decision engine.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BehaviorProfile {
    pub kind: ProfileKind,
    pub attack_priority: f64,
    pub defense_priority: f64,
    pub support_priority: f64,
    pub target_preference: TargetPreference,
    pub risk_tolerance: RiskTolerance,
}

impl BehaviorProfile {
    pub const fn preset(kind: ProfileKind) -> Self {
        let (attack, defense, support, target_preference, risk_tolerance) = match kind {
            ProfileKind::Aggressive => (0.8, 0.1, 0.1, TargetPreference::LowestHealth, RiskTolerance::High),
            ProfileKind::Defensive => (0.3, 0.5, 0.2, TargetPreference::Strongest, RiskTolerance::Low),
            ProfileKind::Support => (0.2, 0.2, 0.6, TargetPreference::LowestHealth, RiskTolerance::Medium),
            ProfileKind::Tactical => (0.4, 0.3, 0.3, TargetPreference::Strategic, RiskTolerance::Medium),
            ProfileKind::Berserker => (0.9, 0.05, 0.05, TargetPreference::Random, RiskTolerance::Extreme),
            ProfileKind::Balanced => (0.5, 0.25, 0.25, TargetPreference::LowestHealth, RiskTolerance::Medium),
        };
        Self {
            kind,
            attack_priority: attack,
            defense_priority: defense,
            support_priority: support,
            target_preference,
            risk_tolerance,
        }
    }

    /// Resolves a content tag such as `"aggressive"`. `None` for unknown tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        tag.parse::<ProfileKind>().ok().map(Self::preset)
    }

    pub fn with_target_preference(mut self, preference: TargetPreference) -> Self {
        self.target_preference = preference;
        self
    }

    pub fn is_cautious(&self) -> bool {
        self.risk_tolerance == RiskTolerance::Low
    }
}

impl Default for BehaviorProfile {
    fn default() -> Self {
        Self::preset(ProfileKind::Balanced)
    }
}
