use crate::combat::{AttackRoll, DamageRoll};
use crate::ids::{CombatantId, SkillId, StatusId};
use crate::state::{ApplyOutcome, ChangeSet};

/// Damage dealt to one target.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageDealt {
    pub roll: DamageRoll,
    /// Health actually removed (clamped to what the target had).
    pub amount: u32,
}

/// One status application attempt.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusProc {
    pub effect: StatusId,
    pub roll: AttackRoll,
    /// `None` when the proc roll failed.
    pub applied: Option<ApplyOutcome>,
}

/// Everything that happened to a single target.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetOutcome {
    pub target: CombatantId,
    pub hit: AttackRoll,
    pub damage: Option<DamageDealt>,
    pub healing: Option<u32>,
    pub statuses: Vec<StatusProc>,
    pub defeated: bool,
}

impl TargetOutcome {
    pub fn is_hit(&self) -> bool {
        self.hit.success
    }

    pub fn is_critical(&self) -> bool {
        self.damage.as_ref().is_some_and(|d| d.roll.is_critical())
    }
}

/// Result of resolving one skill use.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionOutcome {
    pub actor: CombatantId,
    pub skill: SkillId,
    pub resource_spent: u32,
    pub health_spent: u32,
    /// Empty for a cast that found no valid target.
    pub targets: Vec<TargetOutcome>,
    /// Soft failures such as formula fallbacks.
    pub warnings: Vec<String>,
    pub changes: ChangeSet,
}

impl ActionOutcome {
    pub fn total_damage(&self) -> u32 {
        self.targets
            .iter()
            .filter_map(|t| t.damage.as_ref())
            .map(|d| d.amount)
            .sum()
    }

    pub fn total_healing(&self) -> u32 {
        self.targets.iter().filter_map(|t| t.healing).sum()
    }

    pub fn defeated(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.targets.iter().filter(|t| t.defeated).map(|t| t.target)
    }

    pub fn is_no_op(&self) -> bool {
        self.targets.is_empty()
    }
}
