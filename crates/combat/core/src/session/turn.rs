use crate::action::ActionOutcome;
use crate::ai::Decision;
use crate::combat::EscapeRoll;
use crate::ids::{CombatantId, SkillId};
use crate::log::SkipReason;

use super::lifecycle::CombatResult;

/// What an acting combatant does with its turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    UseSkill {
        skill: SkillId,
        target: Option<CombatantId>,
    },
    /// Attempt to flee (player side only).
    Escape,
    Pass,
}

/// An action request for the active combatant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatAction {
    pub actor: CombatantId,
    pub kind: ActionKind,
}

impl CombatAction {
    pub fn use_skill(actor: CombatantId, skill: impl Into<SkillId>, target: Option<CombatantId>) -> Self {
        Self {
            actor,
            kind: ActionKind::UseSkill {
                skill: skill.into(),
                target,
            },
        }
    }

    pub fn escape(actor: CombatantId) -> Self {
        Self {
            actor,
            kind: ActionKind::Escape,
        }
    }

    pub fn pass(actor: CombatantId) -> Self {
        Self {
            actor,
            kind: ActionKind::Pass,
        }
    }
}

/// What the active combatant did.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionReport {
    Skill(ActionOutcome),
    Escape(EscapeRoll),
    Pass,
}

/// Summary of one completed turn.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnReport {
    pub actor: CombatantId,
    pub round: u32,
    pub action: ActionReport,
    /// Scores behind an AI-chosen action.
    pub decision: Option<Decision>,
    /// Set when this turn ended the encounter.
    pub result: Option<CombatResult>,
}

/// Result of [`super::CombatSession::begin_turn`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnPhase {
    /// `actor` must now submit an action.
    Ready(CombatantId),
    /// `actor`'s turn ended during start-of-turn processing.
    Skipped {
        actor: CombatantId,
        reason: SkipReason,
    },
    Finished(CombatResult),
}

/// Result of [`super::CombatSession::advance_one_turn`].
#[derive(Clone, Debug, PartialEq)]
pub enum TurnStep {
    /// An AI-controlled combatant acted.
    Acted(TurnReport),
    Skipped {
        actor: CombatantId,
        reason: SkipReason,
    },
    /// A human-controlled combatant must submit an action.
    AwaitingInput(CombatantId),
    Finished(CombatResult),
}
