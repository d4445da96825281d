use crate::error::{CombatError, ErrorSeverity};
use crate::ids::{CombatantId, SkillId};

/// Why an explicit target was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetIssue {
    NotFound,
    Defeated,
    WrongSide,
}

/// A rejected action request. Raised before any state is mutated.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    #[error("combatant {0} is not part of this encounter")]
    ActorNotFound(CombatantId),

    #[error("combatant {0} has been defeated")]
    ActorDefeated(CombatantId),

    #[error("it is not {actor}'s turn")]
    NotYourTurn {
        actor: CombatantId,
        expected: Option<CombatantId>,
    },

    #[error("combat is already over")]
    CombatOver,

    #[error("skill '{0}' is not registered")]
    UnknownSkill(SkillId),

    #[error("{actor} does not know skill '{skill}'")]
    SkillNotKnown { actor: CombatantId, skill: SkillId },

    #[error("skill '{skill}' costs {required} resource, {available} available")]
    InsufficientResource {
        skill: SkillId,
        required: u32,
        available: u32,
    },

    #[error("skill '{skill}' costs {cost} health, caster has {current}")]
    InsufficientHealth {
        skill: SkillId,
        cost: u32,
        current: u32,
    },

    #[error("skill '{skill}' is on cooldown for {remaining} more turn(s)")]
    OnCooldown { skill: SkillId, remaining: u32 },

    #[error("skill '{0}' needs an explicit target")]
    TargetRequired(SkillId),

    #[error("invalid target {target}: {issue}")]
    InvalidTarget {
        target: CombatantId,
        issue: TargetIssue,
    },

    #[error("escape is not allowed in this encounter")]
    EscapeNotAllowed,

    #[error("only the player's side can attempt to escape")]
    EscapeNotAvailable,
}

impl CombatError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ActionError::InsufficientResource { .. }
            | ActionError::InsufficientHealth { .. }
            | ActionError::OnCooldown { .. }
            | ActionError::TargetRequired(_)
            | ActionError::InvalidTarget { .. } => ErrorSeverity::Recoverable,
            ActionError::CombatOver => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ActionError::ActorNotFound(_) => "ACTION_ACTOR_NOT_FOUND",
            ActionError::ActorDefeated(_) => "ACTION_ACTOR_DEFEATED",
            ActionError::NotYourTurn { .. } => "ACTION_NOT_YOUR_TURN",
            ActionError::CombatOver => "ACTION_COMBAT_OVER",
            ActionError::UnknownSkill(_) => "ACTION_UNKNOWN_SKILL",
            ActionError::SkillNotKnown { .. } => "ACTION_SKILL_NOT_KNOWN",
            ActionError::InsufficientResource { .. } => "ACTION_INSUFFICIENT_RESOURCE",
            ActionError::InsufficientHealth { .. } => "ACTION_INSUFFICIENT_HEALTH",
            ActionError::OnCooldown { .. } => "ACTION_ON_COOLDOWN",
            ActionError::TargetRequired(_) => "ACTION_TARGET_REQUIRED",
            ActionError::InvalidTarget { .. } => "ACTION_INVALID_TARGET",
            ActionError::EscapeNotAllowed => "ACTION_ESCAPE_NOT_ALLOWED",
            ActionError::EscapeNotAvailable => "ACTION_ESCAPE_NOT_AVAILABLE",
        }
    }
}
