//! Event payloads for the turn and lifecycle topics.

use combat_core::{ChangeSet, CombatResult, CombatantId, SkillId, SkipReason};
use serde::{Deserialize, Serialize};

/// Turn progress, one event per turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TurnEvent {
    /// A human-controlled combatant must decide.
    AwaitingInput { actor: CombatantId, round: u32 },

    /// A combatant acted. `skill` is `None` for passes and escape attempts.
    Acted {
        actor: CombatantId,
        round: u32,
        skill: Option<SkillId>,
        /// Combatant fields the action touched, for partial redraws.
        changes: ChangeSet,
    },

    /// A combatant lost its turn.
    Skipped {
        actor: CombatantId,
        round: u32,
        reason: SkipReason,
    },
}

/// Encounter start and end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    Started { encounter: String, combatants: usize },

    Finished {
        encounter: String,
        result: CombatResult,
        rounds: u32,
        /// Narrative node the story resumes at.
        node: String,
    },
}
