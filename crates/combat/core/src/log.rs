//! Ordered, human-readable combat log.
//!
//! Every entry keeps the structured [`CombatEvent`] next to the text rendered
//! when it was recorded, so presentation layers can either print the text or
//! react to the event.

use std::fmt;

use crate::combat::EscapeRoll;
use crate::ids::{CombatantId, SkillId, StatusId};
use crate::session::CombatResult;
use crate::state::ApplyOutcome;

/// Why a combatant lost its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkipReason {
    /// An active effect prevents action.
    Prevented,
    /// Start-of-turn ticks were lethal.
    Defeated,
}

/// Structured log event.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    CombatStarted {
        encounter: String,
        combatants: usize,
    },
    RoundStarted {
        round: u32,
        order: Vec<CombatantId>,
    },
    TurnStarted {
        actor: CombatantId,
    },
    StatusTicked {
        target: CombatantId,
        effect: StatusId,
        damage: u32,
        healing: u32,
    },
    StatusExpired {
        target: CombatantId,
        effect: StatusId,
    },
    TurnSkipped {
        actor: CombatantId,
        reason: SkipReason,
    },
    SkillUsed {
        actor: CombatantId,
        skill: SkillId,
        name: String,
    },
    NoTargets {
        actor: CombatantId,
        skill: SkillId,
    },
    Missed {
        actor: CombatantId,
        target: CombatantId,
    },
    Damaged {
        source: Option<CombatantId>,
        target: CombatantId,
        amount: u32,
        critical: bool,
    },
    Healed {
        target: CombatantId,
        amount: u32,
    },
    StatusApplied {
        target: CombatantId,
        effect: StatusId,
        outcome: ApplyOutcome,
    },
    StatusResisted {
        target: CombatantId,
        effect: StatusId,
    },
    Defeated {
        target: CombatantId,
    },
    EscapeAttempted {
        actor: CombatantId,
        roll: EscapeRoll,
    },
    Passed {
        actor: CombatantId,
    },
    HazardTriggered {
        hazard: String,
        target: CombatantId,
        amount: u32,
    },
    HazardExpired {
        hazard: String,
    },
    Warning(String),
    CombatEnded {
        result: CombatResult,
        round: u32,
    },
}

impl CombatEvent {
    pub fn is_warning(&self) -> bool {
        matches!(self, CombatEvent::Warning(_))
    }

    /// Renders the event, resolving combatant names through `name`.
    pub fn describe(&self, name: impl Fn(CombatantId) -> String) -> String {
        match self {
            CombatEvent::CombatStarted { encounter, combatants } => {
                format!("Combat '{encounter}' begins with {combatants} combatants.")
            }
            CombatEvent::RoundStarted { round, .. } => format!("--- Round {round} ---"),
            CombatEvent::TurnStarted { actor } => format!("{}'s turn.", name(*actor)),
            CombatEvent::StatusTicked {
                target,
                effect,
                damage,
                healing,
            } => match (damage, healing) {
                (0, 0) => format!("{} is affected by {effect}.", name(*target)),
                (d, 0) => format!("{} takes {d} damage from {effect}.", name(*target)),
                (0, h) => format!("{} recovers {h} health from {effect}.", name(*target)),
                (d, h) => format!("{} takes {d} damage and recovers {h} health from {effect}.", name(*target)),
            },
            CombatEvent::StatusExpired { target, effect } => {
                format!("{effect} wears off {}.", name(*target))
            }
            CombatEvent::TurnSkipped { actor, reason } => match reason {
                SkipReason::Prevented => format!("{} cannot act!", name(*actor)),
                SkipReason::Defeated => format!("{} succumbs before acting.", name(*actor)),
            },
            CombatEvent::SkillUsed { actor, name: skill, .. } => format!("{} uses {skill}!", name(*actor)),
            CombatEvent::NoTargets { skill, .. } => format!("{skill} finds no target."),
            CombatEvent::Missed { actor, target } => {
                format!("{} misses {}.", name(*actor), name(*target))
            }
            CombatEvent::Damaged {
                target,
                amount,
                critical,
                ..
            } => {
                let crit = if *critical { "Critical hit! " } else { "" };
                format!("{crit}{} takes {amount} damage.", name(*target))
            }
            CombatEvent::Healed { target, amount } => {
                format!("{} recovers {amount} health.", name(*target))
            }
            CombatEvent::StatusApplied { target, effect, outcome } => match outcome {
                ApplyOutcome::Applied => format!("{} is afflicted with {effect}.", name(*target)),
                ApplyOutcome::Stacked(stacks) => {
                    format!("{effect} on {} stacks to {stacks}.", name(*target))
                }
                ApplyOutcome::Refreshed => format!("{effect} on {} is refreshed.", name(*target)),
                ApplyOutcome::Rejected => format!("{} cannot hold {effect}.", name(*target)),
            },
            CombatEvent::StatusResisted { target, effect } => {
                format!("{} resists {effect}.", name(*target))
            }
            CombatEvent::Defeated { target } => format!("{} is defeated!", name(*target)),
            CombatEvent::EscapeAttempted { actor, roll } => {
                let verdict = if roll.success { "escapes" } else { "fails to escape" };
                format!(
                    "{} {verdict} (rolled {} vs {}).",
                    name(*actor),
                    roll.roll,
                    roll.difficulty
                )
            }
            CombatEvent::Passed { actor } => format!("{} waits.", name(*actor)),
            CombatEvent::HazardTriggered { hazard, target, amount } => {
                format!("{hazard} deals {amount} damage to {}.", name(*target))
            }
            CombatEvent::HazardExpired { hazard } => format!("{hazard} subsides."),
            CombatEvent::Warning(message) => format!("Warning: {message}"),
            CombatEvent::CombatEnded { result, round } => {
                format!("Combat ends in round {round}: {result}.")
            }
        }
    }
}

/// One recorded event.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    pub round: u32,
    pub event: CombatEvent,
    pub text: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Append-only event log of one session.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatLog {
    entries: Vec<LogEntry>,
}

impl CombatLog {
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries recorded at or after `cursor`, for incremental consumers.
    pub fn since(&self, cursor: usize) -> &[LogEntry] {
        &self.entries[cursor.min(self.entries.len())..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.text.as_str())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|entry| entry.event.is_warning())
    }
}
