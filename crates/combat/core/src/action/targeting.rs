//! Target resolution for each targeting mode.

use crate::ids::CombatantId;
use crate::registry::{SkillDefinition, TargetingMode};
use crate::state::{Combatant, Roster};

use super::error::{ActionError, TargetIssue};

/// Living combatants a skill cast by `actor` may affect, in roster order.
pub fn target_pool(roster: &Roster, actor: &Combatant, mode: TargetingMode) -> Vec<CombatantId> {
    match mode {
        TargetingMode::SelfOnly => {
            if actor.is_alive() {
                vec![actor.id]
            } else {
                Vec::new()
            }
        }
        TargetingMode::SingleAlly | TargetingMode::AllAllies => {
            roster.living_allies_of(actor.faction).map(|c| c.id).collect()
        }
        TargetingMode::SingleEnemy | TargetingMode::AllEnemies => {
            roster.living_enemies_of(actor.faction).map(|c| c.id).collect()
        }
        TargetingMode::All => roster.living().map(|c| c.id).collect(),
    }
}

/// Resolves the effective target set without mutating anything.
///
/// Single-target modes need `explicit` unless the pool is empty, in which case
/// the cast resolves against nobody. Group modes ignore `explicit`.
pub fn resolve_targets(
    roster: &Roster,
    actor: &Combatant,
    skill: &SkillDefinition,
    explicit: Option<CombatantId>,
) -> Result<Vec<CombatantId>, ActionError> {
    let pool = target_pool(roster, actor, skill.targeting);

    if !skill.targeting.requires_target() {
        return Ok(pool);
    }
    if pool.is_empty() {
        return Ok(pool);
    }

    let target = explicit.ok_or_else(|| ActionError::TargetRequired(skill.id.clone()))?;
    if pool.contains(&target) {
        return Ok(vec![target]);
    }

    let issue = match roster.get(target) {
        None => TargetIssue::NotFound,
        Some(c) if !c.is_alive() => TargetIssue::Defeated,
        Some(_) => TargetIssue::WrongSide,
    };
    Err(ActionError::InvalidTarget { target, issue })
}
