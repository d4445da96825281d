//! Owned snapshot handed to action providers.

use combat_core::{CombatSession, CombatantId, Roster, SkillId, Weather};

/// What a deciding combatant can see. Cloned out of the session so providers
/// can await freely.
#[derive(Debug, Clone)]
pub struct BattleView {
    pub encounter: String,
    pub round: u32,
    pub actor: CombatantId,
    pub roster: Roster,
    pub weather: Weather,
    /// Skills the actor can use right now, basic attack first.
    pub usable: Vec<SkillId>,
    /// Rendered log lines of the current round.
    pub recent: Vec<String>,
}

impl BattleView {
    pub fn capture(session: &CombatSession, actor: CombatantId) -> Self {
        let round = session.round();
        Self {
            encounter: session.encounter_id().to_string(),
            round,
            actor,
            roster: session.roster().clone(),
            weather: session.battlefield().weather,
            usable: session.usable_skills(actor).into_iter().map(|s| s.id.clone()).collect(),
            recent: session
                .log()
                .entries()
                .iter()
                .filter(|entry| entry.round == round)
                .map(|entry| entry.text.clone())
                .collect(),
        }
    }

    /// Living opponents of the actor.
    pub fn enemies(&self) -> Vec<CombatantId> {
        match self.roster.get(self.actor) {
            Some(actor) => self.roster.living_enemies_of(actor.faction).map(|c| c.id).collect(),
            None => Vec::new(),
        }
    }
}
