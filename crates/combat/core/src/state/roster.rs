use crate::ids::CombatantId;

use super::combatant::{Combatant, Faction};

/// Every combatant of one session, in roster order (players, allies, enemies).
///
/// Combatants are never removed: defeated members stay with zero health so
/// ids remain stable for the whole encounter.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    members: Vec<Combatant>,
}

impl Roster {
    pub fn new(members: Vec<Combatant>) -> Self {
        Self { members }
    }

    /// Next free id.
    pub fn next_id(&self) -> CombatantId {
        CombatantId(self.members.iter().map(|c| c.id.0 + 1).max().unwrap_or(0))
    }

    pub fn push(&mut self, combatant: Combatant) {
        self.members.push(combatant);
    }

    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.members.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.members.iter_mut().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.members.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.members.iter_mut()
    }

    pub fn living(&self) -> impl Iterator<Item = &Combatant> {
        self.members.iter().filter(|c| c.is_alive())
    }

    pub fn living_in(&self, faction: Faction) -> impl Iterator<Item = &Combatant> {
        self.living().filter(move |c| c.faction == faction)
    }

    /// Living members on the same side as `faction` (players and allies share a side).
    pub fn living_allies_of(&self, faction: Faction) -> impl Iterator<Item = &Combatant> {
        self.living().filter(move |c| !c.faction.is_hostile_to(faction))
    }

    pub fn living_enemies_of(&self, faction: Faction) -> impl Iterator<Item = &Combatant> {
        self.living().filter(move |c| c.faction.is_hostile_to(faction))
    }

    pub fn any_enemy_alive(&self) -> bool {
        self.living().any(|c| c.faction == Faction::Enemy)
    }

    pub fn any_party_alive(&self) -> bool {
        self.living().any(|c| c.faction.is_party())
    }

    pub fn is_alive(&self, id: CombatantId) -> bool {
        self.get(id).is_some_and(Combatant::is_alive)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
