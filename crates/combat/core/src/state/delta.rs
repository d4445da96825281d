use std::collections::BTreeMap;

use bitflags::bitflags;

use crate::ids::CombatantId;

bitflags! {
    /// Tracks which parts of a [`super::Combatant`] changed during a turn.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CombatantFields: u8 {
        const HEALTH    = 1 << 0;
        const RESOURCE  = 1 << 1;
        const STATUSES  = 1 << 2;
        const COOLDOWNS = 1 << 3;
        const DEFEATED  = 1 << 4;
    }
}

/// Accumulated field changes per combatant.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChangeSet {
    changes: BTreeMap<CombatantId, CombatantFields>,
}

impl ChangeSet {
    pub fn mark(&mut self, id: CombatantId, fields: CombatantFields) {
        if fields.is_empty() {
            return;
        }
        *self.changes.entry(id).or_default() |= fields;
    }

    pub fn merge(&mut self, other: &ChangeSet) {
        for (&id, &fields) in &other.changes {
            self.mark(id, fields);
        }
    }

    pub fn get(&self, id: CombatantId) -> CombatantFields {
        self.changes.get(&id).copied().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CombatantId, CombatantFields)> + '_ {
        self.changes.iter().map(|(&id, &fields)| (id, fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_accumulate_per_combatant() {
        let mut changes = ChangeSet::default();
        changes.mark(CombatantId(1), CombatantFields::HEALTH);
        changes.mark(CombatantId(1), CombatantFields::STATUSES);
        changes.mark(CombatantId(2), CombatantFields::empty());

        assert_eq!(
            changes.get(CombatantId(1)),
            CombatantFields::HEALTH | CombatantFields::STATUSES
        );
        assert_eq!(changes.iter().count(), 1);
    }
}
