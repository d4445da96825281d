use std::collections::BTreeMap;

use crate::ids::SkillId;

/// Remaining cooldown per skill, counted in the owner's turns.
///
/// A skill with cooldown `N` is unavailable for the owner's next `N` turns.
/// The counter is set when the skill is used and decremented at the end of
/// every later turn of the owner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cooldowns {
    remaining: BTreeMap<SkillId, u32>,
}

impl Cooldowns {
    pub fn remaining(&self, skill: &str) -> u32 {
        self.remaining.get(skill).copied().unwrap_or(0)
    }

    pub fn is_ready(&self, skill: &str) -> bool {
        self.remaining(skill) == 0
    }

    /// Starts a cooldown. Zero clears it.
    pub fn start(&mut self, skill: &SkillId, turns: u32) {
        if turns == 0 {
            self.remaining.remove(skill.as_str());
        } else {
            self.remaining.insert(skill.clone(), turns);
        }
    }

    /// End-of-turn decay. The skill used this turn keeps its fresh counter.
    pub fn tick_except(&mut self, used: Option<&SkillId>) {
        self.remaining.retain(|skill, turns| {
            if Some(skill) != used {
                *turns = turns.saturating_sub(1);
            }
            *turns > 0
        });
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SkillId, u32)> {
        self.remaining.iter().map(|(skill, &turns)| (skill, turns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_blocks_the_next_n_turns() {
        let heal = SkillId::from("heal");
        let mut cooldowns = Cooldowns::default();

        cooldowns.start(&heal, 2);
        cooldowns.tick_except(Some(&heal));
        assert_eq!(cooldowns.remaining("heal"), 2);

        cooldowns.tick_except(None);
        assert!(!cooldowns.is_ready("heal"));

        cooldowns.tick_except(None);
        assert!(cooldowns.is_ready("heal"));
        assert!(cooldowns.is_empty());
    }
}
