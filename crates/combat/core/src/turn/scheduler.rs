//! Round-based initiative scheduler.
//!
//! The queue is computed once per round. Combatants that fall mid-round keep
//! their slot but are skipped when the cursor reaches them, and are pruned
//! when the next round's queue is built.

use crate::ids::CombatantId;
use crate::rng::RngOracle;
use crate::state::{Combatant, Roster};

/// How the per-round queue is ordered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InitiativeSystem {
    /// Agility plus a uniform tiebreak, descending.
    #[default]
    Agility,
    /// The tiebreak draw alone.
    Random,
    /// Roster order without any draw.
    Fixed,
}

/// Orders the living combatants for one round.
///
/// Draws exactly one tiebreak per living combatant, in roster order, unless
/// the system is [`InitiativeSystem::Fixed`]. The sort is stable, so equal
/// keys keep roster order.
pub fn compute_turn_order<'a>(
    combatants: impl IntoIterator<Item = &'a Combatant>,
    system: InitiativeSystem,
    tiebreak_span: f64,
    rng: &mut dyn RngOracle,
) -> Vec<CombatantId> {
    let living = combatants.into_iter().filter(|c| c.is_alive());

    if system == InitiativeSystem::Fixed {
        return living.map(|c| c.id).collect();
    }

    let mut keyed: Vec<(CombatantId, f64)> = living
        .map(|c| {
            let tiebreak = rng.uniform(0.0, tiebreak_span);
            let key = match system {
                InitiativeSystem::Agility => c.stats.agility + tiebreak,
                _ => tiebreak,
            };
            (c.id, key)
        })
        .collect();

    keyed.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    keyed.into_iter().map(|(id, _)| id).collect()
}

/// Result of asking the scheduler for the next actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    Turn(CombatantId),
    /// The cursor ran past the end of the queue.
    RoundComplete,
}

/// Queue, cursor and round counter of one session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnScheduler {
    system: InitiativeSystem,
    tiebreak_span: f64,
    round: u32,
    order: Vec<CombatantId>,
    cursor: usize,
    active: Option<CombatantId>,
}

impl TurnScheduler {
    pub fn new(system: InitiativeSystem, tiebreak_span: f64) -> Self {
        Self {
            system,
            tiebreak_span,
            round: 0,
            order: Vec::new(),
            cursor: 0,
            active: None,
        }
    }

    /// Builds the round-1 queue.
    pub fn start(&mut self, roster: &Roster, rng: &mut dyn RngOracle) -> usize {
        self.round = 0;
        self.next_round(roster, rng)
    }

    /// Increments the round, rebuilds the queue from the living and resets the
    /// cursor. Returns the new queue length.
    pub fn next_round(&mut self, roster: &Roster, rng: &mut dyn RngOracle) -> usize {
        self.round += 1;
        self.order = compute_turn_order(roster.iter(), self.system, self.tiebreak_span, rng);
        self.cursor = 0;
        self.active = None;
        self.order.len()
    }

    /// Moves the cursor to the next living combatant in the queue.
    pub fn next_turn(&mut self, roster: &Roster) -> Advance {
        while let Some(&id) = self.order.get(self.cursor) {
            self.cursor += 1;
            if roster.is_alive(id) {
                self.active = Some(id);
                return Advance::Turn(id);
            }
        }
        self.active = None;
        Advance::RoundComplete
    }

    /// The combatant whose turn is in progress.
    pub fn active(&self) -> Option<CombatantId> {
        self.active
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn order(&self) -> &[CombatantId] {
        &self.order
    }

    /// Queue entries after the active turn that are still alive.
    pub fn upcoming<'a>(&'a self, roster: &'a Roster) -> impl Iterator<Item = CombatantId> + 'a {
        self.order[self.cursor.min(self.order.len())..]
            .iter()
            .copied()
            .filter(move |&id| roster.is_alive(id))
    }

    pub fn system(&self) -> InitiativeSystem {
        self.system
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{PcgRng, ScriptedRng};
    use crate::state::Faction;
    use crate::stats::{ResourceMeter, StatBlock, StatKind};

    fn fighter(id: u32, agility: f64) -> Combatant {
        Combatant::new(
            CombatantId(id),
            format!("F{id}"),
            if id % 2 == 0 { Faction::Player } else { Faction::Enemy },
            StatBlock::uniform(5.0).with(StatKind::Agility, agility),
        )
    }

    #[test]
    fn faster_combatants_act_first() {
        let roster = Roster::new(vec![fighter(0, 3.0), fighter(1, 20.0), fighter(2, 10.0)]);
        let mut rng = ScriptedRng::constant(0.5);
        let order = compute_turn_order(roster.iter(), InitiativeSystem::Agility, 5.0, &mut rng);
        assert_eq!(order, vec![CombatantId(1), CombatantId(2), CombatantId(0)]);
    }

    #[test]
    fn equal_keys_keep_roster_order() {
        let roster = Roster::new(vec![fighter(0, 10.0), fighter(1, 10.0), fighter(2, 10.0)]);
        for _ in 0..2 {
            let mut rng = ScriptedRng::constant(0.25);
            let order = compute_turn_order(roster.iter(), InitiativeSystem::Agility, 5.0, &mut rng);
            assert_eq!(order, vec![CombatantId(0), CombatantId(1), CombatantId(2)]);
        }
    }

    #[test]
    fn same_seed_same_order() {
        let roster = Roster::new((0..6).map(|i| fighter(i, 10.0)).collect());
        let a = compute_turn_order(roster.iter(), InitiativeSystem::Agility, 5.0, &mut PcgRng::new(3));
        let b = compute_turn_order(roster.iter(), InitiativeSystem::Agility, 5.0, &mut PcgRng::new(3));
        assert_eq!(a, b);
    }

    #[test]
    fn dead_are_excluded_and_living_appear_once() {
        let mut dead = fighter(1, 50.0);
        dead.health = ResourceMeter::new(0, 100);
        let roster = Roster::new(vec![fighter(0, 1.0), dead, fighter(2, 2.0)]);

        let mut rng = PcgRng::new(11);
        let order = compute_turn_order(roster.iter(), InitiativeSystem::Agility, 5.0, &mut rng);
        assert_eq!(order.len(), 2);
        assert!(!order.contains(&CombatantId(1)));
    }

    #[test]
    fn fixed_initiative_uses_roster_order_without_draws() {
        let roster = Roster::new(vec![fighter(0, 1.0), fighter(1, 99.0)]);
        let mut rng = ScriptedRng::new([0.1, 0.2]);
        let order = compute_turn_order(roster.iter(), InitiativeSystem::Fixed, 5.0, &mut rng);
        assert_eq!(order, vec![CombatantId(0), CombatantId(1)]);
        assert_eq!(rng.remaining(), 2);
    }

    #[test]
    fn cursor_skips_mid_round_casualties() {
        let mut roster = Roster::new(vec![fighter(0, 30.0), fighter(1, 20.0), fighter(2, 10.0)]);
        let mut rng = ScriptedRng::constant(0.0);
        let mut scheduler = TurnScheduler::new(InitiativeSystem::Agility, 5.0);
        assert_eq!(scheduler.start(&roster, &mut rng), 3);
        assert_eq!(scheduler.round(), 1);

        assert_eq!(scheduler.next_turn(&roster), Advance::Turn(CombatantId(0)));
        roster.get_mut(CombatantId(1)).unwrap().health.deplete(u32::MAX);
        assert_eq!(scheduler.next_turn(&roster), Advance::Turn(CombatantId(2)));
        assert_eq!(scheduler.next_turn(&roster), Advance::RoundComplete);

        assert_eq!(scheduler.next_round(&roster, &mut rng), 2);
        assert_eq!(scheduler.round(), 2);
        assert_eq!(scheduler.order(), &[CombatantId(0), CombatantId(2)]);
    }
}
