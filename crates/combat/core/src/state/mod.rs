//! Mutable per-encounter combatant state.

mod combatant;
mod cooldown;
mod delta;
mod roster;
mod status;

pub use combatant::{Combatant, Controller, Faction};
pub use cooldown::Cooldowns;
pub use delta::{ChangeSet, CombatantFields};
pub use roster::Roster;
pub use status::{ApplyOutcome, StatusEffects, StatusInstance};
