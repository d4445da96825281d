//! Turn ordering and start-of-turn processing.

mod scheduler;
mod tick;

pub use scheduler::{Advance, InitiativeSystem, TurnScheduler, compute_turn_order};
pub use tick::{TickReport, process_turn_start};
