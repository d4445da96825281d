//! Damage math and roll checks shared by the resolution pipeline and hazards.

mod damage;
mod hit;

pub use damage::{Affinities, DamageRoll, DamageType};
pub use hit::{AttackRoll, EscapeRoll, check_critical, check_escape, check_hit, check_proc};
