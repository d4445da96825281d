use crate::config::EngineConfig;
use crate::rng::RngOracle;

/// A percentage roll and whether it succeeded.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackRoll {
    pub roll: f64,
    pub threshold: f64,
    pub success: bool,
}

/// Accuracy check: hits when `uniform(0, 100) <= accuracy + bonus`.
pub fn check_hit(rng: &mut dyn RngOracle, accuracy: f64, bonus: f64) -> AttackRoll {
    let roll = rng.percent();
    let threshold = accuracy + bonus;
    AttackRoll {
        roll,
        threshold,
        success: roll <= threshold,
    }
}

/// Critical check: crits when `uniform(0, 100) < chance`.
pub fn check_critical(rng: &mut dyn RngOracle, chance: f64) -> AttackRoll {
    check_proc(rng, chance)
}

/// Status proc check: applies when `uniform(0, 100) < chance`.
///
/// A chance of 100 always procs and 0 never does.
pub fn check_proc(rng: &mut dyn RngOracle, chance: f64) -> AttackRoll {
    let roll = rng.percent();
    AttackRoll {
        roll,
        threshold: chance,
        success: roll < chance,
    }
}

/// Result of a d20 escape attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EscapeRoll {
    pub roll: u32,
    pub difficulty: u32,
    pub success: bool,
}

/// Escape check: succeeds when a d20 roll meets the difficulty.
pub fn check_escape(rng: &mut dyn RngOracle, difficulty: u32) -> EscapeRoll {
    let roll = rng.roll_die(EngineConfig::ESCAPE_DIE);
    EscapeRoll {
        roll,
        difficulty,
        success: roll >= difficulty,
    }
}
