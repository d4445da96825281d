//! Utility-scoring decision engine for AI-controlled combatants.
//!
//! Every usable skill (basic attack first) is scored with a [`Score`] whose
//! components are kept separate for debugging. The highest total wins; ties go
//! to the candidate enumerated first. The winner's target is then picked by
//! the actor's [`TargetPreference`].

mod decide;
mod profile;
mod scoring;

pub use decide::{AiContext, Decision, choose_action, select_target};
pub use profile::{BehaviorProfile, ProfileKind, RiskTolerance, TargetPreference};
pub use scoring::{Score, score_skill};
