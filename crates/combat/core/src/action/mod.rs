//! Action validation and resolution.

mod available;
mod error;
mod outcome;
mod pipeline;
mod targeting;

pub use available::{can_use_skill, check_skill, usable_skills};
pub use error::{ActionError, TargetIssue};
pub use outcome::{ActionOutcome, DamageDealt, StatusProc, TargetOutcome};
pub use pipeline::Resolver;
pub use targeting::{resolve_targets, target_pool};
