//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the combat engine and from action providers so clients
//! can bubble them up with consistent context.
use thiserror::Error;

use combat_core::{ActionError, CombatantId, SessionError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("no combat is active")]
    NoActiveCombat,

    #[error("no action provider set for human-controlled {actor}")]
    ProviderNotSet { actor: CombatantId },

    #[error("action provider channel closed")]
    ActionProviderChannelClosed,

    #[error("action provider failed: {0}")]
    Provider(String),
}
