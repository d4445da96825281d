use crate::error::{CombatError, ErrorSeverity};

/// Lifecycle misuse and unplayable encounters.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("encounter '{0}' has no enemies")]
    NoEnemies(String),

    #[error("encounter '{0}' has nobody on the player's side")]
    NoParty(String),

    #[error("a combat session is already active")]
    AlreadyActive,

    #[error("no combat session is active")]
    NotActive,

    #[error("the active combat has not reached a result yet")]
    NotFinished,
}

impl CombatError for SessionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            SessionError::NoEnemies(_) | SessionError::NoParty(_) => ErrorSeverity::Validation,
            SessionError::AlreadyActive | SessionError::NotActive | SessionError::NotFinished => {
                ErrorSeverity::Recoverable
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SessionError::NoEnemies(_) => "SESSION_NO_ENEMIES",
            SessionError::NoParty(_) => "SESSION_NO_PARTY",
            SessionError::AlreadyActive => "SESSION_ALREADY_ACTIVE",
            SessionError::NotActive => "SESSION_NOT_ACTIVE",
            SessionError::NotFinished => "SESSION_NOT_FINISHED",
        }
    }
}
