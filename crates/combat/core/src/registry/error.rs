use crate::error::{CombatError, ErrorSeverity};
use crate::ids::{SkillId, StatusId};

/// Content rejected while building a [`super::Registry`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("skill '{0}' is defined more than once")]
    DuplicateSkill(SkillId),

    #[error("status effect '{0}' is defined more than once")]
    DuplicateStatus(StatusId),

    #[error("skill '{skill}' applies unknown status effect '{effect}'")]
    UnknownStatusEffect { skill: SkillId, effect: StatusId },

    #[error("skill '{skill}' has {field} {value} outside 0-100")]
    InvalidPercentage {
        skill: SkillId,
        field: &'static str,
        value: f64,
    },

    #[error("skill '{skill}' has critical multiplier {value} below 1.0")]
    InvalidCriticalMultiplier { skill: SkillId, value: f64 },

    #[error("skill '{skill}' applies '{effect}' for zero rounds")]
    ZeroDuration { skill: SkillId, effect: StatusId },

    #[error("status effect '{effect}' has damage reduction {value} outside 0-1")]
    InvalidDamageReduction { effect: StatusId, value: f64 },
}

impl CombatError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            RegistryError::DuplicateSkill(_) => "REGISTRY_DUPLICATE_SKILL",
            RegistryError::DuplicateStatus(_) => "REGISTRY_DUPLICATE_STATUS",
            RegistryError::UnknownStatusEffect { .. } => "REGISTRY_UNKNOWN_STATUS_EFFECT",
            RegistryError::InvalidPercentage { .. } => "REGISTRY_INVALID_PERCENTAGE",
            RegistryError::InvalidCriticalMultiplier { .. } => "REGISTRY_INVALID_CRIT_MULTIPLIER",
            RegistryError::ZeroDuration { .. } => "REGISTRY_ZERO_DURATION",
            RegistryError::InvalidDamageReduction { .. } => "REGISTRY_INVALID_DAMAGE_REDUCTION",
        }
    }
}
