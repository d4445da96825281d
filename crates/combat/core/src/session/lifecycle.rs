//! Combat lifecycle: result routing, reward delivery and the single-session guard.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::log::CombatLog;
use crate::registry::Registry;
use crate::rng::RngOracle;

use super::encounter::{CombatantSpec, EncounterConfig, RewardGrant};
use super::error::SessionError;
use super::CombatSession;

/// How an encounter ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CombatResult {
    Victory,
    Defeat,
    Escape,
    TimeLimit,
    Draw,
}

impl CombatResult {
    /// Whether the party came out on top.
    pub fn is_victory(self) -> bool {
        self == CombatResult::Victory
    }
}

/// Tells the narrative layer where to resume.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutingSignal {
    pub encounter: String,
    pub result: CombatResult,
    pub node: String,
}

/// Receives victory rewards (party experience, inventory, currency).
pub trait RewardSink {
    fn grant(&mut self, rewards: &RewardGrant);
}

/// Sink that drops rewards.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiscardRewards;

impl RewardSink for DiscardRewards {
    fn grant(&mut self, _rewards: &RewardGrant) {}
}

/// Final state of a finished encounter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatSummary {
    pub encounter: String,
    pub result: CombatResult,
    pub rounds: u32,
    pub routing: RoutingSignal,
    /// Rewards handed to the sink; `None` unless the party won.
    pub rewards: Option<RewardGrant>,
    /// Name and remaining health of every living combatant.
    pub survivors: Vec<(String, u32)>,
    pub log: CombatLog,
}

/// At most one combat is active at a time.
#[derive(Debug, Default)]
pub enum CombatLifecycle {
    #[default]
    Inactive,
    Active(Box<CombatSession>),
}

impl CombatLifecycle {
    pub fn new() -> Self {
        Self::Inactive
    }

    /// Instantiates `encounter` against `party` and makes it the active combat.
    pub fn start(
        &mut self,
        encounter: &EncounterConfig,
        party: &[CombatantSpec],
        registry: Arc<Registry>,
        config: EngineConfig,
        rng: Box<dyn RngOracle>,
    ) -> Result<&mut CombatSession, SessionError> {
        if self.is_active() {
            return Err(SessionError::AlreadyActive);
        }
        let session = CombatSession::new(encounter, party, registry, config, rng)?;
        *self = CombatLifecycle::Active(Box::new(session));
        self.session_mut().ok_or(SessionError::NotActive)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, CombatLifecycle::Active(_))
    }

    pub fn session(&self) -> Option<&CombatSession> {
        match self {
            CombatLifecycle::Active(session) => Some(session),
            CombatLifecycle::Inactive => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut CombatSession> {
        match self {
            CombatLifecycle::Active(session) => Some(session),
            CombatLifecycle::Inactive => None,
        }
    }

    /// Tears down a finished session, delivering victory rewards to `sink`.
    ///
    /// The lifecycle returns to inactive on success. An unfinished session is
    /// left in place.
    pub fn finish(&mut self, sink: &mut dyn RewardSink) -> Result<CombatSummary, SessionError> {
        match std::mem::take(self) {
            CombatLifecycle::Inactive => Err(SessionError::NotActive),
            CombatLifecycle::Active(session) => match session.result() {
                Some(_) => (*session).into_summary(sink),
                None => {
                    *self = CombatLifecycle::Active(session);
                    Err(SessionError::NotFinished)
                }
            },
        }
    }
}
