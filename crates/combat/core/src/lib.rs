//! Deterministic turn-based combat engine.
//!
//! `combat-core` owns the canonical combat rules: skill and status registries,
//! stat formulas, the action pipeline, initiative, start-of-turn ticks, the
//! utility AI and the encounter lifecycle. It performs no I/O; hosts load
//! content through `combat-content` and drive a [`CombatSession`] one turn at a
//! time. Every random draw flows through the session's [`RngOracle`], so a
//! seeded oracle replays an encounter exactly.
pub mod action;
pub mod ai;
pub mod combat;
pub mod config;
pub mod error;
pub mod formula;
pub mod ids;
pub mod log;
pub mod registry;
pub mod rng;
pub mod session;
pub mod state;
pub mod stats;
pub mod turn;

pub use action::{ActionError, ActionOutcome, Resolver, TargetIssue, TargetOutcome};
pub use ai::{
    AiContext, BehaviorProfile, Decision, ProfileKind, Score, TargetPreference, choose_action,
};
pub use combat::{Affinities, DamageRoll, DamageType};
pub use config::EngineConfig;
pub use error::{CombatError, ErrorSeverity};
pub use formula::{Formula, FormulaError};
pub use ids::{CombatantId, SkillId, StatusId};
pub use log::{CombatEvent, CombatLog, LogEntry, SkipReason};
pub use registry::{
    EffectCategory, Registry, RegistryBuilder, RegistryError, SkillDefinition, StatusApplication,
    StatusEffectDefinition, TargetingMode,
};
pub use rng::{PcgRng, RngOracle, ScriptedRng, compute_seed};
pub use session::{
    ActionKind, ActionReport, Battlefield, BattlefieldConfig, CombatAction, CombatLifecycle,
    CombatResult, CombatSession, CombatSummary, CombatantSpec, DiscardRewards, EncounterConfig,
    EnvironmentalHazard, EscapeRule, HazardScope, HazardTrigger, ItemGrant, RewardGrant,
    RewardSink, RoutingSignal, Routes, SessionError, TurnPhase, TurnReport, TurnStep, Weather,
};
pub use state::{ChangeSet, Combatant, CombatantFields, Controller, Faction, Roster};
pub use stats::{ResourceMeter, StatBlock, StatKind};
pub use turn::InitiativeSystem;
