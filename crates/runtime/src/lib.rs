//! Async orchestration for combat encounters.
//!
//! This crate drives a `combat-core` session turn by turn: it sources human
//! decisions through [`ActionProvider`] implementations, paces AI turns for
//! presentation, mirrors the combat log through `tracing`, publishes events on
//! a topic-based bus, and hands rewards and routing signals to the host's
//! collaborators once an encounter ends. Consumers embed [`CombatRuntime`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`rng`] adapts a ChaCha generator to the engine's RNG oracle
pub mod api;
pub mod events;
pub mod rng;
pub mod runtime;

pub use api::{
    ActionProvider, AutoPilotProvider, BattleView, ChannelActionProvider, LedgerTotals, LoggingRouter,
    NarrativeRouter, PassActionProvider, Result, RewardLedger, RouteLog, RuntimeError,
    RuntimeHandle, ScriptedActionProvider,
};
pub use events::{Event, EventBus, LifecycleEvent, Topic, TurnEvent};
pub use rng::SeededRng;
pub use runtime::{CombatRuntime, RuntimeBuilder, RuntimeConfig};
