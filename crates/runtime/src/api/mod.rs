//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! the orchestrator can stay focused on driving encounters.

pub mod collaborators;
pub mod errors;
pub mod handle;
pub mod providers;
pub mod view;

pub use collaborators::{LedgerTotals, LoggingRouter, NarrativeRouter, RewardLedger, RouteLog};
pub use errors::{Result, RuntimeError};
pub use handle::RuntimeHandle;
pub use providers::{
    ActionProvider, AutoPilotProvider, ChannelActionProvider, PassActionProvider,
    ScriptedActionProvider,
};
pub use view::BattleView;
