//! Asynchronous abstraction for sourcing human decisions.
//!
//! AI-controlled combatants are decided inside the engine. Runtime users plug
//! in [`ActionProvider`] implementations for human-controlled combatants so the
//! runtime can run with UI input, scripted fixtures, or an autopilot.
use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use combat_core::{
    ActionKind, AiContext, CombatAction, CombatantId, Registry, RngOracle, choose_action,
};
use tokio::sync::{Mutex, mpsc};

use super::errors::{Result, RuntimeError};
use super::view::BattleView;
use crate::rng::SeededRng;

/// Trait for providing actions for human-controlled combatants.
///
/// Different implementations can handle:
/// - Player input (from UI/CLI)
/// - Scripted/replayed actions
/// - Testing fixtures
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Provide an action for `actor` based on a snapshot of the battle.
    async fn provide_action(&self, actor: CombatantId, view: &BattleView) -> Result<CombatAction>;
}

/// A simple action provider that always passes.
/// Useful for testing or as a fallback.
pub struct PassActionProvider;

#[async_trait]
impl ActionProvider for PassActionProvider {
    async fn provide_action(&self, actor: CombatantId, _view: &BattleView) -> Result<CombatAction> {
        Ok(CombatAction::pass(actor))
    }
}

/// Replays a fixed list of actions in order, then passes.
pub struct ScriptedActionProvider {
    script: Mutex<VecDeque<ActionKind>>,
}

impl ScriptedActionProvider {
    pub fn new(script: impl IntoIterator<Item = ActionKind>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }

    pub async fn remaining(&self) -> usize {
        self.script.lock().await.len()
    }
}

#[async_trait]
impl ActionProvider for ScriptedActionProvider {
    async fn provide_action(&self, actor: CombatantId, _view: &BattleView) -> Result<CombatAction> {
        let kind = self.script.lock().await.pop_front().unwrap_or(ActionKind::Pass);
        Ok(CombatAction { actor, kind })
    }
}

/// Receives actions from another task, typically a UI loop.
pub struct ChannelActionProvider {
    rx: Mutex<mpsc::Receiver<CombatAction>>,
}

impl ChannelActionProvider {
    /// Returns the provider and the sender the UI feeds.
    pub fn channel(buffer: usize) -> (Self, mpsc::Sender<CombatAction>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self { rx: Mutex::new(rx) }, tx)
    }
}

#[async_trait]
impl ActionProvider for ChannelActionProvider {
    async fn provide_action(&self, _actor: CombatantId, _view: &BattleView) -> Result<CombatAction> {
        self.rx
            .lock()
            .await
            .recv()
            .await
            .ok_or(RuntimeError::ActionProviderChannelClosed)
    }
}

/// Lets the engine's decision engine play human-controlled combatants.
pub struct AutoPilotProvider {
    registry: Arc<Registry>,
    noise: f64,
    rng: Mutex<SeededRng>,
}

impl AutoPilotProvider {
    pub fn new(registry: Arc<Registry>, noise: f64, seed: u64) -> Self {
        Self {
            registry,
            noise,
            rng: Mutex::new(SeededRng::new(seed)),
        }
    }
}

#[async_trait]
impl ActionProvider for AutoPilotProvider {
    async fn provide_action(&self, actor: CombatantId, view: &BattleView) -> Result<CombatAction> {
        let Some(combatant) = view.roster.get(actor) else {
            return Ok(CombatAction::pass(actor));
        };
        let ctx = AiContext {
            actor: combatant,
            roster: &view.roster,
            registry: &self.registry,
            weather: view.weather,
        };

        let mut rng = self.rng.lock().await;
        let rng: &mut dyn RngOracle = &mut *rng;
        Ok(match choose_action(&ctx, rng, self.noise) {
            Some(decision) => CombatAction::use_skill(actor, decision.skill, decision.target),
            None => CombatAction::pass(actor),
        })
    }
}
