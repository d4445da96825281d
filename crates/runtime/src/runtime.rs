//! High-level runtime orchestrator.
//!
//! The runtime owns the combat lifecycle, sources human decisions from an
//! [`ActionProvider`], mirrors the combat log onto the event bus and `tracing`,
//! and exposes a builder-based API for hosts to drive encounters.

use std::sync::Arc;
use std::time::Duration;

use combat_core::{
    ActionReport, ChangeSet, CombatAction, CombatEvent, CombatLifecycle, CombatSession, CombatError, CombatSummary,
    CombatantId, CombatantSpec, DiscardRewards, EncounterConfig, EngineConfig, LogEntry, Registry, RewardSink,
    TurnReport, TurnStep,
};

use crate::api::{
    ActionProvider, BattleView, LoggingRouter, NarrativeRouter, Result, RuntimeError,
    RuntimeHandle,
};
use crate::events::{Event, EventBus, LifecycleEvent, TurnEvent};
use crate::rng::SeededRng;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Pause after each AI turn.
    pub ai_turn_delay: Duration,
    /// Pause after each completed round.
    pub round_delay: Duration,
    pub event_buffer_size: usize,
    /// Base seed; each encounter derives its own stream from it.
    pub seed: u64,
    /// Rejected human actions tolerated per turn before the runtime passes.
    pub max_invalid_actions: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            ai_turn_delay: Duration::ZERO,
            round_delay: Duration::ZERO,
            event_buffer_size: 256,
            seed: 0,
            max_invalid_actions: 3,
        }
    }
}

/// Main runtime that drives encounters.
///
/// [`RuntimeHandle`] provides a cloneable façade for observers.
pub struct CombatRuntime {
    config: RuntimeConfig,
    registry: Arc<Registry>,
    engine: EngineConfig,
    lifecycle: CombatLifecycle,
    provider: Option<Box<dyn ActionProvider>>,
    router: Box<dyn NarrativeRouter>,
    rewards: Box<dyn RewardSink + Send>,
    bus: EventBus,
    log_cursor: usize,
    last_round: u32,
}

impl CombatRuntime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle::new(self.bus.clone())
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// The running session, if any.
    pub fn session(&self) -> Option<&CombatSession> {
        self.lifecycle.session()
    }

    /// Set the provider consulted for human-controlled combatants.
    pub fn set_provider(&mut self, provider: impl ActionProvider + 'static) {
        self.provider = Some(Box::new(provider));
    }

    /// Opens `encounter` with `party`. Fails while another encounter runs.
    pub fn start_encounter(&mut self, encounter: &EncounterConfig, party: &[CombatantSpec]) -> Result<()> {
        let rng = SeededRng::for_encounter(self.config.seed, &encounter.id);
        let session = self.lifecycle.start(
            encounter,
            party,
            Arc::clone(&self.registry),
            self.engine.clone(),
            Box::new(rng),
        )?;
        let combatants = session.roster().len();

        tracing::info!(
            encounter = %encounter.id,
            combatants,
            seed = self.config.seed,
            "encounter started"
        );
        self.log_cursor = 0;
        self.last_round = 0;
        self.bus.publish(Event::Lifecycle(LifecycleEvent::Started {
            encounter: encounter.id.clone(),
            combatants,
        }));
        self.flush_log();
        Ok(())
    }

    /// Plays one turn.
    ///
    /// Human turns await the provider. A recoverable rejection (cooldown, cost,
    /// target) is logged and asked for again until `max_invalid_actions` is
    /// reached; any other rejection passes the turn at once. Never returns
    /// [`TurnStep::AwaitingInput`].
    pub async fn step(&mut self) -> Result<TurnStep> {
        let session = self.lifecycle.session_mut().ok_or(RuntimeError::NoActiveCombat)?;

        let mut human = false;
        let step = match session.advance_one_turn() {
            TurnStep::AwaitingInput(actor) => {
                human = true;
                let provider = self
                    .provider
                    .as_deref()
                    .ok_or(RuntimeError::ProviderNotSet { actor })?;
                self.bus.publish(Event::Turn(TurnEvent::AwaitingInput {
                    actor,
                    round: session.round(),
                }));
                TurnStep::Acted(Self::human_turn(session, provider, actor, self.config.max_invalid_actions).await?)
            }
            step => step,
        };

        match &step {
            TurnStep::Acted(report) => self.publish_turn(report),
            TurnStep::Skipped { actor, reason } => {
                self.bus.publish(Event::Turn(TurnEvent::Skipped {
                    actor: *actor,
                    round: self.current_round(),
                    reason: *reason,
                }));
            }
            TurnStep::Finished(_) | TurnStep::AwaitingInput(_) => {}
        }

        self.flush_log();
        if !matches!(step, TurnStep::Finished(_)) {
            self.pace(human).await;
        }
        Ok(step)
    }

    /// Steps until the encounter ends, then finishes it.
    pub async fn run_to_completion(&mut self) -> Result<CombatSummary> {
        loop {
            if let TurnStep::Finished(_) = self.step().await? {
                break;
            }
        }
        self.finish()
    }

    /// Starts `encounter` and plays it to the end.
    pub async fn run_encounter(
        &mut self,
        encounter: &EncounterConfig,
        party: &[CombatantSpec],
    ) -> Result<CombatSummary> {
        self.start_encounter(encounter, party)?;
        self.run_to_completion().await
    }

    /// Closes a decided encounter: grants rewards, routes and publishes.
    pub fn finish(&mut self) -> Result<CombatSummary> {
        self.flush_log();
        let summary = self.lifecycle.finish(self.rewards.as_mut())?;

        tracing::info!(
            encounter = %summary.encounter,
            result = %summary.result,
            rounds = summary.rounds,
            node = %summary.routing.node,
            "encounter finished"
        );
        self.router.route(&summary.routing);
        self.bus.publish(Event::Lifecycle(LifecycleEvent::Finished {
            encounter: summary.encounter.clone(),
            result: summary.result,
            rounds: summary.rounds,
            node: summary.routing.node.clone(),
        }));
        Ok(summary)
    }

    async fn human_turn(
        session: &mut CombatSession,
        provider: &dyn ActionProvider,
        actor: CombatantId,
        max_invalid: u32,
    ) -> Result<TurnReport> {
        let mut rejected = 0;
        loop {
            let view = BattleView::capture(session, actor);
            let action = provider.provide_action(actor, &view).await?;
            let action = CombatAction { actor, ..action };

            match session.submit(action) {
                Ok(report) => return Ok(report),
                Err(error) => {
                    let severity = error.severity();
                    if severity.is_internal() {
                        return Err(error.into());
                    }
                    rejected += 1;
                    let code = error.error_code();
                    tracing::warn!(%actor, %error, code, attempt = rejected, "action rejected");
                    session.warn(format!("action for {actor} rejected ({code}): {error}"));
                    if !severity.is_recoverable() || rejected >= max_invalid.max(1) {
                        return Ok(session.force_pass(actor));
                    }
                }
            }
        }
    }

    fn publish_turn(&self, report: &TurnReport) {
        if let Some(decision) = &report.decision {
            for (skill, score) in &decision.candidates {
                tracing::debug!(actor = %report.actor, %skill, score = score.value(), "candidate");
            }
        }
        let (skill, changes) = match &report.action {
            ActionReport::Skill(outcome) => (Some(outcome.skill.clone()), outcome.changes.clone()),
            ActionReport::Escape(_) | ActionReport::Pass => (None, ChangeSet::default()),
        };
        self.bus.publish(Event::Turn(TurnEvent::Acted {
            actor: report.actor,
            round: report.round,
            skill,
            changes,
        }));
    }

    fn current_round(&self) -> u32 {
        self.lifecycle.session().map_or(0, CombatSession::round)
    }

    /// Sleeps after AI turns and round boundaries. Zero delays skip the timer.
    async fn pace(&mut self, human: bool) {
        if !human && !self.config.ai_turn_delay.is_zero() {
            tokio::time::sleep(self.config.ai_turn_delay).await;
        }
        let round = self.current_round();
        if round > self.last_round {
            if self.last_round > 0 && !self.config.round_delay.is_zero() {
                tokio::time::sleep(self.config.round_delay).await;
            }
            self.last_round = round;
        }
    }

    /// Forwards new log entries to `tracing` and the combat topic.
    fn flush_log(&mut self) {
        let Some(session) = self.lifecycle.session() else {
            return;
        };
        let fresh = session.log().since(self.log_cursor);
        for entry in fresh {
            trace_entry(entry);
            self.bus.publish(Event::Combat(entry.clone()));
        }
        self.log_cursor += fresh.len();
    }
}

fn trace_entry(entry: &LogEntry) {
    match &entry.event {
        CombatEvent::Warning(_) => tracing::warn!(round = entry.round, "{}", entry.text),
        CombatEvent::CombatStarted { .. }
        | CombatEvent::CombatEnded { .. }
        | CombatEvent::RoundStarted { .. }
        | CombatEvent::Defeated { .. } => tracing::info!(round = entry.round, "{}", entry.text),
        _ => tracing::debug!(round = entry.round, "{}", entry.text),
    }
}

/// Builder for [`CombatRuntime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    registry: Option<Arc<Registry>>,
    engine: EngineConfig,
    provider: Option<Box<dyn ActionProvider>>,
    router: Option<Box<dyn NarrativeRouter>>,
    rewards: Option<Box<dyn RewardSink + Send>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            registry: None,
            engine: EngineConfig::default(),
            provider: None,
            router: None,
            rewards: None,
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(mut self, registry: impl Into<Arc<Registry>>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    pub fn engine_config(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    pub fn provider(mut self, provider: impl ActionProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    pub fn router(mut self, router: impl NarrativeRouter + 'static) -> Self {
        self.router = Some(Box::new(router));
        self
    }

    pub fn rewards(mut self, sink: impl RewardSink + Send + 'static) -> Self {
        self.rewards = Some(Box::new(sink));
        self
    }

    /// Builds the runtime. Without a registry only basic attacks exist.
    pub fn build(self) -> CombatRuntime {
        CombatRuntime {
            bus: EventBus::with_capacity(self.config.event_buffer_size),
            registry: self.registry.unwrap_or_else(|| Arc::new(Registry::default())),
            engine: self.engine,
            lifecycle: CombatLifecycle::new(),
            provider: self.provider,
            router: self.router.unwrap_or_else(|| Box::new(LoggingRouter)),
            rewards: self.rewards.unwrap_or_else(|| Box::new(DiscardRewards)),
            log_cursor: 0,
            last_round: 0,
            config: self.config,
        }
    }
}
