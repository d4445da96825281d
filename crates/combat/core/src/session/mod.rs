//! Combat session: the mutable state of one encounter and its step functions.
//!
//! A session is driven one turn at a time. [`CombatSession::begin_turn`]
//! advances the queue and runs start-of-turn ticks; the active combatant then
//! acts through [`CombatSession::submit`]. [`CombatSession::advance_one_turn`]
//! combines both for AI-controlled combatants and stops whenever a human must
//! decide. Nothing here blocks or sleeps; pacing belongs to the host.

mod battlefield;
mod encounter;
mod error;
mod lifecycle;
mod turn;

use std::fmt;
use std::sync::Arc;

pub use battlefield::{
    Battlefield, EnvironmentalHazard, HazardHit, HazardScope, HazardTrigger, Weather,
};
pub use encounter::{
    BattlefieldConfig, CombatantSpec, EncounterConfig, EscapeRule, ItemGrant, RewardGrant, Routes,
};
pub use error::SessionError;
pub use lifecycle::{
    CombatLifecycle, CombatResult, CombatSummary, DiscardRewards, RewardSink, RoutingSignal,
};
pub use turn::{ActionKind, ActionReport, CombatAction, TurnPhase, TurnReport, TurnStep};

use crate::action::{ActionError, ActionOutcome, Resolver, usable_skills};
use crate::ai::{AiContext, BehaviorProfile, Decision, choose_action};
use crate::combat::check_escape;
use crate::config::EngineConfig;
use crate::ids::{CombatantId, SkillId};
use crate::log::{CombatEvent, CombatLog, LogEntry, SkipReason};
use crate::registry::{Registry, SkillDefinition};
use crate::rng::RngOracle;
use crate::state::{Combatant, Controller, Faction, Roster};
use crate::stats::ResourceMeter;
use crate::turn::{Advance, TickReport, TurnScheduler, process_turn_start};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    BetweenTurns,
    AwaitingAction(CombatantId),
    Finished,
}

/// One running encounter.
pub struct CombatSession {
    encounter_id: String,
    registry: Arc<Registry>,
    config: EngineConfig,
    rng: Box<dyn RngOracle>,
    roster: Roster,
    battlefield: Battlefield,
    scheduler: TurnScheduler,
    turn_limit: u32,
    escape: EscapeRule,
    routes: Routes,
    rewards: RewardGrant,
    phase: Phase,
    result: Option<CombatResult>,
    log: CombatLog,
}

impl fmt::Debug for CombatSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombatSession")
            .field("encounter_id", &self.encounter_id)
            .field("round", &self.scheduler.round())
            .field("phase", &self.phase)
            .field("result", &self.result)
            .field("combatants", &self.roster.len())
            .finish_non_exhaustive()
    }
}

impl CombatSession {
    /// Instantiates the encounter and opens round 1.
    ///
    /// Combatants are registered players first, then allies, then enemies.
    /// Unknown skills and behavior tags are dropped with a logged warning.
    /// Round-start hazards fire before the first turn, so the returned session
    /// may already carry a result.
    pub fn new(
        encounter: &EncounterConfig,
        party: &[CombatantSpec],
        registry: Arc<Registry>,
        config: EngineConfig,
        rng: Box<dyn RngOracle>,
    ) -> Result<Self, SessionError> {
        if encounter.enemies.is_empty() {
            return Err(SessionError::NoEnemies(encounter.id.clone()));
        }
        if party.is_empty() && encounter.allies.is_empty() {
            return Err(SessionError::NoParty(encounter.id.clone()));
        }

        let mut roster = Roster::default();
        let mut warnings = Vec::new();
        let sides = [
            (Faction::Player, party),
            (Faction::Ally, encounter.allies.as_slice()),
            (Faction::Enemy, encounter.enemies.as_slice()),
        ];
        for (faction, specs) in sides {
            for spec in specs {
                let combatant = instantiate(roster.next_id(), spec, faction, &registry, &mut warnings);
                roster.push(combatant);
            }
        }

        let battlefield = &encounter.battlefield;
        let mut session = Self {
            encounter_id: encounter.id.clone(),
            scheduler: TurnScheduler::new(encounter.initiative, config.initiative_tiebreak),
            registry,
            config,
            rng,
            roster,
            battlefield: Battlefield::new(
                battlefield.weather,
                battlefield.environment.clone(),
                battlefield.hazards.clone(),
            ),
            turn_limit: encounter.turn_limit,
            escape: encounter.escape,
            routes: encounter.routes.clone(),
            rewards: encounter.rewards.clone(),
            phase: Phase::BetweenTurns,
            result: None,
            log: CombatLog::default(),
        };

        session.record(CombatEvent::CombatStarted {
            encounter: session.encounter_id.clone(),
            combatants: session.roster.len(),
        });
        for warning in warnings {
            session.warn(warning);
        }

        session.scheduler.start(&session.roster, &mut *session.rng);
        session.open_round();
        Ok(session)
    }

    /// Advances to the next turn and runs its start-of-turn processing.
    ///
    /// Returns [`TurnPhase::Ready`] without side effects while an action is
    /// still pending.
    pub fn begin_turn(&mut self) -> TurnPhase {
        loop {
            if let Some(result) = self.result {
                return TurnPhase::Finished(result);
            }
            if let Phase::AwaitingAction(actor) = self.phase {
                return TurnPhase::Ready(actor);
            }

            let actor = match self.scheduler.next_turn(&self.roster) {
                Advance::RoundComplete => {
                    self.close_round();
                    continue;
                }
                Advance::Turn(actor) => actor,
            };

            self.record(CombatEvent::TurnStarted { actor });
            let Some(combatant) = self.roster.get_mut(actor) else {
                continue;
            };
            let report = process_turn_start(combatant, &self.registry);
            self.record_ticks(actor, &report);

            if report.defeated {
                self.record(CombatEvent::Defeated { target: actor });
                self.record(CombatEvent::TurnSkipped {
                    actor,
                    reason: SkipReason::Defeated,
                });
                self.check_decisive();
                return self.skipped(actor, SkipReason::Defeated);
            }

            if report.prevented {
                self.record(CombatEvent::TurnSkipped {
                    actor,
                    reason: SkipReason::Prevented,
                });
                self.end_turn(actor, None);
                return self.skipped(actor, SkipReason::Prevented);
            }

            self.phase = Phase::AwaitingAction(actor);
            return TurnPhase::Ready(actor);
        }
    }

    /// Executes the active combatant's action and ends its turn.
    ///
    /// Rejected actions leave the session untouched and the turn open.
    pub fn submit(&mut self, action: CombatAction) -> Result<TurnReport, ActionError> {
        if self.result.is_some() {
            return Err(ActionError::CombatOver);
        }
        let expected = match self.phase {
            Phase::AwaitingAction(actor) => Some(actor),
            Phase::BetweenTurns | Phase::Finished => None,
        };
        if expected != Some(action.actor) {
            return Err(ActionError::NotYourTurn {
                actor: action.actor,
                expected,
            });
        }

        let actor = action.actor;
        let (report, used) = match action.kind {
            ActionKind::UseSkill { skill, target } => {
                let registry = Arc::clone(&self.registry);
                let definition = registry
                    .skill(skill.as_str())
                    .ok_or(ActionError::UnknownSkill(skill))?;
                let outcome = Resolver::new(&registry, &self.config).resolve(
                    &mut self.roster,
                    &mut *self.rng,
                    actor,
                    definition,
                    target,
                )?;
                self.record_outcome(&outcome, definition);
                let used = definition.id.clone();
                (ActionReport::Skill(outcome), Some(used))
            }
            ActionKind::Escape => {
                let combatant = self.roster.get(actor).ok_or(ActionError::ActorNotFound(actor))?;
                if combatant.faction != Faction::Player {
                    return Err(ActionError::EscapeNotAvailable);
                }
                if !self.escape.allowed {
                    return Err(ActionError::EscapeNotAllowed);
                }
                let roll = check_escape(&mut *self.rng, self.escape.difficulty);
                self.record(CombatEvent::EscapeAttempted { actor, roll });
                if roll.success {
                    self.conclude(CombatResult::Escape);
                }
                (ActionReport::Escape(roll), None)
            }
            ActionKind::Pass => {
                self.record(CombatEvent::Passed { actor });
                (ActionReport::Pass, None)
            }
        };

        self.end_turn(actor, used.as_ref());
        Ok(TurnReport {
            actor,
            round: self.scheduler.round(),
            action: report,
            decision: None,
            result: self.result,
        })
    }

    /// Plays one turn, letting the AI act for non-human combatants.
    ///
    /// An AI with nothing usable passes. If the engine rejects an AI action the
    /// rejection is logged and the combatant passes instead.
    pub fn advance_one_turn(&mut self) -> TurnStep {
        let actor = match self.begin_turn() {
            TurnPhase::Finished(result) => return TurnStep::Finished(result),
            TurnPhase::Skipped { actor, reason } => return TurnStep::Skipped { actor, reason },
            TurnPhase::Ready(actor) => actor,
        };
        if self.roster.get(actor).is_some_and(Combatant::is_human) {
            return TurnStep::AwaitingInput(actor);
        }

        let decision = self.decide(actor);
        let action = match &decision {
            Some(decision) => CombatAction::use_skill(actor, decision.skill.clone(), decision.target),
            None => CombatAction::pass(actor),
        };

        let mut report = match self.submit(action) {
            Ok(report) => report,
            Err(error) => {
                self.warn(format!("AI action for {actor} rejected: {error}"));
                self.force_pass(actor)
            }
        };
        report.decision = decision;
        TurnStep::Acted(report)
    }

    /// Plays AI turns until a human must act or the encounter ends.
    pub fn advance_until_input(&mut self) -> TurnStep {
        loop {
            match self.advance_one_turn() {
                step @ (TurnStep::AwaitingInput(_) | TurnStep::Finished(_)) => return step,
                TurnStep::Acted(_) | TurnStep::Skipped { .. } => {}
            }
        }
    }

    /// Runs the decision engine for `actor` without acting.
    pub fn decide(&mut self, actor: CombatantId) -> Option<Decision> {
        let combatant = self.roster.get(actor)?;
        let ctx = AiContext {
            actor: combatant,
            roster: &self.roster,
            registry: &self.registry,
            weather: self.battlefield.weather,
        };
        choose_action(&ctx, &mut *self.rng, self.config.ai_noise)
    }

    /// Builds a read-only decision context for `actor`.
    pub fn ai_context(&self, actor: CombatantId) -> Option<AiContext<'_>> {
        Some(AiContext {
            actor: self.roster.get(actor)?,
            roster: &self.roster,
            registry: &self.registry,
            weather: self.battlefield.weather,
        })
    }

    /// Skills `actor` could use right now, basic attack first.
    pub fn usable_skills(&self, actor: CombatantId) -> Vec<&SkillDefinition> {
        self.roster
            .get(actor)
            .map(|combatant| usable_skills(combatant, &self.registry))
            .unwrap_or_default()
    }

    /// Consumes a finished session into its summary.
    ///
    /// Rewards reach `sink` only on victory.
    pub fn into_summary(self, sink: &mut dyn RewardSink) -> Result<CombatSummary, SessionError> {
        let result = self.result.ok_or(SessionError::NotFinished)?;
        let rewards = if result.is_victory() {
            sink.grant(&self.rewards);
            Some(self.rewards)
        } else {
            None
        };
        let survivors = self
            .roster
            .living()
            .map(|c| (c.name.clone(), c.health.current()))
            .collect();
        Ok(CombatSummary {
            routing: RoutingSignal {
                encounter: self.encounter_id.clone(),
                result,
                node: self.routes.node_for(result).to_string(),
            },
            encounter: self.encounter_id,
            result,
            rounds: self.scheduler.round(),
            rewards,
            survivors,
            log: self.log,
        })
    }

    pub fn encounter_id(&self) -> &str {
        &self.encounter_id
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.roster.get(id)
    }

    pub fn battlefield(&self) -> &Battlefield {
        &self.battlefield
    }

    pub fn log(&self) -> &CombatLog {
        &self.log
    }

    pub fn round(&self) -> u32 {
        self.scheduler.round()
    }

    /// Current round's queue.
    pub fn turn_order(&self) -> &[CombatantId] {
        self.scheduler.order()
    }

    /// The combatant whose action is pending, if any.
    pub fn awaiting(&self) -> Option<CombatantId> {
        match self.phase {
            Phase::AwaitingAction(actor) => Some(actor),
            Phase::BetweenTurns | Phase::Finished => None,
        }
    }

    pub fn result(&self) -> Option<CombatResult> {
        self.result
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    pub fn rewards(&self) -> &RewardGrant {
        &self.rewards
    }

    fn skipped(&self, actor: CombatantId, reason: SkipReason) -> TurnPhase {
        match self.result {
            Some(result) => TurnPhase::Finished(result),
            None => TurnPhase::Skipped { actor, reason },
        }
    }

    /// Ends the awaited turn of `actor` with a pass, bypassing validation.
    pub fn force_pass(&mut self, actor: CombatantId) -> TurnReport {
        self.record(CombatEvent::Passed { actor });
        self.end_turn(actor, None);
        TurnReport {
            actor,
            round: self.scheduler.round(),
            action: ActionReport::Pass,
            decision: None,
            result: self.result,
        }
    }

    fn end_turn(&mut self, actor: CombatantId, used: Option<&SkillId>) {
        if let Some(combatant) = self.roster.get_mut(actor) {
            combatant.cooldowns.tick_except(used);
        }
        if self.result.is_none() {
            self.phase = Phase::BetweenTurns;
            self.check_decisive();
        }
    }

    fn open_round(&mut self) {
        self.record(CombatEvent::RoundStarted {
            round: self.scheduler.round(),
            order: self.scheduler.order().to_vec(),
        });
        self.fire_hazards(HazardTrigger::RoundStart);
        self.check_decisive();
    }

    fn close_round(&mut self) {
        self.fire_hazards(HazardTrigger::RoundEnd);
        if self.check_decisive().is_some() {
            return;
        }

        let completed = self.scheduler.round();
        if self.turn_limit > 0 && completed >= self.turn_limit {
            self.conclude(CombatResult::TimeLimit);
            return;
        }
        if self.config.max_rounds_guard > 0 && completed >= self.config.max_rounds_guard {
            self.warn(format!("round guard of {completed} reached"));
            self.conclude(CombatResult::Draw);
            return;
        }

        if self.scheduler.next_round(&self.roster, &mut *self.rng) == 0 {
            self.conclude(CombatResult::Draw);
            return;
        }
        self.open_round();
    }

    /// Ends the encounter when a side has been wiped out.
    ///
    /// Mutual annihilation is checked before victory and yields a draw; a
    /// round-end hazard that kills everyone is how an encounter reaches one.
    fn check_decisive(&mut self) -> Option<CombatResult> {
        if self.result.is_some() {
            return self.result;
        }
        let enemies = self.roster.any_enemy_alive();
        let party = self.roster.any_party_alive();
        let result = match (enemies, party) {
            (false, false) => CombatResult::Draw,
            (false, true) => CombatResult::Victory,
            (true, false) => CombatResult::Defeat,
            (true, true) => return None,
        };
        self.conclude(result);
        Some(result)
    }

    fn conclude(&mut self, result: CombatResult) {
        if self.result.is_some() {
            return;
        }
        self.result = Some(result);
        self.phase = Phase::Finished;
        self.record(CombatEvent::CombatEnded {
            result,
            round: self.scheduler.round(),
        });
    }

    fn fire_hazards(&mut self, when: HazardTrigger) {
        let (hits, expired) = self.battlefield.trigger(when, &mut self.roster, &mut *self.rng);
        for hit in hits {
            self.record(CombatEvent::HazardTriggered {
                hazard: hit.hazard,
                target: hit.target,
                amount: hit.amount,
            });
            if hit.defeated {
                self.record(CombatEvent::Defeated { target: hit.target });
            }
        }
        for hazard in expired {
            self.record(CombatEvent::HazardExpired { hazard });
        }
    }

    fn record_ticks(&mut self, target: CombatantId, report: &TickReport) {
        for (effect, damage) in &report.damage {
            self.record(CombatEvent::StatusTicked {
                target,
                effect: effect.clone(),
                damage: *damage,
                healing: 0,
            });
        }
        for (effect, healing) in &report.healing {
            self.record(CombatEvent::StatusTicked {
                target,
                effect: effect.clone(),
                damage: 0,
                healing: *healing,
            });
        }
        for effect in &report.unknown {
            self.warn(format!("unknown status effect '{effect}' ignored"));
        }
        for effect in &report.expired {
            self.record(CombatEvent::StatusExpired {
                target,
                effect: effect.clone(),
            });
        }
    }

    fn record_outcome(&mut self, outcome: &ActionOutcome, skill: &SkillDefinition) {
        let actor = outcome.actor;
        self.record(CombatEvent::SkillUsed {
            actor,
            skill: skill.id.clone(),
            name: skill.name.clone(),
        });
        for warning in &outcome.warnings {
            self.warn(warning.clone());
        }
        if outcome.is_no_op() {
            self.record(CombatEvent::NoTargets {
                actor,
                skill: skill.id.clone(),
            });
            return;
        }

        for target in &outcome.targets {
            if !target.is_hit() {
                self.record(CombatEvent::Missed {
                    actor,
                    target: target.target,
                });
                continue;
            }
            if let Some(damage) = &target.damage {
                self.record(CombatEvent::Damaged {
                    source: Some(actor),
                    target: target.target,
                    amount: damage.amount,
                    critical: damage.roll.is_critical(),
                });
            }
            if let Some(amount) = target.healing {
                self.record(CombatEvent::Healed {
                    target: target.target,
                    amount,
                });
            }
            for proc in &target.statuses {
                let event = match proc.applied {
                    Some(outcome) => CombatEvent::StatusApplied {
                        target: target.target,
                        effect: proc.effect.clone(),
                        outcome,
                    },
                    None => CombatEvent::StatusResisted {
                        target: target.target,
                        effect: proc.effect.clone(),
                    },
                };
                self.record(event);
            }
            if target.defeated {
                self.record(CombatEvent::Defeated { target: target.target });
            }
        }
    }

    /// Appends a warning to the combat log.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.record(CombatEvent::Warning(message.into()));
    }

    fn record(&mut self, event: CombatEvent) {
        let roster = &self.roster;
        let text = event.describe(|id| {
            roster
                .get(id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| id.to_string())
        });
        self.log.push(LogEntry {
            round: self.scheduler.round(),
            event,
            text,
        });
    }
}

fn instantiate(
    id: CombatantId,
    spec: &CombatantSpec,
    faction: Faction,
    registry: &Registry,
    warnings: &mut Vec<String>,
) -> Combatant {
    let mut skills: Vec<SkillId> = Vec::with_capacity(spec.skills.len());
    for skill in &spec.skills {
        if !registry.contains_skill(skill.as_str()) {
            warnings.push(format!("{} lists unknown skill '{skill}'; skipped", spec.name));
        } else if !skills.contains(skill) {
            skills.push(skill.clone());
        }
    }

    let profile = match spec.profile.as_deref() {
        None => BehaviorProfile::default(),
        Some(tag) => BehaviorProfile::from_tag(tag).unwrap_or_else(|| {
            warnings.push(format!("{} has unknown behavior '{tag}'; using balanced", spec.name));
            BehaviorProfile::default()
        }),
    };

    let controller = spec.controller.unwrap_or(match faction {
        Faction::Player => Controller::Human,
        Faction::Ally | Faction::Enemy => Controller::Ai,
    });

    let max_health = spec.max_health.max(1);
    Combatant::new(id, spec.name.clone(), faction, spec.stats.clamped())
        .with_health(ResourceMeter::new(spec.health.unwrap_or(max_health), max_health))
        .with_resource(ResourceMeter::new(
            spec.resource.unwrap_or(spec.max_resource),
            spec.max_resource,
        ))
        .with_controller(controller)
        .with_skills(skills)
        .with_affinities(spec.affinities.clone())
        .with_profile(profile)
}
