//! End-to-end encounter runs through the async runtime.

use combat_core::{
    ActionKind, ActionReport, CombatResult, CombatantSpec, Controller, EncounterConfig, StatBlock, StatKind, TurnStep,
};
use combat_runtime::{
    CombatRuntime, RewardLedger, RouteLog, RuntimeConfig, RuntimeError, ScriptedActionProvider,
};

fn training_yard() -> EncounterConfig {
    combat_content::builtin::encounters()
        .expect("builtin encounters")
        .require("training_yard")
        .expect("training yard")
        .clone()
}

fn hero(max_health: u32) -> CombatantSpec {
    let mut stats = StatBlock::default();
    stats.set(StatKind::Strength, 14.0);
    stats.set(StatKind::Agility, 9.0);
    CombatantSpec::new("Hero", stats, max_health, 0)
}

fn runtime(seed: u64) -> CombatRuntime {
    CombatRuntime::builder()
        .registry(combat_content::builtin::registry().expect("builtin registry"))
        .config(RuntimeConfig {
            seed,
            ..Default::default()
        })
        .build()
}

#[tokio::test]
async fn all_ai_party_replays_identically_with_the_same_seed() {
    let encounter = combat_content::builtin::encounters()
        .expect("builtin encounters")
        .require("goblin_ambush")
        .expect("goblin ambush")
        .clone();
    let mut party = combat_content::builtin::party().expect("builtin party");
    for member in &mut party {
        member.controller = Some(Controller::Ai);
    }

    let first = runtime(42).run_encounter(&encounter, &party).await.expect("first run");
    let second = runtime(42).run_encounter(&encounter, &party).await.expect("second run");

    assert_eq!(first.result, second.result);
    assert_eq!(first.rounds, second.rounds);
    assert_eq!(
        first.log.lines().collect::<Vec<_>>(),
        second.log.lines().collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn scripted_hero_clears_the_training_yard() {
    let ledger = RewardLedger::default();
    let routes = RouteLog::default();
    // Hero is #0, the dummy #1.
    let script = (0..80).map(|_| ActionKind::UseSkill {
        skill: "basic_attack".into(),
        target: Some(combat_core::CombatantId(1)),
    });

    let mut runtime = CombatRuntime::builder()
        .registry(combat_content::builtin::registry().expect("builtin registry"))
        .provider(ScriptedActionProvider::new(script))
        .rewards(ledger.clone())
        .router(routes.clone())
        .config(RuntimeConfig {
            seed: 7,
            ..Default::default()
        })
        .build();

    let summary = runtime
        .run_encounter(&training_yard(), &[hero(140)])
        .await
        .expect("encounter runs");

    assert_eq!(summary.result, CombatResult::Victory);
    assert_eq!(summary.routing.node, "yard_done");
    assert_eq!(ledger.totals().experience, 5);
    assert_eq!(ledger.totals().grants, 1);
    let signals = routes.signals();
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].node, "yard_done");
}

#[tokio::test]
async fn rejected_actions_fall_back_to_passing() {
    let ledger = RewardLedger::default();
    let script = std::iter::repeat_with(|| ActionKind::UseSkill {
        skill: "no_such_skill".into(),
        target: None,
    })
    .take(2000);

    let mut runtime = CombatRuntime::builder()
        .registry(combat_content::builtin::registry().expect("builtin registry"))
        .provider(ScriptedActionProvider::new(script))
        .rewards(ledger.clone())
        .build();

    let summary = runtime
        .run_encounter(&training_yard(), &[hero(3)])
        .await
        .expect("encounter runs");

    assert_eq!(summary.result, CombatResult::Defeat);
    assert_eq!(summary.routing.node, "yard_retry");
    assert!(summary.log.warnings().count() >= 3);
    assert_eq!(ledger.totals().grants, 0);
}

#[tokio::test]
async fn human_turn_without_provider_is_an_error() {
    let mut runtime = runtime(1);
    runtime
        .start_encounter(&training_yard(), &[hero(50)])
        .expect("starts");

    let mut outcome = runtime.step().await;
    while let Ok(step) = &outcome {
        assert!(!matches!(step, combat_core::TurnStep::Finished(_)));
        outcome = runtime.step().await;
    }
    assert!(matches!(outcome, Err(RuntimeError::ProviderNotSet { .. })));
}

#[tokio::test]
async fn stepping_without_an_encounter_fails() {
    let mut runtime = runtime(1);
    assert!(matches!(runtime.step().await, Err(RuntimeError::NoActiveCombat)));
}

#[tokio::test]
async fn second_encounter_is_rejected_while_one_runs() {
    let mut runtime = runtime(1);
    runtime
        .start_encounter(&training_yard(), &[hero(50)])
        .expect("starts");
    let err = runtime
        .start_encounter(&training_yard(), &[hero(50)])
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Session(_)));
}

#[tokio::test]
async fn autopilot_plays_human_combatants() {
    let registry = std::sync::Arc::new(combat_content::builtin::registry().expect("builtin registry"));
    let party = combat_content::builtin::party().expect("builtin party");

    let mut runtime = CombatRuntime::builder()
        .registry(registry.clone())
        .provider(combat_runtime::AutoPilotProvider::new(registry, 10.0, 3))
        .build();

    let summary = runtime
        .run_encounter(&training_yard(), &party)
        .await
        .expect("encounter runs");

    assert_eq!(summary.result, CombatResult::Victory);
}

fn scripted_runtime(script: Vec<ActionKind>) -> CombatRuntime {
    CombatRuntime::builder()
        .registry(combat_content::builtin::registry().expect("builtin registry"))
        .provider(ScriptedActionProvider::new(script))
        .build()
}

#[tokio::test]
async fn missing_target_is_asked_for_again() {
    let mut runtime = scripted_runtime(vec![
        ActionKind::UseSkill {
            skill: "basic_attack".into(),
            target: None,
        },
        ActionKind::UseSkill {
            skill: "basic_attack".into(),
            target: Some(combat_core::CombatantId(1)),
        },
    ]);
    runtime
        .start_encounter(&training_yard(), &[hero(50)])
        .expect("starts");

    // The hero outpaces the dummy and opens the round.
    let step = runtime.step().await.expect("hero acts");
    let TurnStep::Acted(report) = step else {
        panic!("expected the hero to act, got {step:?}");
    };
    assert_eq!(report.actor, combat_core::CombatantId(0));
    assert!(matches!(report.action, ActionReport::Skill(_)));

    let log = runtime.session().expect("active").log();
    let warnings: Vec<_> = log.warnings().map(|entry| entry.text.clone()).collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("ACTION_TARGET_REQUIRED"));
}

#[tokio::test]
async fn unknown_skill_passes_without_asking_again() {
    let mut runtime = scripted_runtime(vec![ActionKind::UseSkill {
        skill: "meteor".into(),
        target: Some(combat_core::CombatantId(1)),
    }]);
    runtime
        .start_encounter(&training_yard(), &[hero(50)])
        .expect("starts");

    let step = runtime.step().await.expect("hero turn resolves");
    let TurnStep::Acted(report) = step else {
        panic!("expected the hero's turn, got {step:?}");
    };
    assert_eq!(report.action, ActionReport::Pass);

    let log = runtime.session().expect("active").log();
    let warnings: Vec<_> = log.warnings().map(|entry| entry.text.clone()).collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("ACTION_UNKNOWN_SKILL"));
}
