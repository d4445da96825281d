//! Event bus behavior observed through the runtime handle.

use combat_core::{CombatResult, CombatantFields, CombatantId, Controller};
use combat_runtime::{
    ChannelActionProvider, CombatRuntime, Event, LifecycleEvent, RuntimeConfig, RuntimeError, Topic, TurnEvent,
};

fn ai_party() -> Vec<combat_core::CombatantSpec> {
    let mut party = combat_content::builtin::party().expect("builtin party");
    for member in &mut party {
        member.controller = Some(Controller::Ai);
    }
    party
}

#[tokio::test]
async fn lifecycle_events_bracket_the_encounter() {
    let encounters = combat_content::builtin::encounters().expect("builtin encounters");
    let encounter = encounters.require("training_yard").expect("training yard");

    let mut runtime = CombatRuntime::builder()
        .registry(combat_content::builtin::registry().expect("builtin registry"))
        .build();
    let handle = runtime.handle();
    let mut lifecycle = handle.subscribe(Topic::Lifecycle);
    let mut turns = handle.subscribe(Topic::Turn);

    let summary = runtime
        .run_encounter(encounter, &ai_party())
        .await
        .expect("encounter runs");
    assert_eq!(summary.result, CombatResult::Victory);

    match lifecycle.recv().await.expect("started event") {
        Event::Lifecycle(LifecycleEvent::Started { encounter, combatants }) => {
            assert_eq!(encounter, "training_yard");
            assert_eq!(combatants, 4);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    match lifecycle.recv().await.expect("finished event") {
        Event::Lifecycle(LifecycleEvent::Finished { result, node, .. }) => {
            assert_eq!(result, CombatResult::Victory);
            assert_eq!(node, "yard_done");
        }
        other => panic!("unexpected event: {other:?}"),
    }

    let first_turn = turns.recv().await.expect("turn event");
    assert!(matches!(first_turn, Event::Turn(TurnEvent::Acted { .. })));

    // The dummy is the last of four combatants.
    let dummy = CombatantId(3);
    let mut dummy_hit = false;
    while let Ok(event) = turns.try_recv() {
        if let Event::Turn(TurnEvent::Acted { changes, .. }) = event {
            dummy_hit |= changes.get(dummy).contains(CombatantFields::HEALTH);
        }
    }
    assert!(dummy_hit);
}

#[tokio::test]
async fn combat_topic_mirrors_the_log() {
    let encounters = combat_content::builtin::encounters().expect("builtin encounters");
    let encounter = encounters.require("training_yard").expect("training yard");

    let mut runtime = CombatRuntime::builder()
        .registry(combat_content::builtin::registry().expect("builtin registry"))
        .config(RuntimeConfig {
            event_buffer_size: 4096,
            ..Default::default()
        })
        .build();
    let mut combat = runtime.handle().subscribe(Topic::Combat);

    let summary = runtime
        .run_encounter(encounter, &ai_party())
        .await
        .expect("encounter runs");

    let mut mirrored = Vec::new();
    while let Ok(Event::Combat(entry)) = combat.try_recv() {
        mirrored.push(entry.text);
    }
    assert_eq!(mirrored, summary.log.lines().map(str::to_owned).collect::<Vec<_>>());
}

#[tokio::test]
async fn closed_action_channel_surfaces_as_an_error() {
    let encounters = combat_content::builtin::encounters().expect("builtin encounters");
    let encounter = encounters.require("training_yard").expect("training yard");
    let (provider, tx) = ChannelActionProvider::channel(4);
    drop(tx);

    let mut runtime = CombatRuntime::builder()
        .registry(combat_content::builtin::registry().expect("builtin registry"))
        .provider(provider)
        .build();
    let party = combat_content::builtin::party().expect("builtin party");

    let err = runtime.run_encounter(encounter, &party).await.unwrap_err();
    assert!(matches!(err, RuntimeError::ActionProviderChannelClosed));
}
