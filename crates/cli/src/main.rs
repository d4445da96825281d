//! Command-line combat simulator.
mod config;
mod input;

use std::sync::Arc;

use anyhow::{Context, Result};
use combat_content::{ContentFactory, builtin};
use combat_core::{CombatSummary, CombatantSpec, EngineConfig, Registry};
use combat_runtime::{
    AutoPilotProvider, CombatRuntime, LoggingRouter, RewardLedger, RuntimeConfig,
};
use config::SimConfig;
use input::StdinProvider;
use tracing_subscriber::EnvFilter;

struct Content {
    registry: Registry,
    encounters: combat_content::EncounterCatalog,
    party: Vec<CombatantSpec>,
    engine: EngineConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = SimConfig::from_env();
    let content = load_content(&config)?;
    for (encounter, combatant, skill) in content.encounters.unknown_skills(&content.registry) {
        tracing::warn!(%encounter, %combatant, %skill, "encounter references unknown skill");
    }
    let encounter = content.encounters.require(&config.encounter)?.clone();

    let registry = Arc::new(content.registry);
    let ledger = RewardLedger::default();
    let builder = CombatRuntime::builder()
        .registry(Arc::clone(&registry))
        .engine_config(content.engine.clone())
        .router(LoggingRouter)
        .rewards(ledger.clone())
        .config(RuntimeConfig {
            ai_turn_delay: config.ai_turn_delay,
            round_delay: config.round_delay,
            seed: config.seed,
            ..Default::default()
        });
    let builder = if config.autopilot {
        builder.provider(AutoPilotProvider::new(registry, content.engine.ai_noise, config.seed))
    } else {
        builder.provider(StdinProvider::new())
    };
    let mut runtime = builder.build();

    let summary = runtime.run_encounter(&encounter, &content.party).await?;
    print_summary(&summary);

    let totals = ledger.totals();
    if totals.grants > 0 {
        println!(
            "Rewards: {} exp, {} currency, {} skill points",
            totals.experience, totals.currency, totals.skill_points
        );
        for (item, quantity) in &totals.items {
            println!("  {item} x{quantity}");
        }
    }

    if let Some(path) = &config.summary_path {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "summary written");
    }
    Ok(())
}

fn load_content(config: &SimConfig) -> Result<Content> {
    match &config.content_dir {
        Some(dir) => {
            let factory = ContentFactory::new(dir.clone());
            Ok(Content {
                registry: factory.load_registry()?,
                encounters: factory.load_encounters()?,
                party: factory.load_party()?,
                engine: factory.load_config()?,
            })
        }
        None => Ok(Content {
            registry: builtin::registry()?,
            encounters: builtin::encounters()?,
            party: builtin::party()?,
            engine: builtin::engine_config()?,
        }),
    }
}

fn print_summary(summary: &CombatSummary) {
    for line in summary.log.lines() {
        println!("{line}");
    }
    println!();
    println!(
        "{}: {} after {} rounds -> {}",
        summary.encounter, summary.result, summary.rounds, summary.routing.node
    );
    for (name, health) in &summary.survivors {
        println!("  {name}: {health} hp");
    }
}
