//! Stdin-backed action provider.
use async_trait::async_trait;
use combat_core::{CombatAction, CombatantId};
use combat_runtime::{ActionProvider, BattleView, Result, RuntimeError};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// Reads `<skill> [target]`, `escape` or `pass` from stdin.
pub struct StdinProvider {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl StdinProvider {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

impl Default for StdinProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionProvider for StdinProvider {
    async fn provide_action(&self, actor: CombatantId, view: &BattleView) -> Result<CombatAction> {
        print_view(actor, view);
        let line = self
            .lines
            .lock()
            .await
            .next_line()
            .await
            .map_err(|e| RuntimeError::Provider(e.to_string()))?
            .ok_or(RuntimeError::ActionProviderChannelClosed)?;
        Ok(parse_action(actor, &line))
    }
}

fn print_view(actor: CombatantId, view: &BattleView) {
    println!();
    for combatant in view.roster.iter() {
        println!(
            "  {} {:<16} {:>4}/{:<4} hp  {:>3}/{:<3} res",
            combatant.id,
            combatant.name,
            combatant.health.current(),
            combatant.health.maximum(),
            combatant.resource.current(),
            combatant.resource.maximum()
        );
    }
    let name = view.roster.get(actor).map_or("?", |c| c.name.as_str());
    let skills: Vec<&str> = view.usable.iter().map(|s| s.as_str()).collect();
    println!("{name} ({actor}), round {}: {}", view.round, skills.join(", "));
    println!("> <skill> [target id] | escape | pass");
}

/// Unparseable input becomes a skill use the engine rejects.
fn parse_action(actor: CombatantId, line: &str) -> CombatAction {
    let mut words = line.split_whitespace();
    match words.next() {
        None | Some("pass") => CombatAction::pass(actor),
        Some("escape") => CombatAction::escape(actor),
        Some(skill) => {
            let target = words
                .next()
                .and_then(|t| t.trim_start_matches('#').parse().ok())
                .map(CombatantId);
            CombatAction::use_skill(actor, skill, target)
        }
    }
}
