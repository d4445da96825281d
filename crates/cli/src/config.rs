//! Simulator configuration read from the environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line simulator settings.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Content directory; builtin data when unset.
    pub content_dir: Option<PathBuf>,
    pub encounter: String,
    pub seed: u64,
    pub ai_turn_delay: Duration,
    pub round_delay: Duration,
    /// Let the decision engine play the party instead of reading stdin.
    pub autopilot: bool,
    /// Where to write the JSON summary, if anywhere.
    pub summary_path: Option<PathBuf>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            content_dir: None,
            encounter: "goblin_ambush".to_string(),
            seed: 0,
            ai_turn_delay: Duration::ZERO,
            round_delay: Duration::ZERO,
            autopilot: true,
            summary_path: None,
        }
    }
}

impl SimConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `COMBAT_CONTENT_DIR` - Directory holding skills, statuses, encounters and party files
    /// - `COMBAT_ENCOUNTER` - Encounter id (default: goblin_ambush)
    /// - `COMBAT_SEED` - Base RNG seed (default: 0)
    /// - `COMBAT_AI_DELAY_MS` - Pause after AI turns
    /// - `COMBAT_ROUND_DELAY_MS` - Pause between rounds
    /// - `COMBAT_AUTOPILOT` - `false` to enter party actions on stdin (default: true)
    /// - `COMBAT_SUMMARY_JSON` - Path for the JSON summary
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.content_dir = env::var_os("COMBAT_CONTENT_DIR").map(PathBuf::from);
        if let Ok(encounter) = env::var("COMBAT_ENCOUNTER")
            && !encounter.trim().is_empty()
        {
            config.encounter = encounter.trim().to_string();
        }
        if let Some(seed) = read_env::<u64>("COMBAT_SEED") {
            config.seed = seed;
        }
        if let Some(ms) = read_env::<u64>("COMBAT_AI_DELAY_MS") {
            config.ai_turn_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = read_env::<u64>("COMBAT_ROUND_DELAY_MS") {
            config.round_delay = Duration::from_millis(ms);
        }
        if let Some(autopilot) = read_env::<bool>("COMBAT_AUTOPILOT") {
            config.autopilot = autopilot;
        }
        config.summary_path = env::var_os("COMBAT_SUMMARY_JSON").map(PathBuf::from);

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}
