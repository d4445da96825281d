//! Content pack embedded at compile time.

use combat_core::{CombatantSpec, EngineConfig, Registry};

use crate::loaders::{ConfigLoader, EncounterCatalog, EncounterLoader, LoadResult, PartyLoader, RegistryLoader};

const SKILLS: &str = include_str!("../data/skills.ron");
const STATUS_EFFECTS: &str = include_str!("../data/status_effects.ron");
const ENCOUNTERS: &str = include_str!("../data/encounters.ron");
const PARTY: &str = include_str!("../data/party.ron");
const ENGINE: &str = include_str!("../data/engine.toml");

pub fn registry() -> LoadResult<Registry> {
    RegistryLoader::parse(SKILLS, "builtin skills.ron", STATUS_EFFECTS, "builtin status_effects.ron")
}

pub fn encounters() -> LoadResult<EncounterCatalog> {
    EncounterLoader::parse(ENCOUNTERS, "builtin encounters.ron")
}

pub fn party() -> LoadResult<Vec<CombatantSpec>> {
    PartyLoader::parse(PARTY, "builtin party.ron")
}

pub fn engine_config() -> LoadResult<EngineConfig> {
    ConfigLoader::parse(ENGINE, "builtin engine.toml")
}
