//! Content factory for loading a full content pack from a directory.

use std::path::{Path, PathBuf};

use combat_core::{CombatantSpec, EngineConfig, Registry};

use crate::loaders::{ConfigLoader, EncounterCatalog, EncounterLoader, LoadResult, PartyLoader, RegistryLoader};

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── engine.toml
/// ├── skills.ron
/// ├── status_effects.ron
/// ├── encounters.ron
/// └── party.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine tunables from `engine.toml`, or defaults when absent.
    pub fn load_config(&self) -> LoadResult<EngineConfig> {
        let path = self.data_dir.join("engine.toml");
        if !path.exists() {
            return Ok(EngineConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the registry from `skills.ron` and `status_effects.ron`.
    pub fn load_registry(&self) -> LoadResult<Registry> {
        RegistryLoader::load(
            &self.data_dir.join("skills.ron"),
            &self.data_dir.join("status_effects.ron"),
        )
    }

    /// Load the encounter catalog from `encounters.ron`.
    pub fn load_encounters(&self) -> LoadResult<EncounterCatalog> {
        EncounterLoader::load(&self.data_dir.join("encounters.ron"))
    }

    /// Load the player party from `party.ron`.
    pub fn load_party(&self) -> LoadResult<Vec<CombatantSpec>> {
        PartyLoader::load(&self.data_dir.join("party.ron"))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn loads_a_minimal_pack() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("skills.ron"), "[]").unwrap();
        fs::write(dir.path().join("status_effects.ron"), "[]").unwrap();
        fs::write(
            dir.path().join("encounters.ron"),
            r#"[(id: "rat", enemies: [(name: "Rat", max_health: 5)])]"#,
        )
        .unwrap();
        fs::write(dir.path().join("party.ron"), r#"[(name: "Hero", max_health: 50)]"#).unwrap();

        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap(), EngineConfig::default());
        assert_eq!(factory.load_registry().unwrap().skill_count(), 0);
        assert_eq!(factory.load_encounters().unwrap().len(), 1);
        assert_eq!(factory.load_party().unwrap()[0].name, "Hero");
    }

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }
}
