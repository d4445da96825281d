//! Encounter catalog loader.

use std::collections::BTreeMap;
use std::path::Path;

use combat_core::{EncounterConfig, Registry};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Encounters keyed by id.
#[derive(Clone, Debug, Default)]
pub struct EncounterCatalog {
    encounters: BTreeMap<String, EncounterConfig>,
}

impl EncounterCatalog {
    pub fn get(&self, id: &str) -> Option<&EncounterConfig> {
        self.encounters.get(id)
    }

    /// Looks up an encounter, failing with the list of known ids.
    pub fn require(&self, id: &str) -> LoadResult<&EncounterConfig> {
        self.get(id).ok_or_else(|| {
            let known: Vec<&str> = self.ids().collect();
            anyhow::anyhow!("Unknown encounter '{}' (known: {})", id, known.join(", "))
        })
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.encounters.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EncounterConfig> {
        self.encounters.values()
    }

    pub fn len(&self) -> usize {
        self.encounters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encounters.is_empty()
    }

    /// Skill references that `registry` cannot resolve, as `(encounter, combatant, skill)`.
    ///
    /// Sessions skip such skills with a warning; content tooling can surface
    /// them earlier.
    pub fn unknown_skills<'a>(&'a self, registry: &'a Registry) -> Vec<(&'a str, &'a str, &'a str)> {
        self.iter()
            .flat_map(|encounter| {
                encounter
                    .enemies
                    .iter()
                    .chain(&encounter.allies)
                    .flat_map(move |spec| {
                        spec.skills
                            .iter()
                            .filter(move |skill| !registry.contains_skill(skill.as_str()))
                            .map(move |skill| (encounter.id.as_str(), spec.name.as_str(), skill.as_str()))
                    })
            })
            .collect()
    }
}

/// Loader for encounter catalogs from RON files.
pub struct EncounterLoader;

impl EncounterLoader {
    /// Load an encounter catalog.
    ///
    /// RON format: `Vec<EncounterConfig>`. Ids must be unique.
    pub fn load(path: &Path) -> LoadResult<EncounterCatalog> {
        let content = read_file(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    pub fn parse(text: &str, origin: &str) -> LoadResult<EncounterCatalog> {
        let raw: Vec<EncounterConfig> = parse_ron(text, origin)?;

        let mut encounters = BTreeMap::new();
        for encounter in raw {
            if encounter.enemies.is_empty() {
                anyhow::bail!("{}: encounter '{}' has no enemies", origin, encounter.id);
            }
            let id = encounter.id.clone();
            if encounters.insert(id.clone(), encounter).is_some() {
                anyhow::bail!("{}: duplicate encounter id '{}'", origin, id);
            }
        }

        Ok(EncounterCatalog { encounters })
    }
}
