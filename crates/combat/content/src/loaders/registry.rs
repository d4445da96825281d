//! Skill and status-effect registry loader.

use std::path::Path;

use combat_core::{Registry, SkillDefinition, StatusEffectDefinition};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Loader for the combat registry from a pair of RON files.
pub struct RegistryLoader;

impl RegistryLoader {
    /// Load skills and status effects and validate them together.
    ///
    /// RON formats: `Vec<SkillDefinition>` and `Vec<StatusEffectDefinition>`.
    /// Formula strings are parsed during deserialization; cross references
    /// (skill → status effect) are checked when the registry is built.
    pub fn load(skills_path: &Path, statuses_path: &Path) -> LoadResult<Registry> {
        let skills = read_file(skills_path)?;
        let statuses = read_file(statuses_path)?;
        Self::parse(
            &skills,
            &skills_path.display().to_string(),
            &statuses,
            &statuses_path.display().to_string(),
        )
    }

    pub fn parse(skills: &str, skills_origin: &str, statuses: &str, statuses_origin: &str) -> LoadResult<Registry> {
        let skills: Vec<SkillDefinition> = parse_ron(skills, skills_origin)?;
        let statuses: Vec<StatusEffectDefinition> = parse_ron(statuses, statuses_origin)?;

        Registry::from_definitions(skills, statuses)
            .map_err(|e| anyhow::anyhow!("Invalid registry ({}, {}): {}", skills_origin, statuses_origin, e))
    }
}
