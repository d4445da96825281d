//! Player party loader.

use std::path::Path;

use combat_core::CombatantSpec;

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Loader for the player party from RON files.
pub struct PartyLoader;

impl PartyLoader {
    /// Load the party roster.
    ///
    /// RON format: `Vec<CombatantSpec>`, in the order members should be
    /// registered. An empty party is rejected.
    pub fn load(path: &Path) -> LoadResult<Vec<CombatantSpec>> {
        let content = read_file(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    pub fn parse(text: &str, origin: &str) -> LoadResult<Vec<CombatantSpec>> {
        let party: Vec<CombatantSpec> = parse_ron(text, origin)?;
        if party.is_empty() {
            anyhow::bail!("{}: party has no members", origin);
        }
        Ok(party)
    }
}
