//! Content loaders for reading combat data from files.
//!
//! Every loader has a `load(path)` entry point and a `parse(text, origin)`
//! counterpart used for embedded data. Errors name the offending file.

pub mod config;
pub mod encounter;
pub mod factory;
pub mod party;
pub mod registry;

pub use config::ConfigLoader;
pub use encounter::{EncounterCatalog, EncounterLoader};
pub use factory::ContentFactory;
pub use party::PartyLoader;
pub use registry::RegistryLoader;

use std::path::Path;

use serde::de::DeserializeOwned;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Deserializes RON text, naming `origin` on failure.
pub(crate) fn parse_ron<T: DeserializeOwned>(text: &str, origin: &str) -> LoadResult<T> {
    ron::from_str(text).map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", origin, e))
}
