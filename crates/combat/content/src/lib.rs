//! Data-driven combat content and loaders.
//!
//! This crate reads RON/TOML data files into `combat-core` types:
//! - Skill and status-effect registries (RON)
//! - Encounter catalogs (RON)
//! - Player parties (RON)
//! - Engine tuning (TOML)
//!
//! A default content pack is embedded at compile time (see [`builtin`]) so
//! hosts can run without a data directory. Formula strings are parsed while
//! deserializing, so malformed content never reaches a session.

#[cfg(feature = "loaders")]
pub mod builtin;
#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, EncounterCatalog, EncounterLoader, LoadResult, PartyLoader,
    RegistryLoader,
};
