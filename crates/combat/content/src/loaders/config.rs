//! Engine tuning loader.

use std::path::Path;

use combat_core::EngineConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine tunables from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load engine tunables from a TOML file.
    ///
    /// Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    pub fn parse(text: &str, origin: &str) -> LoadResult<EngineConfig> {
        let config: EngineConfig = toml::from_str(text)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML {}: {}", origin, e))?;

        if !config.initiative_tiebreak.is_finite() || config.initiative_tiebreak < 0.0 {
            anyhow::bail!(
                "{}: initiative_tiebreak must be a non-negative number, got {}",
                origin,
                config.initiative_tiebreak
            );
        }
        if !config.ai_noise.is_finite() || config.ai_noise < 0.0 {
            anyhow::bail!("{}: ai_noise must be a non-negative number, got {}", origin, config.ai_noise);
        }

        Ok(config)
    }
}
