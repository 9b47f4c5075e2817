//! AI tuning loader.

use std::path::Path;

use maze_core::AiConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`AiConfig`] from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate tuning from a TOML file.
    ///
    /// Missing sections and fields keep their defaults, so a file only needs
    /// to list what it overrides.
    pub fn load(path: &Path) -> LoadResult<AiConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid AI config {}: {}", path.display(), e))
    }

    /// Parse and validate tuning from TOML text.
    pub fn parse(content: &str) -> LoadResult<AiConfig> {
        let config: AiConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }
}
