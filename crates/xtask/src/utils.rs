//! Utility functions for xtask commands

use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "ai.toml";
pub const PROFILES_FILE: &str = "profiles.ron";
pub const SCENARIO_FILE: &str = "scenario.ron";

/// Directory holding the bundled AI data files.
///
/// `MAZE_AI_DATA_DIR` overrides the in-repo `crates/maze/content/data`.
pub fn data_dir() -> PathBuf {
    std::env::var_os("MAZE_AI_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("..")
                .join("maze")
                .join("content")
                .join("data")
        })
}

/// Resolve an explicit path or fall back to a file in the data directory.
pub fn resolve(explicit: Option<PathBuf>, default_name: &str) -> Result<PathBuf> {
    let path = explicit.unwrap_or_else(|| data_dir().join(default_name));
    if !path.exists() {
        return Err(anyhow!(
            "File not found: {}\n\
             Pass the path explicitly or set MAZE_AI_DATA_DIR.",
            path.display()
        ));
    }
    Ok(path)
}
