//! Validate AI data files
//!
//! Loads tuning, profiles and (optionally) a scenario, cross-checks that every
//! spawn names a known profile, and prints which modules each profile ends up with.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;

use maze_content::{ConfigLoader, ProfileLoader, ScenarioLoader};
use maze_core::WorldOracle;
use monster_ai::normalized_modules;

use crate::utils;

/// Validate tuning, profiles and scenario files
#[derive(Parser, Debug)]
pub struct CheckConfig {
    /// AI tuning file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Monster profiles file (RON)
    #[arg(short, long, value_name = "FILE")]
    profiles: Option<PathBuf>,

    /// Scenario file (RON) whose spawns are checked against the profiles
    #[arg(short, long, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Skip the scenario cross-check
    #[arg(long)]
    no_scenario: bool,
}

impl CheckConfig {
    pub fn execute(self) -> Result<()> {
        let config_path = utils::resolve(self.config, utils::CONFIG_FILE)?;
        let config = ConfigLoader::load(&config_path)?;
        println!(
            "{} {}",
            style("✓ Config:").green().bold(),
            style(config_path.display()).dim()
        );
        println!("  seed: {}", config.seed);
        println!("  max chasers: {}", config.brain.max_chasers);
        println!("  max shooters per squad: {}", config.squad.max_shooters);

        let profiles_path = utils::resolve(self.profiles, utils::PROFILES_FILE)?;
        let profiles = ProfileLoader::load(&profiles_path)?;
        println!(
            "{} {} ({} profiles)",
            style("✓ Profiles:").green().bold(),
            style(profiles_path.display()).dim(),
            profiles.len()
        );
        for (name, profile) in &profiles {
            let modules = normalized_modules(profile, &config.modules);
            println!(
                "  {:<12} {:<11} {:<8} squad={:<6} modules={:?}",
                style(name).cyan(),
                profile.brain,
                profile.role,
                profile
                    .squad
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".into()),
                modules
            );
        }

        if self.no_scenario {
            return Ok(());
        }

        let scenario_path = utils::resolve(self.scenario, utils::SCENARIO_FILE)?;
        let scenario = ScenarioLoader::load(&scenario_path)?;
        for spawn in &scenario.monsters {
            profiles.get(&spawn.profile).with_context(|| {
                format!(
                    "monster {} uses unknown profile '{}'",
                    spawn.id, spawn.profile
                )
            })?;
        }
        println!(
            "{} {} ({} monsters, {} rooms, {} route points)",
            style("✓ Scenario:").green().bold(),
            style(scenario_path.display()).dim(),
            scenario.monsters.len(),
            scenario.world.rooms().len(),
            scenario.player_route.len()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundled(name: &str) -> Option<PathBuf> {
        Some(
            std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("../maze/content/data")
                .join(name),
        )
    }

    #[test]
    fn bundled_data_passes() {
        let check = CheckConfig {
            config: bundled(utils::CONFIG_FILE),
            profiles: bundled(utils::PROFILES_FILE),
            scenario: bundled(utils::SCENARIO_FILE),
            no_scenario: false,
        };
        check.execute().unwrap();
    }

    #[test]
    fn unknown_spawn_profile_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let scenario = dir.path().join("scenario.ron");
        std::fs::write(
            &scenario,
            r#####"(
                rows: ["####", "#..#", "####"],
                monsters: [(id: 1, profile: "ghost", at: (x: 1, y: 1))],
                player_route: [(x: 2, y: 1)],
            )"#####,
        )
        .unwrap();

        let check = CheckConfig {
            config: bundled(utils::CONFIG_FILE),
            profiles: bundled(utils::PROFILES_FILE),
            scenario: Some(scenario),
            no_scenario: false,
        };
        let err = check.execute().unwrap_err();
        assert!(err.to_string().contains("ghost"), "{err}");
    }
}
