//! Content and reference collaborators for the monster AI.
//!
//! - [`GridWorld`] implements [`maze_core::WorldOracle`] and
//!   [`maze_core::PathPlanner`] over an ASCII tile map.
//! - [`loaders`] reads tuning (TOML), monster profiles (RON) and scenarios (RON).
pub mod planner;
pub mod world;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use world::GridWorld;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ProfileLoader, Scenario, ScenarioLoader, SpawnSpec};
