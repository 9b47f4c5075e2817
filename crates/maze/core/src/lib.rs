//! Shared data model for the monster AI.
//!
//! `maze-core` defines the types every other crate agrees on: tile geometry,
//! the collaborator traits the AI consumes ([`WorldOracle`], [`PathPlanner`]),
//! per-frame entity views, monster profiles, stimuli, tuning configuration and
//! the [`BrainCommand`] the AI produces. It contains no decision logic.
pub mod command;
pub mod config;
pub mod entity;
pub mod error;
pub mod grid;
pub mod profile;
pub mod stimulus;
pub mod world;

pub use command::{BrainCommand, FireCommand};
pub use config::{
    AiConfig, BrainConfig, InvestigationConfig, MemoryConfig, ModulesConfig, PerceptionConfig,
    SearchConfig, SquadConfig, TacticsConfig,
};
pub use entity::{MonsterId, MonsterStatus, MonsterView, PlayerView};
pub use error::ConfigError;
pub use grid::{GridPosition, MoveVector, WorldPoint};
pub use profile::{AgentProfile, BrainKind, ModuleSet, Role, SquadId};
pub use stimulus::{NoiseEvent, NoiseKind, ScentEvent};
pub use world::{Circle, DarkZone, PathPlanner, Room, RoomKind, SmokeCloud, WorldOracle};
