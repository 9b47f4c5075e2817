//! Monster AI decision core.
//!
//! Turns per-frame views of the world, the player and each monster into one
//! [`maze_core::BrainCommand`] per monster. The crate is frame-stepped and
//! single-threaded: the host calls [`AgentManager::tick`] once per frame and
//! nothing here blocks, allocates threads or fails at tick time.
//!
//! # Layout
//!
//! - [`perception`]: pure vision, hearing and smell gates
//! - [`memory`]: stimulus slots, visit log, investigation and search sweeps
//! - [`tactics`]: per-agent chase/flank/cover choice
//! - [`squad`]: shared blackboard and role directives
//! - [`brain`]: brain variants and their state machines
//! - [`modules`]: optional capabilities composed onto a brain
//! - [`agent`] / [`manager`]: per-agent tick and the frame driver
pub mod agent;
pub mod brain;
pub mod context;
pub mod error;
pub mod manager;
pub mod memory;
pub mod modules;
pub mod perception;
pub mod squad;
pub mod tactics;

pub use agent::Agent;
pub use brain::{
    Brain, BrainCore, BrainState, RoamingBrain, RoomHunterBrain, SentryBrain, TargetConfidence,
    build_brain,
};
pub use context::{AgentSnapshot, TickContext};
pub use error::{AgentError, Result};
pub use manager::{AgentManager, Frame};
pub use modules::{
    BrainModules, InvestigationModule, Selection, TargetSelector, apply_brain_modules,
    normalized_modules,
};
pub use perception::{VisionOptions, can_hear, can_see_player, can_smell, effective_vision_range};
pub use squad::{SquadCoordinator, SquadDirective, SquadModule};
pub use tactics::{FlankCoverTactics, TacticDirective, TacticMode};
