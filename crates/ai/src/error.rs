use maze_core::{ConfigError, MonsterId};

/// Errors raised when managing agents. Ticking never fails.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AgentError {
    #[error("agent {0} already exists")]
    DuplicateAgent(MonsterId),

    #[error("agent {0} not found")]
    UnknownAgent(MonsterId),

    #[error("invalid profile: {0}")]
    InvalidProfile(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, AgentError>;
