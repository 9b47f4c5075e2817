//! Configuration validation errors.
//!
//! Nothing on the per-tick path returns an error; these only surface while
//! loading and validating [`crate::AiConfig`] and [`crate::AgentProfile`].

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{min_field} ({min}) must not exceed {max_field} ({max})")]
    InvertedRange {
        min_field: &'static str,
        min: f64,
        max_field: &'static str,
        max: f64,
    },

    /// A grant that outlives the shot cooldown lets its holder keep the
    /// squad's fire slot forever.
    #[error("squad.fire_grant_seconds ({grant}) must be shorter than brain.fire_cooldown_seconds ({cooldown})")]
    GrantOutlivesCooldown { grant: f64, cooldown: f64 },

    #[error("squad module enabled for a profile without a squad id")]
    SquadModuleWithoutSquad,
}
