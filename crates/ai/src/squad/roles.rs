//! Role weighting for squad reports.

use maze_core::{Role, SquadConfig};

/// Base report priority of a role: leader/rusher > flanker/scout ≈ cover/support > default.
pub const fn report_priority(role: Role) -> u8 {
    match role {
        Role::Leader | Role::Rusher => 3,
        Role::Flanker | Role::Scout | Role::Cover | Role::Support => 2,
        Role::Default => 1,
    }
}

/// Multiplier applied to a report's memory duration.
///
/// Leader reports outlive everyone else's so the squad keeps following the
/// leader's picture of the target.
pub fn memory_multiplier(role: Role, config: &SquadConfig) -> f64 {
    match role {
        Role::Leader => config.leader_memory_mult,
        _ => 1.0,
    }
}
