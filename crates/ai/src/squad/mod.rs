//! Squad coordination.
//!
//! [`SquadCoordinator`] is the blackboard shared by every squad member;
//! [`SquadModule`] is the per-agent side that reports into it and turns the
//! shared target into a role-specific directive.

mod blackboard;
mod directive;
mod roles;

pub use blackboard::{
    FireGrant, FireRequest, FlankLease, ReportOptions, SquadCoordinator, SquadTarget,
    SquadTargetView, TargetKind,
};
pub use directive::{DirectiveKind, SquadDirective, SquadModule};
pub use roles::{memory_multiplier, report_priority};
