//! Shared squad blackboard.
//!
//! One [`SquadCoordinator`] serves every squad in a level. Per squad it keeps
//! the member roster, the shared target, flank-slot leases and ranged-fire
//! grants.
//!
//! # Frame protocol
//!
//! Target reports are two-phase: [`SquadCoordinator::report_target`] stages a
//! report and [`SquadCoordinator::commit`] applies everything staged, so all
//! agents of a frame read the target committed at the end of the previous
//! frame regardless of tick order. Flank leases and fire grants are admission
//! control and resolve immediately; whoever asks first within a frame wins,
//! which keeps the caps exact.

use std::collections::{BTreeMap, BTreeSet};

use maze_core::{GridPosition, MonsterId, Role, SquadConfig, SquadId};

use super::roles::{memory_multiplier, report_priority};

/// How a squad target was acquired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum TargetKind {
    Sighting,
    Noise,
    Scent,
}

impl TargetKind {
    /// Priority added on top of the reporter's role priority.
    pub const fn priority_bonus(self) -> u8 {
        match self {
            TargetKind::Sighting => 2,
            TargetKind::Noise => 1,
            TargetKind::Scent => 0,
        }
    }
}

/// Options of [`SquadCoordinator::report_target`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReportOptions {
    pub kind: TargetKind,
    pub priority: u8,
    pub reporter: MonsterId,
    pub reporter_role: Role,
    pub memory_seconds: f64,
}

impl ReportOptions {
    /// Options with priority and memory derived from the reporter's role.
    pub fn for_role(kind: TargetKind, reporter: MonsterId, role: Role, config: &SquadConfig) -> Self {
        Self {
            kind,
            priority: report_priority(role) + kind.priority_bonus(),
            reporter,
            reporter_role: role,
            memory_seconds: config.target_memory_seconds * memory_multiplier(role, config),
        }
    }
}

/// Blackboard entry for a squad's shared target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SquadTarget {
    pub target: GridPosition,
    pub kind: TargetKind,
    pub priority: u8,
    pub reporter: MonsterId,
    pub reporter_role: Role,
    pub reported_at: f64,
    pub expires_at: f64,
}

impl SquadTarget {
    fn replaces(&self, existing: &SquadTarget, now: f64) -> bool {
        existing.expires_at <= now
            || self.priority > existing.priority
            || (self.priority == existing.priority && self.reported_at >= existing.reported_at)
    }
}

/// What members read back from the blackboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SquadTargetView {
    pub target: GridPosition,
    pub kind: TargetKind,
    pub reporter: MonsterId,
    pub reporter_role: Role,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlankLease {
    pub slot: usize,
    pub leased_until: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FireGrant {
    pub role: Role,
    pub until: f64,
}

/// Options of [`SquadCoordinator::allow_ranged_fire`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FireRequest {
    pub role: Role,
    pub max_shooters: usize,
    pub grant_seconds: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Member {
    role: Role,
    last_seen: f64,
}

#[derive(Clone, Debug, Default)]
struct SquadState {
    members: BTreeMap<MonsterId, Member>,
    target: Option<SquadTarget>,
    pending: Vec<SquadTarget>,
    leases: BTreeMap<MonsterId, FlankLease>,
    grants: BTreeMap<MonsterId, FireGrant>,
}

impl SquadState {
    fn is_empty(&self) -> bool {
        self.members.is_empty() && self.target.is_none() && self.pending.is_empty()
    }
}

/// Blackboard shared by all squads.
#[derive(Clone, Debug)]
pub struct SquadCoordinator {
    config: SquadConfig,
    squads: BTreeMap<SquadId, SquadState>,
}

impl SquadCoordinator {
    pub fn new(config: SquadConfig) -> Self {
        Self {
            config,
            squads: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &SquadConfig {
        &self.config
    }

    // ========================================================================
    // Roster
    // ========================================================================

    /// Registers or refreshes a member. Members not refreshed within
    /// `stale_seconds` are dropped by [`Self::prune`].
    pub fn update_member(&mut self, squad: SquadId, member: MonsterId, role: Role, now: f64) {
        self.squads.entry(squad).or_default().members.insert(
            member,
            Member {
                role,
                last_seen: now,
            },
        );
    }

    /// Drops a member together with its lease and grant.
    pub fn remove_member(&mut self, squad: SquadId, member: MonsterId) {
        if let Some(state) = self.squads.get_mut(&squad) {
            state.members.remove(&member);
            state.leases.remove(&member);
            state.grants.remove(&member);
        }
    }

    pub fn member_count(&self, squad: SquadId) -> usize {
        self.squads.get(&squad).map_or(0, |s| s.members.len())
    }

    pub fn member_role(&self, squad: SquadId, member: MonsterId) -> Option<Role> {
        self.squads
            .get(&squad)
            .and_then(|s| s.members.get(&member))
            .map(|m| m.role)
    }

    // ========================================================================
    // Shared target
    // ========================================================================

    /// Stages a target report. It becomes visible after the next [`Self::commit`].
    pub fn report_target(&mut self, squad: SquadId, grid: GridPosition, now: f64, options: ReportOptions) {
        let state = self.squads.entry(squad).or_default();
        state.pending.push(SquadTarget {
            target: grid,
            kind: options.kind,
            priority: options.priority,
            reporter: options.reporter,
            reporter_role: options.reporter_role,
            reported_at: now,
            expires_at: now + options.memory_seconds.max(0.0),
        });
    }

    /// Applies staged reports in the order they were made.
    ///
    /// A report replaces the current entry when that entry has expired, when
    /// the report has strictly higher priority, or when priorities tie and the
    /// report is at least as recent.
    pub fn commit(&mut self, now: f64) {
        for (squad, state) in &mut self.squads {
            for report in state.pending.drain(..) {
                let accept = state
                    .target
                    .as_ref()
                    .is_none_or(|existing| report.replaces(existing, now));
                if accept {
                    tracing::debug!(
                        "{}: target {} ({}) from {} priority {}",
                        squad,
                        report.target,
                        report.kind,
                        report.reporter,
                        report.priority
                    );
                    state.target = Some(report);
                }
            }
        }
    }

    /// Committed, unexpired target of a squad.
    pub fn get_target(&self, squad: SquadId, now: f64) -> Option<SquadTargetView> {
        self.squads
            .get(&squad)
            .and_then(|s| s.target)
            .filter(|t| now < t.expires_at)
            .map(|t| SquadTargetView {
                target: t.target,
                kind: t.kind,
                reporter: t.reporter,
                reporter_role: t.reporter_role,
            })
    }

    /// Full committed entry, expired or not.
    pub fn target_entry(&self, squad: SquadId) -> Option<&SquadTarget> {
        self.squads.get(&squad).and_then(|s| s.target.as_ref())
    }

    // ========================================================================
    // Flank slots
    // ========================================================================

    /// Leases a flank slot for `member`.
    ///
    /// A member keeps its slot while its lease is alive; each call renews the
    /// lease for `keep_seconds`. New members take the first free slot starting
    /// from `member % slot_count`. Live leases never share a slot while free
    /// slots remain.
    pub fn get_flank_slot(
        &mut self,
        squad: SquadId,
        member: MonsterId,
        slot_count: usize,
        now: f64,
        keep_seconds: f64,
    ) -> usize {
        let slot_count = slot_count.max(1);
        let state = self.squads.entry(squad).or_default();
        state.leases.retain(|_, lease| lease.leased_until > now);

        let leased_until = now + keep_seconds;
        if let Some(lease) = state.leases.get_mut(&member) {
            if lease.slot < slot_count {
                lease.leased_until = leased_until;
                return lease.slot;
            }
        }

        let taken: BTreeSet<usize> = state
            .leases
            .iter()
            .filter(|(id, _)| **id != member)
            .map(|(_, lease)| lease.slot)
            .collect();
        let preferred = member.0 as usize % slot_count;
        let slot = (0..slot_count)
            .map(|i| (preferred + i) % slot_count)
            .find(|s| !taken.contains(s))
            .unwrap_or(preferred);

        tracing::debug!("{}: {} leased flank slot {}", squad, member, slot);
        state.leases.insert(member, FlankLease { slot, leased_until });
        slot
    }

    pub fn flank_lease(&self, squad: SquadId, member: MonsterId) -> Option<FlankLease> {
        self.squads
            .get(&squad)
            .and_then(|s| s.leases.get(&member))
            .copied()
    }

    // ========================================================================
    // Ranged fire
    // ========================================================================

    /// Admission control for ranged attacks.
    ///
    /// At most `max_shooters` members hold a live grant. A holder asking again
    /// has its grant renewed. Grants are validated to be shorter than the
    /// fire cooldown, so a holder's grant lapses before its next shot.
    pub fn allow_ranged_fire(
        &mut self,
        squad: SquadId,
        member: MonsterId,
        now: f64,
        request: FireRequest,
    ) -> bool {
        let state = self.squads.entry(squad).or_default();
        state.grants.retain(|_, grant| grant.until > now);

        let until = now + request.grant_seconds;
        if let Some(grant) = state.grants.get_mut(&member) {
            grant.until = until;
            return true;
        }
        if state.grants.len() >= request.max_shooters {
            tracing::trace!("{}: fire denied to {} ({})", squad, member, request.role);
            return false;
        }
        state.grants.insert(
            member,
            FireGrant {
                role: request.role,
                until,
            },
        );
        tracing::debug!("{}: fire granted to {} ({})", squad, member, request.role);
        true
    }

    /// Members currently holding a fire grant.
    pub fn shooters(&self, squad: SquadId, now: f64) -> Vec<(MonsterId, Role)> {
        self.squads.get(&squad).map_or_else(Vec::new, |s| {
            s.grants
                .iter()
                .filter(|(_, g)| g.until > now)
                .map(|(id, g)| (*id, g.role))
                .collect()
        })
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Drops members idle for longer than `stale_seconds`, their leases and
    /// grants, expired targets, and squads left empty.
    pub fn prune(&mut self, now: f64) {
        let stale = self.config.stale_seconds;
        self.squads.retain(|squad, state| {
            let before = state.members.len();
            state.members.retain(|_, m| now - m.last_seen <= stale);
            if state.members.len() != before {
                tracing::debug!("{}: pruned {} stale members", squad, before - state.members.len());
            }
            let members = &state.members;
            state.leases.retain(|id, l| members.contains_key(id) && l.leased_until > now);
            state.grants.retain(|id, g| members.contains_key(id) && g.until > now);
            if state.target.is_some_and(|t| t.expires_at <= now) {
                state.target = None;
            }
            !state.is_empty()
        });
    }

    pub fn squad_count(&self) -> usize {
        self.squads.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::AiConfig;

    const SQUAD: SquadId = SquadId(1);

    fn coordinator() -> SquadCoordinator {
        SquadCoordinator::new(SquadConfig::default())
    }

    fn report(kind: TargetKind, id: u32, role: Role) -> ReportOptions {
        ReportOptions::for_role(kind, MonsterId(id), role, &SquadConfig::default())
    }

    #[test]
    fn reports_are_invisible_until_commit() {
        let mut squad = coordinator();
        squad.report_target(SQUAD, GridPosition::new(3, 3), 0.0, report(TargetKind::Sighting, 1, Role::Flanker));
        assert_eq!(squad.get_target(SQUAD, 0.0), None);
        squad.commit(0.0);
        assert_eq!(squad.get_target(SQUAD, 0.1).unwrap().target, GridPosition::new(3, 3));
    }

    #[test]
    fn higher_priority_wins_until_it_expires() {
        let mut squad = coordinator();
        squad.report_target(SQUAD, GridPosition::new(1, 1), 0.0, report(TargetKind::Sighting, 1, Role::Leader));
        squad.report_target(SQUAD, GridPosition::new(9, 9), 0.5, report(TargetKind::Noise, 2, Role::Default));
        squad.commit(0.5);
        assert_eq!(squad.get_target(SQUAD, 1.0).unwrap().target, GridPosition::new(1, 1));

        // Leader report lives target_memory * leader_memory_mult = 6s.
        squad.report_target(SQUAD, GridPosition::new(9, 9), 7.0, report(TargetKind::Noise, 2, Role::Default));
        squad.commit(7.0);
        assert_eq!(squad.get_target(SQUAD, 7.0).unwrap().target, GridPosition::new(9, 9));
    }

    #[test]
    fn equal_priority_newer_report_replaces() {
        let mut squad = coordinator();
        squad.report_target(SQUAD, GridPosition::new(1, 1), 0.0, report(TargetKind::Sighting, 1, Role::Flanker));
        squad.commit(0.0);
        squad.report_target(SQUAD, GridPosition::new(2, 2), 1.0, report(TargetKind::Sighting, 2, Role::Cover));
        squad.commit(1.0);
        assert_eq!(squad.get_target(SQUAD, 1.0).unwrap().reporter, MonsterId(2));
    }

    #[test]
    fn leader_reports_outlive_default_reports() {
        let mut squad = coordinator();
        let config = SquadConfig::default();
        squad.report_target(SQUAD, GridPosition::ORIGIN, 0.0, report(TargetKind::Sighting, 1, Role::Leader));
        squad.report_target(SquadId(2), GridPosition::ORIGIN, 0.0, report(TargetKind::Sighting, 2, Role::Default));
        squad.commit(0.0);
        let t = config.target_memory_seconds + 0.5;
        assert!(squad.get_target(SQUAD, t).is_some());
        assert!(squad.get_target(SquadId(2), t).is_none());
    }

    #[test]
    fn flank_slots_are_distinct_and_sticky() {
        let mut squad = coordinator();
        let slots: Vec<usize> = (0..6)
            .map(|i| squad.get_flank_slot(SQUAD, MonsterId(i * 6), 6, 0.0, 3.0))
            .collect();
        let unique: BTreeSet<_> = slots.iter().collect();
        assert_eq!(unique.len(), 6);

        assert_eq!(squad.get_flank_slot(SQUAD, MonsterId(6), 6, 1.0, 3.0), slots[1]);
    }

    #[test]
    fn expired_lease_frees_slot() {
        let mut squad = coordinator();
        assert_eq!(squad.get_flank_slot(SQUAD, MonsterId(0), 6, 0.0, 1.0), 0);
        assert_eq!(squad.get_flank_slot(SQUAD, MonsterId(6), 6, 0.5, 1.0), 1);
        assert_eq!(squad.get_flank_slot(SQUAD, MonsterId(12), 6, 2.0, 1.0), 0);
    }

    #[test]
    fn fire_cap_is_enforced_and_renewed() {
        let mut squad = coordinator();
        let request = FireRequest {
            role: Role::Cover,
            max_shooters: 1,
            grant_seconds: 1.0,
        };
        let granted: Vec<bool> = (1..=3)
            .map(|i| squad.allow_ranged_fire(SQUAD, MonsterId(i), 0.0, request))
            .collect();
        assert_eq!(granted.iter().filter(|g| **g).count(), 1);
        assert!(squad.allow_ranged_fire(SQUAD, MonsterId(1), 0.9, request));
        assert!(!squad.allow_ranged_fire(SQUAD, MonsterId(2), 1.5, request));
        assert!(squad.allow_ranged_fire(SQUAD, MonsterId(2), 2.0, request));
    }

    #[test]
    fn fire_slot_rotates_once_the_holder_cools_down() {
        let mut squad = coordinator();
        let config = AiConfig::default();
        let request = FireRequest {
            role: Role::Cover,
            max_shooters: config.squad.max_shooters,
            grant_seconds: config.squad.fire_grant_seconds,
        };
        let cooldown = config.brain.fire_cooldown_seconds;

        assert!(squad.allow_ranged_fire(SQUAD, MonsterId(1), 0.0, request));
        assert!(!squad.allow_ranged_fire(SQUAD, MonsterId(2), 0.5, request));
        assert!(squad.allow_ranged_fire(SQUAD, MonsterId(2), cooldown - 0.1, request));
        assert!(!squad.allow_ranged_fire(SQUAD, MonsterId(1), cooldown, request));
    }

    #[test]
    fn prune_drops_stale_members_and_empty_squads() {
        let mut squad = coordinator();
        squad.update_member(SQUAD, MonsterId(1), Role::Leader, 0.0);
        squad.update_member(SQUAD, MonsterId(2), Role::Flanker, 5.0);
        squad.prune(6.5);
        assert_eq!(squad.member_count(SQUAD), 1);
        squad.prune(20.0);
        assert_eq!(squad.squad_count(), 0);
    }
}
