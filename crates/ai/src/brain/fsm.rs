//! High-level behavior state machine.

/// Behavior mode of a brain.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BrainState {
    #[default]
    Patrol,
    Investigate,
    Chase,
    Search,
    /// Heading back to the home tile.
    Return,
    /// Stationary guard stance (sentries).
    Hold,
}

/// Current state plus the timers that gate transitions.
///
/// `lock_until` debounces thrashing: while locked, [`Self::transition`] is
/// refused and only [`Self::force`] (used for direct sightings) goes through.
#[derive(Clone, Debug, PartialEq)]
pub struct StateMachine {
    state: BrainState,
    previous: BrainState,
    entered_at: f64,
    lock_until: f64,
}

impl StateMachine {
    pub fn new(initial: BrainState, now: f64) -> Self {
        Self {
            state: initial,
            previous: initial,
            entered_at: now,
            lock_until: now,
        }
    }

    pub fn state(&self) -> BrainState {
        self.state
    }

    pub fn previous(&self) -> BrainState {
        self.previous
    }

    pub fn entered_at(&self) -> f64 {
        self.entered_at
    }

    pub fn time_in_state(&self, now: f64) -> f64 {
        (now - self.entered_at).max(0.0)
    }

    pub fn is(&self, state: BrainState) -> bool {
        self.state == state
    }

    pub fn is_locked(&self, now: f64) -> bool {
        now < self.lock_until
    }

    /// Moves to `to` unless already there or locked. Locks the new state for
    /// `lock_seconds`. Returns true when the state changed.
    pub fn transition(&mut self, to: BrainState, now: f64, lock_seconds: f64) -> bool {
        if to == self.state || self.is_locked(now) {
            return false;
        }
        self.force(to, now, lock_seconds)
    }

    /// Moves to `to` ignoring the lock.
    pub fn force(&mut self, to: BrainState, now: f64, lock_seconds: f64) -> bool {
        if to == self.state {
            return false;
        }
        tracing::debug!(
            "state {} -> {} after {:.2}s",
            self.state,
            to,
            self.time_in_state(now)
        );
        self.previous = self.state;
        self.state = to;
        self.entered_at = now;
        self.lock_until = now + lock_seconds.max(0.0);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_blocks_transitions_but_not_force() {
        let mut fsm = StateMachine::new(BrainState::Patrol, 0.0);
        assert!(fsm.transition(BrainState::Investigate, 0.0, 0.5));
        assert!(!fsm.transition(BrainState::Patrol, 0.2, 0.5));
        assert!(fsm.force(BrainState::Chase, 0.2, 0.5));
        assert_eq!(fsm.previous(), BrainState::Investigate);
        assert!(fsm.transition(BrainState::Search, 0.8, 0.5));
        assert_eq!(fsm.state(), BrainState::Search);
        assert_eq!(fsm.entered_at(), 0.8);
    }

    #[test]
    fn same_state_is_not_a_transition() {
        let mut fsm = StateMachine::new(BrainState::Chase, 0.0);
        assert!(!fsm.force(BrainState::Chase, 1.0, 0.0));
        assert_eq!(fsm.entered_at(), 0.0);
    }
}
