//! Phase and focus bookkeeping for the refresh controller.

use crate::domain::Coordinate;

/// Lifecycle phase of the refresh controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    /// The map has not reported `Ready` yet.
    Uninitialized,
    /// The latest refresh succeeded, or none has started since the map loaded.
    Ready,
    /// A refresh for the current focus point is in flight.
    Refreshing,
    /// The latest refresh failed; the next trigger still refreshes normally.
    Failed,
}

/// Point-in-time view of the controller, for callers and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefreshSnapshot {
    /// Current phase.
    pub phase: RefreshPhase,
    /// Most recently requested focus point.
    pub focus: Option<Coordinate>,
    /// Number of focus changes so far.
    pub generation: u64,
}

/// Identifies one refresh so its completion can be checked for staleness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct RefreshTicket {
    pub(super) generation: u64,
    pub(super) focus: Coordinate,
}

#[derive(Debug)]
pub(super) struct ControllerState {
    phase: RefreshPhase,
    focus: Option<Coordinate>,
    generation: u64,
}

impl ControllerState {
    pub(super) const fn new() -> Self {
        Self {
            phase: RefreshPhase::Uninitialized,
            focus: None,
            generation: 0,
        }
    }

    pub(super) fn is_map_ready(&self) -> bool {
        self.phase != RefreshPhase::Uninitialized
    }

    /// Returns `false` when the map was already ready.
    pub(super) fn mark_map_ready(&mut self) -> bool {
        if self.is_map_ready() {
            return false;
        }
        self.phase = RefreshPhase::Ready;
        true
    }

    pub(super) fn begin(&mut self, focus: Coordinate) -> RefreshTicket {
        self.generation += 1;
        self.focus = Some(focus);
        self.phase = RefreshPhase::Refreshing;
        RefreshTicket {
            generation: self.generation,
            focus,
        }
    }

    pub(super) fn is_current(&self, ticket: &RefreshTicket) -> bool {
        self.generation == ticket.generation
    }

    pub(super) fn settle(&mut self, phase: RefreshPhase) {
        self.phase = phase;
    }

    pub(super) const fn snapshot(&self) -> RefreshSnapshot {
        RefreshSnapshot {
            phase: self.phase,
            focus: self.focus,
            generation: self.generation,
        }
    }
}
