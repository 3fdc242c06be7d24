//! Show/hide state machine
//!
//! A transition fans out into one interpolation per moving bar. The tracker
//! counts them back in and resolves the state once the last one reports,
//! whatever order the host finishes them in.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::host::TransitionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationState {
    #[default]
    Shown,
    Hiding,
    Showing,
    Hidden,
}

impl AnimationState {
    /// Shown or Hidden, i.e. no group transition in flight
    #[inline]
    pub fn is_steady(self) -> bool {
        matches!(self, AnimationState::Shown | AnimationState::Hidden)
    }
}

/// Direction of a group transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Show,
    Hide,
}

impl TransitionKind {
    fn running_state(self) -> AnimationState {
        match self {
            TransitionKind::Show => AnimationState::Showing,
            TransitionKind::Hide => AnimationState::Hiding,
        }
    }

    fn settled_state(self) -> AnimationState {
        match self {
            TransitionKind::Show => AnimationState::Shown,
            TransitionKind::Hide => AnimationState::Hidden,
        }
    }
}

#[derive(Debug, Clone)]
struct ActiveGroup {
    id: TransitionId,
    kind: TransitionKind,
    remaining: usize,
}

#[derive(Debug, Clone, Default)]
pub struct AnimationTracker {
    state: AnimationState,
    active: Option<ActiveGroup>,
    next_id: u64,
}

impl AnimationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Fresh id for interpolations that are not part of a group
    pub fn detached_id(&mut self) -> TransitionId {
        self.allocate()
    }

    fn allocate(&mut self) -> TransitionId {
        self.next_id += 1;
        TransitionId(self.next_id)
    }

    /// Start a group transition of `count` interpolations.
    ///
    /// Returns `None` when another transition is still running. A group with
    /// no interpolations settles immediately.
    pub fn begin(&mut self, kind: TransitionKind, count: usize) -> Option<TransitionId> {
        if !self.state.is_steady() {
            trace!(state = ?self.state, ?kind, "Transition rejected, group in flight");
            return None;
        }

        let id = self.allocate();
        if count == 0 {
            self.state = kind.settled_state();
            return Some(id);
        }

        self.state = kind.running_state();
        self.active = Some(ActiveGroup {
            id,
            kind,
            remaining: count,
        });
        Some(id)
    }

    /// Count one interpolation of a group back in.
    ///
    /// Returns the settled state when this was the last one. Ids of other
    /// groups, or repeated reports after settling, are ignored.
    pub fn finish_one(&mut self, id: TransitionId) -> Option<AnimationState> {
        let group = self.active.as_mut().filter(|g| g.id == id)?;

        group.remaining = group.remaining.saturating_sub(1);
        if group.remaining > 0 {
            return None;
        }

        let kind = group.kind;
        self.active = None;
        self.state = kind.settled_state();
        Some(self.state)
    }

    /// Jump straight to a steady state, used for non-animated show/hide and
    /// when scrolling alone has moved every bar to one end.
    pub fn settle(&mut self, kind: TransitionKind) -> bool {
        if !self.state.is_steady() {
            return false;
        }
        self.state = kind.settled_state();
        true
    }
}
