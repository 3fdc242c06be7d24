//! Scroll sources
//!
//! Every kind of scrollable area the host can observe is turned into the same
//! two events: a position change and a scroll state change. The container
//! only ever sees [`ScrollEvent`]s.

pub mod continuous;
pub mod delta;
pub mod list;

pub use continuous::ContinuousScrollSource;
pub use delta::DeltaScrollSource;
pub use list::ListScrollSource;

use serde::{Deserialize, Serialize};

use crate::config::QuickReturnConfig;
use crate::host::{Scheduler, TimerHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollState {
    #[default]
    Idle,
    Dragging,
    Flinging,
}

/// Old and new scroll position of the observed area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollChange {
    pub x: i32,
    pub y: i32,
    pub old_x: i32,
    pub old_y: i32,
}

impl ScrollChange {
    pub fn new(x: i32, y: i32, old_x: i32, old_y: i32) -> Self {
        Self { x, y, old_x, old_y }
    }

    /// Vertical-only change
    pub fn vertical(y: i32, old_y: i32) -> Self {
        Self::new(0, y, 0, old_y)
    }
}

/// Normalized event stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollEvent {
    Scrolled(ScrollChange),
    StateChanged(ScrollState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// Raw input as the host toolkit delivers it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawScrollInput {
    /// Item list laid out: index of the first visible item, its top edge
    /// relative to the viewport, and heights of the visible items in order
    ListLayout {
        first_visible: usize,
        first_top: i32,
        visible_heights: Vec<i32>,
        scroll_x: i32,
    },
    /// Continuous scroll container moved
    Offset { x: i32, y: i32, old_x: i32, old_y: i32 },
    /// Recycler-style list scrolled by a relative amount
    Delta { dx: i32, dy: i32 },
    /// Scroll state reported natively by the host
    State(ScrollState),
    Touch(TouchPhase),
    /// Items were inserted, removed or reflowed
    ContentChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    ItemList,
    Continuous,
    Delta,
}

/// A scrollable area the container observes
pub trait ScrollSource {
    fn kind(&self) -> SourceKind;

    /// Translate one raw input into zero or more normalized events
    fn handle(&mut self, input: &RawScrollInput, scheduler: &mut dyn Scheduler) -> Vec<ScrollEvent>;

    /// Whether a timer handle was issued for this source
    fn claims_timer(&self, _handle: TimerHandle) -> bool {
        false
    }

    /// A timer issued for this source fired
    fn timer_fired(&mut self, _handle: TimerHandle) -> Option<ScrollEvent> {
        None
    }

    /// Pick up configuration changes
    fn configure(&mut self, _config: &QuickReturnConfig) {}

    /// Release timers before the source is replaced
    fn detach(&mut self, _scheduler: &mut dyn Scheduler) {}
}

/// Receives the normalized stream alongside the container
pub trait ScrollObserver {
    fn on_scroll_changed(&mut self, change: ScrollChange);

    fn on_scroll_state_changed(&mut self, _state: ScrollState) {}
}
