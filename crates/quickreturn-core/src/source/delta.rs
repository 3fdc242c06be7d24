//! Recycler-style source that only reports relative movement

use tracing::trace;

use super::{RawScrollInput, ScrollChange, ScrollEvent, ScrollSource, SourceKind};
use crate::host::Scheduler;

#[derive(Debug, Clone, Default)]
pub struct DeltaScrollSource {
    running_x: i32,
    running_y: i32,
}

impl DeltaScrollSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate a delta into an absolute position change
    pub fn scrolled_by(&mut self, dx: i32, dy: i32) -> ScrollChange {
        let x = self.running_x.saturating_add(dx);
        let y = self.running_y.saturating_add(dy);
        let change = ScrollChange::new(x, y, self.running_x, self.running_y);
        self.running_x = x;
        self.running_y = y;
        change
    }
}

impl ScrollSource for DeltaScrollSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Delta
    }

    fn handle(&mut self, input: &RawScrollInput, _scheduler: &mut dyn Scheduler) -> Vec<ScrollEvent> {
        match input {
            RawScrollInput::Delta { dx, dy } => vec![ScrollEvent::Scrolled(self.scrolled_by(*dx, *dy))],
            RawScrollInput::State(state) => vec![ScrollEvent::StateChanged(*state)],
            other => {
                trace!(?other, "Input not used by delta source");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deltas_accumulate() {
        let mut source = DeltaScrollSource::new();
        assert_eq!(source.scrolled_by(0, 30), ScrollChange::new(0, 30, 0, 0));
        assert_eq!(source.scrolled_by(0, -10), ScrollChange::new(0, 20, 0, 30));
        assert_eq!(source.scrolled_by(5, 0), ScrollChange::new(5, 20, 0, 20));
    }

    #[test]
    fn test_running_position_saturates() {
        let mut source = DeltaScrollSource::new();
        source.scrolled_by(0, i32::MAX);
        assert_eq!(source.scrolled_by(0, 1), ScrollChange::new(0, i32::MAX, 0, i32::MAX));
        assert_eq!(source.scrolled_by(0, -10).y, i32::MAX - 10);
    }
}
