//! Item-list source
//!
//! Item lists only expose the first visible item and its top edge, so the
//! vertical position is rebuilt from the heights of every item scrolled past.
//! Heights are learned as items come into view.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use super::{RawScrollInput, ScrollChange, ScrollEvent, ScrollSource, SourceKind};
use crate::host::Scheduler;

#[derive(Debug, Clone, Default)]
pub struct ListScrollSource {
    item_heights: BTreeMap<usize, i32>,
    old_x: i32,
    old_y: i32,
    /// Next layout only re-establishes the position
    rebaseline: bool,
}

impl ListScrollSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items whose height is known
    pub fn cached_items(&self) -> usize {
        self.item_heights.len()
    }

    /// Derived vertical position for a layout, learning the visible heights
    pub fn scroll_y(&mut self, first_visible: usize, first_top: i32, visible_heights: &[i32]) -> i32 {
        if visible_heights.is_empty() {
            return 0;
        }

        for (offset, height) in visible_heights.iter().enumerate() {
            self.item_heights.insert(first_visible + offset, (*height).max(0));
        }

        let scrolled_past: i64 = self.item_heights.range(..first_visible).map(|(_, h)| i64::from(*h)).sum();
        let y = i64::from(first_top).saturating_neg().max(0) + scrolled_past;
        i32::try_from(y).unwrap_or(i32::MAX)
    }

    /// Forget learned heights after the list content changed
    pub fn invalidate(&mut self) {
        debug!(cached = self.item_heights.len(), "List content changed, dropping height cache");
        self.item_heights.clear();
        self.rebaseline = true;
    }
}

impl ScrollSource for ListScrollSource {
    fn kind(&self) -> SourceKind {
        SourceKind::ItemList
    }

    fn handle(&mut self, input: &RawScrollInput, _scheduler: &mut dyn Scheduler) -> Vec<ScrollEvent> {
        match input {
            RawScrollInput::ListLayout {
                first_visible,
                first_top,
                visible_heights,
                scroll_x,
            } => {
                let y = self.scroll_y(*first_visible, *first_top, visible_heights);
                let change = ScrollChange::new(*scroll_x, y, self.old_x, self.old_y);
                self.old_x = *scroll_x;
                self.old_y = y;

                if std::mem::take(&mut self.rebaseline) {
                    trace!(y, "List position re-baselined");
                    return Vec::new();
                }
                vec![ScrollEvent::Scrolled(change)]
            }
            RawScrollInput::State(state) => vec![ScrollEvent::StateChanged(*state)],
            RawScrollInput::ContentChanged => {
                self.invalidate();
                Vec::new()
            }
            other => {
                trace!(?other, "Input not used by item-list source");
                Vec::new()
            }
        }
    }
}
