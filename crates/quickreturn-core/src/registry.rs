//! Ordered header and footer entries
//!
//! Index 0 on either side is the bar closest to its edge of the container;
//! later entries stack inwards. Order matters for all cumulative offset math.

use serde::{Deserialize, Serialize};

use crate::host::ViewId;

/// Which edge of the container a bar is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Header,
    Footer,
}

impl Edge {
    pub const BOTH: [Edge; 2] = [Edge::Header, Edge::Footer];

    /// Translation for a bar pushed `collapse` pixels towards its edge
    #[inline]
    pub fn translation_for(self, collapse: f32) -> f32 {
        match self {
            Edge::Header => -collapse,
            Edge::Footer => collapse,
        }
    }

    /// Inverse of [`Edge::translation_for`]
    #[inline]
    pub fn collapse_of(self, translation: f32) -> f32 {
        match self {
            Edge::Header => -translation,
            Edge::Footer => translation,
        }
    }
}

/// Flags given when attaching a bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryFlags {
    /// Bar hides and reveals with scrolling
    pub participates: bool,
    /// Bar is drawn over the content instead of beside it
    pub renders_above_content: bool,
    /// Bar is kept off-screen until explicitly unhidden
    pub permanently_hidden: bool,
}

impl Default for EntryFlags {
    fn default() -> Self {
        Self {
            participates: true,
            renders_above_content: true,
            permanently_hidden: false,
        }
    }
}

impl EntryFlags {
    /// A bar that never moves and pushes the content aside
    pub fn fixed() -> Self {
        Self {
            participates: false,
            renders_above_content: false,
            permanently_hidden: false,
        }
    }

    pub fn with_participates(mut self, participates: bool) -> Self {
        self.participates = participates;
        self
    }

    pub fn with_renders_above_content(mut self, above: bool) -> Self {
        self.renders_above_content = above;
        self
    }

    pub fn with_permanently_hidden(mut self, hidden: bool) -> Self {
        self.permanently_hidden = hidden;
        self
    }
}

/// Positions remembered when a bar is permanently hidden, used to put the
/// stack back exactly where it was on unhide
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct HideRecord {
    pub own_collapse: f32,
    /// Shift applied to each later entry, by stacking position
    pub displaced: Vec<(ViewId, f32)>,
}

/// One header or footer bar
#[derive(Debug, Clone, PartialEq)]
pub struct QuickReturnEntry {
    pub view: ViewId,
    pub participates: bool,
    pub renders_above_content: bool,
    pub permanently_hidden: bool,
    pub height: i32,
    pub(crate) hide_record: Option<HideRecord>,
}

impl QuickReturnEntry {
    pub fn new(view: ViewId, flags: EntryFlags, height: i32) -> Self {
        Self {
            view,
            participates: flags.participates,
            renders_above_content: flags.renders_above_content,
            permanently_hidden: flags.permanently_hidden,
            height: height.max(0),
            hide_record: None,
        }
    }

    /// Whether scroll-driven translation may move this bar
    #[inline]
    pub fn is_movable(&self) -> bool {
        self.participates && !self.permanently_hidden
    }
}

/// Headers and footers owned by a container
#[derive(Debug, Clone, Default)]
pub struct Registry {
    headers: Vec<QuickReturnEntry>,
    footers: Vec<QuickReturnEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn side(&self, edge: Edge) -> &[QuickReturnEntry] {
        match edge {
            Edge::Header => &self.headers,
            Edge::Footer => &self.footers,
        }
    }

    pub(crate) fn side_mut(&mut self, edge: Edge) -> &mut Vec<QuickReturnEntry> {
        match edge {
            Edge::Header => &mut self.headers,
            Edge::Footer => &mut self.footers,
        }
    }

    pub fn len(&self, edge: Edge) -> usize {
        self.side(edge).len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.footers.is_empty()
    }

    pub fn get(&self, edge: Edge, index: usize) -> Option<&QuickReturnEntry> {
        self.side(edge).get(index)
    }

    pub(crate) fn get_mut(&mut self, edge: Edge, index: usize) -> Option<&mut QuickReturnEntry> {
        self.side_mut(edge).get_mut(index)
    }

    /// Stacking position of a view
    pub fn position_of(&self, edge: Edge, view: ViewId) -> Option<usize> {
        self.side(edge).iter().position(|e| e.view == view)
    }

    /// Edge and position of a view, headers searched first
    pub fn locate(&self, view: ViewId) -> Option<(Edge, usize)> {
        Edge::BOTH
            .into_iter()
            .find_map(|edge| self.position_of(edge, view).map(|i| (edge, i)))
    }

    pub fn push(&mut self, edge: Edge, entry: QuickReturnEntry) -> usize {
        let side = self.side_mut(edge);
        side.push(entry);
        side.len() - 1
    }

    /// Insert at a stacking position; positions past the end are ignored
    pub fn insert(&mut self, edge: Edge, index: usize, entry: QuickReturnEntry) -> bool {
        let side = self.side_mut(edge);
        if index > side.len() {
            return false;
        }
        side.insert(index, entry);
        true
    }

    pub fn remove(&mut self, edge: Edge, index: usize) -> Option<QuickReturnEntry> {
        let side = self.side_mut(edge);
        if index < side.len() {
            Some(side.remove(index))
        } else {
            None
        }
    }

    /// Any bar on either side that currently reacts to scrolling
    pub fn has_movable(&self) -> bool {
        self.headers.iter().chain(&self.footers).any(QuickReturnEntry::is_movable)
    }
}
