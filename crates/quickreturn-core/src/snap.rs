//! Idle-time snapping decisions

use crate::animation::TransitionKind;
use crate::config::SnapPolicy;
use crate::host::ViewId;
use crate::registry::{Edge, Registry};
use crate::tally::ScrollDirection;
use crate::translation::travel_ranges;

/// Fraction of a bar that must be pushed out before a midpoint snap hides it
pub const MIDPOINT_HIDE_RATIO: f32 = 0.75;

/// Decide which way a stack should settle once scrolling stops.
///
/// `collapse_of` reads how far a bar is currently pushed towards its edge.
pub fn decide(
    policy: SnapPolicy,
    last_direction: Option<ScrollDirection>,
    registry: &Registry,
    collapse_of: impl Fn(Edge, ViewId) -> f32,
) -> Option<TransitionKind> {
    match policy {
        SnapPolicy::None => None,
        SnapPolicy::ToIntent => match last_direction {
            Some(ScrollDirection::Hide) => Some(TransitionKind::Hide),
            _ => Some(TransitionKind::Show),
        },
        SnapPolicy::ToMidpoint => midpoint(registry, collapse_of),
    }
}

/// Only the first bar that is out of place is consulted, headers first.
fn midpoint(
    registry: &Registry,
    collapse_of: impl Fn(Edge, ViewId) -> f32,
) -> Option<TransitionKind> {
    for edge in Edge::BOTH {
        let entries = registry.side(edge);
        let ranges = travel_ranges(entries);

        for (entry, travel) in entries.iter().zip(ranges) {
            if !entry.is_movable() {
                continue;
            }
            let offset = collapse_of(edge, entry.view) - travel.shown;
            if offset.abs() <= f32::EPSILON {
                continue;
            }
            return if offset < entry.height as f32 * MIDPOINT_HIDE_RATIO {
                Some(TransitionKind::Show)
            } else {
                Some(TransitionKind::Hide)
            };
        }
    }
    None
}
