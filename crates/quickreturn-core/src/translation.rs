//! Translation math for stacked bars
//!
//! Everything here works in "collapse" space: how many pixels a bar has been
//! pushed towards its own edge. 0 means fully shown for the outermost bar,
//! and [`Edge::translation_for`](crate::registry::Edge::translation_for)
//! turns a collapse value back into a header or footer translation.

use crate::registry::QuickReturnEntry;

/// Collapse range a bar may move within
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Travel {
    /// Fully shown. Non-zero when bars further out are permanently hidden
    pub shown: f32,
    /// Fully hidden: the height of the whole stack up to and including this bar
    pub hidden: f32,
}

impl Travel {
    #[inline]
    pub fn clamp(&self, collapse: f32) -> f32 {
        collapse.clamp(self.shown, self.hidden)
    }
}

/// Travel range for every entry of one side, by stacking position
pub fn travel_ranges(entries: &[QuickReturnEntry]) -> Vec<Travel> {
    let mut running = 0i32;
    let mut hidden_ahead = 0i32;

    entries
        .iter()
        .map(|entry| {
            running += entry.height;
            let travel = Travel {
                shown: hidden_ahead as f32,
                hidden: running as f32,
            };
            if entry.permanently_hidden {
                hidden_ahead += entry.height;
            }
            travel
        })
        .collect()
}

/// Move one side of bars by a scroll delta.
///
/// `diff` is positive in the reveal direction. Returns the new collapse for
/// every movable entry and `None` for entries that must stay put. Bars further
/// in get a proportionally larger share of the delta, so the stack folds away
/// from the inside out.
pub fn scroll_step(
    entries: &[QuickReturnEntry],
    collapse: &[f32],
    diff: f32,
    parallax_factor: f32,
) -> Vec<Option<f32>> {
    let ranges = travel_ranges(entries);
    let mut height_before = 0i32;

    entries
        .iter()
        .zip(collapse)
        .zip(ranges)
        .map(|((entry, &current), travel)| {
            let scaled = if height_before > 0 {
                diff * (1.0 + entry.height as f32 / height_before as f32)
            } else {
                diff
            };
            height_before += entry.height;

            if !entry.is_movable() {
                return None;
            }
            Some(travel.clamp(current - scaled * parallax_factor))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ViewId;
    use crate::registry::{Edge, EntryFlags};

    fn stack(heights: &[i32]) -> Vec<QuickReturnEntry> {
        heights
            .iter()
            .enumerate()
            .map(|(i, h)| QuickReturnEntry::new(ViewId(i as u64), EntryFlags::default(), *h))
            .collect()
    }

    #[test]
    fn test_big_hide_swipe_collapses_cumulatively() {
        let entries = stack(&[40, 30, 20]);
        let next = scroll_step(&entries, &[0.0, 0.0, 0.0], -400.0, 1.0);
        assert_eq!(next, vec![Some(40.0), Some(70.0), Some(90.0)]);
    }

    #[test]
    fn test_inner_bars_move_faster() {
        let entries = stack(&[40, 40]);
        let next = scroll_step(&entries, &[0.0, 0.0], -10.0, 1.0);
        assert_eq!(next[0], Some(10.0));
        assert_eq!(next[1], Some(20.0));
    }

    #[test]
    fn test_parallax_scales_movement() {
        let entries = stack(&[100]);
        let next = scroll_step(&entries, &[0.0], -50.0, 0.5);
        assert_eq!(next[0], Some(25.0));
    }

    #[test]
    fn test_reveal_clamps_at_shown() {
        let entries = stack(&[40, 30]);
        let next = scroll_step(&entries, &[10.0, 20.0], 500.0, 1.0);
        assert_eq!(next, vec![Some(0.0), Some(0.0)]);
    }

    #[test]
    fn test_permanently_hidden_bar_narrows_later_ranges() {
        let mut entries = stack(&[40, 30, 20]);
        entries[0].permanently_hidden = true;

        let ranges = travel_ranges(&entries);
        assert_eq!(ranges[0], Travel { shown: 0.0, hidden: 40.0 });
        assert_eq!(ranges[1], Travel { shown: 40.0, hidden: 70.0 });
        assert_eq!(ranges[2], Travel { shown: 40.0, hidden: 90.0 });

        let next = scroll_step(&entries, &[40.0, 40.0, 40.0], 100.0, 1.0);
        assert_eq!(next[0], None);
        assert_eq!(next[1], Some(40.0));
        assert_eq!(next[2], Some(40.0));
    }

    #[test]
    fn test_fixed_bars_are_not_moved_but_count_towards_stack() {
        let mut entries = stack(&[40, 30]);
        entries[0].participates = false;
        let next = scroll_step(&entries, &[0.0, 0.0], -400.0, 1.0);
        assert_eq!(next, vec![None, Some(70.0)]);
    }

    /// Drive a side with pseudo-random deltas, storing positions as
    /// translations so the edge mapping is part of the loop
    fn random_walk(entries: &[QuickReturnEntry], edge: Edge, seed: u32) {
        let ranges = travel_ranges(entries);
        let mut translations: Vec<f32> = entries
            .iter()
            .zip(&ranges)
            .map(|(e, t)| edge.translation_for(if e.permanently_hidden { t.hidden } else { t.shown }))
            .collect();
        let mut seed = seed;
        for _ in 0..500 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let diff = ((seed >> 16) % 121) as f32 - 60.0;
            let collapse: Vec<f32> = translations.iter().map(|y| edge.collapse_of(*y)).collect();
            for (i, next) in scroll_step(entries, &collapse, diff, 1.3).into_iter().enumerate() {
                if let Some(c) = next {
                    translations[i] = edge.translation_for(c);
                }
            }
            for (y, travel) in translations.iter().zip(&ranges) {
                let c = edge.collapse_of(*y);
                assert!(
                    c >= travel.shown - f32::EPSILON && c <= travel.hidden + f32::EPSILON,
                    "{:?} collapse {} outside {:?}",
                    edge,
                    c,
                    travel
                );
            }
        }
    }

    #[test]
    fn test_clamp_invariant_over_random_walk() {
        random_walk(&stack(&[48, 24, 36]), Edge::Header, 7);
        random_walk(&stack(&[48, 24, 36]), Edge::Footer, 11);
    }

    #[test]
    fn test_clamp_invariant_with_hidden_bar_ahead() {
        let mut entries = stack(&[48, 24, 36, 16]);
        entries[1].permanently_hidden = true;
        let ranges = travel_ranges(&entries);
        assert_eq!(ranges[2], Travel { shown: 24.0, hidden: 108.0 });

        random_walk(&entries, Edge::Header, 3);
        random_walk(&entries, Edge::Footer, 19);
    }
}
