//! Hysteresis filter for scroll direction
//!
//! Small jitters in either direction are absorbed until the content has
//! travelled far enough one way. Hiding needs a longer run than showing.

/// Direction the bars should move in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Content moved down (finger moved down), bars come back
    Reveal,
    /// Content moved up, bars get out of the way
    Hide,
}

/// A scroll step that passed the hysteresis threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollIntent {
    pub direction: ScrollDirection,
    /// Movement not yet handed to the translation step, positive = reveal
    pub diff: f32,
}

/// Running accumulator over same-signed scroll deltas
#[derive(Debug, Clone, Default)]
pub struct ScrollTally {
    tally: i64,
    /// Part of `tally` already handed out as intent
    consumed: i64,
}

impl ScrollTally {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn value(&self) -> i64 {
        self.tally
    }

    pub fn reset(&mut self) {
        self.tally = 0;
        self.consumed = 0;
    }

    /// Feed one scroll step.
    ///
    /// Returns the intent once the tally has crossed the threshold for its
    /// direction. The tally keeps growing after that, so every further step in
    /// the same direction is reported too, carrying only its unconsumed part.
    pub fn observe(
        &mut self,
        y: i32,
        old_y: i32,
        min_delta_before_show: i32,
        min_delta_before_hide: i32,
    ) -> Option<ScrollIntent> {
        let diff = old_y as i64 - y as i64;

        if diff == 0 || diff.signum() * self.tally.signum() < 0 {
            self.reset();
        }
        if diff == 0 {
            return None;
        }

        self.tally += diff;

        let direction = if self.tally >= min_delta_before_show.max(0) as i64 && self.tally > 0 {
            ScrollDirection::Reveal
        } else if -self.tally >= min_delta_before_hide.max(0) as i64 && self.tally < 0 {
            ScrollDirection::Hide
        } else {
            return None;
        };

        let pending = self.tally - self.consumed;
        self.consumed = self.tally;

        Some(ScrollIntent {
            direction,
            diff: pending as f32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(tally: &mut ScrollTally, deltas: &[i32]) -> Vec<Option<ScrollIntent>> {
        let mut y = 1000;
        deltas
            .iter()
            .map(|d| {
                let old = y;
                y += d;
                tally.observe(y, old, 10, 30)
            })
            .collect()
    }

    #[test]
    fn test_alternating_small_deltas_never_significant() {
        let mut tally = ScrollTally::new();
        let deltas: Vec<i32> = (0..50).map(|i| if i % 2 == 0 { 9 } else { -9 }).collect();
        assert!(feed(&mut tally, &deltas).iter().all(Option::is_none));
    }

    #[test]
    fn test_hide_requires_larger_run_than_show() {
        let mut tally = ScrollTally::new();
        // y increasing = content scrolled towards the end = hide
        let results = feed(&mut tally, &[10, 10, 10]);
        assert!(results[0].is_none());
        assert!(results[1].is_none());
        let intent = results[2].unwrap();
        assert_eq!(intent.direction, ScrollDirection::Hide);
        assert_eq!(intent.diff, -30.0);

        let mut tally = ScrollTally::new();
        let intent = feed(&mut tally, &[-10])[0].unwrap();
        assert_eq!(intent.direction, ScrollDirection::Reveal);
        assert_eq!(intent.diff, 10.0);
    }

    #[test]
    fn test_steps_after_threshold_carry_only_their_own_delta() {
        let mut tally = ScrollTally::new();
        let results = feed(&mut tally, &[-4, -4, -4, -5]);
        assert!(results[0].is_none());
        assert!(results[1].is_none());
        assert_eq!(results[2].unwrap().diff, 12.0);
        assert_eq!(results[3].unwrap().diff, 5.0);
        assert_eq!(tally.value(), 17);
    }

    #[test]
    fn test_reversal_resets_tally() {
        let mut tally = ScrollTally::new();
        feed(&mut tally, &[-8]);
        assert_eq!(tally.value(), 8);
        feed(&mut tally, &[3]);
        assert_eq!(tally.value(), -3);
    }

    #[test]
    fn test_zero_delta_resets_tally() {
        let mut tally = ScrollTally::new();
        feed(&mut tally, &[-8]);
        assert!(feed(&mut tally, &[0])[0].is_none());
        assert_eq!(tally.value(), 0);
    }
}
