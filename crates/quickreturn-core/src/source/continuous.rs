//! Continuous scroll container source
//!
//! These containers report their offset directly but have no idle event of
//! their own. Idle is inferred: every offset change re-arms a short quiet
//! timer, and the timer firing while no finger is down means scrolling
//! stopped. A step within the touch slop, or one landing on the top edge,
//! counts as settled straight away.

use std::time::Duration;

use tracing::trace;

use super::{RawScrollInput, ScrollChange, ScrollEvent, ScrollSource, ScrollState, SourceKind, TouchPhase};
use crate::config::QuickReturnConfig;
use crate::host::{Scheduler, TimerHandle};

#[derive(Debug, Clone)]
pub struct ContinuousScrollSource {
    quiet_period: Duration,
    touch_slop: i32,
    touching: bool,
    state: ScrollState,
    quiet_timer: Option<TimerHandle>,
}

impl Default for ContinuousScrollSource {
    fn default() -> Self {
        Self::new(&QuickReturnConfig::default())
    }
}

impl ContinuousScrollSource {
    pub fn new(config: &QuickReturnConfig) -> Self {
        Self {
            quiet_period: config.idle_quiet_period(),
            touch_slop: config.touch_slop.max(0),
            touching: false,
            state: ScrollState::Idle,
            quiet_timer: None,
        }
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    fn transition(&mut self, state: ScrollState, events: &mut Vec<ScrollEvent>) {
        if self.state != state {
            self.state = state;
            events.push(ScrollEvent::StateChanged(state));
        }
    }

    fn rearm(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(handle) = self.quiet_timer.take() {
            scheduler.cancel(handle);
        }
        self.quiet_timer = Some(scheduler.schedule(self.quiet_period));
    }

    fn disarm(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(handle) = self.quiet_timer.take() {
            scheduler.cancel(handle);
        }
    }

    fn on_offset(&mut self, change: ScrollChange, scheduler: &mut dyn Scheduler) -> Vec<ScrollEvent> {
        let mut events = vec![ScrollEvent::Scrolled(change)];

        let moved = (i64::from(change.y) - i64::from(change.old_y)).abs();
        let settled = moved <= i64::from(self.touch_slop) || change.y <= 0;
        if settled && !self.touching {
            self.disarm(scheduler);
            self.transition(ScrollState::Idle, &mut events);
            return events;
        }

        self.rearm(scheduler);
        if !self.touching && self.state == ScrollState::Idle {
            // moving without a finger down: programmatic or momentum scroll
            self.transition(ScrollState::Flinging, &mut events);
        }
        events
    }

    fn on_touch(&mut self, phase: TouchPhase, scheduler: &mut dyn Scheduler) -> Vec<ScrollEvent> {
        let mut events = Vec::new();
        match phase {
            TouchPhase::Down => {
                self.touching = true;
                self.disarm(scheduler);
                self.transition(ScrollState::Dragging, &mut events);
            }
            TouchPhase::Move => {
                self.touching = true;
                self.transition(ScrollState::Dragging, &mut events);
            }
            TouchPhase::Up | TouchPhase::Cancel => {
                self.touching = false;
                if self.quiet_timer.is_some() {
                    self.transition(ScrollState::Flinging, &mut events);
                } else {
                    self.transition(ScrollState::Idle, &mut events);
                }
            }
        }
        events
    }
}

impl ScrollSource for ContinuousScrollSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Continuous
    }

    fn handle(&mut self, input: &RawScrollInput, scheduler: &mut dyn Scheduler) -> Vec<ScrollEvent> {
        match input {
            RawScrollInput::Offset { x, y, old_x, old_y } => {
                self.on_offset(ScrollChange::new(*x, *y, *old_x, *old_y), scheduler)
            }
            RawScrollInput::Touch(phase) => self.on_touch(*phase, scheduler),
            other => {
                trace!(?other, "Input not used by continuous source");
                Vec::new()
            }
        }
    }

    fn claims_timer(&self, handle: TimerHandle) -> bool {
        self.quiet_timer == Some(handle)
    }

    fn timer_fired(&mut self, handle: TimerHandle) -> Option<ScrollEvent> {
        if self.quiet_timer != Some(handle) {
            return None;
        }
        self.quiet_timer = None;

        if self.touching || self.state == ScrollState::Idle {
            return None;
        }
        self.state = ScrollState::Idle;
        Some(ScrollEvent::StateChanged(ScrollState::Idle))
    }

    fn configure(&mut self, config: &QuickReturnConfig) {
        self.quiet_period = config.idle_quiet_period();
        self.touch_slop = config.touch_slop.max(0);
    }

    fn detach(&mut self, scheduler: &mut dyn Scheduler) {
        self.disarm(scheduler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingTimers {
        next: u64,
        cancelled: Vec<TimerHandle>,
    }

    impl Scheduler for CountingTimers {
        fn schedule(&mut self, _delay: Duration) -> TimerHandle {
            self.next += 1;
            TimerHandle(self.next)
        }

        fn cancel(&mut self, handle: TimerHandle) {
            self.cancelled.push(handle);
        }
    }

    fn offset(y: i32, old_y: i32) -> RawScrollInput {
        RawScrollInput::Offset { x: 0, y, old_x: 0, old_y }
    }

    #[test]
    fn test_drag_then_quiet_period_emits_idle() {
        let mut source = ContinuousScrollSource::default();
        let mut timers = CountingTimers::default();

        let events = source.handle(&RawScrollInput::Touch(TouchPhase::Down), &mut timers);
        assert_eq!(events, vec![ScrollEvent::StateChanged(ScrollState::Dragging)]);

        let events = source.handle(&offset(100, 50), &mut timers);
        assert_eq!(events, vec![ScrollEvent::Scrolled(ScrollChange::vertical(100, 50))]);

        let events = source.handle(&RawScrollInput::Touch(TouchPhase::Up), &mut timers);
        assert_eq!(events, vec![ScrollEvent::StateChanged(ScrollState::Flinging)]);

        let timer = TimerHandle(timers.next);
        assert!(source.claims_timer(timer));
        assert_eq!(
            source.timer_fired(timer),
            Some(ScrollEvent::StateChanged(ScrollState::Idle))
        );
        assert!(!source.claims_timer(timer));
    }

    #[test]
    fn test_extreme_jump_counts_as_movement() {
        let mut source = ContinuousScrollSource::default();
        let events = source.handle(&offset(i32::MAX, i32::MIN), &mut CountingTimers::default());
        assert_eq!(
            events,
            vec![
                ScrollEvent::Scrolled(ScrollChange::vertical(i32::MAX, i32::MIN)),
                ScrollEvent::StateChanged(ScrollState::Flinging),
            ]
        );
    }

    #[test]
    fn test_each_change_rearms_quiet_timer() {
        let mut source = ContinuousScrollSource::default();
        let mut timers = CountingTimers::default();

        source.handle(&offset(100, 50), &mut timers);
        source.handle(&offset(150, 100), &mut timers);
        assert_eq!(timers.cancelled, vec![TimerHandle(1)]);

        // stale handle does nothing
        assert_eq!(source.timer_fired(TimerHandle(1)), None);
        assert_eq!(
            source.timer_fired(TimerHandle(2)),
            Some(ScrollEvent::StateChanged(ScrollState::Idle))
        );
    }

    #[test]
    fn test_touch_down_suppresses_idle() {
        let mut source = ContinuousScrollSource::default();
        let mut timers = CountingTimers::default();

        source.handle(&offset(100, 50), &mut timers);
        source.handle(&RawScrollInput::Touch(TouchPhase::Down), &mut timers);
        assert_eq!(timers.cancelled, vec![TimerHandle(1)]);
        assert_eq!(source.timer_fired(TimerHandle(1)), None);
        assert_eq!(source.state(), ScrollState::Dragging);
    }

    #[test]
    fn test_small_step_without_touch_settles_immediately() {
        let mut source = ContinuousScrollSource::default();
        let mut timers = CountingTimers::default();

        source.handle(&offset(100, 50), &mut timers);
        let events = source.handle(&offset(103, 100), &mut timers);
        assert_eq!(
            events,
            vec![
                ScrollEvent::Scrolled(ScrollChange::vertical(103, 100)),
                ScrollEvent::StateChanged(ScrollState::Idle),
            ]
        );
    }

    #[test]
    fn test_release_without_motion_is_idle() {
        let mut source = ContinuousScrollSource::default();
        let mut timers = CountingTimers::default();

        source.handle(&RawScrollInput::Touch(TouchPhase::Down), &mut timers);
        let events = source.handle(&RawScrollInput::Touch(TouchPhase::Cancel), &mut timers);
        assert_eq!(events, vec![ScrollEvent::StateChanged(ScrollState::Idle)]);
    }
}
