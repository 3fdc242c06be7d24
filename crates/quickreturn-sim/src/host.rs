//! Deterministic host toolkit
//!
//! Views, tweens and timers all run on a virtual clock that only moves when
//! [`SimulatedHost::poll`] is asked to move it. Completions come back as
//! [`HostCallback`]s in time order for the caller to hand to the engine.

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use quickreturn_core::{
    ContentInsets, EasingType, Edge, InterpolationToken, Scheduler, TimerHandle, ViewHost, ViewId,
};
use tracing::trace;

use crate::motion::Tween;

/// Something the host reports back to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCallback {
    InterpolationFinished(InterpolationToken),
    TimerFired(TimerHandle),
}

#[derive(Debug, Clone, Default)]
pub struct SimView {
    pub height: i32,
    pub translation_y: f32,
    pub stack_offset: Option<(Edge, i32)>,
}

#[derive(Debug, Default)]
pub struct SimulatedHost {
    now: Duration,
    views: BTreeMap<ViewId, SimView>,
    tweens: Vec<Tween>,
    timers: BTreeMap<TimerHandle, Duration>,
    /// Callbacks due immediately, e.g. for a tween replaced mid-flight
    immediate: VecDeque<HostCallback>,
    insets: ContentInsets,
    next_timer: u64,
}

impl SimulatedHost {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Add a view of the given height, or resize an existing one
    pub fn put_view(&mut self, view: ViewId, height: i32) {
        self.views.entry(view).or_default().height = height;
    }

    pub fn view(&self, view: ViewId) -> Option<&SimView> {
        self.views.get(&view)
    }

    pub fn insets(&self) -> ContentInsets {
        self.insets
    }

    pub fn is_animating(&self) -> bool {
        !self.tweens.is_empty()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Whether anything is left to run
    pub fn is_idle(&self) -> bool {
        self.tweens.is_empty() && self.timers.is_empty() && self.immediate.is_empty()
    }

    /// Move the clock forward to the next callback due no later than `until`.
    ///
    /// Returns `None` once nothing else is due, with the clock left at `until`.
    /// Tween completions due at the same instant as a timer come first.
    pub fn poll(&mut self, until: Duration) -> Option<HostCallback> {
        if let Some(callback) = self.immediate.pop_front() {
            return Some(callback);
        }
        let until = until.max(self.now);

        let next_tween = self
            .tweens
            .iter()
            .enumerate()
            .min_by_key(|(_, t)| t.ends_at())
            .map(|(i, t)| (i, t.ends_at()));
        let next_timer = self
            .timers
            .iter()
            .min_by_key(|(handle, due)| (**due, **handle))
            .map(|(handle, due)| (*handle, *due));

        let tween_due = next_tween.filter(|(_, at)| *at <= until);
        let timer_due = next_timer.filter(|(_, at)| *at <= until);

        match (tween_due, timer_due) {
            (Some((index, at)), timer) if timer.map_or(true, |(_, t)| at <= t) => {
                self.advance_to(at);
                let tween = self.tweens.remove(index);
                self.set_translation(tween.view, tween.to);
                trace!(view = tween.view.0, at_ms = at.as_millis() as u64, "Tween finished");
                Some(HostCallback::InterpolationFinished(tween.token))
            }
            (_, Some((handle, at))) => {
                self.advance_to(at);
                self.timers.remove(&handle);
                trace!(timer = handle.0, at_ms = at.as_millis() as u64, "Timer fired");
                Some(HostCallback::TimerFired(handle))
            }
            _ => {
                self.advance_to(until);
                None
            }
        }
    }

    fn advance_to(&mut self, now: Duration) {
        self.now = now;
        let frame: Vec<(ViewId, f32)> = self
            .tweens
            .iter()
            .map(|t| (t.view, t.value_at(now)))
            .collect();
        for (view, y) in frame {
            self.set_translation(view, y);
        }
    }

    fn set_translation(&mut self, view: ViewId, y: f32) {
        self.views.entry(view).or_default().translation_y = y;
    }
}

impl ViewHost for SimulatedHost {
    fn measure_height(&self, view: ViewId) -> i32 {
        self.views.get(&view).map_or(0, |v| v.height)
    }

    fn translation_y(&self, view: ViewId) -> f32 {
        self.views.get(&view).map_or(0.0, |v| v.translation_y)
    }

    fn set_translation_y(&mut self, view: ViewId, y: f32) {
        self.set_translation(view, y);
    }

    /// A view animated again while a tween is running ends the old tween
    /// first, and its completion is still reported.
    fn animate_translation_y(
        &mut self,
        view: ViewId,
        from: f32,
        to: f32,
        duration: Duration,
        easing: EasingType,
        token: InterpolationToken,
    ) {
        if let Some(index) = self.tweens.iter().position(|t| t.view == view) {
            let replaced = self.tweens.remove(index);
            self.immediate
                .push_back(HostCallback::InterpolationFinished(replaced.token));
        }

        self.set_translation(view, from);
        self.tweens.push(Tween {
            view,
            start: self.now,
            from,
            to,
            duration,
            easing,
            token,
        });
    }

    fn set_stack_offset(&mut self, view: ViewId, edge: Edge, offset: i32) {
        self.views.entry(view).or_default().stack_offset = Some((edge, offset));
    }

    fn set_content_insets(&mut self, insets: ContentInsets) {
        self.insets = insets;
    }
}

impl Scheduler for SimulatedHost {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.next_timer += 1;
        let handle = TimerHandle(self.next_timer);
        self.timers.insert(handle, self.now + delay);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickreturn_core::TransitionId;

    fn token(id: u64, view: u64) -> InterpolationToken {
        InterpolationToken {
            transition: TransitionId(id),
            view: ViewId(view),
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_callbacks_arrive_in_time_order() {
        let mut host = SimulatedHost::new();
        host.put_view(ViewId(1), 40);

        let late = host.schedule(ms(500));
        host.animate_translation_y(ViewId(1), 0.0, -40.0, ms(200), EasingType::Linear, token(1, 1));
        let early = host.schedule(ms(100));

        assert_eq!(host.poll(ms(1000)), Some(HostCallback::TimerFired(early)));
        assert_eq!(host.now(), ms(100));
        assert!((host.translation_y(ViewId(1)) + 20.0).abs() < 0.01);

        assert_eq!(
            host.poll(ms(1000)),
            Some(HostCallback::InterpolationFinished(token(1, 1)))
        );
        assert_eq!(host.translation_y(ViewId(1)), -40.0);

        assert_eq!(host.poll(ms(1000)), Some(HostCallback::TimerFired(late)));
        assert_eq!(host.poll(ms(1000)), None);
        assert_eq!(host.now(), ms(1000));
        assert!(host.is_idle());
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut host = SimulatedHost::new();
        let handle = host.schedule(ms(100));
        host.cancel(handle);
        assert_eq!(host.poll(ms(200)), None);
    }

    #[test]
    fn test_poll_stops_at_horizon() {
        let mut host = SimulatedHost::new();
        host.animate_translation_y(ViewId(1), 0.0, 100.0, ms(400), EasingType::Linear, token(1, 1));
        assert_eq!(host.poll(ms(100)), None);
        assert_eq!(host.now(), ms(100));
        assert!((host.translation_y(ViewId(1)) - 25.0).abs() < 0.01);
        assert!(host.is_animating());
    }

    #[test]
    fn test_replaced_tween_still_reports() {
        let mut host = SimulatedHost::new();
        host.animate_translation_y(ViewId(1), 0.0, -40.0, ms(200), EasingType::Linear, token(1, 1));
        host.animate_translation_y(ViewId(1), -10.0, 0.0, ms(200), EasingType::Linear, token(2, 1));

        assert_eq!(
            host.poll(ms(0)),
            Some(HostCallback::InterpolationFinished(token(1, 1)))
        );
        assert_eq!(
            host.poll(ms(500)),
            Some(HostCallback::InterpolationFinished(token(2, 1)))
        );
    }

    #[test]
    fn test_layout_calls_recorded() {
        let mut host = SimulatedHost::new();
        host.put_view(ViewId(3), 20);
        host.set_stack_offset(ViewId(3), Edge::Footer, 50);
        assert_eq!(host.view(ViewId(3)).unwrap().stack_offset, Some((Edge::Footer, 50)));
        assert_eq!(host.measure_height(ViewId(3)), 20);
        assert_eq!(host.measure_height(ViewId(9)), 0);
    }
}
