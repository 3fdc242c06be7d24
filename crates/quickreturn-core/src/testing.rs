//! In-crate host double for engine tests

use std::collections::HashMap;
use std::time::Duration;

use crate::config::EasingType;
use crate::container::QuickReturnContainer;
use crate::host::{ContentInsets, InterpolationToken, Scheduler, TimerHandle, ViewHost, ViewId};
use crate::registry::Edge;

#[derive(Debug, Clone)]
pub struct RecordedAnimation {
    pub view: ViewId,
    pub from: f32,
    pub to: f32,
    pub duration: Duration,
    pub easing: EasingType,
    pub token: InterpolationToken,
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    pub heights: HashMap<ViewId, i32>,
    pub translations: HashMap<ViewId, f32>,
    pub offsets: HashMap<ViewId, (Edge, i32)>,
    pub insets: ContentInsets,
    pub running: Vec<RecordedAnimation>,
    pub started: usize,
    pub scheduled: Vec<(TimerHandle, Duration)>,
    pub cancelled: Vec<TimerHandle>,
    next_timer: u64,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_view(mut self, id: u64, height: i32) -> Self {
        self.heights.insert(ViewId(id), height);
        self
    }

    pub fn y(&self, id: u64) -> f32 {
        self.translations.get(&ViewId(id)).copied().unwrap_or(0.0)
    }

    /// Jump every running interpolation to its end and report it
    pub fn finish_animations(&mut self, container: &mut QuickReturnContainer) {
        for anim in std::mem::take(&mut self.running) {
            self.translations.insert(anim.view, anim.to);
            container.on_interpolation_finished(anim.token);
        }
    }

    pub fn last_timer(&self) -> Option<TimerHandle> {
        self.scheduled.last().map(|(h, _)| *h)
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.scheduled.iter().any(|(h, _)| *h == handle) && !self.cancelled.contains(&handle)
    }
}

impl ViewHost for RecordingHost {
    fn measure_height(&self, view: ViewId) -> i32 {
        self.heights.get(&view).copied().unwrap_or(0)
    }

    fn translation_y(&self, view: ViewId) -> f32 {
        self.translations.get(&view).copied().unwrap_or(0.0)
    }

    fn set_translation_y(&mut self, view: ViewId, y: f32) {
        self.translations.insert(view, y);
    }

    fn animate_translation_y(
        &mut self,
        view: ViewId,
        from: f32,
        to: f32,
        duration: Duration,
        easing: EasingType,
        token: InterpolationToken,
    ) {
        self.started += 1;
        self.translations.insert(view, from);
        self.running.push(RecordedAnimation {
            view,
            from,
            to,
            duration,
            easing,
            token,
        });
    }

    fn set_stack_offset(&mut self, view: ViewId, edge: Edge, offset: i32) {
        self.offsets.insert(view, (edge, offset));
    }

    fn set_content_insets(&mut self, insets: ContentInsets) {
        self.insets = insets;
    }
}

impl Scheduler for RecordingHost {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.next_timer += 1;
        let handle = TimerHandle(self.next_timer);
        self.scheduled.push((handle, delay));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.cancelled.push(handle);
    }
}
