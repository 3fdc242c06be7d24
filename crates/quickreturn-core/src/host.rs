//! Primitives the engine borrows from the host toolkit
//!
//! The container never owns views, clocks or tweens. It asks the host to
//! measure, move and animate views and to run timers, and the host calls back
//! into the container when an interpolation finishes or a timer fires.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::EasingType;
use crate::registry::Edge;

/// Opaque handle of a host view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

/// Handle of a scheduled callback, issued by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// Identifies one group of interpolations started together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(pub u64);

/// Returned to the container with every finished interpolation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterpolationToken {
    pub transition: TransitionId,
    pub view: ViewId,
}

/// Space the scrollable content has to leave for the bars
///
/// Margins come from bars that sit beside the content, padding from bars
/// drawn on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentInsets {
    pub top_margin: i32,
    pub bottom_margin: i32,
    pub top_padding: i32,
    pub bottom_padding: i32,
}

/// View operations the engine needs from the host
pub trait ViewHost {
    /// Current measured height of a view in pixels
    fn measure_height(&self, view: ViewId) -> i32;

    fn translation_y(&self, view: ViewId) -> f32;

    fn set_translation_y(&mut self, view: ViewId, y: f32);

    /// Start animating `translationY` from `from` to `to`.
    ///
    /// The host reports completion later through
    /// [`QuickReturnContainer::on_interpolation_finished`](crate::QuickReturnContainer::on_interpolation_finished).
    fn animate_translation_y(
        &mut self,
        view: ViewId,
        from: f32,
        to: f32,
        duration: Duration,
        easing: EasingType,
        token: InterpolationToken,
    );

    /// Distance of a bar from its edge of the container
    fn set_stack_offset(&mut self, view: ViewId, edge: Edge, offset: i32);

    fn set_content_insets(&mut self, insets: ContentInsets);
}

/// Delayed callbacks
pub trait Scheduler {
    /// The host reports firing through
    /// [`QuickReturnContainer::on_timer_fired`](crate::QuickReturnContainer::on_timer_fired).
    fn schedule(&mut self, delay: Duration) -> TimerHandle;

    fn cancel(&mut self, handle: TimerHandle);
}

/// Everything a host toolkit provides
pub trait Host: ViewHost + Scheduler {}

impl<T: ViewHost + Scheduler> Host for T {}
