//! A single running translation animation

use std::time::Duration;

use quickreturn_core::{EasingType, InterpolationToken, ViewId};

use super::easing::EasingExt;
use super::timing::{is_complete, lerp_f32, progress};

#[derive(Debug, Clone)]
pub struct Tween {
    pub view: ViewId,
    /// Virtual time the tween started at
    pub start: Duration,
    pub from: f32,
    pub to: f32,
    pub duration: Duration,
    pub easing: EasingType,
    /// Handed back to the engine on completion
    pub token: InterpolationToken,
}

impl Tween {
    /// Interpolated translation at `now`
    pub fn value_at(&self, now: Duration) -> f32 {
        if self.is_complete(now) {
            return self.to;
        }
        let t = self.easing.apply(progress(self.start, self.duration, now));
        lerp_f32(self.from, self.to, t)
    }

    #[inline]
    pub fn is_complete(&self, now: Duration) -> bool {
        is_complete(self.start, self.duration, now)
    }

    #[inline]
    pub fn ends_at(&self) -> Duration {
        self.start + self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickreturn_core::TransitionId;

    fn tween(easing: EasingType) -> Tween {
        Tween {
            view: ViewId(1),
            start: Duration::from_millis(1000),
            from: 0.0,
            to: -100.0,
            duration: Duration::from_millis(200),
            easing,
            token: InterpolationToken {
                transition: TransitionId(1),
                view: ViewId(1),
            },
        }
    }

    #[test]
    fn test_value_follows_curve() {
        let linear = tween(EasingType::Linear);
        assert_eq!(linear.value_at(Duration::from_millis(1000)), 0.0);
        assert!((linear.value_at(Duration::from_millis(1100)) + 50.0).abs() < 0.01);
        assert_eq!(linear.value_at(Duration::from_millis(1200)), -100.0);

        let quad_in = tween(EasingType::QuadIn);
        assert!((quad_in.value_at(Duration::from_millis(1100)) + 25.0).abs() < 0.01);
    }

    #[test]
    fn test_lands_exactly_on_target() {
        let back = tween(EasingType::BackOut);
        assert_eq!(back.value_at(Duration::from_secs(5)), -100.0);
        assert_eq!(back.ends_at(), Duration::from_millis(1200));
    }
}
