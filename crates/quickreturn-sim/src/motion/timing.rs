//! Time calculation on the simulated clock
//!
//! The simulator never reads wall time. Every function here takes the
//! virtual `now` explicitly so replays are reproducible.

use std::time::Duration;

/// Animation progress (0.0 to 1.0) at `now` for an animation started at `start`
///
/// # Returns
/// Progress value clamped to [0.0, 1.0]
#[inline]
pub fn progress(start: Duration, duration: Duration, now: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_sub(start);
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Check if animation is complete
#[inline]
pub fn is_complete(start: Duration, duration: Duration, now: Duration) -> bool {
    now >= start + duration
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Linear interpolation for translations
#[inline]
pub fn lerp_f32(from: f32, to: f32, t: f64) -> f32 {
    lerp(from as f64, to as f64, t) as f32
}
