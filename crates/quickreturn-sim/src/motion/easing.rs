//! Easing curves
//!
//! Map progress in [0, 1] to eased progress. Every curve starts at 0 and ends
//! at 1; `BackOut` overshoots slightly before settling.

use quickreturn_core::EasingType;

/// Overshoot amount of the back-out curve
const BACK_OVERSHOOT: f64 = 1.70158;

/// Extension trait for EasingType with calculation methods
pub trait EasingExt {
    /// Apply the easing function to a progress value
    ///
    /// # Arguments
    /// * `t` - Progress value in range [0, 1]
    fn apply(&self, t: f64) -> f64;
}

impl EasingExt for EasingType {
    #[inline]
    fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::Linear => t,
            EasingType::QuadIn => t * t,
            EasingType::QuadOut => quad_ease_out(t),
            EasingType::Cubic => cubic_ease_out(t),
            EasingType::BackOut => back_ease_out(t),
        }
    }
}

/// f(t) = 1 - (1-t)²
#[inline]
fn quad_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv
}

/// Cubic ease-out: f(t) = 1 - (1-t)³
#[inline]
fn cubic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// f(t) = 1 + (s+1)(t-1)³ + s(t-1)²
#[inline]
fn back_ease_out(t: f64) -> f64 {
    let u = t - 1.0;
    1.0 + (BACK_OVERSHOOT + 1.0) * u * u * u + BACK_OVERSHOOT * u * u
}
