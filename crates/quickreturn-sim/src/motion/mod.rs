//! Interpolation for the simulated host
//!
//! # Layers
//!
//! ## Atomic
//! - `easing` - Easing curves for the engine's [`EasingType`](quickreturn_core::EasingType)
//! - `timing` - Progress and interpolation on the virtual clock
//!
//! ## Molecular
//! - `tween` - One running translation animation combining the two

// Atomic
pub mod easing;
pub mod timing;

// Molecular
pub mod tween;

pub use easing::EasingExt;
pub use tween::Tween;
