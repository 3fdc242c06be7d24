//! Simulated host toolkit for the quick-return engine
//!
//! Runs the engine against a virtual clock: views keep their translations in
//! memory, tweens are interpolated with the configured easing and timers fire
//! in order. Scroll traces recorded as JSON or TOML can be replayed step by
//! step.

pub mod host;
pub mod motion;
pub mod session;
pub mod trace;

pub use host::{HostCallback, SimulatedHost};
pub use session::{ReplaySession, Snapshot};
pub use trace::{BarSpec, ScrollTrace, TraceSource, TraceStep};
