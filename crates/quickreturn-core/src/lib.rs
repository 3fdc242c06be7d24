pub mod animation;
pub mod config;
pub mod container;
pub mod error;
pub mod host;
pub mod registry;
pub mod snap;
pub mod source;
pub mod tally;
pub mod translation;

#[cfg(test)]
mod testing;

pub use animation::{AnimationState, TransitionKind};
pub use config::{AppConfig, EasingType, QuickReturnConfig, RevealMode, SnapPolicy};
pub use container::QuickReturnContainer;
pub use error::{Error, Result};
pub use host::{ContentInsets, Host, InterpolationToken, Scheduler, TimerHandle, TransitionId, ViewHost, ViewId};
pub use registry::{Edge, EntryFlags, QuickReturnEntry};
pub use source::{
    ContinuousScrollSource, DeltaScrollSource, ListScrollSource, RawScrollInput, ScrollChange,
    ScrollEvent, ScrollObserver, ScrollSource, ScrollState, TouchPhase,
};
pub use tally::ScrollDirection;
