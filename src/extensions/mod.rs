//! Collaborators built on top of the cursor engine's public entry points.

pub mod observers;
pub mod replay;

pub use observers::{CursorContext, CursorEvent, CursorObserver};
pub use replay::{ReplayConfig, ReplayDriver, ReplayPositionObserver, ReplayState};
