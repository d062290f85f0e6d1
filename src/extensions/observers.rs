use serde::{Deserialize, Serialize};

use crate::interaction::{CursorMode, CursorSlot};

/// Read-only engine snapshot passed alongside every event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorContext {
    pub mode: CursorMode,
    pub first_key: f64,
    pub second_key: f64,
    pub dragging: Option<CursorSlot>,
    pub surface_count: usize,
}

/// Notifications published by the cursor engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CursorEvent {
    /// Fired for every accepted key update, whether or not cursors are shown.
    KeyChanged { key: f64, slot: CursorSlot },
    ModeChanged { from: CursorMode, to: CursorMode },
    DragStarted { slot: CursorSlot },
    DragEnded { slot: CursorSlot },
}

/// Subscriber interface for hosts that track cursor state.
///
/// Observers run inline, in registration order, before the engine touches
/// any surface visuals for the same update.
pub trait CursorObserver {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: CursorEvent, context: CursorContext);
}
