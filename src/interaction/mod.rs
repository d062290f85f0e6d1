use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CursorError;
use crate::surface::{HandleRef, SeriesKey, SurfaceId};

/// How many measurement cursors are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CursorMode {
    #[default]
    Off,
    Single,
    Double,
}

impl CursorMode {
    /// Number of cursor slots that carry live visuals in this mode.
    #[must_use]
    pub fn active_count(self) -> usize {
        match self {
            Self::Off => 0,
            Self::Single => 1,
            Self::Double => 2,
        }
    }

    #[must_use]
    pub fn is_active(self, slot: CursorSlot) -> bool {
        slot.position() < self.active_count()
    }
}

impl fmt::Display for CursorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Off => "off",
            Self::Single => "single",
            Self::Double => "double",
        };
        f.write_str(name)
    }
}

impl FromStr for CursorMode {
    type Err = CursorError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(Self::Off),
            "single" | "one" => Ok(Self::Single),
            "double" | "two" => Ok(Self::Double),
            other => Err(CursorError::InvalidData(format!(
                "unknown cursor mode `{other}`"
            ))),
        }
    }
}

/// One of the two fixed cursor identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CursorSlot {
    First,
    Second,
}

impl CursorSlot {
    pub const ALL: [Self; 2] = [Self::First, Self::Second];

    /// Maps the user-facing 1-based slot number; anything else is `None`.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            1 => Some(Self::First),
            2 => Some(Self::Second),
            _ => None,
        }
    }

    /// 1-based slot number.
    #[must_use]
    pub fn index(self) -> usize {
        self.position() + 1
    }

    pub(crate) fn position(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }
}

/// Per-slot cursor state plus the annotation handles it owns.
///
/// `line_handles` and `x_label_handles` are index-aligned with the engine's
/// surface registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CursorData {
    pub(crate) key: f64,
    pub(crate) is_dragging: bool,
    pub(crate) line_handles: Vec<HandleRef>,
    pub(crate) x_label_handles: Vec<HandleRef>,
    pub(crate) series_tracers: IndexMap<SeriesKey, HandleRef>,
    pub(crate) value_label_handles: IndexMap<HandleRef, HandleRef>,
}

impl CursorData {
    #[must_use]
    pub fn key(&self) -> f64 {
        self.key
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    #[must_use]
    pub fn line_handles(&self) -> &[HandleRef] {
        &self.line_handles
    }

    #[must_use]
    pub fn x_label_handles(&self) -> &[HandleRef] {
        &self.x_label_handles
    }

    #[must_use]
    pub fn series_tracers(&self) -> &IndexMap<SeriesKey, HandleRef> {
        &self.series_tracers
    }

    #[must_use]
    pub fn value_label_handles(&self) -> &IndexMap<HandleRef, HandleRef> {
        &self.value_label_handles
    }

    #[must_use]
    pub fn has_handles(&self) -> bool {
        !self.line_handles.is_empty()
            || !self.x_label_handles.is_empty()
            || !self.series_tracers.is_empty()
            || !self.value_label_handles.is_empty()
    }

    /// Drains every handle this slot owns, leaving the key untouched.
    pub(crate) fn take_handles(&mut self) -> Vec<HandleRef> {
        let mut handles: Vec<HandleRef> = Vec::new();
        handles.append(&mut self.line_handles);
        handles.append(&mut self.x_label_handles);
        handles.extend(self.series_tracers.drain(..).map(|(_, tracer)| tracer));
        handles.extend(self.value_label_handles.drain(..).map(|(_, label)| label));
        handles
    }
}

/// Pointer shape the host should show after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointerShape {
    #[default]
    Default,
    ResizeHorizontal,
}

/// Result of routing one pointer event through the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointerResponse {
    /// `false` means the host should forward the event to native pan/zoom.
    pub consumed: bool,
    pub shape: PointerShape,
}

impl PointerResponse {
    #[must_use]
    pub fn passthrough(shape: PointerShape) -> Self {
        Self {
            consumed: false,
            shape,
        }
    }

    #[must_use]
    pub fn consumed(shape: PointerShape) -> Self {
        Self {
            consumed: true,
            shape,
        }
    }
}

/// Active drag lock: which slot moves and which surface had pan/zoom disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragState {
    pub slot: CursorSlot,
    pub surface: SurfaceId,
}
