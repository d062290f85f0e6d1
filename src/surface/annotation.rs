use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{PixelPoint, SeriesId};
use crate::layout::LabelOffset;
use crate::render::{Color, TextHAlign};

/// Identifier of an annotation inside one surface's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnnotationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelStyle {
    pub font_size_px: f64,
    pub padding_top_px: f64,
    pub padding_bottom_px: f64,
    pub padding_horizontal_px: f64,
    pub text_color: Color,
    pub background: Color,
    pub h_align: TextHAlign,
}

/// Where a label is pinned before its offset is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LabelAnchor {
    Point(PixelPoint),
    /// Follows the tracer with this id on the same surface.
    Tracer(AnnotationId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CursorLineAnnotation {
    pub x: f64,
    pub top: f64,
    pub bottom: f64,
    pub style: LineStyle,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelAnnotation {
    pub text: String,
    pub anchor: LabelAnchor,
    pub offset: LabelOffset,
    pub style: LabelStyle,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TracerAnnotation {
    pub series: SeriesId,
    pub key: f64,
    pub value: f64,
    pub position: PixelPoint,
    pub color: Color,
    pub size_px: f64,
    pub visible: bool,
}

/// Cursor visuals a surface draws on behalf of the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    CursorLine(CursorLineAnnotation),
    Label(LabelAnnotation),
    Tracer(TracerAnnotation),
}

impl Annotation {
    #[must_use]
    pub fn is_visible(&self) -> bool {
        match self {
            Self::CursorLine(line) => line.visible,
            Self::Label(label) => label.visible,
            Self::Tracer(tracer) => tracer.visible,
        }
    }

    #[must_use]
    pub fn as_line(&self) -> Option<&CursorLineAnnotation> {
        match self {
            Self::CursorLine(line) => Some(line),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_label(&self) -> Option<&LabelAnnotation> {
        match self {
            Self::Label(label) => Some(label),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_tracer(&self) -> Option<&TracerAnnotation> {
        match self {
            Self::Tracer(tracer) => Some(tracer),
            _ => None,
        }
    }
}

/// Owned store of annotations with explicit create/destroy.
///
/// Ids are never reused within one arena, so a stale handle can only miss.
#[derive(Debug, Clone, Default)]
pub struct AnnotationArena {
    entries: IndexMap<AnnotationId, Annotation>,
    next_id: u64,
}

impl AnnotationArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, annotation: Annotation) -> AnnotationId {
        self.next_id += 1;
        let id = AnnotationId(self.next_id);
        self.entries.insert(id, annotation);
        id
    }

    /// Replaces an existing entry; returns `false` for unknown ids.
    pub fn replace(&mut self, id: AnnotationId, annotation: Annotation) -> bool {
        match self.entries.get_mut(&id) {
            Some(slot) => {
                *slot = annotation;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: AnnotationId) -> Option<Annotation> {
        self.entries.shift_remove(&id)
    }

    #[must_use]
    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.entries.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnnotationId, &Annotation)> {
        self.entries.iter().map(|(id, annotation)| (*id, annotation))
    }

    /// Resolves a label's anchor to a pixel position.
    #[must_use]
    pub fn anchor_position(&self, anchor: LabelAnchor) -> Option<PixelPoint> {
        match anchor {
            LabelAnchor::Point(point) => Some(point),
            LabelAnchor::Tracer(id) => self.get(id)?.as_tracer().map(|tracer| tracer.position),
        }
    }
}
