//! Plot surface contract consumed by the cursor engine.
//!
//! A surface owns one chart pane: its key/value transforms, the series it
//! plots, and an arena of annotations the engine creates on it. The engine
//! never holds drawing objects directly, only `HandleRef`s into these arenas.

mod annotation;
mod signal_surface;

pub use annotation::{
    Annotation, AnnotationArena, AnnotationId, CursorLineAnnotation, LabelAnchor,
    LabelAnnotation, LabelStyle, LineStyle, TracerAnnotation,
};
pub use signal_surface::SignalSurface;

use serde::{Deserialize, Serialize};

use crate::core::{PlotRect, Series, SeriesId};
use crate::error::CursorResult;

/// Engine-assigned identity of a registered surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(pub u64);

/// Annotation handle qualified by the surface that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandleRef {
    pub surface: SurfaceId,
    pub id: AnnotationId,
}

/// Identity of a plotted series across all surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesKey {
    pub surface: SurfaceId,
    pub series: SeriesId,
}

pub trait PlotSurface {
    fn key_to_pixel_x(&self, key: f64) -> CursorResult<f64>;
    fn pixel_x_to_key(&self, pixel_x: f64) -> CursorResult<f64>;
    fn value_to_pixel_y(&self, value: f64) -> CursorResult<f64>;

    /// Currently visible key extent as `(lower, upper)`.
    fn visible_range(&self) -> (f64, f64);
    fn plot_rect(&self) -> PlotRect;
    fn series_list(&self) -> &[Series];

    /// Maximum pixel distance at which a press still hits a drawn element.
    fn selection_tolerance_px(&self) -> f64;

    fn create_annotation(&mut self, annotation: Annotation) -> AnnotationId;
    fn update_annotation(&mut self, id: AnnotationId, annotation: Annotation) -> bool;
    fn destroy_annotation(&mut self, id: AnnotationId) -> bool;
    fn annotation(&self, id: AnnotationId) -> Option<&Annotation>;

    fn request_redraw(&mut self);

    fn set_pan_zoom_enabled(&mut self, enabled: bool);
    fn pan_zoom_enabled(&self) -> bool;
}
