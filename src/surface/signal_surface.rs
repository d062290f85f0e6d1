use tracing::{debug, trace};

use crate::core::{LinearScale, PlotInsets, PlotRect, Series, SeriesId, Viewport};
use crate::error::{CursorError, CursorResult};
use crate::render::{
    LinePrimitive, RectPrimitive, RenderFrame, Renderer, TextHAlign, TextPrimitive,
};

use super::{Annotation, AnnotationArena, AnnotationId, LabelAnnotation, PlotSurface};

const DEFAULT_SELECTION_TOLERANCE_PX: f64 = 8.0;
const SERIES_STROKE_WIDTH: f64 = 1.5;
const GLYPH_WIDTH_RATIO: f64 = 0.6;
const BASELINE_RATIO: f64 = 0.8;

/// In-memory plot pane: linear key/value axes, a series list and an
/// annotation arena, rendered through any `Renderer`.
#[derive(Debug, Clone)]
pub struct SignalSurface {
    name: String,
    viewport: Viewport,
    insets: PlotInsets,
    key_scale: LinearScale,
    value_scale: LinearScale,
    series: Vec<Series>,
    selection_tolerance_px: f64,
    pan_zoom_enabled: bool,
    annotations: AnnotationArena,
    redraw_requests: u64,
    needs_redraw: bool,
}

impl SignalSurface {
    pub fn new(
        name: impl Into<String>,
        viewport: Viewport,
        key_range: (f64, f64),
        value_range: (f64, f64),
    ) -> CursorResult<Self> {
        if !viewport.is_valid() {
            return Err(CursorError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        Ok(Self {
            name: name.into(),
            viewport,
            insets: PlotInsets::default(),
            key_scale: ascending_key_scale(key_range.0, key_range.1)?,
            value_scale: LinearScale::new(value_range.0, value_range.1)?,
            series: Vec::new(),
            selection_tolerance_px: DEFAULT_SELECTION_TOLERANCE_PX,
            pan_zoom_enabled: true,
            annotations: AnnotationArena::new(),
            redraw_requests: 0,
            needs_redraw: true,
        })
    }

    /// Reserves space around the plot rectangle.
    pub fn with_insets(mut self, insets: PlotInsets) -> CursorResult<Self> {
        for value in [insets.left, insets.top, insets.right, insets.bottom] {
            if !value.is_finite() || value < 0.0 {
                return Err(CursorError::InvalidData(
                    "plot insets must be finite and >= 0".to_owned(),
                ));
            }
        }
        if insets.left + insets.right >= f64::from(self.viewport.width)
            || insets.top + insets.bottom >= f64::from(self.viewport.height)
        {
            return Err(CursorError::InvalidData(
                "plot insets leave no drawable area".to_owned(),
            ));
        }
        self.insets = insets;
        Ok(self)
    }

    pub fn with_selection_tolerance(mut self, tolerance_px: f64) -> CursorResult<Self> {
        if !tolerance_px.is_finite() || tolerance_px < 0.0 {
            return Err(CursorError::InvalidData(
                "selection tolerance must be finite and >= 0".to_owned(),
            ));
        }
        self.selection_tolerance_px = tolerance_px;
        Ok(self)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Adds a series, replacing any existing series with the same id.
    pub fn add_series(&mut self, series: Series) {
        match self.series.iter_mut().find(|item| item.id() == series.id()) {
            Some(existing) => *existing = series,
            None => self.series.push(series),
        }
        debug!(surface = %self.name, count = self.series.len(), "series set changed");
        self.needs_redraw = true;
    }

    pub fn remove_series(&mut self, id: SeriesId) -> Option<Series> {
        let index = self.series.iter().position(|item| item.id() == id)?;
        self.needs_redraw = true;
        Some(self.series.remove(index))
    }

    #[must_use]
    pub fn series(&self, id: SeriesId) -> Option<&Series> {
        self.series.iter().find(|item| item.id() == id)
    }

    pub fn series_mut(&mut self, id: SeriesId) -> Option<&mut Series> {
        self.needs_redraw = true;
        self.series.iter_mut().find(|item| item.id() == id)
    }

    /// Sets the visible key range; `lower` must be below `upper`.
    pub fn set_visible_range(&mut self, lower: f64, upper: f64) -> CursorResult<()> {
        self.key_scale = ascending_key_scale(lower, upper)?;
        self.needs_redraw = true;
        Ok(())
    }

    pub fn set_value_range(&mut self, lower: f64, upper: f64) -> CursorResult<()> {
        self.value_scale = LinearScale::new(lower, upper)?;
        self.needs_redraw = true;
        Ok(())
    }

    /// Fits the value axis to every visible sample, with 5% headroom.
    pub fn autoscale_values(&mut self) -> CursorResult<()> {
        let mut bounds: Option<(f64, f64)> = None;
        for sample in self
            .series
            .iter()
            .filter(|series| series.is_visible())
            .flat_map(|series| series.samples())
        {
            bounds = Some(match bounds {
                Some((min, max)) => (min.min(sample.value), max.max(sample.value)),
                None => (sample.value, sample.value),
            });
        }
        let Some((min, max)) = bounds else {
            return Ok(());
        };
        let span = max - min;
        let pad = if span > 0.0 { span * 0.05 } else { 1.0 };
        self.set_value_range(min - pad, max + pad)
    }

    /// Native drag-to-pan. Ignored while a cursor drag holds the surface.
    pub fn pan_by_pixels(&mut self, delta_px: f64) -> CursorResult<bool> {
        if !self.pan_zoom_enabled {
            trace!(surface = %self.name, "pan ignored while pan/zoom disabled");
            return Ok(false);
        }
        let rect = self.plot_rect();
        let key_per_px = self.key_scale.span() / rect.width();
        self.key_scale.pan(-delta_px * key_per_px)?;
        self.needs_redraw = true;
        Ok(true)
    }

    /// Native wheel zoom around a pixel x. Ignored while pan/zoom is disabled.
    pub fn zoom_at_pixel(&mut self, pixel_x: f64, factor: f64) -> CursorResult<bool> {
        if !self.pan_zoom_enabled {
            return Ok(false);
        }
        let anchor = self.pixel_x_to_key(pixel_x)?;
        self.key_scale.zoom_around(anchor, factor)?;
        self.needs_redraw = true;
        Ok(true)
    }

    #[must_use]
    pub fn annotations(&self) -> &AnnotationArena {
        &self.annotations
    }

    #[must_use]
    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }

    /// Number of redraws the engine has requested so far.
    #[must_use]
    pub fn redraw_requests(&self) -> u64 {
        self.redraw_requests
    }

    #[must_use]
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Builds the frame for this surface and hands it to `renderer`.
    pub fn render<R: Renderer>(&mut self, renderer: &mut R) -> CursorResult<()> {
        let frame = self.build_frame()?;
        renderer.render(&frame)?;
        self.needs_redraw = false;
        Ok(())
    }

    pub fn build_frame(&self) -> CursorResult<RenderFrame> {
        let mut frame = RenderFrame::new(self.viewport);
        self.push_series_lines(&mut frame)?;

        for (_, annotation) in self.annotations.iter() {
            if !annotation.is_visible() {
                continue;
            }
            match annotation {
                Annotation::CursorLine(line) => frame.push_line(LinePrimitive::new(
                    line.x,
                    line.top,
                    line.x,
                    line.bottom,
                    line.style.width,
                    line.style.color,
                )),
                Annotation::Tracer(tracer) => {
                    let half = 0.5 * tracer.size_px;
                    frame.push_rect(RectPrimitive::new(
                        tracer.position.x - half,
                        tracer.position.y - half,
                        tracer.size_px,
                        tracer.size_px,
                        tracer.color,
                    ));
                }
                Annotation::Label(label) => self.push_label(&mut frame, label),
            }
        }

        Ok(frame)
    }

    fn push_series_lines(&self, frame: &mut RenderFrame) -> CursorResult<()> {
        let (lower, upper) = self.visible_range();
        for series in self.series.iter().filter(|series| series.is_visible()) {
            let samples = series.samples();
            let start = samples
                .partition_point(|sample| sample.key < lower)
                .saturating_sub(1);
            let end = (samples.partition_point(|sample| sample.key <= upper) + 1).min(samples.len());
            let Some(window) = samples.get(start..end) else {
                continue;
            };
            for pair in window.windows(2) {
                frame.push_line(LinePrimitive::new(
                    self.key_to_pixel_x(pair[0].key)?,
                    self.value_to_pixel_y(pair[0].value)?,
                    self.key_to_pixel_x(pair[1].key)?,
                    self.value_to_pixel_y(pair[1].value)?,
                    SERIES_STROKE_WIDTH,
                    series.color(),
                ));
            }
        }
        Ok(())
    }

    fn push_label(&self, frame: &mut RenderFrame, label: &LabelAnnotation) {
        let Some(anchor) = self.annotations.anchor_position(label.anchor) else {
            return;
        };
        let style = label.style;
        let text_width = label.text.chars().count() as f64 * style.font_size_px * GLYPH_WIDTH_RATIO;
        let width = text_width + 2.0 * style.padding_horizontal_px;
        let height = style.font_size_px + style.padding_top_px + style.padding_bottom_px;
        let center_y = anchor.y + label.offset.dy;
        let anchor_x = anchor.x + label.offset.dx;
        let left = match style.h_align {
            TextHAlign::Left => anchor_x,
            TextHAlign::Center => anchor_x - 0.5 * width,
            TextHAlign::Right => anchor_x - width,
        };
        let top = center_y - 0.5 * height;

        frame.push_rect(RectPrimitive::new(left, top, width, height, style.background));
        frame.push_text(TextPrimitive::new(
            label.text.clone(),
            left + style.padding_horizontal_px,
            top + style.padding_top_px + style.font_size_px * BASELINE_RATIO,
            style.font_size_px,
            style.text_color,
            TextHAlign::Left,
        ));
    }

    fn key_pixel_span(&self) -> (f64, f64) {
        let rect = self.plot_rect();
        (rect.left, rect.right)
    }

    fn value_pixel_span(&self) -> (f64, f64) {
        let rect = self.plot_rect();
        (rect.bottom, rect.top)
    }
}

/// Key axes always run left to right, so the visible range is `(lower, upper)`.
fn ascending_key_scale(lower: f64, upper: f64) -> CursorResult<LinearScale> {
    if lower >= upper {
        return Err(CursorError::InvalidData(format!(
            "visible key range must be ascending, got ({lower}, {upper})"
        )));
    }
    LinearScale::new(lower, upper)
}

impl PlotSurface for SignalSurface {
    fn key_to_pixel_x(&self, key: f64) -> CursorResult<f64> {
        let (start, end) = self.key_pixel_span();
        self.key_scale.domain_to_pixel(key, start, end)
    }

    fn pixel_x_to_key(&self, pixel_x: f64) -> CursorResult<f64> {
        let (start, end) = self.key_pixel_span();
        self.key_scale.pixel_to_domain(pixel_x, start, end)
    }

    fn value_to_pixel_y(&self, value: f64) -> CursorResult<f64> {
        let (start, end) = self.value_pixel_span();
        self.value_scale.domain_to_pixel(value, start, end)
    }

    fn visible_range(&self) -> (f64, f64) {
        self.key_scale.domain()
    }

    fn plot_rect(&self) -> PlotRect {
        PlotRect {
            left: self.insets.left,
            top: self.insets.top,
            right: f64::from(self.viewport.width) - self.insets.right,
            bottom: f64::from(self.viewport.height) - self.insets.bottom,
        }
    }

    fn series_list(&self) -> &[Series] {
        &self.series
    }

    fn selection_tolerance_px(&self) -> f64 {
        self.selection_tolerance_px
    }

    fn create_annotation(&mut self, annotation: Annotation) -> AnnotationId {
        self.annotations.insert(annotation)
    }

    fn update_annotation(&mut self, id: AnnotationId, annotation: Annotation) -> bool {
        self.annotations.replace(id, annotation)
    }

    fn destroy_annotation(&mut self, id: AnnotationId) -> bool {
        self.annotations.remove(id).is_some()
    }

    fn annotation(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.get(id)
    }

    fn request_redraw(&mut self) {
        self.redraw_requests += 1;
        self.needs_redraw = true;
    }

    fn set_pan_zoom_enabled(&mut self, enabled: bool) {
        self.pan_zoom_enabled = enabled;
    }

    fn pan_zoom_enabled(&self) -> bool {
        self.pan_zoom_enabled
    }
}
