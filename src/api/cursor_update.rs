use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{trace, warn};

use crate::core::{PixelPoint, SeriesId};
use crate::extensions::CursorEvent;
use crate::interaction::{CursorMode, CursorSlot};
use crate::layout::{LabelOffset, resolve_label_stack};
use crate::render::{Color, TextHAlign};
use crate::surface::{
    Annotation, CursorLineAnnotation, HandleRef, LabelAnchor, LabelAnnotation, PlotSurface,
    SeriesKey, SurfaceId, TracerAnnotation,
};

use super::CursorEngine;
use super::handle_lifecycle::{hidden_label, hidden_tracer};

/// Value of one series under a cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorReadout {
    pub series: SeriesKey,
    pub name: String,
    pub key: f64,
    pub value: f64,
}

/// One series reading on a surface, before labels are stacked.
struct PlacedReading {
    series: SeriesId,
    color: Color,
    tracer: HandleRef,
    label: HandleRef,
    value: f64,
    y: f64,
}

impl<S: PlotSurface> CursorEngine<S> {
    /// Moves `slot` to `key`, notifies observers and refreshes every surface.
    ///
    /// Returns `false` when the update is rejected: slot 2 outside `Double`,
    /// a non-finite key, or an unchanged key while cursors are off.
    pub fn update_cursor_key(&mut self, key: f64, slot: CursorSlot) -> bool {
        if !key.is_finite() {
            warn!(slot = slot.index(), key, "ignoring non-finite cursor key");
            return false;
        }
        if slot == CursorSlot::Second && self.mode != CursorMode::Double {
            return false;
        }
        let position = slot.position();
        if self.mode == CursorMode::Off && self.cursors[position].key == key {
            return false;
        }

        self.cursors[position].key = key;
        trace!(slot = slot.index(), key, "cursor key updated");
        self.emit_cursor_event(CursorEvent::KeyChanged { key, slot });

        if self.mode == CursorMode::Off {
            return true;
        }

        let surface_ids: SmallVec<[SurfaceId; 8]> = self.surfaces.keys().copied().collect();
        for (surface_index, surface_id) in surface_ids.into_iter().enumerate() {
            self.refresh_surface_visuals(slot, surface_index, surface_id);
        }
        true
    }

    /// `update_cursor_key` addressed by a 1-based slot number; other numbers are ignored.
    pub fn update_cursor_key_at(&mut self, key: f64, slot_index: usize) -> bool {
        match CursorSlot::from_index(slot_index) {
            Some(slot) => self.update_cursor_key(key, slot),
            None => false,
        }
    }

    /// Per-series values under `slot`, in surface then series order.
    #[must_use]
    pub fn cursor_values(&self, slot: CursorSlot) -> Vec<CursorReadout> {
        if !self.mode.is_active(slot) {
            return Vec::new();
        }
        let key = self.cursor_key(slot);
        self.surfaces
            .iter()
            .flat_map(|(&surface_id, surface)| {
                surface
                    .series_list()
                    .iter()
                    .filter(|series| series.is_visible())
                    .filter_map(move |series| {
                        Some(CursorReadout {
                            series: SeriesKey {
                                surface: surface_id,
                                series: series.id(),
                            },
                            name: series.name().to_owned(),
                            key,
                            value: series.value_at(key)?,
                        })
                    })
            })
            .collect()
    }

    /// `key2 - key1` while both cursors are shown.
    #[must_use]
    pub fn cursor_delta(&self) -> Option<f64> {
        (self.mode == CursorMode::Double)
            .then(|| self.cursor_key(CursorSlot::Second) - self.cursor_key(CursorSlot::First))
    }

    fn refresh_surface_visuals(&mut self, slot: CursorSlot, surface_index: usize, surface_id: SurfaceId) {
        let position = slot.position();
        let cursor = &self.cursors[position];
        let key = cursor.key;
        let Some(surface) = self.surfaces.get_mut(&surface_id) else {
            return;
        };

        let x = match surface.key_to_pixel_x(key) {
            Ok(x) => x,
            Err(err) => {
                warn!(error = %err, surface = surface_id.0, "skipping cursor refresh on surface");
                return;
            }
        };
        let rect = surface.plot_rect();

        if let Some(line) = cursor.line_handles.get(surface_index) {
            surface.update_annotation(
                line.id,
                Annotation::CursorLine(CursorLineAnnotation {
                    x,
                    top: rect.top,
                    bottom: rect.bottom,
                    style: self.config.line_style(position),
                    visible: true,
                }),
            );
        }

        if let Some(label) = cursor.x_label_handles.get(surface_index) {
            surface.update_annotation(
                label.id,
                Annotation::Label(LabelAnnotation {
                    text: format!("{:.*}", self.config.key_label_decimals, key),
                    anchor: LabelAnchor::Point(PixelPoint::new(x, rect.top)),
                    offset: LabelOffset {
                        dx: 0.0,
                        dy: 0.5 * self.config.label_stack.label_height_px(),
                    },
                    style: self.config.label_style(position, TextHAlign::Center),
                    visible: true,
                }),
            );
        }

        let readings: SmallVec<[(SeriesId, Color, Option<f64>); 8]> = surface
            .series_list()
            .iter()
            .map(|series| {
                let value = series.is_visible().then(|| series.value_at(key)).flatten();
                (series.id(), series.color(), value)
            })
            .collect();

        let mut placed: SmallVec<[PlacedReading; 8]> = SmallVec::new();
        for (series_id, color, value) in readings {
            let series_key = SeriesKey {
                surface: surface_id,
                series: series_id,
            };
            let Some(&tracer) = cursor.series_tracers.get(&series_key) else {
                continue;
            };
            let Some(&label) = cursor.value_label_handles.get(&tracer) else {
                continue;
            };
            let y = value.and_then(|value| surface.value_to_pixel_y(value).ok());
            match (value, y) {
                (Some(value), Some(y)) => placed.push(PlacedReading {
                    series: series_id,
                    color,
                    tracer,
                    label,
                    value,
                    y,
                }),
                _ => {
                    surface.update_annotation(
                        tracer.id,
                        hidden_tracer(series_id, color, self.config.tracer_size_px),
                    );
                    surface.update_annotation(
                        label.id,
                        hidden_label(
                            LabelAnchor::Tracer(tracer.id),
                            self.config.label_style(position, TextHAlign::Left),
                        ),
                    );
                }
            }
        }

        let tracer_ys: SmallVec<[f64; 8]> = placed.iter().map(|reading| reading.y).collect();
        let offsets = resolve_label_stack(&tracer_ys, self.config.label_stack);

        for (reading, offset) in placed.iter().zip(offsets) {
            surface.update_annotation(
                reading.tracer.id,
                Annotation::Tracer(TracerAnnotation {
                    series: reading.series,
                    key,
                    value: reading.value,
                    position: PixelPoint::new(x, reading.y),
                    color: reading.color,
                    size_px: self.config.tracer_size_px,
                    visible: true,
                }),
            );
            surface.update_annotation(
                reading.label.id,
                Annotation::Label(LabelAnnotation {
                    text: format!("{:.*}", self.config.value_label_decimals, reading.value),
                    anchor: LabelAnchor::Tracer(reading.tracer.id),
                    offset,
                    style: self.config.label_style(position, TextHAlign::Left),
                    visible: true,
                }),
            );
        }

        surface.request_redraw();
    }
}
