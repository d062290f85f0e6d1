use smallvec::SmallVec;
use tracing::trace;

use crate::core::{PixelPoint, SeriesId};
use crate::interaction::CursorSlot;
use crate::layout::LabelOffset;
use crate::render::{Color, TextHAlign};
use crate::surface::{
    Annotation, CursorLineAnnotation, HandleRef, LabelAnchor, LabelAnnotation,
    LabelStyle, LineStyle, PlotSurface, SeriesKey, TracerAnnotation,
};

use super::CursorEngine;

impl<S: PlotSurface> CursorEngine<S> {
    /// Destroys every handle and recreates them for the active slots.
    pub(super) fn rebuild_handles(&mut self) {
        self.destroy_all_handles();
        for slot in CursorSlot::ALL {
            if self.mode.is_active(slot) {
                self.build_slot_handles(slot);
            }
        }
    }

    pub(super) fn destroy_all_handles(&mut self) {
        for slot in CursorSlot::ALL {
            self.destroy_slot_handles(slot);
        }
    }

    fn destroy_slot_handles(&mut self, slot: CursorSlot) {
        let handles = self.cursors[slot.position()].take_handles();
        if handles.is_empty() {
            return;
        }
        trace!(slot = slot.index(), count = handles.len(), "destroy cursor handles");
        for handle in handles {
            if let Some(surface) = self.surfaces.get_mut(&handle.surface) {
                surface.destroy_annotation(handle.id);
            }
        }
    }

    /// Creates hidden visuals for `slot` on every surface; the next key
    /// update positions and reveals them.
    fn build_slot_handles(&mut self, slot: CursorSlot) {
        let position = slot.position();
        let line_style = self.config.line_style(position);
        let key_label_style = self.config.label_style(position, TextHAlign::Center);
        let value_label_style = self.config.label_style(position, TextHAlign::Left);
        let tracer_size = self.config.tracer_size_px;
        let cursor = &mut self.cursors[position];

        for (&surface_id, surface) in self.surfaces.iter_mut() {
            let line = surface.create_annotation(hidden_line(line_style));
            cursor.line_handles.push(HandleRef {
                surface: surface_id,
                id: line,
            });

            let key_label = surface.create_annotation(hidden_label(
                LabelAnchor::Point(PixelPoint::default()),
                key_label_style,
            ));
            cursor.x_label_handles.push(HandleRef {
                surface: surface_id,
                id: key_label,
            });

            let series: SmallVec<[(SeriesId, Color); 8]> = surface
                .series_list()
                .iter()
                .map(|series| (series.id(), series.color()))
                .collect();
            for (series_id, color) in series {
                let tracer = surface.create_annotation(hidden_tracer(series_id, color, tracer_size));
                let label = surface.create_annotation(hidden_label(
                    LabelAnchor::Tracer(tracer),
                    value_label_style,
                ));
                let tracer = HandleRef {
                    surface: surface_id,
                    id: tracer,
                };
                cursor.series_tracers.insert(
                    SeriesKey {
                        surface: surface_id,
                        series: series_id,
                    },
                    tracer,
                );
                cursor.value_label_handles.insert(
                    tracer,
                    HandleRef {
                        surface: surface_id,
                        id: label,
                    },
                );
            }
        }

        trace!(
            slot = slot.index(),
            surfaces = cursor.line_handles.len(),
            tracers = cursor.series_tracers.len(),
            "built cursor handles"
        );
    }
}

pub(super) fn hidden_line(style: LineStyle) -> Annotation {
    Annotation::CursorLine(CursorLineAnnotation {
        x: 0.0,
        top: 0.0,
        bottom: 0.0,
        style,
        visible: false,
    })
}

pub(super) fn hidden_label(anchor: LabelAnchor, style: LabelStyle) -> Annotation {
    Annotation::Label(LabelAnnotation {
        text: String::new(),
        anchor,
        offset: LabelOffset { dx: 0.0, dy: 0.0 },
        style,
        visible: false,
    })
}

pub(super) fn hidden_tracer(series: SeriesId, color: Color, size_px: f64) -> Annotation {
    Annotation::Tracer(TracerAnnotation {
        series,
        key: 0.0,
        value: 0.0,
        position: PixelPoint::default(),
        color,
        size_px,
        visible: false,
    })
}
