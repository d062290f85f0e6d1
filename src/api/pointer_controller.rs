use tracing::{debug, trace, warn};

use crate::core::PixelPoint;
use crate::extensions::CursorEvent;
use crate::interaction::{
    CursorMode, CursorSlot, DragState, PointerResponse, PointerShape,
};
use crate::surface::{Annotation, CursorLineAnnotation, PlotSurface, SurfaceId};

use super::{CursorEngine, SnapScope};

impl<S: PlotSurface> CursorEngine<S> {
    /// Starts a cursor drag when the press lands on an active cursor line.
    ///
    /// Unconsumed presses should fall through to the surface's pan/zoom.
    pub fn on_pointer_press(&mut self, surface_id: SurfaceId, position: PixelPoint) -> PointerResponse {
        if !self.surfaces.contains_key(&surface_id) {
            return PointerResponse::passthrough(PointerShape::Default);
        }
        self.active_surface = Some(surface_id);

        if self.mode == CursorMode::Off {
            return PointerResponse::passthrough(PointerShape::Default);
        }
        if let Some(drag) = self.drag {
            trace!(slot = drag.slot.index(), "press ignored while another drag is active");
            return PointerResponse::passthrough(PointerShape::Default);
        }

        let Some(slot) = self.hit_cursor_line(surface_id, position) else {
            return PointerResponse::passthrough(PointerShape::Default);
        };
        self.begin_drag(slot, surface_id);
        PointerResponse::consumed(PointerShape::ResizeHorizontal)
    }

    /// Drags the held cursor, or reports the hover shape when nothing is held.
    ///
    /// `surface_id` is the surface under the pointer; `None` falls back to the
    /// last active surface.
    pub fn on_pointer_move(
        &mut self,
        surface_id: Option<SurfaceId>,
        position: PixelPoint,
    ) -> PointerResponse {
        let target = surface_id
            .filter(|id| self.surfaces.contains_key(id))
            .or(self.active_surface);

        if let Some(drag) = self.drag {
            let Some(surface) = target.and_then(|id| self.surfaces.get(&id)) else {
                return PointerResponse::consumed(PointerShape::ResizeHorizontal);
            };
            let raw_key = match surface.pixel_x_to_key(position.x) {
                Ok(key) => key,
                Err(err) => {
                    warn!(error = %err, "cannot map drag position to key");
                    return PointerResponse::consumed(PointerShape::ResizeHorizontal);
                }
            };
            let snapped = self.snap(raw_key, SnapScope::AllSurfaces);
            trace!(slot = drag.slot.index(), raw_key, snapped, "cursor drag move");
            self.update_cursor_key(snapped, drag.slot);
            return PointerResponse::consumed(PointerShape::ResizeHorizontal);
        }

        if self.mode == CursorMode::Off {
            return PointerResponse::passthrough(PointerShape::Default);
        }
        PointerResponse::passthrough(self.hover_shape(target, position))
    }

    /// Ends any drag and hands pan/zoom back to the surface that held it.
    pub fn on_pointer_release(
        &mut self,
        surface_id: Option<SurfaceId>,
        position: PixelPoint,
    ) -> PointerResponse {
        let released = self.end_drag();
        let target = surface_id
            .filter(|id| self.surfaces.contains_key(id))
            .or(self.active_surface);
        let shape = if self.mode == CursorMode::Off {
            PointerShape::Default
        } else {
            self.hover_shape(target, position)
        };
        PointerResponse {
            consumed: released.is_some(),
            shape,
        }
    }

    pub(super) fn end_drag(&mut self) -> Option<CursorSlot> {
        let drag = self.drag.take()?;
        for cursor in &mut self.cursors {
            cursor.is_dragging = false;
        }
        if let Some(surface) = self.surfaces.get_mut(&drag.surface) {
            surface.set_pan_zoom_enabled(true);
        }
        debug!(slot = drag.slot.index(), "cursor drag ended");
        self.emit_cursor_event(CursorEvent::DragEnded { slot: drag.slot });
        Some(drag.slot)
    }

    fn begin_drag(&mut self, slot: CursorSlot, surface_id: SurfaceId) {
        self.cursors[slot.position()].is_dragging = true;
        if let Some(surface) = self.surfaces.get_mut(&surface_id) {
            surface.set_pan_zoom_enabled(false);
        }
        self.drag = Some(DragState {
            slot,
            surface: surface_id,
        });
        debug!(slot = slot.index(), surface = surface_id.0, "cursor drag started");
        self.emit_cursor_event(CursorEvent::DragStarted { slot });
    }

    fn hover_shape(&self, surface_id: Option<SurfaceId>, position: PixelPoint) -> PointerShape {
        match surface_id.and_then(|id| self.hit_cursor_line(id, position)) {
            Some(_) => PointerShape::ResizeHorizontal,
            None => PointerShape::Default,
        }
    }

    /// First active slot whose line on `surface_id` lies within the surface's
    /// selection tolerance of `position`.
    fn hit_cursor_line(&self, surface_id: SurfaceId, position: PixelPoint) -> Option<CursorSlot> {
        let surface_index = self.surfaces.get_index_of(&surface_id)?;
        let surface = self.surfaces.get(&surface_id)?;
        let tolerance = surface.selection_tolerance_px();

        CursorSlot::ALL
            .into_iter()
            .filter(|slot| self.mode.is_active(*slot))
            .find(|slot| {
                self.cursors[slot.position()]
                    .line_handles
                    .get(surface_index)
                    .and_then(|handle| surface.annotation(handle.id))
                    .and_then(Annotation::as_line)
                    .filter(|line| line.visible)
                    .is_some_and(|line| distance_to_line(line, position) <= tolerance)
            })
    }
}

/// Pixel distance from `point` to a vertical cursor segment.
fn distance_to_line(line: &CursorLineAnnotation, point: PixelPoint) -> f64 {
    let dx = (point.x - line.x).abs();
    let (top, bottom) = if line.top <= line.bottom {
        (line.top, line.bottom)
    } else {
        (line.bottom, line.top)
    };
    let dy = if point.y < top {
        top - point.y
    } else if point.y > bottom {
        point.y - bottom
    } else {
        0.0
    };
    dx.hypot(dy)
}
