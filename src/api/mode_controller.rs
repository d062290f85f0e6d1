use smallvec::{SmallVec, smallvec};
use tracing::{debug, trace};

use crate::extensions::CursorEvent;
use crate::interaction::{CursorMode, CursorSlot};
use crate::surface::PlotSurface;

use super::{CursorEngine, SnapScope};

/// Visible range and derived distances used to place new cursors.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PlacementFrame {
    lower: f64,
    upper: f64,
    margin: f64,
    step: f64,
}

/// Initial key for cursor 2 when cursor 1 already sits at `first`.
///
/// Prefers `upper - margin`; if that is not clear of cursor 1 by more than
/// `margin`, uses `first + step`, and if that overshoots `upper`, the midpoint
/// between `first` and `upper`.
#[must_use]
pub fn second_cursor_key(first: f64, upper: f64, margin: f64, step: f64) -> f64 {
    let preferred = upper - margin;
    if preferred > first + margin {
        return preferred;
    }
    let stepped = first + step;
    if stepped > upper {
        0.5 * (first + upper)
    } else {
        stepped
    }
}

impl<S: PlotSurface> CursorEngine<S> {
    #[must_use]
    pub fn mode(&self) -> CursorMode {
        self.mode
    }

    /// Switches cursor mode. Returns `false` when `mode` is already current.
    ///
    /// Entering `Single` or `Double` from `Off` places cursors fresh inside the
    /// reference surface's visible range; the last keys are not restored.
    pub fn set_mode(&mut self, mode: CursorMode) -> bool {
        if mode == self.mode {
            trace!(%mode, "cursor mode unchanged");
            return false;
        }

        let previous = self.mode;
        debug!(from = %previous, to = %mode, "cursor mode transition");
        self.end_drag();

        if mode == CursorMode::Off {
            self.destroy_all_handles();
            self.mode = CursorMode::Off;
            for surface in self.surfaces.values_mut() {
                surface.request_redraw();
            }
            self.emit_cursor_event(CursorEvent::ModeChanged {
                from: previous,
                to: mode,
            });
            return true;
        }

        let placement = self.initial_keys(previous, mode);
        self.mode = mode;
        for surface in self.surfaces.values_mut() {
            surface.set_pan_zoom_enabled(true);
        }
        self.emit_cursor_event(CursorEvent::ModeChanged {
            from: previous,
            to: mode,
        });

        self.rebuild_handles();
        for (slot, key) in placement {
            self.update_cursor_key(key, slot);
        }
        true
    }

    fn initial_keys(&self, previous: CursorMode, mode: CursorMode) -> SmallVec<[(CursorSlot, f64); 2]> {
        let reference = self.reference_surface_id();
        let frame = self.placement_frame();
        let scope = reference.map_or(SnapScope::AllSurfaces, SnapScope::Surface);

        let first = if previous == CursorMode::Off {
            self.snap(frame.lower + frame.margin, scope)
        } else {
            self.cursor_key(CursorSlot::First)
        };
        let mut keys: SmallVec<[(CursorSlot, f64); 2]> = smallvec![(CursorSlot::First, first)];

        if mode == CursorMode::Double {
            let second = if previous == CursorMode::Off {
                frame.upper - frame.margin
            } else {
                second_cursor_key(first, frame.upper, frame.margin, frame.step)
            };
            keys.push((CursorSlot::Second, self.snap(second, scope)));
        }

        debug!(?keys, lower = frame.lower, upper = frame.upper, "initial cursor placement");
        keys
    }

    fn placement_frame(&self) -> PlacementFrame {
        let placement = self.config.placement;
        let range = self
            .reference_surface_id()
            .and_then(|id| self.surfaces.get(&id))
            .map(|surface| surface.visible_range());

        let Some((lower, upper)) = range else {
            return PlacementFrame {
                lower: 0.0,
                upper: 1.0,
                margin: placement.degenerate_margin,
                step: placement.degenerate_margin,
            };
        };

        let width = upper - lower;
        if width.is_finite() && width > 0.0 {
            PlacementFrame {
                lower,
                upper,
                margin: width * placement.margin_ratio,
                step: width * placement.second_cursor_step_ratio,
            }
        } else {
            PlacementFrame {
                lower,
                upper,
                margin: placement.degenerate_margin,
                step: placement.degenerate_margin,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::second_cursor_key;

    #[test]
    fn second_cursor_prefers_far_edge() {
        assert_eq!(second_cursor_key(0.5, 10.0, 0.5, 1.0), 9.5);
    }

    #[test]
    fn second_cursor_steps_past_first_when_crowded() {
        // preferred 9.5 is not beyond 9.2 + 0.5
        let key = second_cursor_key(9.2, 10.0, 0.5, 0.5);
        assert!((key - 9.7).abs() <= 1e-9);
    }

    #[test]
    fn second_cursor_falls_back_to_midpoint() {
        let key = second_cursor_key(9.8, 10.0, 0.5, 1.0);
        assert!((key - 9.9).abs() <= 1e-9);
    }
}
