use tracing::debug;

use crate::error::{CursorError, CursorResult};
use crate::extensions::{CursorContext, CursorEvent, CursorObserver};
use crate::interaction::CursorSlot;
use crate::surface::PlotSurface;

use super::CursorEngine;

impl<S: PlotSurface> CursorEngine<S> {
    /// Subscribes an observer; ids must be unique.
    pub fn register_observer(&mut self, observer: Box<dyn CursorObserver>) -> CursorResult<()> {
        if self.observers.iter().any(|item| item.id() == observer.id()) {
            return Err(CursorError::DuplicateObserver(observer.id().to_owned()));
        }
        debug!(observer = observer.id(), "register cursor observer");
        self.observers.push(observer);
        Ok(())
    }

    pub fn unregister_observer(&mut self, id: &str) -> bool {
        let before = self.observers.len();
        self.observers.retain(|item| item.id() != id);
        before != self.observers.len()
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub(super) fn cursor_context(&self) -> CursorContext {
        CursorContext {
            mode: self.mode,
            first_key: self.cursor_key(CursorSlot::First),
            second_key: self.cursor_key(CursorSlot::Second),
            dragging: self.dragging_slot(),
            surface_count: self.surfaces.len(),
        }
    }

    pub(super) fn emit_cursor_event(&mut self, event: CursorEvent) {
        let context = self.cursor_context();
        for observer in &mut self.observers {
            observer.on_event(event, context);
        }
    }
}
