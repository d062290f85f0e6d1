use smallvec::SmallVec;
use tracing::debug;

use crate::error::{CursorError, CursorResult};
use crate::interaction::CursorSlot;
use crate::surface::{PlotSurface, SurfaceId};

use super::CursorEngine;

impl<S: PlotSurface> CursorEngine<S> {
    /// Adds a surface at the end of the registration order.
    pub fn register_surface(&mut self, surface: S) -> SurfaceId {
        self.next_surface_id += 1;
        let id = SurfaceId(self.next_surface_id);
        self.surfaces.insert(id, surface);
        debug!(surface = id.0, count = self.surfaces.len(), "register surface");
        self.refresh_after_surface_change();
        id
    }

    /// Removes a surface and releases every annotation the engine put on it.
    pub fn remove_surface(&mut self, id: SurfaceId) -> Option<S> {
        if !self.surfaces.contains_key(&id) {
            return None;
        }
        if self.drag.is_some_and(|drag| drag.surface == id) {
            self.end_drag();
        }
        self.destroy_all_handles();
        let surface = self.surfaces.shift_remove(&id);
        if self.active_surface == Some(id) {
            self.active_surface = None;
        }
        debug!(surface = id.0, count = self.surfaces.len(), "remove surface");
        self.refresh_after_surface_change();
        surface
    }

    #[must_use]
    pub fn surface(&self, id: SurfaceId) -> Option<&S> {
        self.surfaces.get(&id)
    }

    /// Mutable access for series/range edits; call
    /// [`CursorEngine::surfaces_changed`] afterwards so cursor visuals follow.
    pub fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut S> {
        self.surfaces.get_mut(&id)
    }

    pub fn surfaces(&self) -> impl Iterator<Item = (SurfaceId, &S)> {
        self.surfaces.iter().map(|(id, surface)| (*id, surface))
    }

    #[must_use]
    pub fn surface_ids(&self) -> Vec<SurfaceId> {
        self.surfaces.keys().copied().collect()
    }

    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Rebuilds cursor visuals after series or ranges changed on any surface.
    pub fn surfaces_changed(&mut self) {
        self.refresh_after_surface_change();
    }

    /// Marks the surface used for placement when no pointer event names one.
    pub fn set_active_surface(&mut self, id: SurfaceId) -> CursorResult<()> {
        if !self.surfaces.contains_key(&id) {
            return Err(CursorError::UnknownSurface(id.0));
        }
        self.active_surface = Some(id);
        Ok(())
    }

    #[must_use]
    pub fn active_surface(&self) -> Option<SurfaceId> {
        self.active_surface
    }

    /// Active surface, else the first registered one.
    pub(super) fn reference_surface_id(&self) -> Option<SurfaceId> {
        self.active_surface
            .filter(|id| self.surfaces.contains_key(id))
            .or_else(|| self.surfaces.keys().next().copied())
    }

    fn refresh_after_surface_change(&mut self) {
        self.rebuild_handles();
        let active: SmallVec<[CursorSlot; 2]> = CursorSlot::ALL
            .into_iter()
            .filter(|slot| self.mode.is_active(*slot))
            .collect();
        for slot in active {
            let key = self.cursor_key(slot);
            self.update_cursor_key(key, slot);
        }
    }
}
