//! Cursor synchronization engine.
//!
//! `CursorEngine` owns the registered surfaces, the two cursor slots and the
//! observer list. Every key change funnels through
//! [`CursorEngine::update_cursor_key`], which notifies observers first and
//! then refreshes each surface in registration order.

mod cursor_update;
mod engine_config;
mod handle_lifecycle;
mod mode_controller;
mod observer_dispatch;
mod pointer_controller;
mod snap_resolver;
mod surface_registry;

pub use cursor_update::CursorReadout;
pub use engine_config::{
    CursorEngineConfig, CursorPlacementConfig, CursorStyle, ENGINE_CONFIG_JSON_SCHEMA_V1,
    EngineConfigJsonContractV1,
};
pub use mode_controller::second_cursor_key;
pub use snap_resolver::{SnapScope, StepDirection, nearest_sample_key};

pub use crate::extensions::{CursorContext, CursorEvent, CursorObserver};

use indexmap::IndexMap;

use crate::error::CursorResult;
use crate::interaction::{CursorData, CursorMode, CursorSlot, DragState};
use crate::surface::{PlotSurface, SurfaceId};

/// Orchestrates cursor mode, placement, drag interaction and per-surface
/// annotations for any [`PlotSurface`] implementation.
pub struct CursorEngine<S: PlotSurface> {
    config: CursorEngineConfig,
    surfaces: IndexMap<SurfaceId, S>,
    next_surface_id: u64,
    active_surface: Option<SurfaceId>,
    mode: CursorMode,
    cursors: [CursorData; 2],
    drag: Option<DragState>,
    observers: Vec<Box<dyn CursorObserver>>,
}

impl<S: PlotSurface> CursorEngine<S> {
    pub fn new(config: CursorEngineConfig) -> CursorResult<Self> {
        let config = config.validate()?;
        Ok(Self {
            config,
            surfaces: IndexMap::new(),
            next_surface_id: 0,
            active_surface: None,
            mode: CursorMode::Off,
            cursors: [CursorData::default(), CursorData::default()],
            drag: None,
            observers: Vec::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &CursorEngineConfig {
        &self.config
    }

    #[must_use]
    pub fn cursor(&self, slot: CursorSlot) -> &CursorData {
        &self.cursors[slot.position()]
    }

    /// Stored key of a slot; retained even while the slot is not shown.
    #[must_use]
    pub fn cursor_key(&self, slot: CursorSlot) -> f64 {
        self.cursors[slot.position()].key
    }

    #[must_use]
    pub fn dragging_slot(&self) -> Option<CursorSlot> {
        self.drag.map(|drag| drag.slot)
    }
}
