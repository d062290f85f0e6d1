//! sigview-cursors: measurement cursors for multi-pane signal viewers.
//!
//! The crate keeps one or two vertical cursors synchronized across any number
//! of plot surfaces, snaps them to sampled data, routes pointer drags, and
//! stacks per-series value labels so they never overlap. Surfaces are
//! supplied by the host through the [`surface::PlotSurface`] trait;
//! [`surface::SignalSurface`] is a ready-made in-memory implementation.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod layout;
pub mod render;
pub mod surface;
pub mod telemetry;

pub use api::{CursorEngine, CursorEngineConfig};
pub use error::{CursorError, CursorResult};
pub use interaction::{CursorMode, CursorSlot};
