//! Replay transport that walks cursor 1 through the loaded data.
//!
//! The driver never touches cursor visuals itself: every move goes through
//! [`CursorEngine::update_cursor_key`], and its own position is read back
//! from the engine's `KeyChanged` notifications, so drags and programmatic
//! moves keep the transport in sync.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::{CursorEngine, SnapScope, StepDirection};
use crate::error::{CursorError, CursorResult};
use crate::interaction::CursorSlot;
use crate::surface::PlotSurface;

use super::{CursorContext, CursorEvent, CursorObserver};

pub const REPLAY_OBSERVER_ID: &str = "replay-driver";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Key units advanced per second of playback.
    pub speed_keys_per_second: f64,
    /// Restart from the first key instead of pausing at the end.
    pub loop_playback: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            speed_keys_per_second: 1.0,
            loop_playback: false,
        }
    }
}

impl ReplayConfig {
    fn validate(self) -> CursorResult<Self> {
        if !self.speed_keys_per_second.is_finite() || self.speed_keys_per_second <= 0.0 {
            return Err(CursorError::InvalidData(
                "replay speed must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplayState {
    Stopped,
    Playing,
    Paused,
}

/// Observer half of the driver: records cursor 1's key as the engine reports it.
#[derive(Debug, Clone)]
pub struct ReplayPositionObserver {
    position: Rc<Cell<Option<f64>>>,
}

impl CursorObserver for ReplayPositionObserver {
    fn id(&self) -> &str {
        REPLAY_OBSERVER_ID
    }

    fn on_event(&mut self, event: CursorEvent, _context: CursorContext) {
        if let CursorEvent::KeyChanged {
            key,
            slot: CursorSlot::First,
        } = event
        {
            self.position.set(Some(key));
        }
    }
}

#[derive(Debug)]
pub struct ReplayDriver {
    config: ReplayConfig,
    state: ReplayState,
    position: Rc<Cell<Option<f64>>>,
}

impl ReplayDriver {
    pub fn new(config: ReplayConfig) -> CursorResult<Self> {
        Ok(Self {
            config: config.validate()?,
            state: ReplayState::Stopped,
            position: Rc::new(Cell::new(None)),
        })
    }

    /// Subscribes the driver's position tracker to `engine`.
    pub fn attach<S: PlotSurface>(&self, engine: &mut CursorEngine<S>) -> CursorResult<()> {
        engine.register_observer(Box::new(self.observer()))
    }

    #[must_use]
    pub fn observer(&self) -> ReplayPositionObserver {
        ReplayPositionObserver {
            position: Rc::clone(&self.position),
        }
    }

    #[must_use]
    pub fn state(&self) -> ReplayState {
        self.state
    }

    /// Last cursor 1 key reported by the engine.
    #[must_use]
    pub fn position(&self) -> Option<f64> {
        self.position.get()
    }

    pub fn set_speed(&mut self, speed_keys_per_second: f64) -> CursorResult<()> {
        self.config = ReplayConfig {
            speed_keys_per_second,
            ..self.config
        }
        .validate()?;
        Ok(())
    }

    /// Position as a fraction of the data key range.
    #[must_use]
    pub fn progress<S: PlotSurface>(&self, engine: &CursorEngine<S>) -> Option<f64> {
        let (start, end) = engine.data_key_range()?;
        let position = self.position()?;
        let span = end - start;
        if span <= 0.0 {
            return Some(0.0);
        }
        Some(((position - start) / span).clamp(0.0, 1.0))
    }

    /// Starts playback, rewinding first when the cursor is unset or at the end.
    pub fn play<S: PlotSurface>(&mut self, engine: &mut CursorEngine<S>) -> bool {
        let Some((start, end)) = engine.data_key_range() else {
            warn!("replay has no data to play");
            return false;
        };
        match self.position() {
            Some(position) if position < end => {}
            _ => {
                engine.update_cursor_key(start, CursorSlot::First);
            }
        }
        debug!(start, end, "replay play");
        self.state = ReplayState::Playing;
        true
    }

    pub fn pause(&mut self) {
        if self.state == ReplayState::Playing {
            self.state = ReplayState::Paused;
        }
    }

    /// Stops playback and rewinds cursor 1 to the first sample key.
    pub fn stop<S: PlotSurface>(&mut self, engine: &mut CursorEngine<S>) {
        self.state = ReplayState::Stopped;
        if let Some((start, _)) = engine.data_key_range() {
            engine.update_cursor_key(start, CursorSlot::First);
        }
    }

    /// Advances playback by `delta_seconds`; returns the new key while playing.
    pub fn tick<S: PlotSurface>(
        &mut self,
        engine: &mut CursorEngine<S>,
        delta_seconds: f64,
    ) -> Option<f64> {
        if self.state != ReplayState::Playing {
            return None;
        }
        if !delta_seconds.is_finite() || delta_seconds < 0.0 {
            warn!(delta_seconds, "ignoring invalid replay tick");
            return None;
        }
        let Some((start, end)) = engine.data_key_range() else {
            self.state = ReplayState::Stopped;
            return None;
        };

        let current = self.position().unwrap_or(start).clamp(start, end);
        let mut next = current + self.config.speed_keys_per_second * delta_seconds;
        if next >= end {
            if self.config.loop_playback && current >= end {
                next = start;
            } else {
                next = end;
                if !self.config.loop_playback {
                    self.state = ReplayState::Paused;
                }
            }
        }

        engine.update_cursor_key(next, CursorSlot::First);
        Some(next)
    }

    /// Moves cursor 1 to the adjacent sample key and pauses playback.
    pub fn step<S: PlotSurface>(
        &mut self,
        engine: &mut CursorEngine<S>,
        direction: StepDirection,
    ) -> Option<f64> {
        self.pause();
        let (start, _) = engine.data_key_range()?;
        let current = self.position().unwrap_or(start);
        let next = engine.adjacent_sample_key(current, direction)?;
        engine.update_cursor_key(next, CursorSlot::First);
        Some(next)
    }

    /// Jumps cursor 1 to `fraction` of the data range, snapped to a sample.
    pub fn scrub<S: PlotSurface>(
        &mut self,
        engine: &mut CursorEngine<S>,
        fraction: f64,
    ) -> Option<f64> {
        if !fraction.is_finite() {
            return None;
        }
        let (start, end) = engine.data_key_range()?;
        let raw = start + fraction.clamp(0.0, 1.0) * (end - start);
        let key = engine.snap(raw, SnapScope::AllSurfaces);
        engine.update_cursor_key(key, CursorSlot::First);
        Some(key)
    }
}
