use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::Sample;
use crate::error::{CursorError, CursorResult};
use crate::render::Color;

/// Identity of a series inside its owning surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesId(pub u64);

/// One plotted signal: samples ordered by ascending key.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    id: SeriesId,
    name: String,
    samples: Vec<Sample>,
    visible: bool,
    color: Color,
}

impl Series {
    /// Builds a series from unordered samples.
    ///
    /// Non-finite samples are dropped, the rest are sorted by key and
    /// duplicate keys keep the last occurrence.
    #[must_use]
    pub fn new(id: SeriesId, name: impl Into<String>, samples: Vec<Sample>) -> Self {
        Self {
            id,
            name: name.into(),
            samples: canonicalize_samples(samples),
            visible: true,
            color: Color::rgb(0.16, 0.38, 0.86),
        }
    }

    /// Builds a series from two parallel columns of a loaded table.
    pub fn try_from_columns(
        id: SeriesId,
        name: impl Into<String>,
        keys: &[f64],
        values: &[f64],
    ) -> CursorResult<Self> {
        if keys.len() != values.len() {
            return Err(CursorError::InvalidData(format!(
                "key column has {} rows but value column has {}",
                keys.len(),
                values.len()
            )));
        }
        let samples = keys
            .iter()
            .zip(values)
            .map(|(&key, &value)| Sample::new(key, value))
            .collect();
        Ok(Self::new(id, name, samples))
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn id(&self) -> SeriesId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn key_range(&self) -> Option<(f64, f64)> {
        Some((self.samples.first()?.key, self.samples.last()?.key))
    }

    /// Index of the first sample whose key is `>= key`.
    fn successor_index(&self, key: f64) -> usize {
        self.samples.partition_point(|sample| sample.key < key)
    }

    #[must_use]
    pub fn nearest_at_or_after(&self, key: f64) -> Option<Sample> {
        self.samples.get(self.successor_index(key)).copied()
    }

    /// Last sample whose key is strictly before `key`.
    #[must_use]
    pub fn predecessor_of(&self, key: f64) -> Option<Sample> {
        let index = self.successor_index(key).checked_sub(1)?;
        self.samples.get(index).copied()
    }

    /// Sample that holds at `key` without interpolation.
    ///
    /// This is the last sample with `sample.key <= key`; keys before the first
    /// sample resolve to the first sample.
    #[must_use]
    pub fn sample_at(&self, key: f64) -> Option<Sample> {
        let after = self.samples.partition_point(|sample| sample.key <= key);
        match after.checked_sub(1) {
            Some(index) => self.samples.get(index).copied(),
            None => self.samples.first().copied(),
        }
    }

    #[must_use]
    pub fn value_at(&self, key: f64) -> Option<f64> {
        self.sample_at(key).map(|sample| sample.value)
    }

    /// First sample key strictly greater than `key`.
    #[must_use]
    pub fn next_key_after(&self, key: f64) -> Option<f64> {
        let index = self.samples.partition_point(|sample| sample.key <= key);
        self.samples.get(index).map(|sample| sample.key)
    }

    /// Last sample key strictly less than `key`.
    #[must_use]
    pub fn previous_key_before(&self, key: f64) -> Option<f64> {
        self.predecessor_of(key).map(|sample| sample.key)
    }
}

fn canonicalize_samples(mut samples: Vec<Sample>) -> Vec<Sample> {
    let original_len = samples.len();
    samples.retain(|sample| sample.key.is_finite() && sample.value.is_finite());
    samples.sort_by(|a, b| a.key.total_cmp(&b.key));

    let mut deduped: Vec<Sample> = Vec::with_capacity(samples.len());
    let mut duplicate_count = 0_usize;
    for sample in samples {
        if let Some(last) = deduped.last_mut() {
            if sample.key.total_cmp(&last.key) == Ordering::Equal {
                *last = sample;
                duplicate_count += 1;
                continue;
            }
        }
        deduped.push(sample);
    }

    let filtered_count = original_len.saturating_sub(deduped.len() + duplicate_count);
    if filtered_count > 0 || duplicate_count > 0 {
        warn!(
            filtered_count,
            duplicate_count,
            canonical_count = deduped.len(),
            "canonicalized series samples"
        );
    }
    deduped
}
