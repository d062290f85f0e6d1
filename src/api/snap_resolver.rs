use ordered_float::OrderedFloat;
use smallvec::SmallVec;

use crate::core::{Sample, Series};
use crate::surface::{PlotSurface, SurfaceId};

use super::CursorEngine;

/// Which series a snap considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapScope {
    /// Series plotted on one surface (initial placement).
    Surface(SurfaceId),
    /// Every series on every registered surface (drag).
    AllSurfaces,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Forward,
    Backward,
}

/// Key of the sample closest to `raw_key` among visible, non-empty series.
///
/// Each series contributes the first sample at or after `raw_key` and its
/// predecessor. Equal distances keep the candidate found first.
pub fn nearest_sample_key<'a, I>(series: I, raw_key: f64) -> Option<f64>
where
    I: IntoIterator<Item = &'a Series>,
{
    let mut best: Option<(OrderedFloat<f64>, f64)> = None;
    for series in series {
        if !series.is_visible() || series.is_empty() {
            continue;
        }

        let mut candidates: SmallVec<[Sample; 2]> = SmallVec::new();
        if let Some(sample) = series.nearest_at_or_after(raw_key) {
            candidates.push(sample);
        }
        if let Some(sample) = series.predecessor_of(raw_key) {
            candidates.push(sample);
        }

        for sample in candidates {
            let dist = OrderedFloat((sample.key - raw_key).abs());
            match best {
                Some((current, _)) if current <= dist => {}
                _ => best = Some((dist, sample.key)),
            }
        }
    }
    best.map(|(_, key)| key)
}

impl<S: PlotSurface> CursorEngine<S> {
    /// Snaps `raw_key` to the nearest sampled key in `scope`.
    ///
    /// Returns `raw_key` unchanged when the scope has no samples or the key
    /// is not finite.
    #[must_use]
    pub fn snap(&self, raw_key: f64, scope: SnapScope) -> f64 {
        if !raw_key.is_finite() {
            return raw_key;
        }
        let nearest = match scope {
            SnapScope::Surface(id) => self
                .surfaces
                .get(&id)
                .and_then(|surface| nearest_sample_key(surface.series_list(), raw_key)),
            SnapScope::AllSurfaces => nearest_sample_key(
                self.surfaces
                    .values()
                    .flat_map(|surface| surface.series_list()),
                raw_key,
            ),
        };
        nearest.unwrap_or(raw_key)
    }

    /// Key extent covered by visible series across all surfaces.
    #[must_use]
    pub fn data_key_range(&self) -> Option<(f64, f64)> {
        self.visible_series()
            .filter_map(Series::key_range)
            .reduce(|(lower, upper), (start, end)| (lower.min(start), upper.max(end)))
    }

    /// Nearest sample key strictly after (or before) `key` across all surfaces.
    #[must_use]
    pub fn adjacent_sample_key(&self, key: f64, direction: StepDirection) -> Option<f64> {
        match direction {
            StepDirection::Forward => self
                .visible_series()
                .filter_map(|series| series.next_key_after(key))
                .min_by_key(|candidate| OrderedFloat(*candidate)),
            StepDirection::Backward => self
                .visible_series()
                .filter_map(|series| series.previous_key_before(key))
                .max_by_key(|candidate| OrderedFloat(*candidate)),
        }
    }

    fn visible_series(&self) -> impl Iterator<Item = &Series> {
        self.surfaces
            .values()
            .flat_map(|surface| surface.series_list())
            .filter(|series| series.is_visible())
    }
}

#[cfg(test)]
mod tests {
    use super::nearest_sample_key;
    use crate::core::{Series, SeriesId};

    fn series(id: u64, keys: &[f64]) -> Series {
        let values = vec![0.0; keys.len()];
        Series::try_from_columns(SeriesId(id), "s", keys, &values).expect("columns")
    }

    #[test]
    fn picks_closest_across_series() {
        let a = series(1, &[0.0, 4.0, 8.0]);
        let b = series(2, &[2.5, 6.5]);
        assert_eq!(nearest_sample_key([&a, &b], 3.0), Some(2.5));
        assert_eq!(nearest_sample_key([&a, &b], 7.9), Some(8.0));
        assert_eq!(nearest_sample_key([&a, &b], -10.0), Some(0.0));
        assert_eq!(nearest_sample_key([&a, &b], 100.0), Some(8.0));
    }

    #[test]
    fn ties_keep_first_candidate() {
        let a = series(1, &[1.0, 2.0]);
        assert_eq!(nearest_sample_key([&a], 1.5), Some(2.0));
    }

    #[test]
    fn hidden_and_empty_series_are_skipped() {
        let hidden = series(1, &[1.0]).with_visible(false);
        let empty = series(2, &[]);
        assert_eq!(nearest_sample_key([&hidden, &empty], 0.9), None);
    }
}
