//! Prepared graph data and the data preparator.
//!
//! Raw caller input (a flat sample array or a list of named time series) is
//! turned into [`PreparedGraphData`] once per data refresh. Between refreshes
//! only the axis bounds and the synthetic tail points change.

mod pool;
mod prepare;

pub(crate) use pool::BufferPool;
pub(crate) use prepare::{prepare_indexed, prepare_time_series};

use std::hash::{DefaultHasher, Hash, Hasher};

use chrono::{DateTime, Utc};

use crate::format::seconds_between;
use crate::series::{SeriesData, SeriesGroup, TimeSeries};
use crate::view::Range;

/// Name of the single series produced from index-based samples.
pub const INDEXED_SERIES_NAME: &str = "Value";

/// Aggregate produced by one data preparation.
#[derive(Debug, Clone)]
pub struct PreparedGraphData {
    pub(crate) series: Vec<SeriesData>,
    pub(crate) groups: Vec<SeriesGroup>,
    pub(crate) x_range: Range,
    pub(crate) y_range: Range,
    pub(crate) is_time_based: bool,
    pub(crate) start_time: DateTime<Utc>,
    pub(crate) total_time_span: f64,
}

impl PreparedGraphData {
    /// Prepared series, in input order.
    pub fn series(&self) -> &[SeriesData] {
        &self.series
    }

    /// Look up a series by name.
    pub fn series_by_name(&self, name: &str) -> Option<&SeriesData> {
        self.series.iter().find(|series| series.name() == name)
    }

    /// Configured groups.
    pub fn groups(&self) -> &[SeriesGroup] {
        &self.groups
    }

    /// Current X axis limits.
    pub fn x_range(&self) -> Range {
        self.x_range
    }

    /// Current Y axis limits.
    pub fn y_range(&self) -> Range {
        self.y_range
    }

    /// Whether X is seconds since [`start_time`](Self::start_time) rather than
    /// a sample index.
    pub fn is_time_based(&self) -> bool {
        self.is_time_based
    }

    /// Reference epoch of time-based X values.
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Seconds from the start time to the latest synthetic "now" point. For
    /// index-based data this is the last sample index.
    pub fn total_time_span(&self) -> f64 {
        self.total_time_span
    }

    /// Slide every synthetic tail to `now` without re-preparing the series.
    ///
    /// The span never shrinks below the newest recorded sample, so a clock
    /// that jumps backwards cannot unsort X.
    pub(crate) fn extend_to(&mut self, now: DateTime<Utc>) {
        if !self.is_time_based {
            return;
        }
        let newest = self
            .series
            .iter()
            .filter_map(|series| {
                let real = series.real_point_count();
                real.checked_sub(1).map(|index| series.xs()[index])
            })
            .fold(0.0, f64::max);
        self.total_time_span = seconds_between(self.start_time, now).max(newest);
        let span = self.total_time_span;
        for series in &mut self.series {
            series.set_tail_x(span);
        }
    }

    /// Return every series buffer to the pool.
    pub(crate) fn recycle_into(self, pool: &mut BufferPool) {
        for series in self.series {
            pool.recycle(series.name, series.x_values, series.y_values);
        }
    }
}

/// Identity of the caller's input, used to decide whether to re-prepare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKey {
    /// Caller-controlled generation counter.
    Generation(u64),
    /// Structural fingerprint of the input.
    Fingerprint(u64),
}

impl SourceKey {
    /// Fingerprint index-based samples by length and their first and last
    /// values.
    pub fn of_samples(samples: &[f64]) -> Self {
        let mut hasher = DefaultHasher::new();
        samples.len().hash(&mut hasher);
        if let (Some(first), Some(last)) = (samples.first(), samples.last()) {
            first.to_bits().hash(&mut hasher);
            last.to_bits().hash(&mut hasher);
        }
        Self::Fingerprint(hasher.finish())
    }

    /// Fingerprint time series by name, sample count, visibility, color, and
    /// newest sample.
    ///
    /// Edits that keep all of these intact (rewriting an old sample in place)
    /// are not detected; callers doing that should pass a generation or call
    /// [`TimeSeriesGraph::invalidate`](crate::graph::TimeSeriesGraph::invalidate).
    pub fn of_series(series: &[TimeSeries]) -> Self {
        let mut hasher = DefaultHasher::new();
        series.len().hash(&mut hasher);
        for entry in series {
            entry.name.hash(&mut hasher);
            entry.visible.hash(&mut hasher);
            entry.samples.len().hash(&mut hasher);
            if let Some(color) = entry.color {
                for channel in [color.r, color.g, color.b, color.a] {
                    channel.to_bits().hash(&mut hasher);
                }
            }
            if let Some(last) = entry.samples.last() {
                last.timestamp.hash(&mut hasher);
                last.value.to_bits().hash(&mut hasher);
            }
        }
        Self::Fingerprint(hasher.finish())
    }
}

/// Everything that forces a full data preparation when it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheKey {
    /// Identity of the input.
    pub source: SourceKey,
    /// Hash of the hidden series and group sets.
    pub hidden_hash: u64,
    /// Whether auto-scroll was enabled.
    pub auto_scroll: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::SeriesSample;
    use chrono::{TimeDelta, TimeZone};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + TimeDelta::seconds(secs)
    }

    #[test]
    fn fingerprint_tracks_appends_not_rebuilds() {
        let base = vec![TimeSeries::new(
            "a",
            vec![SeriesSample::new(at(0), 1.0), SeriesSample::new(at(1), 2.0)],
        )];
        let rebuilt = base.clone();
        assert_eq!(SourceKey::of_series(&base), SourceKey::of_series(&rebuilt));

        let mut appended = base.clone();
        appended[0].samples.push(SeriesSample::new(at(2), 3.0));
        assert_ne!(SourceKey::of_series(&base), SourceKey::of_series(&appended));
    }

    #[test]
    fn sample_fingerprint_changes_with_rolling_window() {
        assert_ne!(
            SourceKey::of_samples(&[1.0, 2.0, 3.0]),
            SourceKey::of_samples(&[2.0, 3.0, 4.0])
        );
        assert_eq!(SourceKey::of_samples(&[]), SourceKey::of_samples(&[]));
    }
}
