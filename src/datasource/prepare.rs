//! Turn caller input into [`PreparedGraphData`].
//!
//! Axis bounds are left at placeholders here; the graph refreshes them with
//! the current auto-scroll settings and hidden state right after preparing.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{BufferPool, INDEXED_SERIES_NAME, PreparedGraphData};
use crate::bounds::{EMPTY_Y_RANGE, index_x_limits};
use crate::format::seconds_between;
use crate::series::{SeriesData, SeriesGroup, SeriesSample, TimeSeries};
use crate::style::{Theme, palette_color};
use crate::view::Range;

/// Prepare a flat sample array: X is the sample index.
///
/// Non-finite values are kept so the line breaks at them. Returns `None` for
/// empty input.
pub(crate) fn prepare_indexed(
    samples: &[f64],
    theme: &Theme,
    pool: &mut BufferPool,
) -> Option<PreparedGraphData> {
    if samples.is_empty() {
        pool.retain_names(&HashSet::new());
        return None;
    }

    let count = samples.len();
    let (mut xs, mut ys) = pool.acquire(INDEXED_SERIES_NAME, count);
    for (index, value) in samples.iter().enumerate() {
        xs[index] = index as f64;
        ys[index] = *value;
    }

    let first = samples.iter().copied().find(|v| v.is_finite());
    let last = samples.iter().rev().copied().find(|v| v.is_finite());
    let color = match (first, last) {
        (Some(first), Some(last)) if last < first => theme.bearish,
        _ => theme.bullish,
    };

    pool.retain_names(&HashSet::from([INDEXED_SERIES_NAME]));
    debug!(points = count, "prepared index-based series");

    Some(PreparedGraphData {
        series: vec![SeriesData {
            name: INDEXED_SERIES_NAME.to_string(),
            x_values: xs,
            y_values: ys,
            point_count: count,
            color,
            visible: true,
            group_names: Vec::new(),
            has_tail: false,
        }],
        groups: Vec::new(),
        x_range: index_x_limits(count),
        y_range: EMPTY_Y_RANGE,
        is_time_based: false,
        start_time: DateTime::<Utc>::UNIX_EPOCH,
        total_time_span: count.saturating_sub(1) as f64,
    })
}

/// Prepare named time series against `now`.
///
/// X is seconds since the earliest finite sample across all series. Every
/// non-empty series gets a synthetic last point holding its final value at
/// the total time span. Returns `None` when no series has a usable sample.
pub(crate) fn prepare_time_series(
    series: &[TimeSeries],
    groups: &[SeriesGroup],
    now: DateTime<Utc>,
    pool: &mut BufferPool,
) -> Option<PreparedGraphData> {
    let sorted: Vec<Vec<SeriesSample>> = series.iter().map(usable_samples).collect();

    let Some(start_time) = sorted
        .iter()
        .filter_map(|samples| samples.first())
        .map(|sample| sample.timestamp)
        .min()
    else {
        pool.retain_names(&HashSet::new());
        return None;
    };

    let newest = sorted
        .iter()
        .filter_map(|samples| samples.last())
        .map(|sample| seconds_between(start_time, sample.timestamp))
        .fold(0.0, f64::max);
    let total_time_span = seconds_between(start_time, now).max(newest);

    let mut prepared = Vec::with_capacity(series.len());
    for (index, (input, samples)) in series.iter().zip(&sorted).enumerate() {
        let real = samples.len();
        let (mut xs, mut ys) = pool.acquire(&input.name, real + 1);
        for (slot, sample) in samples.iter().enumerate() {
            xs[slot] = seconds_between(start_time, sample.timestamp);
            ys[slot] = sample.value;
        }
        let has_tail = real > 0;
        if let Some(last) = samples.last() {
            xs[real] = total_time_span;
            ys[real] = last.value;
        }

        prepared.push(SeriesData {
            name: input.name.clone(),
            x_values: xs,
            y_values: ys,
            point_count: if has_tail { real + 1 } else { 0 },
            color: input.color.unwrap_or_else(|| palette_color(index)),
            visible: input.visible && has_tail,
            group_names: groups
                .iter()
                .filter(|group| group.contains(&input.name))
                .map(|group| group.name.clone())
                .collect(),
            has_tail,
        });
    }

    let names: HashSet<&str> = series.iter().map(|s| s.name.as_str()).collect();
    pool.retain_names(&names);
    debug!(
        series = prepared.len(),
        groups = groups.len(),
        total_time_span,
        "prepared time series"
    );

    Some(PreparedGraphData {
        series: prepared,
        groups: groups.to_vec(),
        x_range: Range::new(0.0, total_time_span.max(1.0)),
        y_range: EMPTY_Y_RANGE,
        is_time_based: true,
        start_time,
        total_time_span,
    })
}

/// Finite samples in timestamp order. Input that is already sorted is only
/// copied.
fn usable_samples(series: &TimeSeries) -> Vec<SeriesSample> {
    let mut samples: Vec<SeriesSample> = series
        .samples
        .iter()
        .filter(|sample| sample.value.is_finite())
        .copied()
        .collect();
    if !samples.is_sorted_by_key(|sample| sample.timestamp) {
        samples.sort_by_key(|sample| sample.timestamp);
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Color;
    use chrono::{TimeDelta, TimeZone};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + TimeDelta::seconds(secs)
    }

    fn samples(points: &[(i64, f64)]) -> Vec<SeriesSample> {
        points
            .iter()
            .map(|(secs, value)| SeriesSample::new(at(*secs), *value))
            .collect()
    }

    #[test]
    fn indexed_uses_positions_and_trend_color() {
        let theme = Theme::default();
        let mut pool = BufferPool::new();
        let up = prepare_indexed(&[1.0, 3.0, 2.0, 5.0], &theme, &mut pool).unwrap();
        let series = &up.series()[0];
        assert_eq!(series.name(), INDEXED_SERIES_NAME);
        assert_eq!(series.xs(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(series.color(), theme.bullish);
        assert!(!up.is_time_based());

        let down = prepare_indexed(&[5.0, 4.0], &theme, &mut pool).unwrap();
        assert_eq!(down.series()[0].color(), theme.bearish);

        assert!(prepare_indexed(&[], &theme, &mut pool).is_none());
    }

    #[test]
    fn time_series_appends_hold_last_value_tail() {
        let input = vec![TimeSeries::new("cpu", samples(&[(0, 1.0), (10, 4.0), (20, 2.0)]))];
        let data = prepare_time_series(&input, &[], at(60), &mut BufferPool::new()).unwrap();
        let series = &data.series()[0];

        assert_eq!(series.point_count(), 4);
        assert_eq!(series.xs(), &[0.0, 10.0, 20.0, 60.0]);
        assert_eq!(series.ys(), &[1.0, 4.0, 2.0, 2.0]);
        assert!(series.has_tail());
        assert!(series.buffer_len() >= series.point_count());
        assert_eq!(data.total_time_span(), 60.0);
        assert_eq!(data.start_time(), at(0));
    }

    #[test]
    fn start_time_is_earliest_across_series() {
        let input = vec![
            TimeSeries::new("late", samples(&[(30, 1.0)])),
            TimeSeries::new("early", samples(&[(5, 1.0), (40, 2.0)])),
        ];
        let data = prepare_time_series(&input, &[], at(100), &mut BufferPool::new()).unwrap();
        assert_eq!(data.start_time(), at(5));
        assert_eq!(data.series()[0].xs(), &[25.0, 95.0]);
    }

    #[test]
    fn clock_skew_keeps_x_sorted() {
        let input = vec![TimeSeries::new("a", samples(&[(0, 1.0), (50, 2.0)]))];
        let data = prepare_time_series(&input, &[], at(20), &mut BufferPool::new()).unwrap();
        assert_eq!(data.total_time_span(), 50.0);
        assert!(data.series()[0].xs().is_sorted());
    }

    #[test]
    fn unsorted_and_non_finite_samples_are_cleaned() {
        let input = vec![TimeSeries::new(
            "a",
            samples(&[(20, 3.0), (0, 1.0), (10, f64::NAN), (5, 2.0)]),
        )];
        let data = prepare_time_series(&input, &[], at(30), &mut BufferPool::new()).unwrap();
        let series = &data.series()[0];
        assert_eq!(series.xs(), &[0.0, 5.0, 20.0, 30.0]);
        assert_eq!(series.ys(), &[1.0, 2.0, 3.0, 3.0]);
    }

    #[test]
    fn empty_series_stay_listed_but_hidden() {
        let input = vec![
            TimeSeries::new("a", samples(&[(0, 1.0)])),
            TimeSeries::new("empty", Vec::new()),
        ];
        let data = prepare_time_series(&input, &[], at(10), &mut BufferPool::new()).unwrap();
        let empty = data.series_by_name("empty").unwrap();
        assert_eq!(empty.point_count(), 0);
        assert!(!empty.is_visible());
        assert!(empty.last_point().is_none());
    }

    #[test]
    fn all_empty_input_has_no_data() {
        let input = vec![TimeSeries::new("a", Vec::new())];
        assert!(prepare_time_series(&input, &[], at(0), &mut BufferPool::new()).is_none());
        assert!(prepare_time_series(&[], &[], at(0), &mut BufferPool::new()).is_none());
    }

    #[test]
    fn colors_and_groups_are_assigned() {
        let red = Color::rgb8(255, 0, 0);
        let input = vec![
            TimeSeries::new("a", samples(&[(0, 1.0)])),
            TimeSeries::new("b", samples(&[(0, 1.0)])).with_color(red),
        ];
        let groups = vec![
            SeriesGroup::new("g1", Color::WHITE, ["a", "b"]),
            SeriesGroup::new("g2", Color::WHITE, ["b"]),
        ];
        let data = prepare_time_series(&input, &groups, at(1), &mut BufferPool::new()).unwrap();
        assert_eq!(data.series()[0].color(), palette_color(0));
        assert_eq!(data.series()[1].color(), red);
        assert_eq!(data.series()[0].group_names(), &["g1".to_string()]);
        assert_eq!(data.series()[1].group_names().len(), 2);
    }

    #[test]
    fn pool_reuses_buffers_between_preparations() {
        let mut pool = BufferPool::new();
        let input = vec![TimeSeries::new("a", samples(&[(0, 1.0), (1, 2.0)]))];
        let first = prepare_time_series(&input, &[], at(2), &mut pool).unwrap();
        let ptr = first.series()[0].xs().as_ptr();
        first.recycle_into(&mut pool);

        let second = prepare_time_series(&input, &[], at(3), &mut pool).unwrap();
        assert_eq!(second.series()[0].xs().as_ptr(), ptr);

        second.recycle_into(&mut pool);
        let renamed = vec![TimeSeries::new("b", samples(&[(0, 1.0)]))];
        prepare_time_series(&renamed, &[], at(3), &mut pool).unwrap();
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn extend_to_slides_every_tail() {
        let input = vec![
            TimeSeries::new("a", samples(&[(0, 1.0)])),
            TimeSeries::new("b", samples(&[(4, 2.0)])),
        ];
        let mut data = prepare_time_series(&input, &[], at(10), &mut BufferPool::new()).unwrap();
        data.extend_to(at(25));
        assert_eq!(data.total_time_span(), 25.0);
        assert_eq!(data.series()[0].last_point(), Some((25.0, 1.0)));
        assert_eq!(data.series()[1].last_point(), Some((25.0, 2.0)));
    }
}
