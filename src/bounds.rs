//! Axis bounds for prepared graph data.
//!
//! Y bounds are recomputed from the drawn series every time the visible X
//! window moves. Values are treated as non-negative magnitudes: the lower
//! bound never drops below zero.

use crate::config::AutoScrollConfig;
use crate::datasource::PreparedGraphData;
use crate::series::SeriesData;
use crate::view::Range;
use crate::visibility::HiddenState;

/// Y range used when no point contributes.
pub const EMPTY_Y_RANGE: Range = Range {
    min: 0.0,
    max: 100.0,
};

/// Fraction of the data range added above and below.
pub const Y_PADDING_FRAC: f64 = 0.15;

/// Fraction of the time span added right of "now" when auto-scroll is off.
pub const X_PADDING_FRAC: f64 = 0.05;

/// Compute padded Y bounds over `series`.
///
/// With a `window`, only points whose X falls inside it count, plus the
/// last point before `window.min` so the value entering from the left is
/// part of the range. Ranges narrower than `epsilon` are widened to
/// `max(|max| * 0.1, 1)` before padding.
pub fn compute_y_bounds<'a, I>(series: I, window: Option<Range>, epsilon: f64) -> Range
where
    I: IntoIterator<Item = &'a SeriesData>,
{
    // Range::new would swap these; start from an explicitly empty range.
    let mut data = Range {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    for series in series {
        let xs = series.xs();
        let ys = series.ys();
        match window {
            None => ys.iter().for_each(|y| data.expand_to_include(*y)),
            Some(window) => {
                let start = xs.partition_point(|x| *x < window.min);
                let end = xs.partition_point(|x| *x <= window.max).max(start);
                if let Some(entering) = start.checked_sub(1) {
                    data.expand_to_include(ys[entering]);
                }
                ys[start..end]
                    .iter()
                    .for_each(|y| data.expand_to_include(*y));
            }
        }
    }

    if !data.is_finite() {
        return EMPTY_Y_RANGE;
    }

    let mut range = data.span();
    if range < epsilon {
        range = (data.max.abs() * 0.1).max(1.0);
    }
    let min = (data.min - Y_PADDING_FRAC * range).max(0.0);
    let mut max = data.max + Y_PADDING_FRAC * range;
    if max - min < epsilon {
        max = min + 1.0;
    }
    Range { min, max }
}

/// X limits for time-based data.
///
/// With auto-scroll off the full span is shown with 5% room on the right.
/// With auto-scroll on a window of the configured width is placed so that
/// "now" (`total_time_span`) sits at the configured position across it.
pub fn calculate_x_limits(total_time_span: f64, auto_scroll: &AutoScrollConfig) -> Range {
    let window = auto_scroll.window_seconds();
    if !auto_scroll.enabled || window <= 0.0 {
        let right = total_time_span * (1.0 + X_PADDING_FRAC);
        return if right > 0.0 {
            Range::new(0.0, right)
        } else {
            Range::new(0.0, 1.0)
        };
    }
    let fraction = auto_scroll.now_fraction();
    Range::new(
        total_time_span - window * fraction,
        total_time_span + window * (1.0 - fraction),
    )
}

/// X limits for index-based data: the sample indices, at least one unit wide.
pub fn index_x_limits(point_count: usize) -> Range {
    Range::new(0.0, (point_count.saturating_sub(1) as f64).max(1.0))
}

/// Recompute both axes of `data` in place.
///
/// `manual_y` replaces the computed Y range when the owner pinned one.
pub(crate) fn refresh_bounds(
    data: &mut PreparedGraphData,
    auto_scroll: &AutoScrollConfig,
    epsilon: f64,
    hidden: &HiddenState,
    manual_y: Option<Range>,
) {
    let windowed = data.is_time_based && auto_scroll.enabled;
    data.x_range = if data.is_time_based {
        calculate_x_limits(data.total_time_span, auto_scroll)
    } else {
        let count = data.series.first().map_or(0, SeriesData::point_count);
        index_x_limits(count)
    };
    let window = windowed.then_some(data.x_range);
    data.y_range = manual_y.unwrap_or_else(|| {
        compute_y_bounds(
            data.series.iter().filter(|series| hidden.is_drawn(series)),
            window,
            epsilon,
        )
    });
}
