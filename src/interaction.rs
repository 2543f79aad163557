//! Hover hit-testing and click actions.
//!
//! These helpers turn pointer positions into either the series under the
//! cursor or the legend/controls action a click triggers.

use crate::config::GraphType;
use crate::geom::{ScreenPoint, ScreenRect};
use crate::series::SeriesData;
use crate::transform::Transform;

/// Greatest index `i` with `xs[i] <= x`, or `None` when `x` lies left of every
/// value. `xs` must be non-decreasing.
pub fn binary_search_nearest_x(xs: &[f64], x: f64) -> Option<usize> {
    xs.partition_point(|value| *value <= x).checked_sub(1)
}

/// Series under the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverHit {
    /// Index into the prepared series list.
    pub series_index: usize,
    /// Cursor X in data units.
    pub x: f64,
    /// Series value at `x`.
    pub value: f64,
}

/// Hit tolerance in pixels for a given line weight.
pub fn hover_threshold_px(line_weight: f32) -> f32 {
    line_weight * 3.0 + 4.0
}

/// Find the drawn series closest to `mouse` vertically.
///
/// A series is a candidate when the cursor X lies inside its X range and the
/// cursor is within [`hover_threshold_px`] of its value. Filled graph types
/// also hit anywhere between zero and the value. The smallest vertical
/// distance wins; ties keep the earlier series.
pub fn find_hovered_series(
    series: &[SeriesData],
    is_drawn: impl Fn(&SeriesData) -> bool,
    mouse: ScreenPoint,
    transform: &Transform,
    graph_type: GraphType,
    line_weight: f32,
) -> Option<HoverHit> {
    if !transform.screen().contains(mouse) {
        return None;
    }
    let cursor = transform.screen_to_data(mouse);
    let threshold = hover_threshold_px(line_weight) as f64 * transform.y_units_per_pixel();

    let mut best: Option<(HoverHit, f64)> = None;
    for (series_index, data) in series.iter().enumerate() {
        if !is_drawn(data) {
            continue;
        }
        let Some(value) = value_at(data.xs(), data.ys(), cursor.x, graph_type.is_stepped()) else {
            continue;
        };
        let distance = (cursor.y - value).abs();
        let under_fill = graph_type.is_filled() && cursor.y >= 0.0 && cursor.y <= value;
        if distance > threshold && !under_fill {
            continue;
        }
        if best.is_none_or(|(_, nearest)| distance < nearest) {
            best = Some((
                HoverHit {
                    series_index,
                    x: cursor.x,
                    value,
                },
                distance,
            ));
        }
    }
    best.map(|(hit, _)| hit)
}

/// Series value at `x`, interpolated or step-held. `None` outside the data.
fn value_at(xs: &[f64], ys: &[f64], x: f64, stepped: bool) -> Option<f64> {
    let (first, last) = (*xs.first()?, *xs.last()?);
    if x < first || x > last {
        return None;
    }
    let index = binary_search_nearest_x(xs, x)?;
    let value = match (stepped, xs.get(index + 1)) {
        (false, Some(next_x)) if *next_x > xs[index] => {
            let t = (x - xs[index]) / (next_x - xs[index]);
            ys[index] + (ys[index + 1] - ys[index]) * t
        }
        _ => ys[index],
    };
    value.is_finite().then_some(value)
}

/// What a click on the graph chrome asks the owner to do.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphAction {
    /// Flip a series in the legend.
    ToggleSeries(String),
    /// Flip a group in the legend.
    ToggleGroup(String),
    /// Flip auto-scroll.
    ToggleAutoScroll,
    /// Shrink the auto-scroll window by one unit.
    DecreaseWindow,
    /// Grow the auto-scroll window by one unit.
    IncreaseWindow,
    /// Switch to the next window unit.
    CycleUnit,
    /// Move "now" across the window, in percent.
    SetNowPosition(f64),
}

/// Clickable regions recorded while building a frame.
#[derive(Debug, Default, Clone)]
pub(crate) struct HitTargets {
    buttons: Vec<(ScreenRect, GraphAction)>,
    slider: Option<ScreenRect>,
}

impl HitTargets {
    pub(crate) fn push(&mut self, rect: ScreenRect, action: GraphAction) {
        self.buttons.push((rect, action));
    }

    pub(crate) fn set_slider(&mut self, rect: ScreenRect) {
        self.slider = Some(rect);
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.buttons.is_empty() && self.slider.is_none()
    }

    /// Action for a click at `point`. Later regions are drawn on top, so they
    /// win.
    pub(crate) fn action_at(&self, point: ScreenPoint) -> Option<GraphAction> {
        if let Some((_, action)) = self
            .buttons
            .iter()
            .rev()
            .find(|(rect, _)| rect.contains(point))
        {
            return Some(action.clone());
        }
        let slider = self.slider.filter(|rect| rect.contains(point))?;
        let fraction = ((point.x - slider.min.x) / slider.width().max(1.0)).clamp(0.0, 1.0);
        Some(GraphAction::SetNowPosition((fraction as f64 * 100.0).round()))
    }
}
