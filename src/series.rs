//! Series input types and the prepared per-frame series model.

use chrono::{DateTime, Utc};

use crate::render::Color;

/// A recorded value at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSample {
    /// When the value was recorded.
    pub timestamp: DateTime<Utc>,
    /// Recorded value.
    pub value: f64,
}

impl SeriesSample {
    /// Create a new sample.
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// A named stream of time-stamped samples, as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    /// Identity key, unique within one render call.
    pub name: String,
    /// Samples, ideally in ascending timestamp order.
    pub samples: Vec<SeriesSample>,
    /// Line color; a palette color is used when `None`.
    pub color: Option<Color>,
    /// Whether the series may be drawn at all.
    pub visible: bool,
}

impl TimeSeries {
    /// Create a visible series without a fixed color.
    pub fn new(name: impl Into<String>, samples: Vec<SeriesSample>) -> Self {
        Self {
            name: name.into(),
            samples,
            color: None,
            visible: true,
        }
    }

    /// Pin the line color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Set whether the series may be drawn.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// A named group of series that can be hidden together from the legend.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesGroup {
    /// Group name shown in the legend.
    pub name: String,
    /// Legend swatch color.
    pub color: Color,
    /// Names of member series.
    pub members: Vec<String>,
}

impl SeriesGroup {
    /// Create a group from its member names.
    pub fn new<I, S>(name: impl Into<String>, color: Color, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            color,
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether a series belongs to the group.
    pub fn contains(&self, series_name: &str) -> bool {
        self.members.iter().any(|member| member == series_name)
    }
}

/// One renderable line, rebuilt every time data is prepared.
///
/// The X/Y buffers come from a pool and may be longer than `point_count`;
/// only the first `point_count` entries are meaningful. X values are
/// non-decreasing.
///
/// In time-based data the last valid point is a synthetic copy of the last
/// real value. It is the one field that changes between preparations:
/// [`SeriesData::set_tail_x`] slides it to "now" every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesData {
    pub(crate) name: String,
    pub(crate) x_values: Vec<f64>,
    pub(crate) y_values: Vec<f64>,
    pub(crate) point_count: usize,
    pub(crate) color: Color,
    pub(crate) visible: bool,
    pub(crate) group_names: Vec<String>,
    pub(crate) has_tail: bool,
}

impl SeriesData {
    /// Series name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Valid X values.
    pub fn xs(&self) -> &[f64] {
        &self.x_values[..self.point_count]
    }

    /// Valid Y values.
    pub fn ys(&self) -> &[f64] {
        &self.y_values[..self.point_count]
    }

    /// Number of valid points, including a synthetic tail.
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Number of recorded points, excluding a synthetic tail.
    pub fn real_point_count(&self) -> usize {
        if self.has_tail {
            self.point_count.saturating_sub(1)
        } else {
            self.point_count
        }
    }

    /// Capacity of the underlying buffers.
    pub fn buffer_len(&self) -> usize {
        self.x_values.len().min(self.y_values.len())
    }

    /// Line color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Whether the series may be drawn this frame.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Groups this series belongs to.
    pub fn group_names(&self) -> &[String] {
        &self.group_names
    }

    /// Whether the last point is a synthetic hold-last-value sample.
    pub fn has_tail(&self) -> bool {
        self.has_tail
    }

    /// Latest `(x, y)` point.
    pub fn last_point(&self) -> Option<(f64, f64)> {
        let index = self.point_count.checked_sub(1)?;
        Some((self.x_values[index], self.y_values[index]))
    }

    /// Move the synthetic tail point to `x`.
    ///
    /// Does nothing for series without a tail. `x` is clamped so the tail
    /// never precedes the last recorded point.
    pub fn set_tail_x(&mut self, x: f64) {
        if !self.has_tail || self.point_count == 0 {
            return;
        }
        let tail = self.point_count - 1;
        let floor = if tail > 0 {
            self.x_values[tail - 1]
        } else {
            f64::NEG_INFINITY
        };
        self.x_values[tail] = x.max(floor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tailed(xs: Vec<f64>, ys: Vec<f64>) -> SeriesData {
        SeriesData {
            name: "a".to_string(),
            point_count: xs.len(),
            x_values: xs,
            y_values: ys,
            color: Color::WHITE,
            visible: true,
            group_names: Vec::new(),
            has_tail: true,
        }
    }

    #[test]
    fn tail_moves_but_never_precedes_data() {
        let mut series = tailed(vec![0.0, 5.0, 10.0], vec![1.0, 2.0, 2.0]);
        series.set_tail_x(42.0);
        assert_eq!(series.last_point(), Some((42.0, 2.0)));
        series.set_tail_x(1.0);
        assert_eq!(series.last_point(), Some((5.0, 2.0)));
        assert_eq!(series.real_point_count(), 2);
    }

    #[test]
    fn group_membership_by_name() {
        let group = SeriesGroup::new("cpu", Color::WHITE, ["core0", "core1"]);
        assert!(group.contains("core1"));
        assert!(!group.contains("gpu"));
    }
}
