//! Graph configuration surface.
//!
//! Everything here is plain data handed to the graph by its owner. All
//! structs deserialize with defaults for missing fields, so a host can keep a
//! partial JSON document next to its own settings.

use serde::{Deserialize, Serialize};

use crate::error::GraphResult;
use crate::style::Theme;

/// How each series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GraphType {
    /// Line with the area down to zero filled.
    #[default]
    Area,
    /// Plain polyline.
    Line,
    /// Step-held line.
    Stairs,
    /// One bar per sample.
    Bars,
    /// Step-held line with the area below filled.
    StairsArea,
}

impl GraphType {
    /// Whether the area under the line counts as part of the series.
    pub fn is_filled(self) -> bool {
        matches!(self, Self::Area | Self::StairsArea)
    }

    /// Whether values hold until the next sample instead of interpolating.
    pub fn is_stepped(self) -> bool {
        matches!(self, Self::Stairs | Self::StairsArea | Self::Bars)
    }
}

/// Unit of the auto-scroll window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Seconds.
    Seconds,
    /// Minutes.
    #[default]
    Minutes,
    /// Hours.
    Hours,
    /// Days.
    Days,
}

impl TimeUnit {
    /// All units in cycling order.
    pub const ALL: [TimeUnit; 4] = [Self::Seconds, Self::Minutes, Self::Hours, Self::Days];

    /// Length of one unit in seconds.
    pub fn seconds(self) -> f64 {
        match self {
            Self::Seconds => 1.0,
            Self::Minutes => 60.0,
            Self::Hours => 3_600.0,
            Self::Days => 86_400.0,
        }
    }

    /// Short label used by the controls drawer.
    pub fn label(self) -> &'static str {
        match self {
            Self::Seconds => "sec",
            Self::Minutes => "min",
            Self::Hours => "hr",
            Self::Days => "day",
        }
    }

    /// The unit following this one, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|unit| *unit == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// Auto-scroll window settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoScrollConfig {
    /// Follow "now" instead of showing the full data range.
    pub enabled: bool,
    /// Window width in `unit`s.
    pub value: f64,
    /// Unit of `value`.
    pub unit: TimeUnit,
    /// Where "now" sits across the window, in percent (0 = left edge).
    pub now_position: f64,
}

impl AutoScrollConfig {
    /// Window width in seconds.
    pub fn window_seconds(&self) -> f64 {
        (self.value * self.unit.seconds()).max(0.0)
    }

    /// Fraction of the window left of "now", clamped into `0.0..=1.0`.
    pub fn now_fraction(&self) -> f64 {
        (self.now_position / 100.0).clamp(0.0, 1.0)
    }
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            value: 5.0,
            unit: TimeUnit::Minutes,
            now_position: 75.0,
        }
    }
}

/// Legend placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LegendPosition {
    /// Overlay in the top-right corner of the plot.
    #[default]
    Inside,
    /// Strip below the plot of `LegendConfig::height` pixels.
    Outside,
    /// No legend.
    Hidden,
}

/// Legend settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendConfig {
    /// Placement of the legend.
    pub position: LegendPosition,
    /// Height of the outside legend strip in pixels.
    pub height: f32,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            position: LegendPosition::Inside,
            height: 48.0,
        }
    }
}

/// Value label settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueLabelConfig {
    /// Draw one label per series at its latest value.
    pub enabled: bool,
    /// Maximum number of labels; highest values win.
    pub max_visible: usize,
    /// Minimum vertical gap between labels in the same column.
    pub min_spacing: f32,
    /// Stair steps per label row.
    pub steps_per_row: u32,
    /// Horizontal gap between the data point and the first column.
    pub offset_x: f32,
    /// Horizontal gap between columns.
    pub column_gap: f32,
    /// Inner text padding.
    pub padding: f32,
    /// Font size in pixels.
    pub font_size: f32,
}

impl Default for ValueLabelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_visible: 8,
            min_spacing: 2.0,
            steps_per_row: 2,
            offset_x: 8.0,
            column_gap: 4.0,
            padding: 3.0,
            font_size: 11.0,
        }
    }
}

/// Numeric style constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Series line width in pixels. Also scales the hover threshold.
    pub line_weight: f32,
    /// Alpha applied to filled areas.
    pub fill_alpha: f32,
    /// Bar width as a fraction of the smallest sample spacing.
    pub bar_width_frac: f64,
    /// Axis tick label size.
    pub tick_font_size: f32,
    /// Tooltip font size.
    pub tooltip_font_size: f32,
    /// Padding between widget bounds and the plot area.
    pub plot_padding: f32,
    /// Y ranges narrower than this are widened before padding.
    pub range_epsilon: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            line_weight: 1.5,
            fill_alpha: 0.25,
            bar_width_frac: 0.8,
            tick_font_size: 11.0,
            tooltip_font_size: 12.0,
            plot_padding: 6.0,
            range_epsilon: 1e-4,
        }
    }
}

/// Full configuration for a [`TimeSeriesGraph`](crate::graph::TimeSeriesGraph).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Drawing style for every series.
    pub graph_type: GraphType,
    /// Auto-scroll window.
    pub auto_scroll: AutoScrollConfig,
    /// Legend placement.
    pub legend: LegendConfig,
    /// Value labels.
    pub value_labels: ValueLabelConfig,
    /// Numeric style constants.
    pub style: StyleConfig,
    /// Colors.
    pub theme: Theme,
    /// Draw a horizontal line at the latest value of the primary series.
    pub show_current_value_line: bool,
    /// Draw the crosshair and tooltip on hover.
    pub show_hover: bool,
    /// Draw the auto-scroll controls drawer.
    pub show_controls: bool,
    /// Message shown when there is nothing to plot.
    pub placeholder: String,
}

impl GraphConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(input: &str) -> GraphResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json_pretty(&self) -> GraphResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            graph_type: GraphType::default(),
            auto_scroll: AutoScrollConfig::default(),
            legend: LegendConfig::default(),
            value_labels: ValueLabelConfig::default(),
            style: StyleConfig::default(),
            theme: Theme::default(),
            show_current_value_line: false,
            show_hover: true,
            show_controls: true,
            placeholder: "No data available".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GraphConfig::from_json_str(
            r#"{ "graph_type": "Stairs", "auto_scroll": { "enabled": true, "unit": "Hours" } }"#,
        )
        .expect("config parses");
        assert_eq!(config.graph_type, GraphType::Stairs);
        assert!(config.auto_scroll.enabled);
        assert_eq!(config.auto_scroll.unit, TimeUnit::Hours);
        assert_eq!(config.auto_scroll.value, 5.0);
        assert_eq!(config.value_labels, ValueLabelConfig::default());
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = GraphConfig::from_json_str("{ graph_type: ").unwrap_err();
        assert!(matches!(err, crate::error::GraphError::Config(_)));
    }

    #[test]
    fn window_uses_unit_seconds() {
        let auto = AutoScrollConfig {
            enabled: true,
            value: 2.0,
            unit: TimeUnit::Hours,
            now_position: 150.0,
        };
        assert_eq!(auto.window_seconds(), 7_200.0);
        assert_eq!(auto.now_fraction(), 1.0);
        assert_eq!(TimeUnit::Days.next(), TimeUnit::Seconds);
    }
}
