//! Visual theme and the default series palette.

use serde::{Deserialize, Serialize};

use crate::render::Color;

/// Series colors assigned by index when the caller does not pick one.
///
/// The order and values are stable: legends, tooltips, and value labels rely
/// on matching the line color.
pub const PALETTE: [Color; 10] = [
    Color::rgb8(66, 135, 245),
    Color::rgb8(245, 166, 35),
    Color::rgb8(80, 200, 120),
    Color::rgb8(235, 87, 87),
    Color::rgb8(155, 89, 182),
    Color::rgb8(26, 188, 156),
    Color::rgb8(241, 196, 15),
    Color::rgb8(230, 126, 34),
    Color::rgb8(149, 165, 166),
    Color::rgb8(236, 112, 180),
];

/// Palette color for the series at `index`.
pub fn palette_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

/// Flat color constants used by the graph renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Plot background.
    pub background: Color,
    /// Axis lines, ticks, and tick labels.
    pub axis: Color,
    /// Grid lines.
    pub grid: Color,
    /// Index-based series whose last value is at or above the first.
    pub bullish: Color,
    /// Index-based series whose last value is below the first.
    pub bearish: Color,
    /// Crosshair guide lines.
    pub crosshair: Color,
    /// Tooltip background.
    pub hover_bg: Color,
    /// Tooltip border.
    pub hover_border: Color,
    /// Legend background.
    pub legend_bg: Color,
    /// Legend border.
    pub legend_border: Color,
    /// Controls drawer background.
    pub controls_bg: Color,
    /// Highlight for active controls.
    pub controls_active: Color,
    /// Primary text color.
    pub text: Color,
    /// Placeholder message shown when there is no data.
    pub placeholder: Color,
    /// Inline error message color.
    pub error: Color,
}

impl Theme {
    /// Create the default dark theme.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::rgb8(24, 26, 31),
            axis: Color::rgb8(170, 176, 186),
            grid: Color::rgb8(170, 176, 186).with_alpha(0.15),
            bullish: Color::rgb8(38, 166, 91),
            bearish: Color::rgb8(231, 76, 60),
            crosshair: Color::rgb8(200, 200, 200).with_alpha(0.6),
            hover_bg: Color::rgb8(36, 39, 46).with_alpha(0.95),
            hover_border: Color::rgb8(90, 96, 108),
            legend_bg: Color::rgb8(30, 33, 39).with_alpha(0.85),
            legend_border: Color::rgb8(70, 75, 86),
            controls_bg: Color::rgb8(30, 33, 39),
            controls_active: Color::rgb8(66, 135, 245),
            text: Color::rgb8(225, 228, 234),
            placeholder: Color::rgb8(130, 136, 146),
            error: Color::rgb8(235, 87, 87),
        }
    }
}
