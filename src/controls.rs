//! Auto-scroll controls drawer.
//!
//! A strip above the plot holding the auto-scroll toggle, the window width
//! with -/+ buttons, the unit switch, and a slider for where "now" sits.

use crate::config::AutoScrollConfig;
use crate::format::abbreviate;
use crate::geom::{ScreenPoint, ScreenRect};
use crate::interaction::{GraphAction, HitTargets};
use crate::render::{LineStyle, RectStyle, RenderList, TextMeasurer, TextStyle};
use crate::style::Theme;

/// Height of the drawer strip.
pub const CONTROLS_HEIGHT: f32 = 24.0;

const CONTROLS_FONT_SIZE: f32 = 11.0;
const CONTROLS_PADDING: f32 = 4.0;
const CONTROLS_GAP: f32 = 6.0;
const BUTTON_SIZE: f32 = 16.0;
const SLIDER_WIDTH: f32 = 100.0;
const SLIDER_KNOB: f32 = 8.0;

/// Smallest window width, in units.
pub const MIN_WINDOW_VALUE: f64 = 1.0;

/// Positions of every control in the drawer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlsLayout {
    /// Drawer background.
    pub rect: ScreenRect,
    /// Auto-scroll toggle button.
    pub toggle: ScreenRect,
    /// Window decrease button.
    pub decrease: ScreenRect,
    /// Window value readout.
    pub value: ScreenRect,
    /// Window increase button.
    pub increase: ScreenRect,
    /// Unit switch.
    pub unit: ScreenRect,
    /// Caption of the slider.
    pub now_label: ScreenRect,
    /// "Now" position track.
    pub slider: ScreenRect,
}

/// Lay out the drawer inside `strip`, left to right.
pub fn layout_controls(
    strip: ScreenRect,
    auto_scroll: &AutoScrollConfig,
    measurer: &dyn TextMeasurer,
) -> ControlsLayout {
    let center_y = strip.center_y();
    let mut x = strip.min.x + CONTROLS_PADDING;
    let mut next = |width: f32, height: f32| {
        let rect = ScreenRect::from_origin_size(
            ScreenPoint::new(x, center_y - height * 0.5),
            (width, height),
        );
        x += width + CONTROLS_GAP;
        rect
    };
    let text_box = |text: &str| {
        let (width, _) = measurer.measure(text, CONTROLS_FONT_SIZE);
        width + CONTROLS_PADDING * 2.0
    };

    let toggle = next(text_box(&toggle_label(auto_scroll)), BUTTON_SIZE);
    let decrease = next(BUTTON_SIZE, BUTTON_SIZE);
    let value = next(text_box(&value_label(auto_scroll)), BUTTON_SIZE);
    let increase = next(BUTTON_SIZE, BUTTON_SIZE);
    let unit = next(text_box(auto_scroll.unit.label()), BUTTON_SIZE);
    let now_label = next(text_box(NOW_LABEL), BUTTON_SIZE);
    let slider = next(SLIDER_WIDTH, BUTTON_SIZE);

    ControlsLayout {
        rect: strip,
        toggle,
        decrease,
        value,
        increase,
        unit,
        now_label,
        slider,
    }
}

const NOW_LABEL: &str = "now";

fn toggle_label(auto_scroll: &AutoScrollConfig) -> String {
    format!("Auto-scroll: {}", if auto_scroll.enabled { "on" } else { "off" })
}

fn value_label(auto_scroll: &AutoScrollConfig) -> String {
    abbreviate(auto_scroll.value)
}

/// Apply a drawer action to the auto-scroll settings.
///
/// Returns `false` for actions the drawer does not own.
pub fn apply_control(auto_scroll: &mut AutoScrollConfig, action: &GraphAction) -> bool {
    match action {
        GraphAction::ToggleAutoScroll => auto_scroll.enabled = !auto_scroll.enabled,
        GraphAction::DecreaseWindow => {
            auto_scroll.value = (auto_scroll.value - 1.0).max(MIN_WINDOW_VALUE);
        }
        GraphAction::IncreaseWindow => {
            auto_scroll.value = (auto_scroll.value + 1.0).max(MIN_WINDOW_VALUE);
        }
        GraphAction::CycleUnit => auto_scroll.unit = auto_scroll.unit.next(),
        GraphAction::SetNowPosition(position) => {
            auto_scroll.now_position = position.clamp(0.0, 100.0);
        }
        GraphAction::ToggleSeries(_) | GraphAction::ToggleGroup(_) => return false,
    }
    true
}

impl ControlsLayout {
    /// Register every control as a click target.
    pub(crate) fn register(&self, targets: &mut HitTargets) {
        targets.push(self.toggle, GraphAction::ToggleAutoScroll);
        targets.push(self.decrease, GraphAction::DecreaseWindow);
        targets.push(self.increase, GraphAction::IncreaseWindow);
        targets.push(self.unit, GraphAction::CycleUnit);
        targets.set_slider(self.slider);
    }

    /// Draw the drawer.
    pub(crate) fn build(
        &self,
        render: &mut RenderList,
        auto_scroll: &AutoScrollConfig,
        theme: &Theme,
    ) {
        let text = TextStyle {
            color: theme.text,
            size: CONTROLS_FONT_SIZE,
        };
        let button = RectStyle {
            fill: theme.controls_bg,
            stroke: theme.legend_border,
            stroke_width: 1.0,
        };
        let label_at = |rect: ScreenRect| {
            ScreenPoint::new(
                rect.min.x + CONTROLS_PADDING,
                rect.center_y() - CONTROLS_FONT_SIZE * 0.6,
            )
        };

        render.rect(self.rect, RectStyle::filled(theme.controls_bg));

        let toggle_style = if auto_scroll.enabled {
            RectStyle {
                fill: theme.controls_active,
                ..button
            }
        } else {
            button
        };
        render.rect(self.toggle, toggle_style);
        render.text(label_at(self.toggle), toggle_label(auto_scroll), text.clone());

        for (rect, glyph) in [(self.decrease, "-"), (self.increase, "+")] {
            render.rect(rect, button);
            render.text(
                ScreenPoint::new(
                    rect.min.x + BUTTON_SIZE * 0.35,
                    rect.center_y() - CONTROLS_FONT_SIZE * 0.6,
                ),
                glyph,
                text.clone(),
            );
        }
        render.text(label_at(self.value), value_label(auto_scroll), text.clone());

        render.rect(self.unit, button);
        render.text(label_at(self.unit), auto_scroll.unit.label(), text.clone());

        render.text(label_at(self.now_label), NOW_LABEL, text);
        let track_y = self.slider.center_y();
        render.line(
            ScreenPoint::new(self.slider.min.x, track_y),
            ScreenPoint::new(self.slider.max.x, track_y),
            LineStyle {
                color: theme.axis,
                width: 2.0,
            },
        );
        let knob_x = self.slider.min.x + self.slider.width() * auto_scroll.now_fraction() as f32;
        render.rect(
            ScreenRect::from_origin_size(
                ScreenPoint::new(knob_x - SLIDER_KNOB * 0.5, track_y - SLIDER_KNOB * 0.5),
                (SLIDER_KNOB, SLIDER_KNOB),
            ),
            RectStyle::filled(theme.controls_active),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeUnit;
    use crate::render::ApproxTextMeasurer;

    fn strip() -> ScreenRect {
        ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(600.0, CONTROLS_HEIGHT))
    }

    #[test]
    fn controls_flow_left_to_right() {
        let layout = layout_controls(
            strip(),
            &AutoScrollConfig::default(),
            &ApproxTextMeasurer::default(),
        );
        let order = [
            layout.toggle,
            layout.decrease,
            layout.value,
            layout.increase,
            layout.unit,
            layout.slider,
        ];
        for pair in order.windows(2) {
            assert!(pair[1].min.x > pair[0].max.x);
        }
        assert!(order.iter().all(|rect| rect.min.y >= 0.0 && rect.max.y <= CONTROLS_HEIGHT));
    }

    #[test]
    fn clicks_map_to_actions() {
        let layout = layout_controls(
            strip(),
            &AutoScrollConfig::default(),
            &ApproxTextMeasurer::default(),
        );
        let mut targets = HitTargets::default();
        layout.register(&mut targets);
        let center =
            |rect: ScreenRect| ScreenPoint::new(rect.min.x + rect.width() * 0.5, rect.center_y());
        assert_eq!(
            targets.action_at(center(layout.toggle)),
            Some(GraphAction::ToggleAutoScroll)
        );
        assert_eq!(
            targets.action_at(center(layout.unit)),
            Some(GraphAction::CycleUnit)
        );
        assert_eq!(
            targets.action_at(center(layout.slider)),
            Some(GraphAction::SetNowPosition(50.0))
        );
    }

    #[test]
    fn actions_update_auto_scroll() {
        let mut auto = AutoScrollConfig::default();
        assert!(apply_control(&mut auto, &GraphAction::ToggleAutoScroll));
        assert!(auto.enabled);

        auto.value = 1.0;
        apply_control(&mut auto, &GraphAction::DecreaseWindow);
        assert_eq!(auto.value, MIN_WINDOW_VALUE);
        apply_control(&mut auto, &GraphAction::IncreaseWindow);
        assert_eq!(auto.value, 2.0);

        apply_control(&mut auto, &GraphAction::CycleUnit);
        assert_eq!(auto.unit, TimeUnit::Hours);

        apply_control(&mut auto, &GraphAction::SetNowPosition(140.0));
        assert_eq!(auto.now_position, 100.0);

        assert!(!apply_control(&mut auto, &GraphAction::ToggleSeries("a".to_string())));
    }
}
