//! Legend layout, hit regions, and drawing.
//!
//! Groups are listed before series. Each row has a toggle ring, a color
//! swatch, and the name; clicking a row hides or shows its target.

use crate::config::LegendPosition;
use crate::datasource::PreparedGraphData;
use crate::geom::{ScreenPoint, ScreenRect, clamp_point};
use crate::interaction::{GraphAction, HitTargets};
use crate::render::{
    Color, LineStyle, RectStyle, RenderCommand, RenderList, TextMeasurer, TextStyle,
};
use crate::style::Theme;
use crate::visibility::HiddenState;

const LEGEND_FONT_SIZE: f32 = 12.0;
const LEGEND_LINE_HEIGHT: f32 = 18.0;
const LEGEND_PADDING: f32 = 6.0;
const LEGEND_TOGGLE_DIAMETER: f32 = 10.0;
const LEGEND_TOGGLE_INNER_DIAMETER: f32 = 6.0;
const LEGEND_TOGGLE_GAP: f32 = 6.0;
const LEGEND_SWATCH_WIDTH: f32 = 16.0;
const LEGEND_SWATCH_GAP: f32 = 6.0;
const LEGEND_ENTRY_GAP: f32 = 14.0;
const LEGEND_HIDDEN_ALPHA: f32 = 0.35;
const LEGEND_TEXT_HIDDEN_ALPHA: f32 = 0.5;

/// One clickable legend row.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    /// Group or series name.
    pub label: String,
    /// Swatch color.
    pub color: Color,
    /// Whether the entry is currently hidden.
    pub hidden: bool,
    /// Click target.
    pub rect: ScreenRect,
    /// What clicking the entry does.
    pub action: GraphAction,
}

/// Legend box and its entries.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendLayout {
    /// Background box.
    pub rect: ScreenRect,
    /// Rows in draw order.
    pub entries: Vec<LegendEntry>,
}

struct Item {
    label: String,
    color: Color,
    hidden: bool,
    action: GraphAction,
    width: f32,
}

/// Lay out the legend.
///
/// `Inside` stacks rows in a box at the top right of `area` (the plot).
/// `Outside` flows entries left to right across `area` (the strip reserved
/// under the plot), wrapping to new rows. Returns `None` when hidden or
/// there is nothing to list.
pub fn layout_legend(
    data: &PreparedGraphData,
    hidden: &HiddenState,
    position: LegendPosition,
    area: ScreenRect,
    measurer: &dyn TextMeasurer,
) -> Option<LegendLayout> {
    if position == LegendPosition::Hidden || !area.is_valid() {
        return None;
    }
    let text_start =
        LEGEND_TOGGLE_DIAMETER + LEGEND_TOGGLE_GAP + LEGEND_SWATCH_WIDTH + LEGEND_SWATCH_GAP;
    let item = |label: &str, color, hidden: bool, action| Item {
        label: label.to_string(),
        color,
        hidden,
        action,
        width: text_start + measurer.measure(label, LEGEND_FONT_SIZE).0,
    };

    let mut items: Vec<Item> = data
        .groups()
        .iter()
        .map(|group| {
            item(
                &group.name,
                group.color,
                hidden.is_group_hidden(&group.name),
                GraphAction::ToggleGroup(group.name.clone()),
            )
        })
        .collect();
    items.extend(data.series().iter().map(|series| {
        item(
            series.name(),
            series.color(),
            hidden.hides(series) || !series.is_visible(),
            GraphAction::ToggleSeries(series.name().to_string()),
        )
    }));
    if items.is_empty() {
        return None;
    }

    match position {
        LegendPosition::Inside => Some(stacked(items, area)),
        LegendPosition::Outside => Some(flowed(items, area)),
        LegendPosition::Hidden => None,
    }
}

fn stacked(items: Vec<Item>, plot: ScreenRect) -> LegendLayout {
    let widest = items.iter().map(|item| item.width).fold(0.0_f32, f32::max);
    let width = widest + LEGEND_PADDING * 2.0;
    let height = items.len() as f32 * LEGEND_LINE_HEIGHT + LEGEND_PADDING * 2.0;
    let origin = clamp_point(
        ScreenPoint::new(
            plot.max.x - width - LEGEND_PADDING,
            plot.min.y + LEGEND_PADDING,
        ),
        plot,
        (width, height),
    );
    let entries = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let row_y = origin.y + LEGEND_PADDING + index as f32 * LEGEND_LINE_HEIGHT;
            entry(
                item,
                ScreenRect::new(
                    ScreenPoint::new(origin.x, row_y),
                    ScreenPoint::new(origin.x + width, row_y + LEGEND_LINE_HEIGHT),
                ),
            )
        })
        .collect();
    LegendLayout {
        rect: ScreenRect::from_origin_size(origin, (width, height)),
        entries,
    }
}

fn flowed(items: Vec<Item>, strip: ScreenRect) -> LegendLayout {
    let mut entries = Vec::with_capacity(items.len());
    let mut x = strip.min.x + LEGEND_PADDING;
    let mut y = strip.min.y + LEGEND_PADDING;
    for item in items {
        let width = item.width + LEGEND_PADDING;
        if x + width > strip.max.x && x > strip.min.x + LEGEND_PADDING {
            x = strip.min.x + LEGEND_PADDING;
            y += LEGEND_LINE_HEIGHT;
        }
        if y + LEGEND_LINE_HEIGHT > strip.max.y {
            break;
        }
        let rect = ScreenRect::from_origin_size(
            ScreenPoint::new(x - LEGEND_PADDING * 0.5, y),
            (width, LEGEND_LINE_HEIGHT),
        );
        entries.push(entry(item, rect));
        x += width + LEGEND_ENTRY_GAP;
    }
    LegendLayout {
        rect: strip,
        entries,
    }
}

fn entry(item: Item, rect: ScreenRect) -> LegendEntry {
    LegendEntry {
        label: item.label,
        color: item.color,
        hidden: item.hidden,
        rect,
        action: item.action,
    }
}

impl LegendLayout {
    /// Register every row as a click target.
    pub(crate) fn register(&self, targets: &mut HitTargets) {
        for entry in &self.entries {
            targets.push(entry.rect, entry.action.clone());
        }
    }

    /// Draw the legend.
    pub(crate) fn build(&self, render: &mut RenderList, theme: &Theme) {
        render.rect(
            self.rect,
            RectStyle {
                fill: theme.legend_bg,
                stroke: theme.legend_border,
                stroke_width: 1.0,
            },
        );
        for entry in &self.entries {
            let center_y = entry.rect.center_y();
            let toggle_center = ScreenPoint::new(
                entry.rect.min.x + LEGEND_PADDING + LEGEND_TOGGLE_DIAMETER * 0.5,
                center_y,
            );
            let (swatch, text_color, ring, fill) = if entry.hidden {
                (
                    entry.color.with_alpha(LEGEND_HIDDEN_ALPHA),
                    theme.text.with_alpha(LEGEND_TEXT_HIDDEN_ALPHA),
                    theme.text.with_alpha(0.45),
                    theme.legend_bg,
                )
            } else {
                (entry.color, theme.text, theme.text.with_alpha(0.7), entry.color)
            };

            render.push(RenderCommand::Points {
                points: vec![toggle_center],
                size: LEGEND_TOGGLE_DIAMETER,
                color: ring,
            });
            render.push(RenderCommand::Points {
                points: vec![toggle_center],
                size: LEGEND_TOGGLE_INNER_DIAMETER,
                color: fill,
            });

            let swatch_start = ScreenPoint::new(
                toggle_center.x + LEGEND_TOGGLE_DIAMETER * 0.5 + LEGEND_TOGGLE_GAP,
                center_y,
            );
            let swatch_end = ScreenPoint::new(swatch_start.x + LEGEND_SWATCH_WIDTH, center_y);
            render.line(
                swatch_start,
                swatch_end,
                LineStyle {
                    color: swatch,
                    width: 2.0,
                },
            );
            render.text(
                ScreenPoint::new(
                    swatch_end.x + LEGEND_SWATCH_GAP,
                    entry.rect.min.y + (LEGEND_LINE_HEIGHT - LEGEND_FONT_SIZE * 1.2) * 0.5,
                ),
                entry.label.clone(),
                TextStyle {
                    color: text_color,
                    size: LEGEND_FONT_SIZE,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::{BufferPool, prepare_time_series};
    use crate::render::{ApproxTextMeasurer, Color};
    use crate::series::{SeriesGroup, SeriesSample, TimeSeries};
    use chrono::{TimeZone, Utc};

    fn data() -> PreparedGraphData {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let sample = vec![SeriesSample::new(now, 1.0)];
        let series = vec![
            TimeSeries::new("alpha", sample.clone()),
            TimeSeries::new("beta", sample),
        ];
        let groups = vec![SeriesGroup::new("both", Color::WHITE, ["alpha", "beta"])];
        prepare_time_series(&series, &groups, now, &mut BufferPool::new()).unwrap()
    }

    fn plot() -> ScreenRect {
        ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(400.0, 300.0))
    }

    #[test]
    fn groups_come_first_and_rows_stack_inside() {
        let layout = layout_legend(
            &data(),
            &HiddenState::new(),
            LegendPosition::Inside,
            plot(),
            &ApproxTextMeasurer::default(),
        )
        .expect("legend");
        let labels: Vec<&str> = layout.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["both", "alpha", "beta"]);
        assert_eq!(layout.entries[0].action, GraphAction::ToggleGroup("both".to_string()));
        assert!(layout.rect.max.x <= 400.0);
        assert!(layout.entries[1].rect.min.y >= layout.entries[0].rect.max.y);
    }

    #[test]
    fn hidden_group_marks_members_hidden() {
        let mut hidden = HiddenState::new();
        hidden.toggle_group("both");
        let layout = layout_legend(
            &data(),
            &hidden,
            LegendPosition::Inside,
            plot(),
            &ApproxTextMeasurer::default(),
        )
        .expect("legend");
        assert!(layout.entries.iter().all(|entry| entry.hidden));
    }

    #[test]
    fn outside_legend_flows_in_strip() {
        let strip = ScreenRect::new(ScreenPoint::new(0.0, 300.0), ScreenPoint::new(400.0, 348.0));
        let layout = layout_legend(
            &data(),
            &HiddenState::new(),
            LegendPosition::Outside,
            strip,
            &ApproxTextMeasurer::default(),
        )
        .expect("legend");
        assert_eq!(layout.entries.len(), 3);
        assert!(layout.entries.iter().all(|e| e.rect.min.y == layout.entries[0].rect.min.y));
        assert!(layout.entries[1].rect.min.x > layout.entries[0].rect.max.x);

        let mut targets = HitTargets::default();
        layout.register(&mut targets);
        let beta = layout.entries[2].rect;
        let center = ScreenPoint::new(beta.min.x + 2.0, beta.center_y());
        assert_eq!(
            targets.action_at(center),
            Some(GraphAction::ToggleSeries("beta".to_string()))
        );
    }

    #[test]
    fn hidden_position_has_no_layout() {
        assert!(layout_legend(
            &data(),
            &HiddenState::new(),
            LegendPosition::Hidden,
            plot(),
            &ApproxTextMeasurer::default(),
        )
        .is_none());
    }
}
