//! Per-frame draw list construction.
//!
//! The frame is built in a fixed order: grid and axes, series, the
//! current-value line, value labels, hover, legend, and the controls drawer,
//! all inside a clip to the widget bounds.

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::axis::{AxisFormatter, AxisLayout};
use crate::config::{GraphConfig, GraphType, LegendPosition};
use crate::controls::{CONTROLS_HEIGHT, layout_controls};
use crate::datasource::PreparedGraphData;
use crate::error::{GraphError, GraphResult};
use crate::format::{abbreviate, format_timestamp};
use crate::geom::{Point, ScreenPoint, ScreenRect, clamp_point};
use crate::interaction::{HitTargets, HoverHit, find_hovered_series};
use crate::labels::{LabelCandidate, PlacedLabel, label_at, layout_value_labels};
use crate::legend::layout_legend;
use crate::render::{
    Color, LineSegment, LineStyle, RectStyle, RenderCommand, RenderList, TextMeasurer, TextStyle,
    build_area_polygons, build_bar_rects, build_line_segments, build_stair_polygons,
    build_stair_segments,
};
use crate::series::SeriesData;
use crate::style::Theme;
use crate::transform::Transform;
use crate::view::Viewport;
use crate::visibility::HiddenState;

const TICK_LENGTH: f32 = 4.0;
const AXIS_PADDING: f32 = 4.0;
const LABEL_GAP: f32 = 2.0;
const MIN_PLOT_SIZE: f32 = 8.0;
const X_TICK_SPACING: f32 = 100.0;
const Y_TICK_SPACING: f32 = 40.0;
const HOVER_OFFSET: f32 = 12.0;
const HOVER_MARKER_SIZE: f32 = 7.0;
const MESSAGE_FONT_SIZE: f32 = 14.0;

/// Host-supplied inputs for one frame.
#[derive(Clone, Copy)]
pub struct FrameInput<'a> {
    /// Widget bounds in window pixels.
    pub bounds: ScreenRect,
    /// Pointer position, when it is over the widget.
    pub cursor: Option<ScreenPoint>,
    /// Wall-clock "now" for this frame.
    pub now: DateTime<Utc>,
    /// Text measurer of the painting backend.
    pub measurer: &'a dyn TextMeasurer,
}

impl<'a> FrameInput<'a> {
    /// Inputs for a frame at the current time.
    pub fn new(bounds: ScreenRect, measurer: &'a dyn TextMeasurer) -> Self {
        Self {
            bounds,
            cursor: None,
            now: Utc::now(),
            measurer,
        }
    }

    /// Set the pointer position.
    pub fn with_cursor(mut self, cursor: Option<ScreenPoint>) -> Self {
        self.cursor = cursor;
        self
    }

    /// Pin "now", for deterministic hosts and tests.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

impl std::fmt::Debug for FrameInput<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameInput")
            .field("bounds", &self.bounds)
            .field("cursor", &self.cursor)
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

/// Everything the frame reads from the graph.
pub(crate) struct FrameContext<'a> {
    pub(crate) data: &'a PreparedGraphData,
    pub(crate) config: &'a GraphConfig,
    pub(crate) hidden: &'a HiddenState,
    pub(crate) x_formatter: &'a AxisFormatter,
    pub(crate) y_formatter: &'a AxisFormatter,
}

/// A built frame plus what the graph keeps for input handling.
#[derive(Debug, Default)]
pub(crate) struct BuiltFrame {
    pub(crate) render: RenderList,
    pub(crate) hover: Option<HoverHit>,
    pub(crate) targets: HitTargets,
    pub(crate) plot_rect: Option<ScreenRect>,
}

/// Screen areas of one frame.
#[derive(Debug, Clone, Copy)]
struct FrameLayout {
    controls: Option<ScreenRect>,
    legend_strip: Option<ScreenRect>,
    plot: ScreenRect,
    x_axis: ScreenRect,
    y_axis: ScreenRect,
}

pub(crate) fn build_frame(
    ctx: &FrameContext<'_>,
    input: &FrameInput<'_>,
) -> GraphResult<BuiltFrame> {
    let data = ctx.data;
    let config = ctx.config;
    let theme = &config.theme;
    let bounds = input.bounds;
    if bounds.width() < MIN_PLOT_SIZE || bounds.height() < MIN_PLOT_SIZE {
        return Err(GraphError::PlotAreaTooSmall {
            width: bounds.width(),
            height: bounds.height(),
        });
    }
    let viewport = Viewport::new(data.x_range(), data.y_range());
    if !viewport.is_valid() {
        return Err(invalid_range(viewport));
    }

    let y_layout_probe = AxisLayout::new(
        viewport.y,
        tick_target(bounds.height(), Y_TICK_SPACING),
        ctx.y_formatter,
    );
    let layout = layout_frame(ctx, input, &y_layout_probe)?;
    let plot_rect = layout.plot;
    let transform = Transform::new(viewport, plot_rect).ok_or_else(|| invalid_range(viewport))?;
    let x_layout = AxisLayout::new(
        viewport.x,
        tick_target(plot_rect.width(), X_TICK_SPACING),
        ctx.x_formatter,
    );
    let y_layout = AxisLayout::new(
        viewport.y,
        tick_target(plot_rect.height(), Y_TICK_SPACING),
        ctx.y_formatter,
    );

    let mut frame = BuiltFrame {
        plot_rect: Some(plot_rect),
        ..BuiltFrame::default()
    };
    let render = &mut frame.render;
    render.push(RenderCommand::ClipRect(bounds));
    render.rect(plot_rect, RectStyle::filled(theme.background));

    build_grid(render, &x_layout, &y_layout, &transform, theme);
    build_axes(
        render,
        &x_layout,
        &y_layout,
        &transform,
        layout,
        config,
        input.measurer,
    );

    render.push(RenderCommand::ClipRect(plot_rect));
    for series in data.series().iter().filter(|s| ctx.hidden.is_drawn(s)) {
        build_series(render, series, &transform, config);
    }
    if config.show_current_value_line {
        build_current_value_line(render, ctx, &transform);
    }
    render.push(RenderCommand::ClipEnd);

    let labels = if config.value_labels.enabled {
        let labels = value_labels(ctx, &transform, input.measurer);
        build_value_labels(render, &labels, config);
        labels
    } else {
        Vec::new()
    };

    if config.show_hover {
        if let Some(cursor) = input.cursor.filter(|c| plot_rect.contains(*c)) {
            frame.hover = build_hover(render, ctx, &transform, &labels, cursor, input.measurer);
        }
    }

    let legend_area = match config.legend.position {
        LegendPosition::Inside => Some(plot_rect),
        LegendPosition::Outside => layout.legend_strip,
        LegendPosition::Hidden => None,
    };
    if let Some(legend) = legend_area.and_then(|area| {
        layout_legend(data, ctx.hidden, config.legend.position, area, input.measurer)
    }) {
        legend.build(render, theme);
        legend.register(&mut frame.targets);
    }

    if let Some(strip) = layout.controls {
        let controls = layout_controls(strip, &config.auto_scroll, input.measurer);
        controls.build(render, &config.auto_scroll, theme);
        controls.register(&mut frame.targets);
    }

    render.push(RenderCommand::ClipEnd);
    trace!(
        commands = frame.render.commands().len(),
        hovered = frame.hover.is_some(),
        "built graph frame"
    );
    Ok(frame)
}

/// A centered message filling the whole widget.
pub(crate) fn build_message(
    bounds: ScreenRect,
    message: &str,
    color: Color,
    theme: &Theme,
    measurer: &dyn TextMeasurer,
) -> RenderList {
    let mut render = RenderList::new();
    if !bounds.is_valid() {
        return render;
    }
    render.push(RenderCommand::ClipRect(bounds));
    render.rect(bounds, RectStyle::filled(theme.background));
    let size = measurer.measure(message, MESSAGE_FONT_SIZE);
    let position = clamp_point(
        ScreenPoint::new(
            bounds.min.x + (bounds.width() - size.0) * 0.5,
            bounds.min.y + (bounds.height() - size.1) * 0.5,
        ),
        bounds,
        size,
    );
    render.text(
        position,
        message,
        TextStyle {
            color,
            size: MESSAGE_FONT_SIZE,
        },
    );
    render.push(RenderCommand::ClipEnd);
    render
}

fn invalid_range(viewport: Viewport) -> GraphError {
    GraphError::InvalidAxisRange {
        x_min: viewport.x.min,
        x_max: viewport.x.max,
        y_min: viewport.y.min,
        y_max: viewport.y.max,
    }
}

fn tick_target(length: f32, spacing: f32) -> usize {
    ((length / spacing).floor() as usize).clamp(2, 10)
}

fn layout_frame(
    ctx: &FrameContext<'_>,
    input: &FrameInput<'_>,
    y_layout: &AxisLayout,
) -> GraphResult<FrameLayout> {
    let config = ctx.config;
    let style = &config.style;
    let mut area = input.bounds;

    let controls = (config.show_controls && ctx.data.is_time_based()).then(|| {
        let strip = ScreenRect::new(
            area.min,
            ScreenPoint::new(area.max.x, area.min.y + CONTROLS_HEIGHT),
        );
        area.min.y = strip.max.y;
        strip
    });
    let legend_strip = (config.legend.position == LegendPosition::Outside).then(|| {
        let strip = ScreenRect::new(
            ScreenPoint::new(area.min.x, area.max.y - config.legend.height),
            area.max,
        );
        area.max.y = strip.min.y;
        strip
    });

    let widest_label = y_layout
        .major()
        .map(|tick| input.measurer.measure(&tick.label, style.tick_font_size).0)
        .fold(0.0_f32, f32::max);
    let y_axis_width = widest_label + TICK_LENGTH + AXIS_PADDING * 2.0;
    let x_axis_height = style.tick_font_size * 1.2 + TICK_LENGTH + AXIS_PADDING * 2.0;
    let pad = style.plot_padding.max(0.0);

    let plot = ScreenRect::new(
        ScreenPoint::new(area.min.x + y_axis_width, area.min.y + pad),
        ScreenPoint::new(area.max.x - pad, area.max.y - x_axis_height),
    );
    if plot.width() < MIN_PLOT_SIZE || plot.height() < MIN_PLOT_SIZE {
        return Err(GraphError::PlotAreaTooSmall {
            width: plot.width(),
            height: plot.height(),
        });
    }
    Ok(FrameLayout {
        controls,
        legend_strip,
        plot,
        x_axis: ScreenRect::new(
            ScreenPoint::new(plot.min.x, plot.max.y),
            ScreenPoint::new(plot.max.x, area.max.y),
        ),
        y_axis: ScreenRect::new(
            ScreenPoint::new(area.min.x, plot.min.y),
            ScreenPoint::new(plot.min.x, plot.max.y),
        ),
    })
}

fn build_grid(
    render: &mut RenderList,
    x_layout: &AxisLayout,
    y_layout: &AxisLayout,
    transform: &Transform,
    theme: &Theme,
) {
    let plot = transform.screen();
    let mut segments = Vec::new();
    for tick in x_layout.major() {
        let x = transform.x_to_screen(tick.value);
        segments.push(LineSegment::new(
            ScreenPoint::new(x, plot.min.y),
            ScreenPoint::new(x, plot.max.y),
        ));
    }
    for tick in y_layout.major() {
        let y = transform.y_to_screen(tick.value);
        segments.push(LineSegment::new(
            ScreenPoint::new(plot.min.x, y),
            ScreenPoint::new(plot.max.x, y),
        ));
    }
    if segments.is_empty() {
        return;
    }
    render.push(RenderCommand::ClipRect(plot));
    render.push(RenderCommand::LineSegments {
        segments,
        style: LineStyle {
            color: theme.grid,
            width: 1.0,
        },
    });
    render.push(RenderCommand::ClipEnd);
}

fn build_axes(
    render: &mut RenderList,
    x_layout: &AxisLayout,
    y_layout: &AxisLayout,
    transform: &Transform,
    layout: FrameLayout,
    config: &GraphConfig,
    measurer: &dyn TextMeasurer,
) {
    let theme = &config.theme;
    let font_size = config.style.tick_font_size;
    let plot = layout.plot;
    let label_style = TextStyle {
        color: theme.axis,
        size: font_size,
    };
    let mut ticks = vec![
        LineSegment::new(
            ScreenPoint::new(plot.min.x, plot.max.y),
            ScreenPoint::new(plot.max.x, plot.max.y),
        ),
        LineSegment::new(
            ScreenPoint::new(plot.min.x, plot.min.y),
            ScreenPoint::new(plot.min.x, plot.max.y),
        ),
    ];

    let mut last_x_label_right = f32::NEG_INFINITY;
    for tick in x_layout.major() {
        let x = transform.x_to_screen(tick.value);
        ticks.push(LineSegment::new(
            ScreenPoint::new(x, plot.max.y),
            ScreenPoint::new(x, plot.max.y + TICK_LENGTH),
        ));
        if tick.label.is_empty() {
            continue;
        }
        let size = measurer.measure(&tick.label, font_size);
        let pos = clamp_point(
            ScreenPoint::new(x - size.0 * 0.5, plot.max.y + TICK_LENGTH + AXIS_PADDING),
            layout.x_axis,
            size,
        );
        if pos.x >= last_x_label_right + LABEL_GAP {
            render.text(pos, tick.label.clone(), label_style.clone());
            last_x_label_right = pos.x + size.0;
        }
    }

    let mut last_y_label_top = f32::INFINITY;
    for tick in y_layout.major() {
        let y = transform.y_to_screen(tick.value);
        ticks.push(LineSegment::new(
            ScreenPoint::new(plot.min.x - TICK_LENGTH, y),
            ScreenPoint::new(plot.min.x, y),
        ));
        if tick.label.is_empty() {
            continue;
        }
        let size = measurer.measure(&tick.label, font_size);
        let pos = clamp_point(
            ScreenPoint::new(
                plot.min.x - TICK_LENGTH - AXIS_PADDING - size.0,
                y - size.1 * 0.5,
            ),
            layout.y_axis,
            size,
        );
        if pos.y + size.1 <= last_y_label_top - LABEL_GAP {
            render.text(pos, tick.label.clone(), label_style.clone());
            last_y_label_top = pos.y;
        }
    }

    render.push(RenderCommand::LineSegments {
        segments: ticks,
        style: LineStyle {
            color: theme.axis,
            width: 1.0,
        },
    });
}

fn build_series(
    render: &mut RenderList,
    series: &SeriesData,
    transform: &Transform,
    config: &GraphConfig,
) {
    let xs = series.xs();
    let ys = series.ys();
    let plot = transform.screen();
    let color = series.color();
    let fill = color.with_alpha(config.style.fill_alpha);
    let line = LineStyle {
        color,
        width: config.style.line_weight,
    };
    let baseline = transform.y_to_screen(0.0).clamp(plot.min.y, plot.max.y);

    let mut segments = Vec::new();
    let mut polygons = Vec::new();
    match config.graph_type {
        GraphType::Line => build_line_segments(xs, ys, transform, plot, &mut segments),
        GraphType::Area => {
            build_area_polygons(xs, ys, transform, baseline, &mut polygons);
            build_line_segments(xs, ys, transform, plot, &mut segments);
        }
        GraphType::Stairs => build_stair_segments(xs, ys, transform, plot, &mut segments),
        GraphType::StairsArea => {
            build_stair_polygons(xs, ys, transform, baseline, &mut polygons);
            build_stair_segments(xs, ys, transform, plot, &mut segments);
        }
        GraphType::Bars => {
            let mut rects = Vec::new();
            build_bar_rects(
                xs,
                ys,
                transform,
                baseline,
                config.style.bar_width_frac,
                &mut rects,
            );
            for rect in rects {
                render.rect(
                    rect,
                    RectStyle {
                        fill,
                        stroke: color,
                        stroke_width: 1.0,
                    },
                );
            }
        }
    }
    if !polygons.is_empty() {
        render.push(RenderCommand::Polygons {
            polygons,
            color: fill,
        });
    }
    if !segments.is_empty() {
        render.push(RenderCommand::LineSegments {
            segments,
            style: line,
        });
    }
}

/// The index series, or the first drawn series in time mode.
fn primary_series<'a>(ctx: &FrameContext<'a>) -> Option<&'a SeriesData> {
    ctx.data
        .series()
        .iter()
        .find(|series| ctx.hidden.is_drawn(series))
}

fn build_current_value_line(
    render: &mut RenderList,
    ctx: &FrameContext<'_>,
    transform: &Transform,
) {
    let Some((_, value)) = primary_series(ctx).and_then(SeriesData::last_point) else {
        return;
    };
    if !value.is_finite() {
        return;
    }
    let plot = transform.screen();
    let y = transform.y_to_screen(value);
    render.line(
        ScreenPoint::new(plot.min.x, y),
        ScreenPoint::new(plot.max.x, y),
        LineStyle {
            color: ctx.config.theme.crosshair.with_alpha(0.6),
            width: 1.0,
        },
    );
}

fn value_labels(
    ctx: &FrameContext<'_>,
    transform: &Transform,
    measurer: &dyn TextMeasurer,
) -> Vec<PlacedLabel> {
    let config = &ctx.config.value_labels;
    let plot = transform.screen();
    let candidates = ctx
        .data
        .series()
        .iter()
        .enumerate()
        .filter(|(_, series)| ctx.hidden.is_drawn(series))
        .filter_map(|(series_index, series)| {
            let (x, value) = series.last_point()?;
            if !value.is_finite() {
                return None;
            }
            let anchor = transform.data_to_screen(Point::new(x, value));
            let anchor = ScreenPoint::new(
                anchor.x.clamp(plot.min.x, plot.max.x),
                anchor.y.clamp(plot.min.y, plot.max.y),
            );
            let text = abbreviate(value);
            let text_size = measurer.measure(&text, config.font_size);
            Some(LabelCandidate {
                series_index,
                text,
                value,
                anchor,
                color: series.color(),
                text_size,
            })
        })
        .collect();
    layout_value_labels(candidates, plot, config)
}

fn build_value_labels(render: &mut RenderList, labels: &[PlacedLabel], config: &GraphConfig) {
    let pad = config.value_labels.padding;
    for label in labels {
        if label.displaced {
            render.line(
                label.anchor,
                ScreenPoint::new(label.rect.min.x, label.rect.center_y()),
                LineStyle {
                    color: label.color.with_alpha(0.7),
                    width: 1.0,
                },
            );
        }
        render.rect(label.rect, RectStyle::filled(label.color));
        render.text(
            ScreenPoint::new(label.rect.min.x + pad, label.rect.min.y + pad),
            label.text.clone(),
            TextStyle {
                color: config.theme.background,
                size: config.value_labels.font_size,
            },
        );
    }
}

fn build_hover(
    render: &mut RenderList,
    ctx: &FrameContext<'_>,
    transform: &Transform,
    labels: &[PlacedLabel],
    cursor: ScreenPoint,
    measurer: &dyn TextMeasurer,
) -> Option<HoverHit> {
    let config = ctx.config;
    let theme = &config.theme;
    let plot = transform.screen();

    if let Some(label) = label_at(labels, cursor) {
        let series = &ctx.data.series()[label.series_index];
        let (x, value) = series.last_point()?;
        render.rect(
            label.rect,
            RectStyle {
                fill: Color::TRANSPARENT,
                stroke: theme.hover_border,
                stroke_width: 1.5,
            },
        );
        push_tooltip(render, ctx, series.name(), x, value, cursor, plot, measurer);
        return Some(HoverHit {
            series_index: label.series_index,
            x,
            value,
        });
    }

    let hit = find_hovered_series(
        ctx.data.series(),
        |series| ctx.hidden.is_drawn(series),
        cursor,
        transform,
        config.graph_type,
        config.style.line_weight,
    )?;
    let series = &ctx.data.series()[hit.series_index];
    let point = ScreenPoint::new(cursor.x, transform.y_to_screen(hit.value));
    let crosshair = LineStyle {
        color: theme.crosshair,
        width: 1.0,
    };
    render.line(
        ScreenPoint::new(point.x, plot.min.y),
        ScreenPoint::new(point.x, plot.max.y),
        crosshair,
    );
    render.line(
        ScreenPoint::new(plot.min.x, point.y),
        ScreenPoint::new(plot.max.x, point.y),
        crosshair,
    );
    render.push(RenderCommand::Points {
        points: vec![point],
        size: HOVER_MARKER_SIZE,
        color: series.color(),
    });
    push_tooltip(render, ctx, series.name(), hit.x, hit.value, cursor, plot, measurer);
    Some(hit)
}

#[allow(clippy::too_many_arguments)]
fn push_tooltip(
    render: &mut RenderList,
    ctx: &FrameContext<'_>,
    name: &str,
    x: f64,
    value: f64,
    cursor: ScreenPoint,
    plot: ScreenRect,
    measurer: &dyn TextMeasurer,
) {
    let theme = &ctx.config.theme;
    let font_size = ctx.config.style.tooltip_font_size;
    let mut label = format!("{name}\n{}", abbreviate(value));
    if ctx.data.is_time_based() {
        label.push('\n');
        label.push_str(&format_timestamp(ctx.data.start_time(), x));
    }

    let size = measurer.measure_multiline(&label, font_size);
    let mut origin = ScreenPoint::new(cursor.x + HOVER_OFFSET, cursor.y + HOVER_OFFSET);
    if origin.x + size.0 > plot.max.x {
        origin.x = cursor.x - size.0 - HOVER_OFFSET;
    }
    if origin.y + size.1 > plot.max.y {
        origin.y = cursor.y - size.1 - HOVER_OFFSET;
    }
    origin = clamp_point(origin, plot, size);

    render.rect(
        ScreenRect::from_origin_size(origin, size),
        RectStyle {
            fill: theme.hover_bg,
            stroke: theme.hover_border,
            stroke_width: 1.0,
        },
    );
    let line_height = font_size * 1.2;
    for (index, line) in label.lines().enumerate() {
        render.text(
            ScreenPoint::new(origin.x + 4.0, origin.y + 4.0 + index as f32 * line_height),
            line,
            TextStyle {
                color: theme.text,
                size: font_size,
            },
        );
    }
}
