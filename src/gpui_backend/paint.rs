use gpui::{
    App, BorderStyle, Bounds, ContentMask, Corners, Edges, PathBuilder, Pixels, TextRun, Window,
    font, point, px, quad,
};
use tracing::warn;

use crate::error::GraphError;
use crate::geom::{ScreenPoint, ScreenRect};
use crate::render::{Color, LineSegment, LineStyle, RectStyle, RenderCommand, RenderList, TextStyle};

/// Paint a render list. Clip commands nest; each draw call uses the
/// innermost active clip.
pub(crate) fn paint_render(render: &RenderList, window: &mut Window, cx: &mut App) {
    let mut clip_stack: Vec<ContentMask<Pixels>> = Vec::new();
    for command in render.commands() {
        match command {
            RenderCommand::ClipRect(rect) => {
                clip_stack.push(ContentMask {
                    bounds: to_bounds(*rect),
                });
            }
            RenderCommand::ClipEnd => {
                clip_stack.pop();
            }
            RenderCommand::LineSegments { segments, style } => {
                with_clip(window, &clip_stack, |window| {
                    paint_lines(window, segments, *style);
                });
            }
            RenderCommand::Polygons { polygons, color } => {
                with_clip(window, &clip_stack, |window| {
                    paint_polygons(window, polygons, *color);
                });
            }
            RenderCommand::Points {
                points,
                size,
                color,
            } => {
                with_clip(window, &clip_stack, |window| {
                    paint_points(window, points, *size, *color);
                });
            }
            RenderCommand::Rect { rect, style } => {
                with_clip(window, &clip_stack, |window| {
                    paint_rect(window, *rect, *style);
                });
            }
            RenderCommand::Text {
                position,
                text,
                style,
            } => {
                with_clip(window, &clip_stack, |window| {
                    paint_text(window, cx, *position, text, style);
                });
            }
        }
    }
}

fn paint_lines(window: &mut Window, segments: &[LineSegment], style: LineStyle) {
    if segments.is_empty() {
        return;
    }
    let width = style.width.max(0.5);
    let mut builder = PathBuilder::stroke(px(width));
    for segment in segments {
        builder.move_to(point(px(segment.start.x), px(segment.start.y)));
        builder.line_to(point(px(segment.end.x), px(segment.end.y)));
    }
    match builder.build() {
        Ok(path) => window.paint_path(path, to_rgba(style.color)),
        Err(err) => backend_failure("line path", err),
    }
}

fn paint_polygons(window: &mut Window, polygons: &[Vec<ScreenPoint>], color: Color) {
    for polygon in polygons.iter().filter(|polygon| polygon.len() >= 3) {
        let mut builder = PathBuilder::fill();
        builder.move_to(point(px(polygon[0].x), px(polygon[0].y)));
        for vertex in &polygon[1..] {
            builder.line_to(point(px(vertex.x), px(vertex.y)));
        }
        builder.close();
        match builder.build() {
            Ok(path) => window.paint_path(path, to_rgba(color)),
            Err(err) => backend_failure("fill path", err),
        }
    }
}

fn paint_points(window: &mut Window, points: &[ScreenPoint], size: f32, color: Color) {
    let radius = size.max(2.0) * 0.5;
    for pt in points {
        let bounds = Bounds::from_corners(
            point(px(pt.x - radius), px(pt.y - radius)),
            point(px(pt.x + radius), px(pt.y + radius)),
        );
        window.paint_quad(quad(
            bounds,
            Corners::all(px(radius)),
            to_rgba(color),
            Edges::all(px(0.0)),
            to_rgba(color),
            BorderStyle::default(),
        ));
    }
}

fn paint_rect(window: &mut Window, rect: ScreenRect, style: RectStyle) {
    window.paint_quad(quad(
        to_bounds(rect),
        Corners::all(px(0.0)),
        to_rgba(style.fill),
        Edges::all(px(style.stroke_width)),
        to_rgba(style.stroke),
        BorderStyle::default(),
    ));
}

fn paint_text(
    window: &mut Window,
    cx: &mut App,
    position: ScreenPoint,
    text: &str,
    style: &TextStyle,
) {
    if text.is_empty() {
        return;
    }
    let run = TextRun {
        len: text.len(),
        font: font(".SystemUIFont"),
        color: to_hsla(style.color),
        background_color: None,
        underline: None,
        strikethrough: None,
    };
    let shaped = window
        .text_system()
        .shape_line(text.to_string().into(), px(style.size), &[run], None);
    let line_height = shaped.ascent + shaped.descent;
    if let Err(err) = shaped.paint(point(px(position.x), px(position.y)), line_height, window, cx) {
        backend_failure("text", err);
    }
}

fn backend_failure(what: &str, err: impl std::fmt::Display) {
    let err = GraphError::Backend(format!("{what}: {err}"));
    warn!(error = %err, "graph paint call skipped");
}

fn to_rgba(color: Color) -> gpui::Rgba {
    gpui::Rgba {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

pub(crate) fn to_hsla(color: Color) -> gpui::Hsla {
    gpui::Hsla::from(to_rgba(color))
}

fn to_bounds(rect: ScreenRect) -> Bounds<Pixels> {
    Bounds::from_corners(
        point(px(rect.min.x), px(rect.min.y)),
        point(px(rect.max.x), px(rect.max.y)),
    )
}

fn with_clip(window: &mut Window, stack: &[ContentMask<Pixels>], f: impl FnOnce(&mut Window)) {
    if let Some(mask) = stack.last() {
        window.with_content_mask(Some(mask.clone()), f);
    } else {
        f(window);
    }
}
