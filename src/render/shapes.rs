//! Screen-space geometry for each graph type.
//!
//! Builders take the valid prefix of a series (`xs`/`ys` of equal length),
//! keep only the part that intersects the visible X range, and write into a
//! caller-owned buffer so frames can reuse allocations.

use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::render::LineSegment;
use crate::transform::Transform;

/// Build clipped polyline segments.
pub fn build_line_segments(
    xs: &[f64],
    ys: &[f64],
    transform: &Transform,
    clip: ScreenRect,
    out: &mut Vec<LineSegment>,
) {
    out.clear();
    let range = visible_span(xs, transform);
    if range.len() < 2 {
        return;
    }
    for i in range.start..range.end - 1 {
        if !finite_pair(ys, i) {
            continue;
        }
        let start = transform.data_to_screen(Point::new(xs[i], ys[i]));
        let end = transform.data_to_screen(Point::new(xs[i + 1], ys[i + 1]));
        if let Some((start, end)) = clip_segment(start, end, clip) {
            out.push(LineSegment::new(start, end));
        }
    }
}

/// Build clipped step segments: each value holds until the next sample.
pub fn build_stair_segments(
    xs: &[f64],
    ys: &[f64],
    transform: &Transform,
    clip: ScreenRect,
    out: &mut Vec<LineSegment>,
) {
    out.clear();
    let range = visible_span(xs, transform);
    if range.len() < 2 {
        return;
    }
    for i in range.start..range.end - 1 {
        if !finite_pair(ys, i) {
            continue;
        }
        let x0 = transform.x_to_screen(xs[i]);
        let x1 = transform.x_to_screen(xs[i + 1]);
        let y0 = transform.y_to_screen(ys[i]);
        let y1 = transform.y_to_screen(ys[i + 1]);
        let run = clip_segment(ScreenPoint::new(x0, y0), ScreenPoint::new(x1, y0), clip);
        let rise = clip_segment(ScreenPoint::new(x1, y0), ScreenPoint::new(x1, y1), clip);
        out.extend(run.into_iter().chain(rise).map(|(a, b)| LineSegment::new(a, b)));
    }
}

/// Build trapezoids between the polyline and `baseline_y`.
pub fn build_area_polygons(
    xs: &[f64],
    ys: &[f64],
    transform: &Transform,
    baseline_y: f32,
    out: &mut Vec<Vec<ScreenPoint>>,
) {
    out.clear();
    let range = visible_span(xs, transform);
    if range.len() < 2 {
        return;
    }
    for i in range.start..range.end - 1 {
        let x0 = transform.x_to_screen(xs[i]);
        let x1 = transform.x_to_screen(xs[i + 1]);
        if x1 <= x0 || !finite_pair(ys, i) {
            continue;
        }
        out.push(vec![
            ScreenPoint::new(x0, transform.y_to_screen(ys[i])),
            ScreenPoint::new(x1, transform.y_to_screen(ys[i + 1])),
            ScreenPoint::new(x1, baseline_y),
            ScreenPoint::new(x0, baseline_y),
        ]);
    }
}

/// Build one filled rectangle per step, from the held value down to
/// `baseline_y`.
pub fn build_stair_polygons(
    xs: &[f64],
    ys: &[f64],
    transform: &Transform,
    baseline_y: f32,
    out: &mut Vec<Vec<ScreenPoint>>,
) {
    out.clear();
    let range = visible_span(xs, transform);
    if range.len() < 2 {
        return;
    }
    for i in range.start..range.end - 1 {
        let x0 = transform.x_to_screen(xs[i]);
        let x1 = transform.x_to_screen(xs[i + 1]);
        if x1 <= x0 || !ys[i].is_finite() {
            continue;
        }
        let y = transform.y_to_screen(ys[i]);
        out.push(vec![
            ScreenPoint::new(x0, y),
            ScreenPoint::new(x1, y),
            ScreenPoint::new(x1, baseline_y),
            ScreenPoint::new(x0, baseline_y),
        ]);
    }
}

/// Build one bar per sample centered on its X value.
///
/// The bar width is `width_frac` of the smallest spacing between visible
/// samples (one data unit when there is a single sample).
pub fn build_bar_rects(
    xs: &[f64],
    ys: &[f64],
    transform: &Transform,
    baseline_y: f32,
    width_frac: f64,
    out: &mut Vec<ScreenRect>,
) {
    out.clear();
    let range = visible_span(xs, transform);
    if range.is_empty() {
        return;
    }
    let spacing = xs[range.clone()]
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .filter(|dx| *dx > 0.0)
        .fold(f64::INFINITY, f64::min);
    let spacing = if spacing.is_finite() { spacing } else { 1.0 };
    let half = spacing * width_frac.clamp(0.05, 1.0) * 0.5;
    for i in range.filter(|i| ys[*i].is_finite()) {
        let left = transform.x_to_screen(xs[i] - half);
        let right = transform.x_to_screen(xs[i] + half);
        let top = transform.y_to_screen(ys[i]);
        out.push(ScreenRect::new(
            ScreenPoint::new(left, top.min(baseline_y)),
            ScreenPoint::new(right.max(left + 1.0), top.max(baseline_y)),
        ));
    }
}

/// Index range of samples to draw, widened by one sample on each side so
/// lines entering and leaving the window stay connected.
fn visible_span(xs: &[f64], transform: &Transform) -> std::ops::Range<usize> {
    let x_range = transform.viewport().x;
    let start = xs.partition_point(|x| *x < x_range.min).saturating_sub(1);
    let end = (xs.partition_point(|x| *x <= x_range.max) + 1).min(xs.len());
    start..end.max(start)
}

fn finite_pair(ys: &[f64], i: usize) -> bool {
    ys[i].is_finite() && ys[i + 1].is_finite()
}

fn clip_segment(
    mut start: ScreenPoint,
    mut end: ScreenPoint,
    rect: ScreenRect,
) -> Option<(ScreenPoint, ScreenPoint)> {
    const LEFT: u8 = 1;
    const RIGHT: u8 = 2;
    const TOP: u8 = 4;
    const BOTTOM: u8 = 8;

    let mut out_start = region_code(start, rect);
    let mut out_end = region_code(end, rect);

    loop {
        if (out_start | out_end) == 0 {
            return Some((start, end));
        }
        if (out_start & out_end) != 0 {
            return None;
        }

        let out_code = if out_start != 0 { out_start } else { out_end };
        let (mut x, mut y) = (0.0_f32, 0.0_f32);

        if (out_code & TOP) != 0 {
            x = start.x + (end.x - start.x) * (rect.min.y - start.y) / (end.y - start.y);
            y = rect.min.y;
        } else if (out_code & BOTTOM) != 0 {
            x = start.x + (end.x - start.x) * (rect.max.y - start.y) / (end.y - start.y);
            y = rect.max.y;
        } else if (out_code & RIGHT) != 0 {
            y = start.y + (end.y - start.y) * (rect.max.x - start.x) / (end.x - start.x);
            x = rect.max.x;
        } else if (out_code & LEFT) != 0 {
            y = start.y + (end.y - start.y) * (rect.min.x - start.x) / (end.x - start.x);
            x = rect.min.x;
        }

        let new_point = ScreenPoint::new(x, y);
        if out_code == out_start {
            start = new_point;
            out_start = region_code(start, rect);
        } else {
            end = new_point;
            out_end = region_code(end, rect);
        }
    }

    fn region_code(point: ScreenPoint, rect: ScreenRect) -> u8 {
        let mut code = 0;
        if point.x < rect.min.x {
            code |= LEFT;
        } else if point.x > rect.max.x {
            code |= RIGHT;
        }
        if point.y < rect.min.y {
            code |= TOP;
        } else if point.y > rect.max.y {
            code |= BOTTOM;
        }
        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{Range, Viewport};

    fn transform() -> Transform {
        let viewport = Viewport::new(Range::new(0.0, 10.0), Range::new(0.0, 10.0));
        let rect = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(100.0, 100.0));
        Transform::new(viewport, rect).expect("valid transform")
    }

    #[test]
    fn clip_segment_inside() {
        let rect = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(10.0, 10.0));
        let start = ScreenPoint::new(2.0, 2.0);
        let end = ScreenPoint::new(8.0, 8.0);
        let clipped = clip_segment(start, end, rect).expect("segment should clip");
        assert_eq!(clipped, (start, end));
    }

    #[test]
    fn clip_segment_trims_to_edge() {
        let rect = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(10.0, 10.0));
        let (start, end) =
            clip_segment(ScreenPoint::new(-10.0, 5.0), ScreenPoint::new(5.0, 5.0), rect)
                .expect("segment crosses the rect");
        assert_eq!(start, ScreenPoint::new(0.0, 5.0));
        assert_eq!(end, ScreenPoint::new(5.0, 5.0));
    }

    #[test]
    fn lines_skip_points_outside_window() {
        let transform = transform();
        let xs = [-20.0, -10.0, 1.0, 2.0, 30.0, 40.0];
        let ys = [1.0; 6];
        let mut out = Vec::new();
        build_line_segments(&xs, &ys, &transform, transform.screen(), &mut out);
        // (-10, 1), (1, 2), (2, 30): the outer neighbours are clipped, not dropped.
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].start.x, 0.0);
        assert_eq!(out[2].end.x, 100.0);
    }

    #[test]
    fn stairs_emit_run_and_rise() {
        let transform = transform();
        let mut out = Vec::new();
        build_stair_segments(&[0.0, 5.0], &[2.0, 8.0], &transform, transform.screen(), &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].start.y, out[0].end.y);
        assert_eq!(out[1].start.x, out[1].end.x);
    }

    #[test]
    fn bars_use_smallest_spacing() {
        let transform = transform();
        let mut out = Vec::new();
        build_bar_rects(&[1.0, 2.0, 4.0], &[5.0, 6.0, 7.0], &transform, 100.0, 0.5, &mut out);
        assert_eq!(out.len(), 3);
        assert!((out[0].width() - 5.0).abs() < 1e-3);
        assert_eq!(out[0].max.y, 100.0);
        assert!((out[0].min.y - 50.0).abs() < 1e-3);
    }

    #[test]
    fn gaps_break_the_line() {
        let transform = transform();
        let mut out = Vec::new();
        build_line_segments(
            &[0.0, 1.0, 2.0, 3.0],
            &[1.0, f64::NAN, 2.0, 3.0],
            &transform,
            transform.screen(),
            &mut out,
        );
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn area_polygons_reach_baseline() {
        let transform = transform();
        let mut out = Vec::new();
        build_area_polygons(&[0.0, 5.0, 10.0], &[1.0, 2.0, 3.0], &transform, 100.0, &mut out);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|poly| poly[2].y == 100.0 && poly[3].y == 100.0));
    }
}
