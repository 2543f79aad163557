//! Coordinate transforms between data and screen space.

use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::view::Viewport;

const MIN_SPAN: f64 = 1e-12;

/// Linear transform from data coordinates into screen coordinates.
#[derive(Debug, Clone)]
pub struct Transform {
    viewport: Viewport,
    screen: ScreenRect,
}

impl Transform {
    /// Create a transform for the given viewport and screen rectangle.
    ///
    /// Returns `None` when the screen rectangle has no area or the viewport is
    /// not finite.
    pub fn new(viewport: Viewport, screen: ScreenRect) -> Option<Self> {
        if !screen.is_valid() || !viewport.x.is_finite() || !viewport.y.is_finite() {
            return None;
        }
        let viewport = Viewport::new(
            viewport.x.with_min_span(MIN_SPAN),
            viewport.y.with_min_span(MIN_SPAN),
        );
        Some(Self { viewport, screen })
    }

    /// Access the viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Access the screen rectangle.
    pub fn screen(&self) -> ScreenRect {
        self.screen
    }

    /// Map a data point into screen space.
    pub fn data_to_screen(&self, point: Point) -> ScreenPoint {
        ScreenPoint::new(self.x_to_screen(point.x), self.y_to_screen(point.y))
    }

    /// Map a data X value into a screen X coordinate.
    pub fn x_to_screen(&self, x: f64) -> f32 {
        let x_norm = self.viewport.x.fraction_of(x);
        (self.screen.min.x as f64 + x_norm * self.screen.width() as f64) as f32
    }

    /// Map a data Y value into a screen Y coordinate.
    pub fn y_to_screen(&self, y: f64) -> f32 {
        let y_norm = self.viewport.y.fraction_of(y);
        (self.screen.max.y as f64 - y_norm * self.screen.height() as f64) as f32
    }

    /// Map a screen point into data space.
    pub fn screen_to_data(&self, point: ScreenPoint) -> Point {
        let x_norm = (point.x as f64 - self.screen.min.x as f64) / self.screen.width() as f64;
        let y_norm = (self.screen.max.y as f64 - point.y as f64) / self.screen.height() as f64;
        Point::new(
            self.viewport.x.min + x_norm * self.viewport.x.span(),
            self.viewport.y.min + y_norm * self.viewport.y.span(),
        )
    }

    /// Data units covered by one vertical pixel.
    pub fn y_units_per_pixel(&self) -> f64 {
        self.viewport.y.span() / self.screen.height() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Range;

    #[test]
    fn linear_roundtrip() {
        let viewport = Viewport::new(Range::new(0.0, 10.0), Range::new(0.0, 10.0));
        let screen = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(100.0, 100.0));
        let transform = Transform::new(viewport, screen).expect("valid transform");
        let point = Point::new(5.0, 7.5);
        let roundtrip = transform.screen_to_data(transform.data_to_screen(point));
        assert!((roundtrip.x - point.x).abs() < 1e-6);
        assert!((roundtrip.y - point.y).abs() < 1e-6);
    }

    #[test]
    fn y_axis_points_down_on_screen() {
        let viewport = Viewport::new(Range::new(0.0, 1.0), Range::new(0.0, 50.0));
        let screen = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(10.0, 100.0));
        let transform = Transform::new(viewport, screen).expect("valid transform");
        assert_eq!(transform.y_to_screen(50.0), 0.0);
        assert_eq!(transform.y_to_screen(0.0), 100.0);
        assert!((transform.y_units_per_pixel() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn rejects_empty_screen() {
        let viewport = Viewport::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0));
        let screen = ScreenRect::new(ScreenPoint::new(5.0, 5.0), ScreenPoint::new(5.0, 20.0));
        assert!(Transform::new(viewport, screen).is_none());
    }
}
