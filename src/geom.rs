//! Geometric primitives used by the graph pipeline.
//!
//! [`Point`] lives in data space (seconds or sample index on X, value on Y).
//! [`ScreenPoint`] and [`ScreenRect`] live in logical pixels with Y growing
//! downwards, which is what every render backend expects.

/// A point in data space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X value in data coordinates.
    pub x: f64,
    /// Y value in data coordinates.
    pub y: f64,
}

impl Point {
    /// Create a new data point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in screen space (pixel coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// X value in screen pixels.
    pub x: f32,
    /// Y value in screen pixels.
    pub y: f32,
}

impl ScreenPoint {
    /// Create a new screen point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle in screen space (pixel coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    /// Top-left corner.
    pub min: ScreenPoint,
    /// Bottom-right corner.
    pub max: ScreenPoint,
}

impl ScreenRect {
    /// Create a new screen rectangle from corners.
    pub fn new(min: ScreenPoint, max: ScreenPoint) -> Self {
        Self { min, max }
    }

    /// Create a rectangle from its top-left corner and a `(width, height)` size.
    pub fn from_origin_size(origin: ScreenPoint, size: (f32, f32)) -> Self {
        Self {
            min: origin,
            max: ScreenPoint::new(origin.x + size.0, origin.y + size.1),
        }
    }

    /// Rectangle width in pixels.
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Rectangle height in pixels.
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Vertical center in pixels.
    pub fn center_y(&self) -> f32 {
        (self.min.y + self.max.y) * 0.5
    }

    /// Check whether the rectangle has positive area.
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Check whether the point lies inside the rectangle (edges included).
    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Check whether two rectangles overlap with positive area.
    pub fn intersects(&self, other: &ScreenRect) -> bool {
        !(self.max.x <= other.min.x
            || self.min.x >= other.max.x
            || self.max.y <= other.min.y
            || self.min.y >= other.max.y)
    }
}

/// Move a box of `size` at `point` so that it stays inside `rect`.
pub(crate) fn clamp_point(point: ScreenPoint, rect: ScreenRect, size: (f32, f32)) -> ScreenPoint {
    let max_x = (rect.max.x - size.0).max(rect.min.x);
    let max_y = (rect.max.y - size.1).max(rect.min.y);
    ScreenPoint::new(point.x.clamp(rect.min.x, max_x), point.y.clamp(rect.min.y, max_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_box_inside() {
        let rect = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(100.0, 50.0));
        let clamped = clamp_point(ScreenPoint::new(95.0, -4.0), rect, (20.0, 10.0));
        assert_eq!(clamped, ScreenPoint::new(80.0, 0.0));
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = ScreenRect::from_origin_size(ScreenPoint::new(0.0, 0.0), (10.0, 10.0));
        let b = ScreenRect::from_origin_size(ScreenPoint::new(10.0, 0.0), (10.0, 10.0));
        let c = ScreenRect::from_origin_size(ScreenPoint::new(5.0, 5.0), (10.0, 10.0));
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(a.contains(ScreenPoint::new(10.0, 10.0)));
    }
}
