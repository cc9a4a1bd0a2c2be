// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Planar geometry helpers for keypoint analysis.

use serde::{Deserialize, Serialize};

/// Angle returned by [`get_angle`] when either ray has zero length.
pub const DEGENERATE_ANGLE: f32 = 0.0;

/// A 2-D point in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// The image origin, also used as the legacy "absent keypoint" sentinel.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Check whether this point is the `(0, 0)` absence sentinel.
    #[must_use]
    pub fn is_origin(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl From<[f32; 2]> for Point {
    fn from(p: [f32; 2]) -> Self {
        Self::new(p[0], p[1])
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// Calculate the interior angle at vertex `b` formed by the rays `b→a` and `b→c`.
///
/// # Arguments
///
/// * `a` - Endpoint of the first ray
/// * `b` - Vertex
/// * `c` - Endpoint of the second ray
///
/// # Returns
///
/// Angle in degrees within `[0, 180]`, or [`DEGENERATE_ANGLE`] when `a` or `c`
/// coincides with `b`.
#[must_use]
pub fn get_angle(a: Point, b: Point, c: Point) -> f32 {
    let (v1x, v1y) = (f64::from(a.x - b.x), f64::from(a.y - b.y));
    let (v2x, v2y) = (f64::from(c.x - b.x), f64::from(c.y - b.y));

    let norm = v1x.hypot(v1y) * v2x.hypot(v2y);
    if norm <= f64::EPSILON || !norm.is_finite() {
        return DEGENERATE_ANGLE;
    }

    // Clamped so rounding never pushes acos out of its domain
    let cos = (v1x.mul_add(v2x, v1y * v2y) / norm).clamp(-1.0, 1.0);
    #[allow(clippy::cast_possible_truncation)]
    let angle = cos.acos().to_degrees() as f32;
    angle
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-3;

    #[test]
    fn test_straight_line() {
        let angle = get_angle(Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 2.0));
        assert!((angle - 180.0).abs() < TOL);
    }

    #[test]
    fn test_right_angle() {
        let angle = get_angle(Point::new(10.0, 0.0), Point::new(0.0, 0.0), Point::new(0.0, 5.0));
        assert!((angle - 90.0).abs() < TOL);
    }

    #[test]
    fn test_coincident_rays() {
        let angle = get_angle(Point::new(3.0, 4.0), Point::new(0.0, 0.0), Point::new(6.0, 8.0));
        assert!(angle.abs() < TOL);
    }

    #[test]
    fn test_symmetry() {
        let a = Point::new(12.0, -3.0);
        let b = Point::new(1.5, 2.0);
        let c = Point::new(-4.0, 9.0);
        assert!((get_angle(a, b, c) - get_angle(c, b, a)).abs() < TOL);
    }

    #[test]
    fn test_range() {
        let b = Point::new(0.0, 0.0);
        for i in 0..36 {
            let theta = (i as f32 * 10.0).to_radians();
            let c = Point::new(theta.cos() * 50.0, theta.sin() * 50.0);
            let angle = get_angle(Point::new(50.0, 0.0), b, c);
            assert!((0.0..=180.0).contains(&angle), "angle {angle} out of range");
        }
    }

    #[test]
    fn test_degenerate_returns_sentinel() {
        let p = Point::new(5.0, 5.0);
        assert!((get_angle(p, p, Point::new(1.0, 2.0)) - DEGENERATE_ANGLE).abs() < f32::EPSILON);
        assert!((get_angle(Point::new(1.0, 2.0), p, p) - DEGENERATE_ANGLE).abs() < f32::EPSILON);
        assert!(
            (get_angle(Point::ORIGIN, Point::ORIGIN, Point::ORIGIN) - DEGENERATE_ANGLE).abs()
                < f32::EPSILON
        );
    }

    #[test]
    fn test_origin_sentinel() {
        assert!(Point::ORIGIN.is_origin());
        assert!(!Point::new(0.0, 1.0).is_origin());
        assert_eq!(Point::from([3.0, 4.0]), Point::new(3.0, 4.0));
    }
}
