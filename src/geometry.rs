//! Geometry primitives
//!
//! Small 2D helpers shared by every feature computation: Euclidean distance,
//! centroid of a point sequence, and min/max projection along an axis.
//! Callers are responsible for rejecting empty sequences before use; the
//! extractor's minimum-point-count guards do exactly that.

use crate::types::Point;

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Mean of a point sequence.
///
/// Returns the origin for an empty slice; callers guard against empty
/// regions before invoking any geometry.
pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::new(0.0, 0.0);
    }
    let n = points.len() as f64;
    let sum_x: f64 = points.iter().map(|p| p.x).sum();
    let sum_y: f64 = points.iter().map(|p| p.y).sum();
    Point::new(sum_x / n, sum_y / n)
}

/// Axis selector for projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Point {
    fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

/// Point with the minimum projection along the given axis.
pub fn min_along(points: &[Point], axis: Axis) -> Option<Point> {
    points
        .iter()
        .copied()
        .min_by(|a, b| a.along(axis).total_cmp(&b.along(axis)))
}

/// Point with the maximum projection along the given axis.
pub fn max_along(points: &[Point], axis: Axis) -> Option<Point> {
    points
        .iter()
        .copied()
        .max_by(|a, b| a.along(axis).total_cmp(&b.along(axis)))
}

/// Midpoint of two points.
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((distance(a, b) - 5.0).abs() < 1e-12);
        assert_eq!(distance(a, a), 0.0);
    }

    #[test]
    fn test_centroid() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(0.0, 2.0),
        ];
        let c = centroid(&points);
        assert!((c.x - 1.0).abs() < 1e-12);
        assert!((c.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_centroid_empty_is_origin() {
        let c = centroid(&[]);
        assert_eq!(c.x, 0.0);
        assert_eq!(c.y, 0.0);
    }

    #[test]
    fn test_projections() {
        let points = [
            Point::new(1.0, 5.0),
            Point::new(-2.0, 3.0),
            Point::new(4.0, -1.0),
        ];
        assert_eq!(min_along(&points, Axis::X).unwrap().x, -2.0);
        assert_eq!(max_along(&points, Axis::X).unwrap().x, 4.0);
        assert_eq!(min_along(&points, Axis::Y).unwrap().y, -1.0);
        assert_eq!(max_along(&points, Axis::Y).unwrap().y, 5.0);
        assert!(min_along(&[], Axis::X).is_none());
    }

    #[test]
    fn test_midpoint() {
        let m = midpoint(Point::new(0.0, 0.0), Point::new(2.0, 6.0));
        assert_eq!(m.x, 1.0);
        assert_eq!(m.y, 3.0);
    }
}
