//! Point and rectangle arithmetic in screen coordinates (y grows downward).
//!
//! Angles are degrees. A positive rotation turns clockwise on screen, so
//! rotating the dial's top point by 90 degrees about the center lands on the
//! right-hand side of the dial.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rotate this point by `degrees` about `pivot`.
    pub fn rotate(self, degrees: f64, pivot: Point) -> Point {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let d = self - pivot;
        Point::new(
            pivot.x + d.x * cos - d.y * sin,
            pivot.y + d.x * sin + d.y * cos,
        )
    }

    /// Scale this point's offset from `pivot` independently per axis.
    pub fn scale(self, sx: f64, sy: f64, pivot: Point) -> Point {
        let d = self - pivot;
        Point::new(pivot.x + d.x * sx, pivot.y + d.y * sy)
    }

    pub fn distance(self, other: Point) -> f64 {
        let d = self - other;
        (d.x * d.x + d.y * d.y).sqrt()
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top_left: Point,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(top_left: Point, width: f64, height: f64) -> Self {
        Self {
            top_left,
            width,
            height,
        }
    }

    /// Square of side `side` centred on `center`.
    pub fn square_around(center: Point, side: f64) -> Self {
        let half = side / 2.0;
        Self::new(Point::new(center.x - half, center.y - half), side, side)
    }

    /// Smallest rectangle enclosing every point, or `None` for an empty set.
    pub fn bounding<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });
        Some(Self::new(min, max.x - min.x, max.y - min.y))
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.top_left.x + self.width / 2.0,
            self.top_left.y + self.height / 2.0,
        )
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.top_left.x + self.width, self.top_left.y + self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rotate_quarter_turn_is_clockwise() {
        let center = Point::new(100.0, 100.0);
        let top = Point::new(100.0, 30.0);
        let right = top.rotate(90.0, center);
        assert_abs_diff_eq!(right.x, 170.0, epsilon = 1e-9);
        assert_abs_diff_eq!(right.y, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rotate_full_turn_returns_to_start() {
        let center = Point::new(10.0, -4.0);
        let p = Point::new(3.5, 7.25);
        let back = p.rotate(250.0, center).rotate(110.0, center);
        assert_abs_diff_eq!(back.x, p.x, epsilon = 1e-9);
        assert_abs_diff_eq!(back.y, p.y, epsilon = 1e-9);
    }

    #[test]
    fn test_scale_about_pivot() {
        let pivot = Point::new(5.0, 5.0);
        let p = Point::new(15.0, 0.0).scale(0.4, 1.0, pivot);
        assert_abs_diff_eq!(p.x, 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bounding_rect() {
        let rect = Rect::bounding([
            Point::new(1.0, 2.0),
            Point::new(-3.0, 8.0),
            Point::new(4.0, -1.0),
        ])
        .unwrap();
        assert_eq!(rect.top_left, Point::new(-3.0, -1.0));
        assert_eq!(rect.width, 7.0);
        assert_eq!(rect.height, 9.0);
        assert_eq!(Rect::bounding(Vec::<Point>::new()), None);
    }

    #[test]
    fn test_square_around_center() {
        let rect = Rect::square_around(Point::new(93.0, 93.0), 140.0);
        assert_eq!(rect.top_left, Point::new(23.0, 23.0));
        assert_eq!(rect.center(), Point::new(93.0, 93.0));
    }
}
