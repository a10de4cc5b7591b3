//! Tick scale generation.
//!
//! Angles are measured from the top of the dial, clockwise positive. A tick is
//! a short radial line that starts on the dial outline and runs toward the
//! center; its inner end sits at `factor * radius`.

use crate::config::{ScaleConfig, TickStyle};
use crate::geometry::Point;

/// Tolerance for treating a float step as an exact multiple of an interval.
const STEP_EPSILON: f64 = 1e-9;

/// Angular span covered by the scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleRange {
    pub start: f64,
    pub end: f64,
}

impl AngleRange {
    pub const FULL: AngleRange = AngleRange {
        start: -180.0,
        end: 180.0,
    };
    pub const HALF: AngleRange = AngleRange {
        start: -90.0,
        end: 90.0,
    };

    pub fn for_dial(half: bool) -> Self {
        if half {
            Self::HALF
        } else {
            Self::FULL
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickClass {
    Primary,
    Sub,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleTick {
    pub angle: f64,
    pub class: TickClass,
    /// Outer end, on the dial outline.
    pub from: Point,
    /// Inner end, toward the center.
    pub to: Point,
    pub style: TickStyle,
}

/// Radial segment from the dial outline toward `center`, rotated to `angle`.
pub fn radius_line(center: Point, radius: f64, angle: f64, factor: f64) -> (Point, Point) {
    let start = Point::new(center.x, center.y - radius);
    let end = center + (start - center) * factor;
    (start.rotate(angle, center), end.rotate(angle, center))
}

/// Whether `angle` is a whole multiple of `interval`.
pub fn is_multiple_of(angle: f64, interval: f64) -> bool {
    let ratio = angle / interval;
    (ratio - ratio.round()).abs() < STEP_EPSILON
}

/// Every tick over `range`, stepping by the sub interval, in ascending angle.
/// A step that lands on a primary multiple is emitted once, as primary.
pub fn generate_scale(
    range: AngleRange,
    center: Point,
    radius: f64,
    scale: &ScaleConfig,
) -> Vec<ScaleTick> {
    let step = scale.sub.interval;
    let span = range.end - range.start;
    if step <= 0.0 || span < 0.0 {
        return Vec::new();
    }

    let count = (span / step + STEP_EPSILON).floor() as usize;
    (0..=count)
        .map(|i| {
            let angle = range.start + step * i as f64;
            let (class, style) = if is_multiple_of(angle, scale.primary.interval) {
                (TickClass::Primary, scale.primary)
            } else {
                (TickClass::Sub, scale.sub)
            };
            let (from, to) = radius_line(center, radius, angle, style.factor);
            ScaleTick {
                angle,
                class,
                from,
                to,
                style,
            }
        })
        .collect()
}
