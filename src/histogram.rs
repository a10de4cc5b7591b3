//! Histogram overlay: one permanent radial mark per recorded reading.

use crate::config::HistogramConfig;
use crate::geometry::Point;
use crate::scale::radius_line;
use crate::scene::{Element, ElementId, Scene, Shape, Style};

/// Append-only overlay of radial marks, one per recorded sample.
#[derive(Debug)]
pub struct Histogram {
    config: HistogramConfig,
    center: Point,
    radius: f64,
    marks: Vec<(f64, ElementId)>,
}

impl Histogram {
    pub fn new(config: HistogramConfig, center: Point, radius: f64) -> Self {
        Self {
            config,
            center,
            radius,
            marks: Vec::new(),
        }
    }

    pub fn record_sample(&mut self, angle: f64, scene: &mut Scene) -> ElementId {
        let (from, to) = radius_line(self.center, self.radius, angle, self.config.factor);
        let style =
            Style::stroke(self.config.color, self.config.width).with_opacity(self.config.opacity);
        let id = scene.add(Element::new(
            Shape::Line {
                from,
                to,
                dash: None,
            },
            style,
        ));
        self.marks.push((angle, id));
        id
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Recorded sample angles, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.marks.iter().map(|(angle, _)| *angle)
    }

    pub fn mark_ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.marks.iter().map(|(_, id)| *id)
    }
}
