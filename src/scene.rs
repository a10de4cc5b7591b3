//! Retained-mode drawing context owned by one widget.
//!
//! Elements are appended once and addressed by [`ElementId`]; they are never
//! removed, so an id handed out by a scene stays valid for that scene's life.
//! Transforms are applied to element geometry directly.

use crate::config::Color;
use crate::geometry::Point;
use crate::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub stroke: Option<Color>,
    pub fill: Option<Color>,
    pub width: f64,
    pub opacity: f64,
}

impl Style {
    pub const fn stroke(color: Color, width: f64) -> Self {
        Self {
            stroke: Some(color),
            fill: None,
            width,
            opacity: 1.0,
        }
    }

    pub const fn fill(color: Color) -> Self {
        Self {
            stroke: None,
            fill: Some(color),
            width: 0.0,
            opacity: 1.0,
        }
    }

    pub const fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub const fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Line {
        from: Point,
        to: Point,
        /// Dash and gap lengths; solid when `None`.
        dash: Option<[f64; 2]>,
    },
    Circle {
        center: Point,
        radius: f64,
    },
    /// Circular arc through three points, closed by its chord when filled.
    Arc {
        from: Point,
        through: Point,
        to: Point,
    },
    Polygon {
        points: Vec<Point>,
        closed: bool,
    },
    Text {
        anchor: Point,
        content: String,
        font_size: f64,
    },
    Group(Vec<Element>),
}

impl Shape {
    pub fn rotate(&mut self, degrees: f64, pivot: Point) {
        self.map_points(&mut |p| p.rotate(degrees, pivot));
    }

    pub fn scale(&mut self, sx: f64, sy: f64, pivot: Point) {
        self.map_points(&mut |p| p.scale(sx, sy, pivot));
        if let Shape::Circle { radius, .. } = self {
            *radius *= sx.abs().max(sy.abs());
        }
    }

    fn map_points(&mut self, f: &mut dyn FnMut(Point) -> Point) {
        match self {
            Shape::Line { from, to, .. } => {
                *from = f(*from);
                *to = f(*to);
            }
            Shape::Circle { center, .. } => *center = f(*center),
            Shape::Arc { from, through, to } => {
                *from = f(*from);
                *through = f(*through);
                *to = f(*to);
            }
            Shape::Polygon { points, .. } => points.iter_mut().for_each(|p| *p = f(*p)),
            // Text rotation moves the anchor only; glyphs stay upright.
            Shape::Text { anchor, .. } => *anchor = f(*anchor),
            Shape::Group(children) => {
                for child in children.iter_mut() {
                    child.shape.map_points(&mut *f);
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub shape: Shape,
    pub style: Style,
}

impl Element {
    pub fn new(shape: Shape, style: Style) -> Self {
        Self { shape, style }
    }

    pub fn rotate(&mut self, degrees: f64, pivot: Point) {
        self.shape.rotate(degrees, pivot);
    }
}

#[derive(Debug, Default)]
pub struct Scene {
    surface: Option<Surface>,
    elements: Vec<Element>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the scene to its host surface. A scene is bound at most once.
    pub fn bind(&mut self, surface: Surface) {
        self.surface = Some(surface);
    }

    pub fn surface(&self) -> Option<Surface> {
        self.surface
    }

    pub fn add(&mut self, element: Element) -> ElementId {
        self.elements.push(element);
        ElementId(self.elements.len() - 1)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.0)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        id.0 < self.elements.len()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_ids_address_elements_in_insertion_order() {
        let mut scene = Scene::new();
        let a = scene.add(Element::new(
            Shape::Circle {
                center: Point::new(0.0, 0.0),
                radius: 5.0,
            },
            Style::fill(Color::WHITE),
        ));
        let b = scene.add(Element::new(
            Shape::Line {
                from: Point::new(0.0, 0.0),
                to: Point::new(1.0, 0.0),
                dash: None,
            },
            Style::stroke(Color::BLACK, 1.0),
        ));
        assert_ne!(a, b);
        assert_eq!(scene.len(), 2);
        assert!(matches!(scene.get(a).unwrap().shape, Shape::Circle { .. }));
        assert!(matches!(scene.get(b).unwrap().shape, Shape::Line { .. }));
    }

    #[test]
    fn test_group_rotates_every_child() {
        let pivot = Point::new(0.0, 0.0);
        let line = |to| {
            Element::new(
                Shape::Line {
                    from: pivot,
                    to,
                    dash: Some([2.0, 2.0]),
                },
                Style::stroke(Color::GREY, 2.0),
            )
        };
        let mut group = Shape::Group(vec![
            line(Point::new(0.0, -10.0)),
            line(Point::new(10.0, 0.0)),
        ]);
        group.rotate(90.0, pivot);
        let Shape::Group(children) = group else {
            panic!("group changed kind");
        };
        let ends: Vec<Point> = children
            .iter()
            .map(|c| match c.shape {
                Shape::Line { to, .. } => to,
                _ => unreachable!(),
            })
            .collect();
        assert_abs_diff_eq!(ends[0].x, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ends[0].y, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ends[1].x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ends[1].y, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_text_rotation_moves_anchor_only() {
        let mut text = Shape::Text {
            anchor: Point::new(0.0, -20.0),
            content: "0".to_string(),
            font_size: 12.0,
        };
        text.rotate(180.0, Point::new(0.0, 0.0));
        let Shape::Text {
            anchor, font_size, ..
        } = text
        else {
            unreachable!()
        };
        assert_abs_diff_eq!(anchor.y, 20.0, epsilon = 1e-9);
        assert_eq!(font_size, 12.0);
    }
}
