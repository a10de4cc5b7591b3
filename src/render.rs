// ============================================================================
// RASTERIZER
// ============================================================================
//
// Turns retained scene elements into an RGBA8 frame. Everything is drawn with
// per-pixel coverage so strokes stay smooth at any rotation.

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::config::{Color, MIN_DASH_PERIOD};
use crate::geometry::{Point, Rect};
use crate::scene::{Element, Shape, Style};

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    /// Wrap an RGBA8 frame of `width * height` pixels.
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        let height = height.min(frame.len() / (width.max(1) * 4));
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    /// Alpha-blend `color` over the pixel at (x, y).
    pub fn blend(&mut self, x: i32, y: i32, color: Color, alpha: f64) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let src = [color.r, color.g, color.b];
        for (channel, value) in src.iter().enumerate() {
            let dst = self.frame[idx + channel] as f64;
            self.frame[idx + channel] = (*value as f64 * a + dst * (1.0 - a)).round() as u8;
        }
        self.frame[idx + 3] = 0xff;
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.frame[idx..idx + 4]);
        Some(out)
    }
}

/// Pixel range covering `rect` grown by `margin`, clipped to the canvas.
fn pixel_bounds(canvas: &Canvas, rect: Rect, margin: f64) -> Option<(i32, i32, i32, i32)> {
    let min_x = ((rect.top_left.x - margin).floor() as i32).max(0);
    let min_y = ((rect.top_left.y - margin).floor() as i32).max(0);
    let max_x = ((rect.bottom_right().x + margin).ceil() as i32).min(canvas.width as i32 - 1);
    let max_y = ((rect.bottom_right().y + margin).ceil() as i32).min(canvas.height as i32 - 1);
    (min_x <= max_x && min_y <= max_y).then_some((min_x, min_y, max_x, max_y))
}

/// Coverage of a pixel whose center lies `dist` from an edge of a band
/// `half_width` wide.
fn coverage(dist: f64, half_width: f64) -> f64 {
    (1.0 - (dist - half_width).clamp(0.0, 1.0)).clamp(0.0, 1.0)
}

pub fn draw_thick_line_aa(
    canvas: &mut Canvas,
    from: Point,
    to: Point,
    thickness: f64,
    color: Color,
    opacity: f64,
) {
    let Some(bounds) = Rect::bounding([from, to]) else {
        return;
    };
    let Some((min_x, min_y, max_x, max_y)) = pixel_bounds(canvas, bounds, thickness + 1.0) else {
        return;
    };
    let d = to - from;
    let len_sq = d.x * d.x + d.y * d.y;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = Point::new(x as f64, y as f64);
            let t = if len_sq > 0.0 {
                (((p.x - from.x) * d.x + (p.y - from.y) * d.y) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let dist = p.distance(from + d * t);
            let aa = coverage(dist, thickness / 2.0);
            if aa > 0.01 {
                canvas.blend(x, y, color, aa * opacity);
            }
        }
    }
}

pub fn draw_dashed_line_aa(
    canvas: &mut Canvas,
    from: Point,
    to: Point,
    thickness: f64,
    dash: [f64; 2],
    color: Color,
    opacity: f64,
) {
    let length = from.distance(to);
    let period = dash[0] + dash[1];
    if length <= 0.0 || dash[0] <= 0.0 || !(period >= MIN_DASH_PERIOD) {
        draw_thick_line_aa(canvas, from, to, thickness, color, opacity);
        return;
    }
    let dir = (to - from) * (1.0 / length);
    let mut offset = 0.0;
    while offset < length {
        let end = (offset + dash[0]).min(length);
        draw_thick_line_aa(
            canvas,
            from + dir * offset,
            from + dir * end,
            thickness,
            color,
            opacity,
        );
        offset += period;
    }
}

pub fn draw_disc(canvas: &mut Canvas, center: Point, radius: f64, color: Color, opacity: f64) {
    let bounds = Rect::square_around(center, radius * 2.0);
    let Some((min_x, min_y, max_x, max_y)) = pixel_bounds(canvas, bounds, 1.0) else {
        return;
    };
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dist = Point::new(x as f64, y as f64).distance(center);
            let aa = if dist > radius {
                1.0 - (dist - radius).min(1.0)
            } else {
                1.0
            };
            if aa > 0.0 {
                canvas.blend(x, y, color, aa * opacity);
            }
        }
    }
}

pub fn draw_ring(
    canvas: &mut Canvas,
    center: Point,
    radius: f64,
    thickness: f64,
    color: Color,
    opacity: f64,
) {
    draw_arc_band(canvas, center, radius, thickness, None, color, opacity);
}

/// Annulus of `thickness` around `radius`. With a chord, only the part on
/// the `keep` side of the line through `a` and `b` is drawn.
fn draw_arc_band(
    canvas: &mut Canvas,
    center: Point,
    radius: f64,
    thickness: f64,
    chord: Option<(Point, Point, Point)>,
    color: Color,
    opacity: f64,
) {
    let bounds = Rect::square_around(center, radius * 2.0);
    let Some((min_x, min_y, max_x, max_y)) = pixel_bounds(canvas, bounds, thickness + 1.0) else {
        return;
    };
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = Point::new(x as f64, y as f64);
            if let Some((a, b, keep)) = chord {
                if side(a, b, p) * side(a, b, keep) < 0.0 {
                    continue;
                }
            }
            let aa = coverage((p.distance(center) - radius).abs(), thickness / 2.0);
            if aa > 0.01 {
                canvas.blend(x, y, color, aa * opacity);
            }
        }
    }
}

/// Signed area test: which side of the line a->b the point p lies on.
fn side(a: Point, b: Point, p: Point) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Circle through three points, or `None` when they are collinear.
fn circumcircle(a: Point, b: Point, c: Point) -> Option<(Point, f64)> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < f64::EPSILON {
        return None;
    }
    let a2 = a.x * a.x + a.y * a.y;
    let b2 = b.x * b.x + b.y * b.y;
    let c2 = c.x * c.x + c.y * c.y;
    let center = Point::new(
        (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d,
        (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d,
    );
    Some((center, center.distance(a)))
}

fn fill_arc_segment(
    canvas: &mut Canvas,
    from: Point,
    through: Point,
    to: Point,
    color: Color,
    opacity: f64,
) {
    let Some((center, radius)) = circumcircle(from, through, to) else {
        return;
    };
    let bounds = Rect::square_around(center, radius * 2.0);
    let Some((min_x, min_y, max_x, max_y)) = pixel_bounds(canvas, bounds, 1.0) else {
        return;
    };
    let keep = side(from, to, through);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = Point::new(x as f64, y as f64);
            if side(from, to, p) * keep < 0.0 {
                continue;
            }
            let dist = p.distance(center);
            let aa = if dist > radius {
                1.0 - (dist - radius).min(1.0)
            } else {
                1.0
            };
            if aa > 0.0 {
                canvas.blend(x, y, color, aa * opacity);
            }
        }
    }
}

fn point_in_polygon(points: &[Point], p: Point) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

pub fn fill_polygon(canvas: &mut Canvas, points: &[Point], color: Color, opacity: f64) {
    if points.len() < 3 {
        return;
    }
    let Some(bounds) = Rect::bounding(points.iter().copied()) else {
        return;
    };
    let Some((min_x, min_y, max_x, max_y)) = pixel_bounds(canvas, bounds, 1.0) else {
        return;
    };
    // 2x2 supersampling per pixel
    const OFFSETS: [(f64, f64); 4] = [(-0.25, -0.25), (0.25, -0.25), (-0.25, 0.25), (0.25, 0.25)];
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let hits = OFFSETS
                .iter()
                .filter(|(dx, dy)| {
                    point_in_polygon(points, Point::new(x as f64 + dx, y as f64 + dy))
                })
                .count();
            if hits > 0 {
                canvas.blend(x, y, color, opacity * hits as f64 / OFFSETS.len() as f64);
            }
        }
    }
}

pub fn draw_text(
    canvas: &mut Canvas,
    anchor: Point,
    text: &str,
    font: &Font,
    font_size: f64,
    color: Color,
    opacity: f64,
) {
    let scale = Scale::uniform(font_size as f32);
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();

    // Bounding box for the whole string, so it can be centered on the anchor
    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    if min_x > max_x {
        return;
    }
    let offset_x = anchor.x.round() as i32 - (max_x - min_x) / 2;
    let offset_y = anchor.y.round() as i32 - (max_y - min_y) / 2;
    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = offset_x + gx as i32 + bb.min.x - min_x;
                let py = offset_y + gy as i32 + bb.min.y - min_y;
                canvas.blend(px, py, color, v as f64 * opacity);
            });
        }
    }
}

pub fn render_element(canvas: &mut Canvas, element: &Element, font: Option<&Font>) {
    render_shape(canvas, &element.shape, &element.style, font);
}

fn render_shape(canvas: &mut Canvas, shape: &Shape, style: &Style, font: Option<&Font>) {
    let opacity = style.opacity;
    match shape {
        Shape::Line { from, to, dash } => {
            let Some(color) = style.stroke else {
                return;
            };
            match dash {
                Some(dash) => {
                    draw_dashed_line_aa(canvas, *from, *to, style.width, *dash, color, opacity)
                }
                None => draw_thick_line_aa(canvas, *from, *to, style.width, color, opacity),
            }
        }
        Shape::Circle { center, radius } => {
            if let Some(fill) = style.fill {
                draw_disc(canvas, *center, *radius, fill, opacity);
            }
            if let Some(stroke) = style.stroke {
                draw_ring(canvas, *center, *radius, style.width, stroke, opacity);
            }
        }
        Shape::Arc { from, through, to } => {
            if let Some(fill) = style.fill {
                fill_arc_segment(canvas, *from, *through, *to, fill, opacity);
            }
            if let (Some(stroke), Some((center, radius))) =
                (style.stroke, circumcircle(*from, *through, *to))
            {
                draw_arc_band(
                    canvas,
                    center,
                    radius,
                    style.width,
                    Some((*from, *to, *through)),
                    stroke,
                    opacity,
                );
            }
        }
        Shape::Polygon { points, closed } => {
            if let (Some(fill), true) = (style.fill, *closed) {
                fill_polygon(canvas, points, fill, opacity);
            }
            if let Some(stroke) = style.stroke {
                for pair in points.windows(2) {
                    draw_thick_line_aa(canvas, pair[0], pair[1], style.width, stroke, opacity);
                }
                if let (true, Some(first), Some(last)) = (*closed, points.first(), points.last()) {
                    draw_thick_line_aa(canvas, *last, *first, style.width, stroke, opacity);
                }
            }
        }
        Shape::Text {
            anchor,
            content,
            font_size,
        } => {
            if let (Some(font), Some(color)) = (font, style.fill) {
                draw_text(canvas, *anchor, content, font, *font_size, color, opacity);
            }
        }
        Shape::Group(children) => {
            for child in children {
                let child_style = Style {
                    opacity: child.style.opacity * opacity,
                    ..child.style
                };
                render_shape(canvas, &child.shape, &child_style, font);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(width: usize, height: usize) -> Vec<u8> {
        vec![0u8; width * height * 4]
    }

    #[test]
    fn test_line_covers_its_pixels_only() {
        let mut buf = frame(20, 20);
        let mut canvas = Canvas::new(&mut buf, 20, 20);
        canvas.clear(Color::WHITE);
        draw_thick_line_aa(
            &mut canvas,
            Point::new(2.0, 10.0),
            Point::new(17.0, 10.0),
            2.0,
            Color::BLACK,
            1.0,
        );
        assert_eq!(canvas.pixel(10, 10), Some([0, 0, 0, 0xff]));
        assert_eq!(canvas.pixel(10, 2), Some([0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn test_sub_pixel_dash_draws_solid() {
        let draw = |dash: Option<[f64; 2]>| {
            let mut buf = frame(20, 20);
            let mut canvas = Canvas::new(&mut buf, 20, 20);
            canvas.clear(Color::WHITE);
            let (from, to) = (Point::new(2.0, 10.0), Point::new(17.0, 10.0));
            match dash {
                Some(dash) => {
                    draw_dashed_line_aa(&mut canvas, from, to, 2.0, dash, Color::BLACK, 1.0)
                }
                None => draw_thick_line_aa(&mut canvas, from, to, 2.0, Color::BLACK, 1.0),
            }
            buf
        };
        let solid = draw(None);
        assert!(draw(Some([1e-12, 0.0])) == solid);
        assert!(draw(Some([f64::NAN, 1.0])) == solid);
        assert!(draw(Some([2.0, 2.0])) != solid);
    }

    #[test]
    fn test_opacity_blends_toward_background() {
        let mut buf = frame(4, 4);
        let mut canvas = Canvas::new(&mut buf, 4, 4);
        canvas.clear(Color::WHITE);
        canvas.blend(1, 1, Color::BLACK, 0.5);
        let [r, g, b, a] = canvas.pixel(1, 1).unwrap();
        assert_eq!((r, g, b, a), (128, 128, 128, 0xff));
        // Out of bounds writes are ignored.
        canvas.blend(-1, 9, Color::BLACK, 1.0);
    }

    #[test]
    fn test_polygon_fill() {
        let mut buf = frame(20, 20);
        let mut canvas = Canvas::new(&mut buf, 20, 20);
        canvas.clear(Color::WHITE);
        let square = [
            Point::new(5.0, 5.0),
            Point::new(15.0, 5.0),
            Point::new(15.0, 15.0),
            Point::new(5.0, 15.0),
        ];
        fill_polygon(&mut canvas, &square, Color::BLUE, 1.0);
        assert_eq!(canvas.pixel(10, 10), Some([0, 0, 0xff, 0xff]));
        assert_eq!(canvas.pixel(2, 2), Some([0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn test_half_arc_fills_upper_half_only() {
        let mut buf = frame(40, 40);
        let mut canvas = Canvas::new(&mut buf, 40, 40);
        canvas.clear(Color::WHITE);
        let element = Element::new(
            Shape::Arc {
                from: Point::new(5.0, 20.0),
                through: Point::new(20.0, 5.0),
                to: Point::new(35.0, 20.0),
            },
            Style::stroke(Color::BLACK, 1.0).with_fill(Color::BLUE),
        );
        render_element(&mut canvas, &element, None);
        assert_eq!(canvas.pixel(20, 12), Some([0, 0, 0xff, 0xff]));
        assert_eq!(canvas.pixel(20, 28), Some([0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn test_circumcircle() {
        let (center, radius) = circumcircle(
            Point::new(0.0, 10.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 10.0),
        )
        .unwrap();
        assert!((center.x - 10.0).abs() < 1e-9 && (center.y - 10.0).abs() < 1e-9);
        assert!((radius - 10.0).abs() < 1e-9);
        assert!(circumcircle(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0)
        )
        .is_none());
    }
}
