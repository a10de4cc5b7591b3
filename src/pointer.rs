//! Pointer model: the rotatable shape that shows the current direction.
//!
//! A model is described by a TOML asset of one or more outline paths drawn in
//! their own coordinate space, pointing up (negative y). Loading fits the
//! outline into the dial's bounding box and centers it on the dial center.

use serde::Deserialize;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use tracing::{debug, warn};

use crate::config::Color;
use crate::error::ModelError;
use crate::geometry::{Point, Rect};
use crate::scene::{Element, Shape, Style};

const BUILTIN_ARROW: &str = r##"
[[paths]]
points = [[0.0, -50.0], [7.0, -30.0], [2.5, -30.0], [2.5, 50.0], [-2.5, 50.0], [-2.5, -30.0], [-7.0, -30.0]]
fill = "#d03030"
stroke = "#401010"
width = 0.5

[[paths]]
points = [[-5.0, -3.0], [5.0, -3.0], [5.0, 3.0], [-5.0, 3.0]]
fill = "#202020"
"##;

/// Where a pointer model asset comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelSource {
    Builtin,
    File(PathBuf),
    Inline(String),
}

impl From<Option<PathBuf>> for ModelSource {
    fn from(src: Option<PathBuf>) -> Self {
        src.map_or(ModelSource::Builtin, ModelSource::File)
    }
}

impl ModelSource {
    pub fn read(&self) -> Result<ModelAsset, ModelError> {
        let content = match self {
            ModelSource::Builtin => BUILTIN_ARROW.to_string(),
            ModelSource::Inline(content) => content.clone(),
            ModelSource::File(path) => {
                std::fs::read_to_string(path).map_err(|source| ModelError::Read {
                    path: path.clone(),
                    source,
                })?
            }
        };
        Ok(toml::from_str(&content)?)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelPath {
    pub points: Vec<[f64; 2]>,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_true")]
    pub closed: bool,
}

fn default_width() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelAsset {
    pub paths: Vec<ModelPath>,
}

/// Everything needed to place a model on its dial.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub bounds: Rect,
    pub scale_factor: f64,
    pub center: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointerModel {
    elements: Vec<Element>,
    rotation: f64,
}

impl PointerModel {
    pub fn load(source: &ModelSource, placement: &Placement) -> Result<Self, ModelError> {
        let asset = source.read()?;
        Self::fit(&asset, placement)
    }

    /// Scale the asset uniformly into the placement bounds, shrink it by the
    /// scale factor and center it on the placement center.
    pub fn fit(asset: &ModelAsset, placement: &Placement) -> Result<Self, ModelError> {
        let points = asset
            .paths
            .iter()
            .flat_map(|path| path.points.iter().copied().map(Point::from));
        let source = Rect::bounding(points).ok_or(ModelError::Empty)?;

        let fit = [
            (placement.bounds.width, source.width),
            (placement.bounds.height, source.height),
        ]
        .into_iter()
        .filter(|(_, extent)| *extent > 0.0)
        .map(|(target, extent)| target / extent)
        .fold(f64::INFINITY, f64::min);
        if !fit.is_finite() {
            return Err(ModelError::DegenerateBounds {
                width: source.width,
                height: source.height,
            });
        }
        let scale = fit * placement.scale_factor;
        let origin = source.center();

        let elements = asset
            .paths
            .iter()
            .filter(|path| !path.points.is_empty())
            .map(|path| {
                let points = path
                    .points
                    .iter()
                    .map(|&p| placement.center + (Point::from(p) - origin) * scale)
                    .collect();
                let style = Style {
                    stroke: path.stroke,
                    fill: path.fill,
                    width: path.width,
                    opacity: 1.0,
                };
                Element::new(
                    Shape::Polygon {
                        points,
                        closed: path.closed,
                    },
                    style,
                )
            })
            .collect();

        Ok(Self {
            elements,
            rotation: 0.0,
        })
    }

    pub fn rotate(&mut self, degrees: f64, pivot: Point) {
        for element in &mut self.elements {
            element.rotate(degrees, pivot);
        }
        self.rotation += degrees;
    }

    /// Cumulative rotation applied since the model was loaded.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
}

/// Load a model on a background thread. The result arrives exactly once on
/// the returned channel.
pub fn spawn_load(
    source: ModelSource,
    placement: Placement,
) -> Receiver<Result<PointerModel, ModelError>> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        debug!(?source, "loading pointer model");
        let result = PointerModel::load(&source, &placement);
        if sender.send(result).is_err() {
            warn!("pointer model finished loading after its widget was dropped");
        }
    });
    receiver
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn placement() -> Placement {
        Placement {
            bounds: Rect::square_around(Point::new(100.0, 100.0), 140.0),
            scale_factor: 0.6,
            center: Point::new(100.0, 100.0),
        }
    }

    fn polygon_points(model: &PointerModel, index: usize) -> Vec<Point> {
        match &model.elements()[index].shape {
            Shape::Polygon { points, .. } => points.clone(),
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn test_builtin_fits_box_and_centers() {
        let model = PointerModel::load(&ModelSource::Builtin, &placement()).unwrap();
        assert_eq!(model.elements().len(), 2);
        let all: Vec<Point> = (0..2).flat_map(|i| polygon_points(&model, i)).collect();
        let bounds = Rect::bounding(all).unwrap();
        // 100 units tall scaled to 140 * 0.6
        assert_abs_diff_eq!(bounds.height, 84.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bounds.center().x, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bounds.center().y, 100.0, epsilon = 1e-9);
        assert_eq!(model.rotation(), 0.0);
    }

    #[test]
    fn test_rotation_accumulates() {
        let mut model = PointerModel::load(&ModelSource::Builtin, &placement()).unwrap();
        let tip = polygon_points(&model, 0)[0];
        model.rotate(30.0, Point::new(100.0, 100.0));
        model.rotate(-75.0, Point::new(100.0, 100.0));
        assert_abs_diff_eq!(model.rotation(), -45.0);
        model.rotate(45.0, Point::new(100.0, 100.0));
        let back = polygon_points(&model, 0)[0];
        assert_abs_diff_eq!(back.x, tip.x, epsilon = 1e-9);
        assert_abs_diff_eq!(back.y, tip.y, epsilon = 1e-9);
    }

    #[test]
    fn test_inline_asset_and_errors() {
        let source = ModelSource::Inline(
            "[[paths]]\npoints = [[0.0, -1.0], [0.0, 1.0]]\nclosed = false\nstroke = \"black\"\n"
                .to_string(),
        );
        let model = PointerModel::load(&source, &placement()).unwrap();
        let points = polygon_points(&model, 0);
        assert_abs_diff_eq!(points[0].y, 100.0 - 42.0, epsilon = 1e-9);

        let empty = ModelSource::Inline("paths = []".to_string());
        assert!(matches!(
            PointerModel::load(&empty, &placement()),
            Err(ModelError::Empty)
        ));

        let dot = ModelSource::Inline("[[paths]]\npoints = [[1.0, 1.0]]\n".to_string());
        assert!(matches!(
            PointerModel::load(&dot, &placement()),
            Err(ModelError::DegenerateBounds { .. })
        ));

        let missing = ModelSource::File(PathBuf::from("/nonexistent/pointer.toml"));
        assert!(matches!(
            PointerModel::load(&missing, &placement()),
            Err(ModelError::Read { .. })
        ));
    }

    #[test]
    fn test_spawn_load_delivers_once() {
        let receiver = spawn_load(ModelSource::Builtin, placement());
        let model = receiver.recv().unwrap().unwrap();
        assert_eq!(model.elements().len(), 2);
        assert!(receiver.recv().is_err());
    }
}
