//! Rotation engine: the only place that turns an absolute angle into element
//! transforms. It owns the pointer model and the current angle, so the angle
//! it reports always matches what is on screen.

use tracing::trace;

use crate::error::SceneError;
use crate::geometry::Point;
use crate::pointer::PointerModel;
use crate::scene::{ElementId, Scene, Shape};

/// Scene elements that turn together with the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationTargets {
    pub indicator: ElementId,
    pub label: ElementId,
    pub cross_light: Option<ElementId>,
}

#[derive(Debug)]
pub struct RotationEngine {
    center: Point,
    model: PointerModel,
    targets: RotationTargets,
    label_position: Point,
    current_angle: f64,
}

impl RotationEngine {
    /// Take ownership of a freshly loaded model. The scene elements are
    /// assumed to still be at their initial orientation of `initial_angle`.
    pub fn new(
        model: PointerModel,
        center: Point,
        targets: RotationTargets,
        label_position: Point,
        initial_angle: f64,
    ) -> Self {
        Self {
            center,
            model,
            targets,
            label_position,
            current_angle: initial_angle,
        }
    }

    pub fn current_angle(&self) -> f64 {
        self.current_angle
    }

    pub fn model(&self) -> &PointerModel {
        &self.model
    }

    /// Rotate every dependent element by the difference between `target` and
    /// the current angle. Nothing moves unless every element is present.
    pub fn apply_angle(&mut self, target: f64, scene: &mut Scene) -> Result<(), SceneError> {
        let ids = [
            Some(self.targets.indicator),
            Some(self.targets.label),
            self.targets.cross_light,
        ];
        if let Some(missing) = ids.into_iter().flatten().find(|id| !scene.contains(*id)) {
            return Err(SceneError::UnknownElement(missing));
        }

        let delta = target - self.current_angle;
        let center = self.center;
        trace!(target, delta, "applying angle");

        self.model.rotate(delta, center);
        if let Some(indicator) = scene.get_mut(self.targets.indicator) {
            indicator.rotate(delta, center);
        }
        self.label_position = self.label_position.rotate(delta, center);
        if let Some(label) = scene.get_mut(self.targets.label) {
            if let Shape::Text {
                anchor, content, ..
            } = &mut label.shape
            {
                *anchor = self.label_position;
                *content = format_angle(target);
            }
        }
        if let Some(cross_light) = self.targets.cross_light.and_then(|id| scene.get_mut(id)) {
            cross_light.rotate(delta, center);
        }

        self.current_angle = target;
        Ok(())
    }
}

/// Label text for an angle: whole degrees print without a fraction.
pub fn format_angle(angle: f64) -> String {
    format!("{angle}")
}
