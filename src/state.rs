//! Angle state: buffers requests until the pointer model is attached, then
//! hands every request to the rotation engine. A failed model load is
//! terminal: the widget stops accepting requests.

use std::mem;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{ModelError, SceneError, SetupError};
use crate::rotation::RotationEngine;
use crate::scene::Scene;

/// One angle update as issued by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleRequest {
    pub angle: f64,
    /// Leave a permanent histogram mark at `angle` once applied.
    pub histogram: bool,
}

impl AngleRequest {
    pub const fn plain(angle: f64) -> Self {
        Self {
            angle,
            histogram: false,
        }
    }

    pub const fn with_histogram(angle: f64) -> Self {
        Self {
            angle,
            histogram: true,
        }
    }
}

/// What happened to a recorded request.
#[derive(Debug, PartialEq)]
pub enum Delivery {
    /// Queued until the pointer model attaches.
    Buffered,
    Applied,
    /// Handed to the engine, which rejected it; the angle did not change.
    Failed(SceneError),
    /// Discarded because the pointer model will never load.
    Dropped,
}

#[derive(Debug)]
pub enum AngleState {
    Unattached { pending: Vec<AngleRequest> },
    Attached(RotationEngine),
    Failed(Arc<ModelError>),
}

impl Default for AngleState {
    fn default() -> Self {
        AngleState::Unattached {
            pending: Vec::new(),
        }
    }
}

impl AngleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_angle(&mut self, request: AngleRequest, scene: &mut Scene) -> Delivery {
        match self {
            AngleState::Unattached { pending } => {
                debug!(angle = request.angle, queued = pending.len() + 1, "buffering angle");
                pending.push(request);
                Delivery::Buffered
            }
            AngleState::Attached(engine) => match engine.apply_angle(request.angle, scene) {
                Ok(()) => Delivery::Applied,
                Err(err) => Delivery::Failed(err),
            },
            AngleState::Failed(err) => {
                warn!(angle = request.angle, %err, "pointer model unavailable, dropping angle");
                Delivery::Dropped
            }
        }
    }

    /// Switch to `Attached`, returning the buffered requests in arrival order.
    /// The caller replays them before accepting any new request.
    pub fn attach(&mut self, engine: RotationEngine) -> Result<Vec<AngleRequest>, SetupError> {
        match self {
            AngleState::Attached(_) => Err(SetupError::AlreadyAttached),
            AngleState::Failed(err) => Err(SetupError::Model(Arc::clone(err))),
            AngleState::Unattached { pending } => {
                let pending = mem::take(pending);
                *self = AngleState::Attached(engine);
                Ok(pending)
            }
        }
    }

    /// Record a model load failure. Buffered requests are discarded and every
    /// later request is dropped. Has no effect once a model is attached.
    pub fn fail(&mut self, err: Arc<ModelError>) {
        if let AngleState::Unattached { pending } = self {
            warn!(%err, dropped = pending.len(), "pointer model failed, discarding buffered angles");
            *self = AngleState::Failed(err);
        }
    }

    pub fn is_attached(&self) -> bool {
        matches!(self, AngleState::Attached(_))
    }

    pub fn failure(&self) -> Option<&Arc<ModelError>> {
        match self {
            AngleState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// The angle currently on display; zero unless a model is attached.
    pub fn current_angle(&self) -> f64 {
        match self {
            AngleState::Attached(engine) => engine.current_angle(),
            AngleState::Unattached { .. } | AngleState::Failed(_) => 0.0,
        }
    }

    pub fn pending(&self) -> &[AngleRequest] {
        match self {
            AngleState::Unattached { pending } => pending.as_slice(),
            AngleState::Attached(_) | AngleState::Failed(_) => &[],
        }
    }

    pub fn engine(&self) -> Option<&RotationEngine> {
        match self {
            AngleState::Attached(engine) => Some(engine),
            AngleState::Unattached { .. } | AngleState::Failed(_) => None,
        }
    }
}
