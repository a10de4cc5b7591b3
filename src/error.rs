//! Error types for configuration, model loading, setup and scene access.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::scene::ElementId;

/// Invalid or unreadable widget configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("radius must be a positive finite number, got {0}")]
    InvalidRadius(f64),
    #[error("{name} interval must be positive, got {value}")]
    InvalidInterval { name: &'static str, value: f64 },
    #[error("{name} shrink factor must be in (0, 1], got {value}")]
    InvalidFactor { name: &'static str, value: f64 },
    #[error("{name} opacity must be in [0, 1], got {value}")]
    InvalidOpacity { name: &'static str, value: f64 },
    #[error("{name} must be a non-negative finite number, got {value}")]
    InvalidLength { name: &'static str, value: f64 },
    #[error("max framerate must be a positive finite number, got {0}")]
    InvalidFramerate(f64),
    #[error("dash pattern {0:?} must be finite, non-negative and span at least one pixel")]
    InvalidDash([f64; 2]),
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Failure to produce a pointer model from its asset.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model asset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse model asset: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("model asset has no drawable paths")]
    Empty,
    #[error("model asset bounds are degenerate ({width} x {height})")]
    DegenerateBounds { width: f64, height: f64 },
    #[error("model loader stopped before delivering a model")]
    LoaderDisconnected,
}

/// Fatal errors while binding the widget to its host.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("no drawing surface registered as `{0}`")]
    SurfaceNotFound(String),
    #[error("widget has already been drawn")]
    AlreadyDrawn,
    #[error("widget has not been drawn yet")]
    NotDrawn,
    #[error("pointer model is already attached")]
    AlreadyAttached,
    /// The model could not be loaded. The same error is reported on every
    /// later poll.
    #[error("pointer model failed to load: {0}")]
    Model(#[source] Arc<ModelError>),
    #[error("font data could not be parsed")]
    Font,
}

impl From<ModelError> for SetupError {
    fn from(err: ModelError) -> Self {
        SetupError::Model(Arc::new(err))
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("no element {0:?} in this scene")]
    UnknownElement(ElementId),
}
