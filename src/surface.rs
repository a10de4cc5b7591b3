//! Host drawing surfaces, looked up by the `bind_to` identifier.

use std::collections::HashMap;

/// Pixel dimensions of a host drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
}

impl Surface {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Anything that can resolve a surface identifier, e.g. a window host or a
/// page with several canvases.
pub trait SurfaceHost {
    fn surface(&self, id: &str) -> Option<Surface>;
}

impl SurfaceHost for HashMap<String, Surface> {
    fn surface(&self, id: &str) -> Option<Surface> {
        self.get(id).copied()
    }
}

/// A host with exactly one surface.
impl SurfaceHost for (&str, Surface) {
    fn surface(&self, id: &str) -> Option<Surface> {
        (self.0 == id).then_some(self.1)
    }
}
