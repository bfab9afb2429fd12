//! Frame compositing: render targets, the canvas and the per-frame geometry pipeline.

pub(crate) mod canvas;
pub(crate) mod compositor;
pub(crate) mod geometry;
pub(crate) mod raster;
pub(crate) mod target;
