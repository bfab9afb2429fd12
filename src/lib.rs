//! Render frames of Lottie and SVG animations into caller-owned 32-bit pixel buffers.
//!
//! - Load an [`Animation`] from a file or from in-memory data
//! - Bind it to a [`RenderTarget`] with a [`FrameCompositor`]
//! - Call [`FrameCompositor::render_frame`] with optional crop and rotation ([`FrameOpts`])
//!
//! The compositor owns one reusable [`Canvas`]; every frame request rebuilds the picture
//! transform from identity, so renders are independent of each other.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod animation;
mod engine;
mod foundation;
mod picture;
mod render;
mod sampler;

pub use crate::animation::Animation;
pub use crate::engine::content::ContentType;
pub use crate::engine::{Engine, EngineGuard, EngineOpts};
pub use crate::foundation::core::{Affine, Colorspace, Point, Rect, Rgba8Premul, Size, Vec2};
pub use crate::foundation::error::{LottieError, LottieResult};
pub use crate::picture::Picture;
pub use crate::render::canvas::{Canvas, CanvasState};
pub use crate::render::compositor::FrameCompositor;
pub use crate::render::geometry::FrameOpts;
pub use crate::render::target::{RenderTarget, rgba8_from_buffer};
pub use crate::sampler::FrameSampler;
