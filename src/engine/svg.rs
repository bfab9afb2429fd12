use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::engine::EngineGuard;
use crate::engine::display::{DisplayList, DrawItem};
use crate::foundation::core::{Affine, Size};
use crate::foundation::error::{LottieError, LottieResult};

static NEXT_SVG_ID: AtomicU64 = AtomicU64::new(1);

/// A parsed, single-frame SVG document.
#[derive(Clone)]
pub(crate) struct SvgContent {
    pub(crate) id: u64,
    pub(crate) tree: Arc<usvg::Tree>,
}

impl SvgContent {
    pub(crate) fn from_slice(bytes: &[u8], engine: &EngineGuard) -> LottieResult<Self> {
        let opts = usvg::Options {
            fontdb: engine.fontdb(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(bytes, &opts)
            .map_err(|e| LottieError::resource_load(format!("svg parse failed: {e}")))?;
        let size = tree.size();
        if !(size.width().is_finite() && size.height().is_finite()) {
            return Err(LottieError::resource_load("svg has invalid width/height"));
        }
        Ok(Self {
            id: NEXT_SVG_ID.fetch_add(1, Ordering::Relaxed),
            tree: Arc::new(tree),
        })
    }

    pub(crate) fn size(&self) -> Size {
        let s = self.tree.size();
        Size::new(f64::from(s.width()), f64::from(s.height()))
    }

    pub(crate) fn display_list(&self) -> DisplayList {
        DisplayList {
            items: vec![DrawItem::Svg {
                content_id: self.id,
                tree: self.tree.clone(),
                transform: Affine::IDENTITY,
            }],
        }
    }
}

/// Rasterize `tree` through the device `transform` into a `width x height` premultiplied RGBA8
/// buffer. Only the part of the document that lands inside the buffer is drawn.
pub(crate) fn rasterize_svg_to_device(
    tree: &usvg::Tree,
    transform: Affine,
    width: u32,
    height: u32,
    max_dim: u32,
) -> LottieResult<Vec<u8>> {
    if width > max_dim || height > max_dim {
        return Err(LottieError::draw(format!(
            "svg raster size too large: {width}x{height} (max {max_dim}x{max_dim})"
        )));
    }
    let coeffs = transform.as_coeffs();
    if !coeffs.iter().all(|c| c.is_finite()) {
        return Err(LottieError::draw("svg transform is not finite"));
    }
    let [sx, ky, kx, sy, tx, ty] = coeffs.map(|c| c as f32);

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| LottieError::draw(format!("failed to allocate {width}x{height} svg pixmap")))?;
    resvg::render(
        tree,
        resvg::tiny_skia::Transform::from_row(sx, ky, kx, sy, tx, ty),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap.take())
}

#[cfg(test)]
#[path = "../../tests/unit/engine/svg.rs"]
mod tests;
