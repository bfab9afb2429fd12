use std::sync::Arc;

use kurbo::Shape as _;

use crate::engine::display::{DrawItem, FillRule, LineCap, LineJoin, StrokeStyle};
use crate::engine::svg::rasterize_svg_to_device;
use crate::foundation::core::{Affine, BezPath, Rect};
use crate::foundation::error::{LottieError, LottieResult};
use crate::picture::PaintSnapshot;

#[derive(Clone, Copy, Debug, PartialEq)]
struct SvgRasterKey {
    content: u64,
    w: u16,
    h: u16,
    transform: [f64; 6],
}

/// The last device-space SVG raster, reused while content, surface size and transform repeat.
#[derive(Default)]
pub(crate) struct SvgRasterCache {
    last: Option<(SvgRasterKey, vello_cpu::Image)>,
}

impl SvgRasterCache {
    fn image_for(
        &mut self,
        content: u64,
        tree: &usvg::Tree,
        transform: Affine,
        (w, h): (u16, u16),
        max_dim: u32,
    ) -> LottieResult<vello_cpu::Image> {
        let key = SvgRasterKey {
            content,
            w,
            h,
            transform: transform.as_coeffs(),
        };
        if let Some((last, img)) = &self.last
            && *last == key
        {
            return Ok(img.clone());
        }
        let rgba =
            rasterize_svg_to_device(tree, transform, u32::from(w), u32::from(h), max_dim)?;
        let pixmap = pixmap_from_premul_bytes(&rgba, u32::from(w), u32::from(h))?;
        let img = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.last = Some((key, img.clone()));
        Ok(img)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        usize::from(self.last.is_some())
    }
}

/// Record the draw commands for `snap` into `ctx`.
///
/// A clip with no area draws nothing.
pub(crate) fn encode_snapshot(
    ctx: &mut vello_cpu::RenderContext,
    snap: &PaintSnapshot,
    svg_cache: &mut SvgRasterCache,
    svg_max_dim: u32,
) -> LottieResult<()> {
    ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

    let clipped = match snap.clip {
        Some((rect, _)) if !has_area(rect) => return Ok(()),
        Some((rect, clip_xf)) => {
            ctx.set_transform(affine_to_cpu(clip_xf));
            ctx.push_clip_layer(&bezpath_to_cpu(&rect.to_path(0.1)));
            true
        }
        None => false,
    };

    for item in &snap.display_list.items {
        match item {
            DrawItem::Fill {
                path,
                transform,
                color,
                rule,
            } => {
                let [r, g, b, a] = *color;
                ctx.set_transform(affine_to_cpu(snap.content_transform * *transform));
                ctx.set_fill_rule(match rule {
                    FillRule::NonZero => vello_cpu::peniko::Fill::NonZero,
                    FillRule::EvenOdd => vello_cpu::peniko::Fill::EvenOdd,
                });
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
                ctx.fill_path(&bezpath_to_cpu(path));
            }
            DrawItem::Stroke {
                path,
                transform,
                color,
                style,
            } => {
                let [r, g, b, a] = *color;
                ctx.set_transform(affine_to_cpu(snap.content_transform * *transform));
                ctx.set_stroke(stroke_to_cpu(style));
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
                ctx.stroke_path(&bezpath_to_cpu(path));
            }
            DrawItem::Svg {
                content_id,
                tree,
                transform,
            } => {
                let (w, h) = (ctx.width(), ctx.height());
                let img = svg_cache.image_for(
                    *content_id,
                    tree,
                    snap.content_transform * *transform,
                    (w, h),
                    svg_max_dim,
                )?;
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(img);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(w),
                    f64::from(h),
                ));
            }
        }
    }

    if clipped {
        ctx.pop_layer();
    }
    Ok(())
}

fn has_area(rect: Rect) -> bool {
    rect.is_finite() && rect.width() > 0.0 && rect.height() > 0.0
}

fn stroke_to_cpu(style: &StrokeStyle) -> vello_cpu::kurbo::Stroke {
    let cap = match style.cap {
        LineCap::Butt => vello_cpu::kurbo::Cap::Butt,
        LineCap::Round => vello_cpu::kurbo::Cap::Round,
        LineCap::Square => vello_cpu::kurbo::Cap::Square,
    };
    let join = match style.join {
        LineJoin::Miter => vello_cpu::kurbo::Join::Miter,
        LineJoin::Round => vello_cpu::kurbo::Join::Round,
        LineJoin::Bevel => vello_cpu::kurbo::Join::Bevel,
    };
    vello_cpu::kurbo::Stroke::new(style.width)
        .with_caps(cap)
        .with_join(join)
        .with_miter_limit(style.miter_limit)
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> LottieResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| LottieError::draw("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| LottieError::draw("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(LottieError::draw("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
