use kurbo::Shape as _;

use crate::engine::display::{DrawItem, FillRule, LineCap, LineJoin, StrokeStyle};
use crate::engine::lottie::anim::{Animated, PathData, is_truthy};
use crate::engine::lottie::model::{RawProp, RawShape, RawTransform};
use crate::foundation::core::{Affine, BezPath, Point, Rect, Vec2};
use crate::foundation::error::LottieResult;

const CURVE_TOLERANCE: f64 = 0.1;

/// Layer or group transform: `translate(p) · rotate(r) · scale(s / 100) · translate(-a)`.
#[derive(Clone, Debug)]
pub(crate) struct TransformAnim {
    anchor: Animated<Vec2>,
    position: PositionAnim,
    scale: Animated<Vec2>,
    rotation_deg: Animated<f64>,
    opacity_pct: Animated<f64>,
}

#[derive(Clone, Debug)]
enum PositionAnim {
    Joined(Animated<Vec2>),
    Split { x: Animated<f64>, y: Animated<f64> },
}

impl Default for TransformAnim {
    fn default() -> Self {
        Self {
            anchor: Animated::constant(Vec2::ZERO),
            position: PositionAnim::Joined(Animated::constant(Vec2::ZERO)),
            scale: Animated::constant(Vec2::new(100.0, 100.0)),
            rotation_deg: Animated::constant(0.0),
            opacity_pct: Animated::constant(100.0),
        }
    }
}

impl TransformAnim {
    pub(crate) fn compile(raw: &RawTransform, what: &str) -> LottieResult<Self> {
        let position = match &raw.p {
            Some(p) if p.is_split() => PositionAnim::Split {
                x: Animated::parse_or(p.component("x").as_ref(), 0.0, what)?,
                y: Animated::parse_or(p.component("y").as_ref(), 0.0, what)?,
            },
            p => PositionAnim::Joined(Animated::parse_or(p.as_ref(), Vec2::ZERO, what)?),
        };
        Ok(Self {
            anchor: Animated::parse_or(raw.a.as_ref(), Vec2::ZERO, what)?,
            position,
            scale: Animated::parse_or(raw.s.as_ref(), Vec2::new(100.0, 100.0), what)?,
            rotation_deg: Animated::parse_or(raw.r.as_ref(), 0.0, what)?,
            opacity_pct: Animated::parse_or(raw.o.as_ref(), 100.0, what)?,
        })
    }

    pub(crate) fn matrix(&self, frame: f64) -> Affine {
        let anchor = self.anchor.sample(frame);
        let position = match &self.position {
            PositionAnim::Joined(p) => p.sample(frame),
            PositionAnim::Split { x, y } => Vec2::new(x.sample(frame), y.sample(frame)),
        };
        let scale = self.scale.sample(frame) / 100.0;
        let rotation = self.rotation_deg.sample(frame).to_radians();

        Affine::translate(position)
            * Affine::rotate(rotation)
            * Affine::scale_non_uniform(scale.x, scale.y)
            * Affine::translate(-anchor)
    }

    /// Opacity in `[0, 1]`.
    pub(crate) fn opacity(&self, frame: f64) -> f64 {
        (self.opacity_pct.sample(frame) / 100.0).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Debug)]
pub(crate) enum ShapeNode {
    Group {
        items: Vec<ShapeNode>,
        transform: TransformAnim,
    },
    Rect {
        center: Animated<Vec2>,
        size: Animated<Vec2>,
        roundness: Animated<f64>,
    },
    Ellipse {
        center: Animated<Vec2>,
        size: Animated<Vec2>,
    },
    Path(Animated<PathData>),
    Fill {
        color: Animated<[f64; 4]>,
        opacity_pct: Animated<f64>,
        rule: FillRule,
    },
    Stroke {
        color: Animated<[f64; 4]>,
        opacity_pct: Animated<f64>,
        width: Animated<f64>,
        cap: LineCap,
        join: LineJoin,
        miter_limit: f64,
    },
}

fn hidden(hd: &Option<serde_json::Value>) -> bool {
    hd.as_ref().is_some_and(is_truthy)
}

fn required<'a>(p: &'a Option<RawProp>, what: &str) -> LottieResult<&'a RawProp> {
    p.as_ref().ok_or_else(|| {
        crate::foundation::error::LottieError::resource_load(format!("{what}: missing property"))
    })
}

/// Compile one group's item list. The group `tr` item (if any) is returned separately.
pub(crate) fn compile_items(
    raw: &[RawShape],
    what: &str,
) -> LottieResult<(Vec<ShapeNode>, TransformAnim)> {
    let mut items = Vec::with_capacity(raw.len());
    let mut transform = TransformAnim::default();

    for shape in raw {
        match shape {
            RawShape::Group { it, hd } => {
                if hidden(hd) {
                    continue;
                }
                let (children, tr) = compile_items(it, what)?;
                items.push(ShapeNode::Group {
                    items: children,
                    transform: tr,
                });
            }
            RawShape::Rect { p, s, r, hd } => {
                if hidden(hd) {
                    continue;
                }
                items.push(ShapeNode::Rect {
                    center: Animated::parse_or(p.as_ref(), Vec2::ZERO, what)?,
                    size: Animated::parse(required(s, what)?, what)?,
                    roundness: Animated::parse_or(r.as_ref(), 0.0, what)?,
                });
            }
            RawShape::Ellipse { p, s, hd } => {
                if hidden(hd) {
                    continue;
                }
                items.push(ShapeNode::Ellipse {
                    center: Animated::parse_or(p.as_ref(), Vec2::ZERO, what)?,
                    size: Animated::parse(required(s, what)?, what)?,
                });
            }
            RawShape::Path { ks, hd } => {
                if hidden(hd) {
                    continue;
                }
                items.push(ShapeNode::Path(Animated::parse(required(ks, what)?, what)?));
            }
            RawShape::Fill { c, o, r, hd } => {
                if hidden(hd) {
                    continue;
                }
                items.push(ShapeNode::Fill {
                    color: Animated::parse_or(c.as_ref(), [0.0, 0.0, 0.0, 1.0], what)?,
                    opacity_pct: Animated::parse_or(o.as_ref(), 100.0, what)?,
                    rule: if *r == Some(2.0) {
                        FillRule::EvenOdd
                    } else {
                        FillRule::NonZero
                    },
                });
            }
            RawShape::Stroke {
                c,
                o,
                w,
                lc,
                lj,
                ml,
                hd,
            } => {
                if hidden(hd) {
                    continue;
                }
                items.push(ShapeNode::Stroke {
                    color: Animated::parse_or(c.as_ref(), [0.0, 0.0, 0.0, 1.0], what)?,
                    opacity_pct: Animated::parse_or(o.as_ref(), 100.0, what)?,
                    width: Animated::parse_or(w.as_ref(), 1.0, what)?,
                    cap: match lc.map(|v| v as i64) {
                        Some(2) => LineCap::Round,
                        Some(3) => LineCap::Square,
                        _ => LineCap::Butt,
                    },
                    join: match lj.map(|v| v as i64) {
                        Some(2) => LineJoin::Round,
                        Some(3) => LineJoin::Bevel,
                        _ => LineJoin::Miter,
                    },
                    miter_limit: ml.unwrap_or(4.0),
                });
            }
            RawShape::Transform(tr) => {
                transform = TransformAnim::compile(tr, what)?;
            }
            RawShape::Unsupported => {
                tracing::warn!(layer = what, "ignoring unsupported shape item");
            }
        }
    }

    Ok((items, transform))
}

/// Geometry collected while walking a group, waiting for a fill or stroke.
struct Geometry {
    path: BezPath,
    transform: Affine,
}

/// Evaluate `items` at `frame`, appending paint ops top-most first.
///
/// Returns the group's geometry so fills later in the parent group can paint it too.
pub(crate) fn eval_items(
    items: &[ShapeNode],
    frame: f64,
    transform: Affine,
    opacity: f64,
    out: &mut Vec<DrawItem>,
) -> Vec<(BezPath, Affine)> {
    let mut geometry: Vec<Geometry> = Vec::new();

    for item in items {
        match item {
            ShapeNode::Group {
                items: children,
                transform: tr,
            } => {
                let child_xf = transform * tr.matrix(frame);
                let child_opacity = opacity * tr.opacity(frame);
                let nested = eval_items(children, frame, child_xf, child_opacity, out);
                geometry.extend(
                    nested
                        .into_iter()
                        .map(|(path, transform)| Geometry { path, transform }),
                );
            }
            ShapeNode::Rect {
                center,
                size,
                roundness,
            } => {
                let c = center.sample(frame);
                let s = size.sample(frame);
                let rect = Rect::from_center_size(c.to_point(), (s.x.abs(), s.y.abs()));
                let radius = roundness.sample(frame).max(0.0);
                let path = if radius > 0.0 {
                    rect.to_rounded_rect(radius).to_path(CURVE_TOLERANCE)
                } else {
                    rect.to_path(CURVE_TOLERANCE)
                };
                geometry.push(Geometry { path, transform });
            }
            ShapeNode::Ellipse { center, size } => {
                let c = center.sample(frame);
                let s = size.sample(frame);
                let ellipse = kurbo::Ellipse::new(
                    Point::new(c.x, c.y),
                    (s.x.abs() / 2.0, s.y.abs() / 2.0),
                    0.0,
                );
                geometry.push(Geometry {
                    path: ellipse.to_path(CURVE_TOLERANCE),
                    transform,
                });
            }
            ShapeNode::Path(data) => {
                geometry.push(Geometry {
                    path: data.sample(frame).to_bezpath(),
                    transform,
                });
            }
            ShapeNode::Fill {
                color,
                opacity_pct,
                rule,
            } => {
                let alpha = opacity * (opacity_pct.sample(frame) / 100.0).clamp(0.0, 1.0);
                let color = color_to_rgba8(color.sample(frame), alpha);
                if color[3] == 0 {
                    continue;
                }
                for g in &geometry {
                    out.push(DrawItem::Fill {
                        path: g.path.clone(),
                        transform: g.transform,
                        color,
                        rule: *rule,
                    });
                }
            }
            ShapeNode::Stroke {
                color,
                opacity_pct,
                width,
                cap,
                join,
                miter_limit,
            } => {
                let alpha = opacity * (opacity_pct.sample(frame) / 100.0).clamp(0.0, 1.0);
                let color = color_to_rgba8(color.sample(frame), alpha);
                let width = width.sample(frame);
                if color[3] == 0 || width <= 0.0 {
                    continue;
                }
                let style = StrokeStyle {
                    width,
                    cap: *cap,
                    join: *join,
                    miter_limit: *miter_limit,
                };
                for g in &geometry {
                    out.push(DrawItem::Stroke {
                        path: g.path.clone(),
                        transform: g.transform,
                        color,
                        style,
                    });
                }
            }
        }
    }

    geometry
        .into_iter()
        .map(|g| (g.path, g.transform))
        .collect()
}

/// Lottie colors are `[r, g, b, a]` in `0..=1`; some exporters write `0..=255`.
pub(crate) fn color_to_rgba8(c: [f64; 4], opacity: f64) -> [u8; 4] {
    let scale = if c[..3].iter().any(|&v| v > 1.0) {
        1.0 / 255.0
    } else {
        1.0
    };
    let to_u8 = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    [
        to_u8(c[0] * scale),
        to_u8(c[1] * scale),
        to_u8(c[2] * scale),
        to_u8(c[3].clamp(0.0, 1.0) * opacity),
    ]
}

/// Parse `#rrggbb` (solid layer color).
pub(crate) fn parse_hex_color(s: &str) -> Option<[f64; 4]> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| -> Option<f64> {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .ok()
            .map(|v| f64::from(v) / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?, 1.0])
}

#[cfg(test)]
#[path = "../../../tests/unit/engine/lottie_shape.rs"]
mod tests;
