//! Lottie document loading and per-frame evaluation.
//!
//! Supported: shape layers (groups, rectangles, ellipses, bezier paths, fills, strokes, group
//! transforms), solid layers, null layers, layer parenting, split positions and keyframed
//! properties with hold and cubic-bezier easing. Image, precomp and text layers are skipped with a
//! warning.

use std::collections::HashMap;

use crate::engine::display::{DisplayList, DrawItem, FillRule};
use crate::foundation::core::{Affine, Rect, Size};
use crate::foundation::error::{LottieError, LottieResult};

pub(crate) mod anim;
pub(crate) mod model;
pub(crate) mod shape;

use model::{RawAnimation, RawLayer};
use shape::{ShapeNode, TransformAnim};

const LAYER_TY_SOLID: i64 = 1;
const LAYER_TY_NULL: i64 = 3;
const LAYER_TY_SHAPE: i64 = 4;

#[derive(Clone, Debug)]
pub(crate) enum LayerKind {
    /// Transform-only layer; also used for skipped layer types so children still resolve.
    Null,
    Solid { color: [f64; 4], size: Size },
    Shape(Vec<ShapeNode>),
}

#[derive(Clone, Debug)]
pub(crate) struct Layer {
    pub(crate) name: String,
    pub(crate) parent: Option<usize>,
    pub(crate) in_point: f64,
    pub(crate) out_point: f64,
    pub(crate) start_time: f64,
    pub(crate) hidden: bool,
    pub(crate) transform: TransformAnim,
    pub(crate) kind: LayerKind,
}

impl Layer {
    fn is_visible_at(&self, frame: f64) -> bool {
        !self.hidden && self.in_point <= frame && frame < self.out_point
    }
}

/// A compiled Lottie composition. Layers are stored top-most first, as in the document.
#[derive(Clone, Debug)]
pub(crate) struct Composition {
    pub(crate) name: Option<String>,
    pub(crate) frame_rate: f64,
    pub(crate) in_point: f64,
    pub(crate) out_point: f64,
    pub(crate) size: Size,
    pub(crate) layers: Vec<Layer>,
}

impl Composition {
    pub(crate) fn from_slice(bytes: &[u8]) -> LottieResult<Self> {
        let raw: RawAnimation = serde_json::from_slice(bytes)
            .map_err(|e| LottieError::resource_load(format!("invalid lottie json: {e}")))?;
        Self::compile(raw)
    }

    pub(crate) fn compile(raw: RawAnimation) -> LottieResult<Self> {
        if !(raw.fr.is_finite() && raw.fr > 0.0) {
            return Err(LottieError::resource_load(format!(
                "frame rate must be > 0, got {}",
                raw.fr
            )));
        }
        if !(raw.w.is_finite() && raw.h.is_finite() && raw.w > 0.0 && raw.h > 0.0) {
            return Err(LottieError::resource_load(format!(
                "composition size must be > 0, got {}x{}",
                raw.w, raw.h
            )));
        }
        if !(raw.ip.is_finite() && raw.op.is_finite()) {
            return Err(LottieError::resource_load("in/out points must be finite"));
        }

        let by_ind: HashMap<i64, usize> = raw
            .layers
            .iter()
            .enumerate()
            .filter_map(|(i, l)| l.ind.map(|ind| (ind as i64, i)))
            .collect();

        let mut layers = Vec::with_capacity(raw.layers.len());
        for (i, rl) in raw.layers.iter().enumerate() {
            layers.push(compile_layer(i, rl, &by_ind, raw.ip, raw.op)?);
        }
        check_parent_chains(&layers)?;

        Ok(Self {
            name: raw.nm,
            frame_rate: raw.fr,
            in_point: raw.ip,
            out_point: raw.op,
            size: Size::new(raw.w, raw.h),
            layers,
        })
    }

    pub(crate) fn frame_count(&self) -> u32 {
        let span = (self.out_point - self.in_point).floor();
        if span <= 0.0 {
            0
        } else {
            span.min(f64::from(u32::MAX)) as u32
        }
    }

    pub(crate) fn duration_secs(&self) -> f64 {
        ((self.out_point - self.in_point) / self.frame_rate).max(0.0)
    }

    /// Composition frame time for a zero-based frame index.
    pub(crate) fn frame_time(&self, index: u32) -> f64 {
        self.in_point + f64::from(index)
    }

    /// Evaluate the composition at frame `index` into a bottom-first display list.
    pub(crate) fn display_list(&self, index: u32) -> DisplayList {
        let frame = self.frame_time(index);
        let mut top_first = Vec::new();

        for layer in &self.layers {
            if !layer.is_visible_at(frame) {
                continue;
            }
            let local = frame - layer.start_time;
            let matrix = self.world_matrix(layer, frame);
            let opacity = layer.transform.opacity(local);
            if opacity <= 0.0 {
                continue;
            }

            match &layer.kind {
                LayerKind::Null => {}
                LayerKind::Solid { color, size } => {
                    let color = shape::color_to_rgba8(*color, opacity);
                    if color[3] == 0 {
                        continue;
                    }
                    let rect = Rect::from_origin_size((0.0, 0.0), *size);
                    top_first.push(DrawItem::Fill {
                        path: kurbo::Shape::to_path(&rect, 0.1),
                        transform: matrix,
                        color,
                        rule: FillRule::NonZero,
                    });
                }
                LayerKind::Shape(items) => {
                    shape::eval_items(items, local, matrix, opacity, &mut top_first);
                }
            }
        }

        top_first.reverse();
        DisplayList { items: top_first }
    }

    /// Layer transform including its parents, each sampled in its own local time.
    fn world_matrix(&self, layer: &Layer, frame: f64) -> Affine {
        let mut m = layer.transform.matrix(frame - layer.start_time);
        let mut next = layer.parent;
        while let Some(idx) = next {
            let Some(parent) = self.layers.get(idx) else {
                break;
            };
            m = parent.transform.matrix(frame - parent.start_time) * m;
            next = parent.parent;
        }
        m
    }
}

fn compile_layer(
    position: usize,
    rl: &RawLayer,
    by_ind: &HashMap<i64, usize>,
    comp_ip: f64,
    comp_op: f64,
) -> LottieResult<Layer> {
    let name = rl
        .nm
        .clone()
        .unwrap_or_else(|| format!("layer {position}"));
    let transform = match &rl.ks {
        Some(ks) => TransformAnim::compile(ks, &name)?,
        None => TransformAnim::default(),
    };

    let parent = match rl.parent {
        Some(p) => match by_ind.get(&(p as i64)) {
            Some(&idx) if idx != position => Some(idx),
            _ => {
                tracing::warn!(layer = %name, parent = p, "layer parent not found; ignoring");
                None
            }
        },
        None => None,
    };

    let kind = match rl.ty as i64 {
        LAYER_TY_SHAPE => {
            let (items, _) = shape::compile_items(&rl.shapes, &name)?;
            LayerKind::Shape(items)
        }
        LAYER_TY_SOLID => {
            let color = rl
                .sc
                .as_deref()
                .and_then(shape::parse_hex_color)
                .ok_or_else(|| {
                    LottieError::resource_load(format!("{name}: solid layer without a valid color"))
                })?;
            let size = Size::new(rl.sw.unwrap_or(0.0), rl.sh.unwrap_or(0.0));
            LayerKind::Solid { color, size }
        }
        LAYER_TY_NULL => LayerKind::Null,
        other => {
            tracing::warn!(layer = %name, ty = other, "unsupported layer type; skipping");
            LayerKind::Null
        }
    };

    Ok(Layer {
        name,
        parent,
        in_point: rl.ip.unwrap_or(comp_ip),
        out_point: rl.op.unwrap_or(comp_op),
        start_time: rl.st,
        hidden: rl.hd.as_ref().is_some_and(anim::is_truthy),
        transform,
        kind,
    })
}

fn check_parent_chains(layers: &[Layer]) -> LottieResult<()> {
    for (i, layer) in layers.iter().enumerate() {
        let mut steps = 0usize;
        let mut next = layer.parent;
        while let Some(idx) = next {
            steps += 1;
            if steps > layers.len() {
                return Err(LottieError::resource_load(format!(
                    "{}: layer parent chain forms a cycle (layer {i})",
                    layer.name
                )));
            }
            next = layers.get(idx).and_then(|l| l.parent);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../../tests/unit/engine/lottie_composition.rs"]
mod tests;
