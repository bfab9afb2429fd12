use serde_json::Value;

use crate::engine::lottie::model::RawProp;
use crate::foundation::core::{BezPath, Vec2};
use crate::foundation::error::{LottieError, LottieResult};

pub(crate) trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for [f64; 4] {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        std::array::from_fn(|i| a[i] + (b[i] - a[i]) * t)
    }
}

impl Lerp for PathData {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        if a.vertices.len() != b.vertices.len() {
            return if t < 1.0 { a.clone() } else { b.clone() };
        }
        let mix = |xs: &[Vec2], ys: &[Vec2]| -> Vec<Vec2> {
            xs.iter()
                .zip(ys)
                .map(|(x, y)| <Vec2 as Lerp>::lerp(x, y, t))
                .collect()
        };
        Self {
            closed: a.closed,
            vertices: mix(&a.vertices, &b.vertices),
            in_tangents: mix(&a.in_tangents, &b.in_tangents),
            out_tangents: mix(&a.out_tangents, &b.out_tangents),
        }
    }
}

/// Conversion from a Lottie JSON value (`k` or a keyframe `s`).
pub(crate) trait FromJson: Sized {
    fn from_json(v: &Value) -> Option<Self>;
}

fn number_list(v: &Value) -> Option<Vec<f64>> {
    match v {
        Value::Number(n) => n.as_f64().map(|x| vec![x]),
        Value::Array(items) => items.iter().map(Value::as_f64).collect(),
        _ => None,
    }
}

impl FromJson for f64 {
    fn from_json(v: &Value) -> Option<Self> {
        number_list(v)?.first().copied()
    }
}

impl FromJson for Vec2 {
    fn from_json(v: &Value) -> Option<Self> {
        match number_list(v)?.as_slice() {
            [x, y, ..] => Some(Vec2::new(*x, *y)),
            [x] => Some(Vec2::new(*x, *x)),
            [] => None,
        }
    }
}

impl FromJson for [f64; 4] {
    fn from_json(v: &Value) -> Option<Self> {
        match number_list(v)?.as_slice() {
            [r, g, b, a, ..] => Some([*r, *g, *b, *a]),
            [r, g, b] => Some([*r, *g, *b, 1.0]),
            _ => None,
        }
    }
}

/// Bezier path vertices with tangents relative to their vertex.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct PathData {
    pub(crate) closed: bool,
    pub(crate) vertices: Vec<Vec2>,
    pub(crate) in_tangents: Vec<Vec2>,
    pub(crate) out_tangents: Vec<Vec2>,
}

impl PathData {
    pub(crate) fn to_bezpath(&self) -> BezPath {
        let mut path = BezPath::new();
        let n = self.vertices.len();
        if n == 0 {
            return path;
        }
        let tangent = |list: &[Vec2], i: usize| list.get(i).copied().unwrap_or(Vec2::ZERO);

        path.move_to(self.vertices[0].to_point());
        let segments = if self.closed { n } else { n - 1 };
        for i in 0..segments {
            let j = (i + 1) % n;
            let from = self.vertices[i];
            let to = self.vertices[j];
            let c1 = from + tangent(&self.out_tangents, i);
            let c2 = to + tangent(&self.in_tangents, j);
            path.curve_to(c1.to_point(), c2.to_point(), to.to_point());
        }
        if self.closed {
            path.close_path();
        }
        path
    }
}

impl FromJson for PathData {
    fn from_json(v: &Value) -> Option<Self> {
        // Keyframed shapes wrap the path in a one-element array.
        let obj = match v {
            Value::Array(items) => items.first()?.as_object()?,
            Value::Object(obj) => obj,
            _ => return None,
        };
        let points = |key: &str| -> Option<Vec<Vec2>> {
            match obj.get(key) {
                None => Some(Vec::new()),
                Some(Value::Array(items)) => items.iter().map(Vec2::from_json).collect(),
                Some(_) => None,
            }
        };
        let vertices = points("v")?;
        let in_tangents = points("i")?;
        let out_tangents = points("o")?;
        let closed = obj.get("c").is_some_and(is_truthy);
        Some(Self {
            closed,
            vertices,
            in_tangents,
            out_tangents,
        })
    }
}

pub(crate) fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        _ => false,
    }
}

/// Easing applied between two keyframes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Ease {
    Linear,
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl Ease {
    pub(crate) fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicBezier { x1, y1, x2, y2 } => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let u = solve_bezier_param(x1, x2, t);
                bezier_axis(y1, y2, u)
            }
        }
    }
}

fn bezier_axis(p1: f64, p2: f64, u: f64) -> f64 {
    let v = 1.0 - u;
    3.0 * v * v * u * p1 + 3.0 * v * u * u * p2 + u * u * u
}

fn bezier_axis_slope(p1: f64, p2: f64, u: f64) -> f64 {
    let v = 1.0 - u;
    3.0 * v * v * p1 + 6.0 * v * u * (p2 - p1) + 3.0 * u * u * (1.0 - p2)
}

/// Find `u` with `bezier_axis(x1, x2, u) == x`. Newton first, bisection if it stalls.
fn solve_bezier_param(x1: f64, x2: f64, x: f64) -> f64 {
    let mut u = x;
    for _ in 0..8 {
        let err = bezier_axis(x1, x2, u) - x;
        if err.abs() < 1e-7 {
            return u;
        }
        let slope = bezier_axis_slope(x1, x2, u);
        if slope.abs() < 1e-6 {
            break;
        }
        u -= err / slope;
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    u = x;
    for _ in 0..64 {
        let v = bezier_axis(x1, x2, u);
        if (v - x).abs() < 1e-7 {
            break;
        }
        if v < x {
            lo = u;
        } else {
            hi = u;
        }
        u = 0.5 * (lo + hi);
    }
    u
}

#[derive(Clone, Debug)]
pub(crate) struct Keyframe<T> {
    pub(crate) frame: f64,
    pub(crate) value: T,
    pub(crate) ease: Ease, // toward the next key
    pub(crate) hold: bool,
}

/// A property that is either constant or keyframed in composition frame time.
#[derive(Clone, Debug)]
pub(crate) enum Animated<T> {
    Static(T),
    Keyframes(Vec<Keyframe<T>>), // sorted by frame, non-empty
}

impl<T> Animated<T>
where
    T: Lerp + Clone + FromJson,
{
    pub(crate) fn constant(value: T) -> Self {
        Self::Static(value)
    }

    /// Parse an optional property, falling back to `default` when absent.
    pub(crate) fn parse_or(prop: Option<&RawProp>, default: T, what: &str) -> LottieResult<Self> {
        match prop {
            Some(p) => Self::parse(p, what),
            None => Ok(Self::Static(default)),
        }
    }

    pub(crate) fn parse(prop: &RawProp, what: &str) -> LottieResult<Self> {
        let k = prop
            .k
            .as_ref()
            .ok_or_else(|| LottieError::resource_load(format!("{what}: property has no value")))?;
        if let Some(keys) = keyframe_objects(k) {
            return Self::parse_keyframes(keys, what);
        }
        T::from_json(k)
            .map(Self::Static)
            .ok_or_else(|| LottieError::resource_load(format!("{what}: unsupported value {k}")))
    }

    fn parse_keyframes(keys: &[Value], what: &str) -> LottieResult<Self> {
        let mut out: Vec<Keyframe<T>> = Vec::with_capacity(keys.len());
        let mut pending_end: Option<T> = None;

        for key in keys {
            let frame = key.get("t").and_then(Value::as_f64).ok_or_else(|| {
                LottieError::resource_load(format!("{what}: keyframe without time"))
            })?;
            let value = match key.get("s") {
                Some(s) => Some(T::from_json(s).ok_or_else(|| {
                    LottieError::resource_load(format!("{what}: unsupported keyframe value {s}"))
                })?),
                None => pending_end.take().or_else(|| out.last().map(|k| k.value.clone())),
            };
            let Some(value) = value else {
                continue;
            };
            pending_end = key.get("e").and_then(T::from_json);

            out.push(Keyframe {
                frame,
                value,
                ease: keyframe_ease(key),
                hold: key.get("h").is_some_and(is_truthy),
            });
        }

        if let Some(end) = pending_end
            && let Some(last) = out.last()
        {
            // Legacy exports carry the final value only as the last key's `e`.
            let frame = last.frame;
            out.push(Keyframe {
                frame,
                value: end,
                ease: Ease::Linear,
                hold: false,
            });
        }

        if out.is_empty() {
            return Err(LottieError::resource_load(format!(
                "{what}: keyframed property has no usable keys"
            )));
        }
        if !out.windows(2).all(|w| w[0].frame <= w[1].frame) {
            return Err(LottieError::resource_load(format!(
                "{what}: keyframes must be sorted by time"
            )));
        }
        Ok(Self::Keyframes(out))
    }

    pub(crate) fn sample(&self, frame: f64) -> T {
        let keys = match self {
            Self::Static(v) => return v.clone(),
            Self::Keyframes(keys) => keys,
        };

        let idx = keys.partition_point(|k| k.frame <= frame);
        if idx == 0 {
            return keys[0].value.clone();
        }
        if idx >= keys.len() {
            return keys[keys.len() - 1].value.clone();
        }

        let a = &keys[idx - 1];
        let b = &keys[idx];
        let span = b.frame - a.frame;
        if a.hold || span <= 0.0 {
            return a.value.clone();
        }
        let t = (frame - a.frame) / span;
        T::lerp(&a.value, &b.value, a.ease.apply(t))
    }

    #[cfg(test)]
    pub(crate) fn is_static(&self) -> bool {
        matches!(self, Self::Static(_))
    }
}

fn keyframe_objects(k: &Value) -> Option<&[Value]> {
    let items = k.as_array()?;
    let first = items.first()?;
    (first.is_object() && first.get("t").is_some()).then_some(items.as_slice())
}

fn keyframe_ease(key: &Value) -> Ease {
    fn handle(v: Option<&Value>) -> Option<(f64, f64)> {
        let v = v?;
        let x = f64::from_json(v.get("x")?)?;
        let y = f64::from_json(v.get("y")?)?;
        Some((x, y))
    }

    match (handle(key.get("o")), handle(key.get("i"))) {
        (Some((x1, y1)), Some((x2, y2))) => Ease::CubicBezier {
            x1: x1.clamp(0.0, 1.0),
            y1,
            x2: x2.clamp(0.0, 1.0),
            y2,
        },
        _ => Ease::Linear,
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/engine/lottie_anim.rs"]
mod tests;
