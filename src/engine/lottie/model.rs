//! Serde model of the Lottie document subset understood by the engine.
//!
//! Fields are kept close to the wire names; [`super::Composition::compile`] turns this into the
//! evaluated form.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub(crate) struct RawAnimation {
    #[serde(default)]
    pub(crate) nm: Option<String>,
    pub(crate) fr: f64,
    pub(crate) ip: f64,
    pub(crate) op: f64,
    pub(crate) w: f64,
    pub(crate) h: f64,
    #[serde(default)]
    pub(crate) layers: Vec<RawLayer>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLayer {
    pub(crate) ty: f64,
    #[serde(default)]
    pub(crate) nm: Option<String>,
    #[serde(default)]
    pub(crate) ind: Option<f64>,
    #[serde(default)]
    pub(crate) parent: Option<f64>,
    #[serde(default)]
    pub(crate) ip: Option<f64>,
    #[serde(default)]
    pub(crate) op: Option<f64>,
    #[serde(default)]
    pub(crate) st: f64,
    #[serde(default)]
    pub(crate) hd: Option<Value>,
    #[serde(default)]
    pub(crate) ks: Option<RawTransform>,
    #[serde(default)]
    pub(crate) shapes: Vec<RawShape>,
    #[serde(default)]
    pub(crate) sc: Option<String>,
    #[serde(default)]
    pub(crate) sw: Option<f64>,
    #[serde(default)]
    pub(crate) sh: Option<f64>,
}

/// An animatable property: `{"a": 0, "k": value}` or `{"a": 1, "k": [keyframes]}`.
///
/// Split positions use `{"s": true, "x": {..}, "y": {..}}` instead of `k`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawProp {
    #[serde(default)]
    pub(crate) k: Option<Value>,
    #[serde(default)]
    pub(crate) s: Option<Value>,
    #[serde(default)]
    pub(crate) x: Option<Value>,
    #[serde(default)]
    pub(crate) y: Option<Value>,
}

impl RawProp {
    pub(crate) fn is_split(&self) -> bool {
        self.s.as_ref().is_some_and(super::anim::is_truthy)
    }

    /// Component property of a split position.
    pub(crate) fn component(&self, key: &str) -> Option<RawProp> {
        let v = match key {
            "x" => self.x.as_ref()?,
            "y" => self.y.as_ref()?,
            _ => return None,
        };
        serde_json::from_value(v.clone()).ok()
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawTransform {
    #[serde(default)]
    pub(crate) a: Option<RawProp>,
    #[serde(default)]
    pub(crate) p: Option<RawProp>,
    #[serde(default)]
    pub(crate) s: Option<RawProp>,
    #[serde(default)]
    pub(crate) r: Option<RawProp>,
    #[serde(default)]
    pub(crate) o: Option<RawProp>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "ty")]
pub(crate) enum RawShape {
    #[serde(rename = "gr")]
    Group {
        #[serde(default)]
        it: Vec<RawShape>,
        #[serde(default)]
        hd: Option<Value>,
    },
    #[serde(rename = "rc")]
    Rect {
        #[serde(default)]
        p: Option<RawProp>,
        #[serde(default)]
        s: Option<RawProp>,
        #[serde(default)]
        r: Option<RawProp>,
        #[serde(default)]
        hd: Option<Value>,
    },
    #[serde(rename = "el")]
    Ellipse {
        #[serde(default)]
        p: Option<RawProp>,
        #[serde(default)]
        s: Option<RawProp>,
        #[serde(default)]
        hd: Option<Value>,
    },
    #[serde(rename = "sh")]
    Path {
        #[serde(default)]
        ks: Option<RawProp>,
        #[serde(default)]
        hd: Option<Value>,
    },
    #[serde(rename = "fl")]
    Fill {
        #[serde(default)]
        c: Option<RawProp>,
        #[serde(default)]
        o: Option<RawProp>,
        #[serde(default)]
        r: Option<f64>,
        #[serde(default)]
        hd: Option<Value>,
    },
    #[serde(rename = "st")]
    Stroke {
        #[serde(default)]
        c: Option<RawProp>,
        #[serde(default)]
        o: Option<RawProp>,
        #[serde(default)]
        w: Option<RawProp>,
        #[serde(default)]
        lc: Option<f64>,
        #[serde(default)]
        lj: Option<f64>,
        #[serde(default)]
        ml: Option<f64>,
        #[serde(default)]
        hd: Option<Value>,
    },
    #[serde(rename = "tr")]
    Transform(RawTransform),
    #[serde(other)]
    Unsupported,
}
