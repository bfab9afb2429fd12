use std::sync::Arc;

use crate::foundation::core::{Affine, BezPath};

/// Winding rule for fills.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct StrokeStyle {
    pub(crate) width: f64,
    pub(crate) cap: LineCap,
    pub(crate) join: LineJoin,
    pub(crate) miter_limit: f64,
}

/// One paint operation in content (native) coordinates.
///
/// `transform` maps the item's local geometry into content space; the picture transform is
/// applied on top at raster time. Colors are straight-alpha RGBA8.
#[derive(Clone)]
pub(crate) enum DrawItem {
    Fill {
        path: BezPath,
        transform: Affine,
        color: [u8; 4],
        rule: FillRule,
    },
    Stroke {
        path: BezPath,
        transform: Affine,
        color: [u8; 4],
        style: StrokeStyle,
    },
    Svg {
        content_id: u64,
        tree: Arc<usvg::Tree>,
        transform: Affine,
    },
}

/// Paint operations for one frame, bottom-most first.
#[derive(Clone, Default)]
pub(crate) struct DisplayList {
    pub(crate) items: Vec<DrawItem>,
}

#[cfg(test)]
impl DisplayList {
    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }
}
