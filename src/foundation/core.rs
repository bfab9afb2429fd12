pub use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};

/// Orientation and alpha convention of the 32-bit pixels written into a render target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Colorspace {
    /// `a << 24 | b << 16 | g << 8 | r`, premultiplied alpha.
    Abgr8888,
    /// `a << 24 | r << 16 | g << 8 | b`, premultiplied alpha.
    #[default]
    Argb8888,
    /// `a << 24 | b << 16 | g << 8 | r`, straight alpha.
    Abgr8888S,
    /// `a << 24 | r << 16 | g << 8 | b`, straight alpha.
    Argb8888S,
}

impl Colorspace {
    /// Return `true` when color channels are stored premultiplied by alpha.
    pub fn is_premultiplied(self) -> bool {
        matches!(self, Self::Abgr8888 | Self::Argb8888)
    }

    /// Pack one premultiplied pixel into this colorspace.
    pub fn pack(self, px: Rgba8Premul) -> u32 {
        let Rgba8Premul { r, g, b, a } = if self.is_premultiplied() {
            px
        } else {
            px.to_straight()
        };
        let (r, g, b, a) = (u32::from(r), u32::from(g), u32::from(b), u32::from(a));
        match self {
            Self::Abgr8888 | Self::Abgr8888S => (a << 24) | (b << 16) | (g << 8) | r,
            Self::Argb8888 | Self::Argb8888S => (a << 24) | (r << 16) | (g << 8) | b,
        }
    }

    /// Unpack one pixel of this colorspace into straight-alpha RGBA8.
    pub fn unpack_straight(self, v: u32) -> [u8; 4] {
        let a = (v >> 24) as u8;
        let hi = (v >> 16) as u8;
        let g = (v >> 8) as u8;
        let lo = v as u8;
        let (r, b) = match self {
            Self::Abgr8888 | Self::Abgr8888S => (lo, hi),
            Self::Argb8888 | Self::Argb8888S => (hi, lo),
        };
        if self.is_premultiplied() {
            let s = Rgba8Premul { r, g, b, a }.to_straight();
            [s.r, s.g, s.b, s.a]
        } else {
            [r, g, b, a]
        }
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Undo premultiplication. Fully transparent pixels map to transparent black.
    ///
    /// Straight values are returned in this same struct; callers must track which convention a
    /// value carries.
    pub fn to_straight(self) -> Self {
        if self.a == 0 {
            return Self::transparent();
        }
        let a = u16::from(self.a);
        let unpremul = |c: u8| -> u8 { ((u16::from(c) * 255 + a / 2) / a).min(255) as u8 };
        Self {
            r: unpremul(self.r),
            g: unpremul(self.g),
            b: unpremul(self.b),
            a: self.a,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
