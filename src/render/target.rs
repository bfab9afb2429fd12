use crate::foundation::core::{Colorspace, Size};
use crate::foundation::error::{LottieError, LottieResult};

/// A caller-owned 32-bit pixel buffer that frames are rendered into.
///
/// Rows are `stride` pixels apart; only the first `width` pixels of each of the first `height`
/// rows are written.
pub struct RenderTarget<'buf> {
    buffer: &'buf mut [u32],
    stride: u32,
    width: u32,
    height: u32,
    colorspace: Colorspace,
}

impl<'buf> RenderTarget<'buf> {
    /// Bind a buffer. Requires non-zero dimensions, `stride >= width` and
    /// `buffer.len() >= stride * height`.
    pub fn new(
        buffer: &'buf mut [u32],
        stride: u32,
        width: u32,
        height: u32,
        colorspace: Colorspace,
    ) -> LottieResult<Self> {
        if width == 0 || height == 0 {
            return Err(LottieError::validation(format!(
                "target size must be non-zero, got {width}x{height}"
            )));
        }
        if stride < width {
            return Err(LottieError::validation(format!(
                "stride {stride} is smaller than width {width}"
            )));
        }
        let needed = (stride as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| LottieError::validation("stride * height overflows"))?;
        if buffer.len() < needed {
            return Err(LottieError::validation(format!(
                "buffer holds {} pixels, need at least {needed} ({stride} x {height})",
                buffer.len()
            )));
        }
        Ok(Self {
            buffer,
            stride,
            width,
            height,
            colorspace,
        })
    }

    /// Pixels per row.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Target size as floating point, for geometry.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Pixel layout written into the buffer.
    pub fn colorspace(&self) -> Colorspace {
        self.colorspace
    }

    /// The whole bound buffer.
    pub fn buffer(&self) -> &[u32] {
        self.buffer
    }

    pub(crate) fn rows_mut(&mut self) -> impl Iterator<Item = &mut [u32]> + '_ {
        let width = self.width as usize;
        self.buffer
            .chunks_mut(self.stride as usize)
            .take(self.height as usize)
            .map(move |row| &mut row[..width])
    }

    /// Zero the `width x height` region.
    pub(crate) fn clear(&mut self) {
        for row in self.rows_mut() {
            row.fill(0);
        }
    }
}

impl std::fmt::Debug for RenderTarget<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderTarget")
            .field("stride", &self.stride)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("colorspace", &self.colorspace)
            .finish()
    }
}

/// Convert a rendered region into tightly packed straight-alpha RGBA8 bytes.
pub fn rgba8_from_buffer(
    buffer: &[u32],
    stride: u32,
    width: u32,
    height: u32,
    colorspace: Colorspace,
) -> LottieResult<Vec<u8>> {
    if width == 0 || height == 0 || stride == 0 {
        return Err(LottieError::validation(format!(
            "region must be non-empty, got {width}x{height} with stride {stride}"
        )));
    }
    let needed = (stride as usize).saturating_mul(height as usize);
    if stride < width || buffer.len() < needed {
        return Err(LottieError::validation(
            "buffer too small for the requested region",
        ));
    }
    let mut out = Vec::with_capacity((width as usize) * (height as usize) * 4);
    for row in buffer
        .chunks(stride as usize)
        .take(height as usize)
    {
        for &px in &row[..width as usize] {
            out.extend_from_slice(&colorspace.unpack_straight(px));
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/target.rs"]
mod tests;
