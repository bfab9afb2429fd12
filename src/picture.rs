use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::engine::content::Content;
use crate::engine::display::DisplayList;
use crate::foundation::core::{Affine, Rect, Size};

static NEXT_PICTURE_ID: AtomicU64 = AtomicU64::new(1);

/// The drawable content of an [`crate::Animation`].
///
/// A picture is never built directly; borrow it through [`crate::Animation::picture`] or
/// [`crate::Animation::picture_mut`]. Size, transform and clip are plain state read by the canvas
/// when it is updated.
pub struct Picture {
    id: u64,
    content: Arc<Content>,
    frame: u32,
    native: Size,
    size: Size,
    transform: Affine,
    clip: Option<Rect>,
}

/// Everything the canvas needs to draw one picture, captured at `update` time.
#[derive(Clone)]
pub(crate) struct PaintSnapshot {
    pub(crate) picture_id: u64,
    pub(crate) frame: u32,
    pub(crate) display_list: DisplayList,
    /// Native content space to device space.
    pub(crate) content_transform: Affine,
    /// Clip rectangle in sized picture space and the transform that maps it to device space.
    pub(crate) clip: Option<(Rect, Affine)>,
}

impl Picture {
    pub(crate) fn new(content: Arc<Content>) -> Self {
        let native = content.native_size();
        Self {
            id: NEXT_PICTURE_ID.fetch_add(1, Ordering::Relaxed),
            content,
            frame: 0,
            native,
            size: native,
            transform: Affine::IDENTITY,
            clip: None,
        }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn set_frame(&mut self, frame: u32) {
        self.frame = frame;
    }

    pub(crate) fn frame(&self) -> u32 {
        self.frame
    }

    /// Intrinsic size of the content.
    pub fn native_size(&self) -> Size {
        self.native
    }

    /// Size the native content box is stretched to.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Stretch the content to `size`. Each axis scales independently; the origin stays put.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Current transform.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Replace the transform. It is applied after the size fit.
    pub fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    /// Current clip rectangle, if any.
    pub fn clip(&self) -> Option<Rect> {
        self.clip
    }

    /// Clip drawing to `clip`, given in sized picture space (before the transform).
    ///
    /// A rectangle with no area hides the picture entirely.
    pub fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip;
    }

    /// Scale from native content space to sized picture space.
    fn fit(&self) -> Affine {
        let sx = if self.native.width > 0.0 {
            self.size.width / self.native.width
        } else {
            1.0
        };
        let sy = if self.native.height > 0.0 {
            self.size.height / self.native.height
        } else {
            1.0
        };
        Affine::scale_non_uniform(sx, sy)
    }

    /// Evaluate the current frame and capture the draw state.
    pub(crate) fn snapshot(&self) -> PaintSnapshot {
        PaintSnapshot {
            picture_id: self.id,
            frame: self.frame,
            display_list: self.content.display_list(self.frame),
            content_transform: self.transform * self.fit(),
            clip: self.clip.map(|r| (r, self.transform)),
        }
    }
}

impl std::fmt::Debug for Picture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Picture")
            .field("id", &self.id)
            .field("frame", &self.frame)
            .field("native", &self.native)
            .field("size", &self.size)
            .field("transform", &self.transform)
            .field("clip", &self.clip)
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/unit/picture.rs"]
mod tests;
