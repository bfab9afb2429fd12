use crate::animation::Animation;
use crate::foundation::core::Size;
use crate::foundation::error::{LottieError, LottieResult};
use crate::render::canvas::Canvas;
use crate::render::geometry::{FrameOpts, TransformPipeline};
use crate::render::target::RenderTarget;

enum Slot<'buf> {
    /// No frame rendered yet; the canvas is created on first use.
    Unbound(RenderTarget<'buf>),
    Bound(Canvas<'buf>),
    /// Canvas creation failed. The compositor cannot render any more.
    Failed,
}

/// Renders frames of one [`Animation`] into one caller-owned buffer.
///
/// The target is fixed at construction. The canvas is created and the picture pushed on the first
/// [`FrameCompositor::render_frame`] call, then reused for every later frame.
pub struct FrameCompositor<'buf> {
    animation: Animation,
    target_size: Size,
    slot: Slot<'buf>,
}

impl<'buf> FrameCompositor<'buf> {
    /// Bind `animation` to `target`. No rendering happens until the first frame request.
    pub fn new(animation: Animation, target: RenderTarget<'buf>) -> Self {
        Self {
            animation,
            target_size: target.size(),
            slot: Slot::Unbound(target),
        }
    }

    /// The animation being rendered.
    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    /// Size of the bound target in pixels.
    pub fn target_size(&self) -> Size {
        self.target_size
    }

    /// The bound buffer, holding the last synchronized frame.
    pub fn buffer(&self) -> Option<&[u32]> {
        match &self.slot {
            Slot::Unbound(target) => Some(target.buffer()),
            Slot::Bound(canvas) => Some(canvas.target().buffer()),
            Slot::Failed => None,
        }
    }

    /// Give the animation back, releasing the canvas and the buffer borrow.
    pub fn into_animation(self) -> Animation {
        self.animation
    }

    /// Render frame `index` into the target.
    ///
    /// Index, crop and rotation are validated before the buffer is touched; on those errors the
    /// buffer keeps its previous contents. A [`LottieError::Draw`] leaves it undefined.
    #[tracing::instrument(skip(self), fields(frames = self.animation.frame_count()))]
    pub fn render_frame(&mut self, index: i64, opts: &FrameOpts) -> LottieResult<()> {
        let frame_count = self.animation.frame_count();
        let frame = u32::try_from(index)
            .ok()
            .filter(|&i| i < frame_count)
            .ok_or(LottieError::FrameIndexOutOfRange { index, frame_count })?;

        self.ensure_canvas()?;
        let pipeline = TransformPipeline::resolve(self.target_size, opts)?;

        let Slot::Bound(canvas) = &mut self.slot else {
            return Err(LottieError::surface_init("canvas unavailable"));
        };
        self.animation.select_frame(frame);
        pipeline.apply(self.animation.picture_mut());

        canvas.update(self.animation.picture())?;
        canvas.clear();
        canvas.draw()?;
        canvas.sync()
    }

    fn ensure_canvas(&mut self) -> LottieResult<()> {
        match std::mem::replace(&mut self.slot, Slot::Failed) {
            Slot::Bound(canvas) => {
                self.slot = Slot::Bound(canvas);
                Ok(())
            }
            Slot::Unbound(target) => {
                let mut canvas = Canvas::new(target)?;
                if canvas.is_empty() {
                    canvas.push(self.animation.picture())?;
                }
                self.slot = Slot::Bound(canvas);
                Ok(())
            }
            Slot::Failed => Err(LottieError::surface_init(
                "canvas creation failed earlier; compositor is unusable",
            )),
        }
    }
}

impl std::fmt::Debug for FrameCompositor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = match &self.slot {
            Slot::Unbound(_) => "unbound",
            Slot::Bound(_) => "bound",
            Slot::Failed => "failed",
        };
        f.debug_struct("FrameCompositor")
            .field("animation", &self.animation)
            .field("target_size", &self.target_size)
            .field("slot", &slot)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
