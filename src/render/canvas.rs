use crate::engine::{Engine, EngineGuard};
use crate::foundation::core::{Colorspace, Rgba8Premul};
use crate::foundation::error::{LottieError, LottieResult};
use crate::picture::{PaintSnapshot, Picture};
use crate::render::raster::{SvgRasterCache, encode_snapshot};
use crate::render::target::RenderTarget;

/// Where the canvas is in its push/update/draw/sync cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CanvasState {
    /// Bound to a target, nothing pushed.
    Created,
    /// A picture is pushed; ready for `update`/`clear`/`draw`.
    Pushed,
    /// `draw` recorded commands that `sync` has not written out yet.
    Drawing,
}

/// A rendering surface bound to one [`RenderTarget`] for its whole lifetime.
///
/// The canvas holds at most one picture. A frame is produced by `update`, `clear`, `draw` and
/// `sync`, in that order; after `sync` the target buffer holds the frame.
pub struct Canvas<'buf> {
    target: RenderTarget<'buf>,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    pushed: Option<u64>,
    pending: Option<PaintSnapshot>,
    state: CanvasState,
    svg_cache: SvgRasterCache,
    engine: EngineGuard,
}

impl<'buf> Canvas<'buf> {
    /// Bind a canvas to `target`, acquiring the engine.
    pub fn new(target: RenderTarget<'buf>) -> LottieResult<Self> {
        let engine = Engine::acquire()?;
        Self::with_engine(target, engine)
    }

    pub(crate) fn with_engine(target: RenderTarget<'buf>, engine: EngineGuard) -> LottieResult<Self> {
        let w: u16 = target.width().try_into().map_err(|_| {
            LottieError::surface_init(format!("target width {} exceeds u16", target.width()))
        })?;
        let h: u16 = target.height().try_into().map_err(|_| {
            LottieError::surface_init(format!("target height {} exceeds u16", target.height()))
        })?;
        tracing::debug!(width = w, height = h, colorspace = ?target.colorspace(), "canvas created");
        Ok(Self {
            target,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            pushed: None,
            pending: None,
            state: CanvasState::Created,
            svg_cache: SvgRasterCache::default(),
            engine,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CanvasState {
        self.state
    }

    /// Return `true` when no picture has been pushed.
    pub fn is_empty(&self) -> bool {
        self.pushed.is_none()
    }

    /// The bound target.
    pub fn target(&self) -> &RenderTarget<'buf> {
        &self.target
    }

    /// Register `picture` as the canvas content. Only one push is allowed.
    pub fn push(&mut self, picture: &Picture) -> LottieResult<()> {
        if self.pushed.is_some() {
            return Err(LottieError::validation("canvas already holds a picture"));
        }
        self.pushed = Some(picture.id());
        self.state = CanvasState::Pushed;
        tracing::debug!(picture = picture.id(), "picture pushed");
        Ok(())
    }

    /// Capture the picture's current frame, size, transform and clip for the next draw.
    pub fn update(&mut self, picture: &Picture) -> LottieResult<()> {
        match self.pushed {
            Some(id) if id == picture.id() => {
                self.pending = Some(picture.snapshot());
                Ok(())
            }
            Some(_) => Err(LottieError::validation(
                "picture was not pushed to this canvas",
            )),
            None => Err(LottieError::validation("update before push")),
        }
    }

    /// Zero the target region and drop recorded commands.
    pub fn clear(&mut self) {
        self.target.clear();
        self.pixmap.data_as_u8_slice_mut().fill(0);
        self.ctx.reset();
        if self.state == CanvasState::Drawing {
            self.state = CanvasState::Pushed;
        }
    }

    /// Record the pushed picture as captured by the last `update`.
    pub fn draw(&mut self) -> LottieResult<()> {
        if self.pushed.is_none() {
            return Err(LottieError::draw("nothing pushed to the canvas"));
        }
        let snap = self
            .pending
            .as_ref()
            .ok_or_else(|| LottieError::draw("canvas drawn before update"))?;
        tracing::trace!(
            picture = snap.picture_id,
            frame = snap.frame,
            items = snap.display_list.items.len(),
            "draw"
        );
        let max_dim = self.engine.opts().svg_max_raster_dim;
        encode_snapshot(&mut self.ctx, snap, &mut self.svg_cache, max_dim)?;
        self.ctx.flush();
        self.state = CanvasState::Drawing;
        Ok(())
    }

    /// Finish rasterizing and write the pixels into the target in its colorspace.
    pub fn sync(&mut self) -> LottieResult<()> {
        if self.state != CanvasState::Drawing {
            return Err(LottieError::validation("sync without a pending draw"));
        }
        self.ctx.render_to_pixmap(&mut self.pixmap);
        write_pixmap(&self.pixmap, &mut self.target);
        self.state = CanvasState::Pushed;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn svg_cache_len(&self) -> usize {
        self.svg_cache.len()
    }
}

fn write_pixmap(pixmap: &vello_cpu::Pixmap, target: &mut RenderTarget<'_>) {
    let colorspace: Colorspace = target.colorspace();
    let width = target.width() as usize;
    let src = pixmap.data_as_u8_slice();
    for (y, row) in target.rows_mut().enumerate() {
        let start = y * width * 4;
        let Some(src_row) = src.get(start..start + width * 4) else {
            break;
        };
        for (dst, px) in row.iter_mut().zip(src_row.chunks_exact(4)) {
            *dst = colorspace.pack(Rgba8Premul {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            });
        }
    }
}

impl std::fmt::Debug for Canvas<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("target", &self.target)
            .field("state", &self.state)
            .field("pushed", &self.pushed)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
