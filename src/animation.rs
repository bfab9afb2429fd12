use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::engine::content::{Content, ContentType};
use crate::engine::{Engine, EngineGuard};
use crate::foundation::core::Size;
use crate::foundation::error::{LottieError, LottieResult};
use crate::picture::Picture;

/// A loaded vector animation and its playhead.
///
/// Metadata is computed once at load time. The only mutable state is the current frame and the
/// [`Picture`] draw state.
pub struct Animation {
    content: Arc<Content>,
    picture: Picture,
    frame_count: u32,
    duration_secs: f64,
    frame_rate: f64,
    native: Size,
    // Keeps the engine alive for as long as the content exists.
    _engine: EngineGuard,
}

impl Animation {
    /// Load from a file. The format is taken from the extension, or sniffed from the contents.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> LottieResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            LottieError::resource_load(format!("failed to read '{}': {e}", path.display()))
        })?;
        let ty = ContentType::detect(path, &bytes).ok_or_else(|| {
            LottieError::resource_load(format!(
                "cannot tell the format of '{}'",
                path.display()
            ))
        })?;
        Self::from_bytes(&bytes, ty)
    }

    /// Load from in-memory data with a MIME-like content type (`"lottie"`, `"image/svg+xml"`, ...).
    #[tracing::instrument(skip(data), fields(len = data.len()))]
    pub fn from_data(data: &str, content_type: &str) -> LottieResult<Self> {
        let ty = ContentType::from_mime(content_type)?;
        Self::from_bytes(data.as_bytes(), ty)
    }

    /// Load from raw bytes of a known format.
    pub fn from_bytes(data: &[u8], content_type: ContentType) -> LottieResult<Self> {
        let engine = Engine::acquire()?;
        let content = Arc::new(Content::load(data, content_type, &engine)?);
        let picture = Picture::new(content.clone());
        let anim = Self {
            frame_count: content.frame_count(),
            duration_secs: content.duration_secs(),
            frame_rate: content.frame_rate(),
            native: content.native_size(),
            content,
            picture,
            _engine: engine,
        };
        tracing::debug!(
            frames = anim.frame_count,
            fps = anim.frame_rate,
            width = anim.native.width,
            height = anim.native.height,
            "animation loaded"
        );
        Ok(anim)
    }

    /// Format the animation was loaded from.
    pub fn content_type(&self) -> ContentType {
        self.content.content_type()
    }

    /// Composition name, when the document carries one.
    pub fn name(&self) -> Option<&str> {
        self.content.name()
    }

    /// Number of renderable frames. Valid indices are `0..frame_count`.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Playback duration.
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration_secs).unwrap_or_default()
    }

    /// Playback duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// Frames per second (0 for still content).
    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    /// Intrinsic content size.
    pub fn native_size(&self) -> Size {
        self.native
    }

    /// Move the playhead. Indices are not checked here.
    pub fn select_frame(&mut self, index: u32) {
        self.picture.set_frame(index);
    }

    /// Frame the playhead points at.
    pub fn current_frame(&self) -> u32 {
        self.picture.frame()
    }

    /// The drawable content.
    pub fn picture(&self) -> &Picture {
        &self.picture
    }

    /// The drawable content, for changing size, transform or clip.
    pub fn picture_mut(&mut self) -> &mut Picture {
        &mut self.picture
    }
}

impl std::fmt::Debug for Animation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animation")
            .field("content_type", &self.content_type())
            .field("frame_count", &self.frame_count)
            .field("duration_secs", &self.duration_secs)
            .field("frame_rate", &self.frame_rate)
            .field("native", &self.native)
            .finish()
    }
}
