/// Convenience result type used across the crate.
pub type LottieResult<T> = Result<T, LottieError>;

/// Error type for loading animations and rendering frames.
#[derive(thiserror::Error, Debug)]
pub enum LottieError {
    /// The animation path, data or format could not be loaded.
    #[error("resource load error: {0}")]
    ResourceLoad(String),

    /// The requested frame index is outside `[0, frame_count)`.
    #[error("frame index {index} out of range (frame count {frame_count})")]
    FrameIndexOutOfRange {
        /// Index passed by the caller.
        index: i64,
        /// Number of frames in the animation.
        frame_count: u32,
    },

    /// The requested crop cannot be shown by the render target.
    #[error("crop out of bounds: {0}")]
    CropOutOfBounds(String),

    /// The rendering surface could not be initialized.
    #[error("surface init error: {0}")]
    SurfaceInit(String),

    /// The engine failed to draw the frame. Buffer contents are undefined afterwards.
    #[error("draw failure: {0}")]
    Draw(String),

    /// Invalid caller input (target geometry, rotation, canvas misuse).
    #[error("validation error: {0}")]
    Validation(String),

    /// Any other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LottieError {
    /// Build a [`LottieError::ResourceLoad`].
    pub fn resource_load(msg: impl Into<String>) -> Self {
        Self::ResourceLoad(msg.into())
    }

    /// Build a [`LottieError::CropOutOfBounds`].
    pub fn crop_out_of_bounds(msg: impl Into<String>) -> Self {
        Self::CropOutOfBounds(msg.into())
    }

    /// Build a [`LottieError::SurfaceInit`].
    pub fn surface_init(msg: impl Into<String>) -> Self {
        Self::SurfaceInit(msg.into())
    }

    /// Build a [`LottieError::Draw`].
    pub fn draw(msg: impl Into<String>) -> Self {
        Self::Draw(msg.into())
    }

    /// Build a [`LottieError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
