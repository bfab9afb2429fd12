use std::path::Path;

use crate::engine::EngineGuard;
use crate::engine::display::DisplayList;
use crate::engine::lottie::Composition;
use crate::engine::svg::SvgContent;
use crate::foundation::core::Size;
use crate::foundation::error::{LottieError, LottieResult};

/// Format of an animation resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// Lottie (Bodymovin) JSON.
    Lottie,
    /// Static SVG document, exposed as a one-frame animation.
    Svg,
}

impl ContentType {
    /// Parse a MIME-like content type name (`"lottie"`, `"application/json"`, `"image/svg+xml"`, ...).
    pub fn from_mime(s: &str) -> LottieResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lottie" | "lottie+json" | "application/json" | "json" => Ok(Self::Lottie),
            "svg" | "svg+xml" | "image/svg+xml" => Ok(Self::Svg),
            other => Err(LottieError::resource_load(format!(
                "unsupported content type \"{other}\""
            ))),
        }
    }

    /// Guess from a file extension, then from the first non-whitespace byte.
    pub(crate) fn detect(path: &Path, bytes: &[u8]) -> Option<Self> {
        let by_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match by_ext.as_deref() {
            Some("json" | "lottie") => return Some(Self::Lottie),
            Some("svg") => return Some(Self::Svg),
            _ => {}
        }
        match bytes.iter().copied().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') => Some(Self::Lottie),
            Some(b'<') => Some(Self::Svg),
            _ => None,
        }
    }
}

/// Loaded animation content, independent of the format it came from.
#[derive(Clone)]
pub(crate) enum Content {
    Lottie(Composition),
    Svg(SvgContent),
}

impl Content {
    pub(crate) fn load(bytes: &[u8], ty: ContentType, engine: &EngineGuard) -> LottieResult<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(LottieError::resource_load("animation data is empty"));
        }
        match ty {
            ContentType::Lottie => Composition::from_slice(bytes).map(Self::Lottie),
            ContentType::Svg => SvgContent::from_slice(bytes, engine).map(Self::Svg),
        }
    }

    pub(crate) fn content_type(&self) -> ContentType {
        match self {
            Self::Lottie(_) => ContentType::Lottie,
            Self::Svg(_) => ContentType::Svg,
        }
    }

    pub(crate) fn native_size(&self) -> Size {
        match self {
            Self::Lottie(c) => c.size,
            Self::Svg(s) => s.size(),
        }
    }

    pub(crate) fn frame_count(&self) -> u32 {
        match self {
            Self::Lottie(c) => c.frame_count(),
            Self::Svg(_) => 1,
        }
    }

    pub(crate) fn frame_rate(&self) -> f64 {
        match self {
            Self::Lottie(c) => c.frame_rate,
            Self::Svg(_) => 0.0,
        }
    }

    pub(crate) fn duration_secs(&self) -> f64 {
        match self {
            Self::Lottie(c) => c.duration_secs(),
            Self::Svg(_) => 0.0,
        }
    }

    pub(crate) fn name(&self) -> Option<&str> {
        match self {
            Self::Lottie(c) => c.name.as_deref(),
            Self::Svg(_) => None,
        }
    }

    pub(crate) fn display_list(&self, frame: u32) -> DisplayList {
        match self {
            Self::Lottie(c) => c.display_list(frame),
            Self::Svg(s) => s.display_list(),
        }
    }
}
