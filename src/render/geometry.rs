//! Per-frame picture geometry: size fit, crop and rotation.
//!
//! Every render rebuilds the transform from identity through an ordered list of stages, so the
//! result depends only on the request and never on what was rendered before.

use crate::foundation::core::{Affine, Point, Rect, Size};
use crate::foundation::error::{LottieError, LottieResult};
use crate::picture::Picture;

/// Per-frame render request options.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameOpts {
    /// Region of the target-sized content to stretch over the whole target.
    pub crop: Option<Rect>,
    /// Clockwise rotation in degrees about the target centre, applied after the crop.
    pub rotation_deg: Option<f64>,
}

impl FrameOpts {
    /// Return options with a crop rectangle.
    pub fn with_crop(mut self, crop: Rect) -> Self {
        self.crop = Some(crop);
        self
    }

    /// Return options with a rotation in degrees.
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation_deg = Some(degrees);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Stage {
    /// Identity transform, size = target, no clip.
    Reset { target: Size },
    /// `scale(tw / cw, th / ch) · translate(-cx, -cy)`, clipped to the crop.
    CropFit { crop: Rect, target: Size },
    /// `translate(c) · rotate(θ) · translate(-c)` about the target centre.
    RotateAboutCenter { radians: f64, center: Point },
}

/// Geometry resolved for one frame.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TransformPipeline {
    stages: Vec<Stage>,
}

/// Result of running the pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ResolvedGeometry {
    pub(crate) size: Size,
    pub(crate) transform: Affine,
    pub(crate) clip: Option<Rect>,
}

impl TransformPipeline {
    /// Validate `opts` against `target` and build the stages. Nothing is mutated on error.
    pub(crate) fn resolve(target: Size, opts: &FrameOpts) -> LottieResult<Self> {
        let mut stages = vec![Stage::Reset { target }];

        if let Some(crop) = opts.crop {
            check_crop(crop, target)?;
            stages.push(Stage::CropFit { crop, target });
        }

        if let Some(deg) = opts.rotation_deg {
            if !deg.is_finite() {
                return Err(LottieError::validation(format!(
                    "rotation must be finite, got {deg}"
                )));
            }
            stages.push(Stage::RotateAboutCenter {
                radians: deg.to_radians(),
                center: Point::new(target.width / 2.0, target.height / 2.0),
            });
        }

        Ok(Self { stages })
    }

    #[cfg(test)]
    pub(crate) fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub(crate) fn evaluate(&self) -> ResolvedGeometry {
        let mut out = ResolvedGeometry {
            size: Size::ZERO,
            transform: Affine::IDENTITY,
            clip: None,
        };
        for stage in &self.stages {
            match *stage {
                Stage::Reset { target } => {
                    out = ResolvedGeometry {
                        size: target,
                        transform: Affine::IDENTITY,
                        clip: None,
                    };
                }
                Stage::CropFit { crop, target } => {
                    let sx = target.width / crop.width();
                    let sy = target.height / crop.height();
                    let fit = Affine::scale_non_uniform(sx, sy)
                        * Affine::translate((-crop.x0, -crop.y0));
                    out.transform = fit * out.transform;
                    out.clip = Some(crop);
                }
                Stage::RotateAboutCenter { radians, center } => {
                    let rot = Affine::translate(center.to_vec2())
                        * Affine::rotate(radians)
                        * Affine::translate(-center.to_vec2());
                    out.transform = rot * out.transform;
                }
            }
        }
        out
    }

    pub(crate) fn apply(&self, picture: &mut Picture) {
        let g = self.evaluate();
        picture.set_size(g.size);
        picture.set_transform(g.transform);
        picture.set_clip(g.clip);
    }
}

fn check_crop(crop: Rect, target: Size) -> LottieResult<()> {
    if !crop.is_finite() || crop.width() <= 0.0 || crop.height() <= 0.0 {
        return Err(LottieError::crop_out_of_bounds(format!(
            "crop must be finite with positive size, got {crop:?}"
        )));
    }
    if crop.width() > target.width || crop.height() > target.height {
        return Err(LottieError::crop_out_of_bounds(format!(
            "crop {}x{} exceeds target {}x{}",
            crop.width(),
            crop.height(),
            target.width,
            target.height
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/geometry.rs"]
mod tests;
