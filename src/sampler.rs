use crate::animation::Animation;

/// Iterates the valid frame indices of an animation, `0..frame_count`.
///
/// Indices are `i64`, the type [`crate::FrameCompositor::render_frame`] takes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSampler {
    frame_count: u32,
    step: u32,
    next: i64,
}

impl FrameSampler {
    /// Sample every frame of `animation`.
    pub fn new(animation: &Animation) -> Self {
        Self::with_frame_count(animation.frame_count())
    }

    /// Sample every frame of a `frame_count`-frame range.
    pub fn with_frame_count(frame_count: u32) -> Self {
        Self {
            frame_count,
            step: 1,
            next: 0,
        }
    }

    /// Visit every `step`-th frame. A step of 0 is treated as 1.
    pub fn with_step(mut self, step: u32) -> Self {
        self.step = step.max(1);
        self
    }

    /// Return `true` while at least one index remains.
    pub fn has_more(&self) -> bool {
        self.next < i64::from(self.frame_count)
    }

    /// Start over from frame 0.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

impl Iterator for FrameSampler {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if !self.has_more() {
            return None;
        }
        let out = self.next;
        self.next += i64::from(self.step);
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (i64::from(self.frame_count) - self.next).max(0);
        let step = i64::from(self.step);
        let n = ((remaining + step - 1) / step) as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for FrameSampler {}
