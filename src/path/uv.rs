//! Arc-length texture parameterization.
//!
//! All segments of a path share one logical U axis in [0, 1]. Each segment
//! gets a slice proportional to its length, so the shader sees a single
//! continuous ribbon no matter how many quads it is split into.

use crate::path::SegmentedPath;
use crate::util::{InvalidPathError, Result};

/// A segment's slice `[u0, u1]` of the path's U axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UvRange {
    pub u0: f32,
    pub u1: f32,
}

impl UvRange {
    pub const fn new(u0: f32, u1: f32) -> Self {
        Self { u0, u1 }
    }

    /// Fraction of the path covered by this slice.
    #[inline]
    pub fn contribution(&self) -> f32 {
        self.u1 - self.u0
    }

    /// Path coordinate at fraction `t` of this slice.
    #[inline]
    pub fn lerp(&self, t: f32) -> f32 {
        self.u0 + (self.u1 - self.u0) * t
    }
}

/// Assign every segment its UV slice, in path order.
///
/// Slices are contiguous: each `u0` is bit-identical to the previous `u1`.
/// Fails when the path has no length, which would otherwise divide by zero,
/// or when the length is not finite.
pub fn parameterize(path: &mut SegmentedPath) -> Result<()> {
    let total = path.total_length;
    if !total.is_finite() {
        return Err(InvalidPathError::LengthOverflow.into());
    }
    if !(total > 0.0) {
        return Err(InvalidPathError::ZeroLength {
            points: path.segments.len() + 1,
        }
        .into());
    }

    let mut progress = 0.0f32;
    for segment in &mut path.segments {
        let contribution = segment.length / total;
        segment.uv = UvRange::new(progress, progress + contribution);
        progress = segment.uv.u1;
    }

    tracing::trace!(final_progress = progress, "parameterized {} segments", path.segments.len());
    Ok(())
}
