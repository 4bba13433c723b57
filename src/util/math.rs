//! Math type re-exports and path-specific helpers.
//!
//! This module re-exports types from `glam` and provides the 2D bounds
//! used to frame previews.

pub use glam::{Mat4, Vec2, Vec3, Vec4};

use std::f32::consts::TAU;
use std::fmt;

/// Direction of `v` in radians, in `[0, 2π)`.
///
/// A zero vector has angle 0.
#[inline]
pub fn direction_angle(v: Vec2) -> f32 {
    if v == Vec2::ZERO {
        return 0.0;
    }
    let a = v.y.atan2(v.x);
    if a < 0.0 {
        // rem_euclid may round up to TAU for tiny negative angles
        (a + TAU) % TAU
    } else {
        a
    }
}

/// 2D bounding box.
#[derive(Clone, Copy, PartialEq)]
pub struct Bounds2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds2 {
    /// Empty bounding box (inverted, will expand on first point).
    pub const EMPTY: Self = Self {
        min: Vec2::splat(f32::INFINITY),
        max: Vec2::splat(f32::NEG_INFINITY),
    };

    /// Create a new bounding box from min and max points.
    #[inline]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Check if this box is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Expand this box to include a point.
    #[inline]
    pub fn expand_by_point(&mut self, p: Vec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Grow every side by `margin`.
    #[inline]
    pub fn inflate(&self, margin: f32) -> Self {
        Self::new(self.min - Vec2::splat(margin), self.max + Vec2::splat(margin))
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

impl Default for Bounds2 {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for Bounds2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bounds2({:?} - {:?})", self.min, self.max)
    }
}
