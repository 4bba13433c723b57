//! Ribbon geometry: one flat quad per path segment.

mod builder;
mod quad;

pub use builder::{build_quad, build_quads, MeshSettings};
pub use quad::{Quad, QuadTransform, QUAD_INDICES};
