//! Per-segment drawable quad.

use stormlight_shader::Vertex;

use crate::material::WeakMaterialHandle;
use crate::path::UvRange;
use crate::util::{Mat4, Vec2, Vec3};

/// Two CCW triangles over the vertex order
/// top-left, top-right, bottom-left, bottom-right.
pub const QUAD_INDICES: [u32; 6] = [0, 2, 1, 2, 3, 1];

/// Placement of a quad inside its path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadTransform {
    pub position: Vec3,
    /// Rotation about Z in radians
    pub rotation: f32,
}

impl QuadTransform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_rotation_z(self.rotation)
    }
}

/// Flat ribbon piece covering one segment.
///
/// Geometry is fixed at construction. The material is borrowed from the
/// owning path, never owned.
#[derive(Clone, Debug)]
pub struct Quad {
    pub(crate) segment_index: usize,
    pub(crate) vertices: [Vertex; 4],
    pub(crate) size: Vec2,
    pub(crate) uv: UvRange,
    pub(crate) transform: QuadTransform,
    pub(crate) frustum_culled: bool,
    pub(crate) material: WeakMaterialHandle,
}

impl Quad {
    /// Index of the segment this quad was built from.
    pub fn segment_index(&self) -> usize {
        self.segment_index
    }

    /// Local-space vertices
    pub fn vertices(&self) -> &[Vertex; 4] {
        &self.vertices
    }

    pub fn indices(&self) -> &'static [u32; 6] {
        &QUAD_INDICES
    }

    /// (length along the segment, width across it)
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn uv_range(&self) -> UvRange {
        self.uv
    }

    pub fn transform(&self) -> &QuadTransform {
        &self.transform
    }

    /// Always false: the host must never cull the glow by bounding volume.
    pub fn frustum_culled(&self) -> bool {
        self.frustum_culled
    }

    pub fn material(&self) -> &WeakMaterialHandle {
        &self.material
    }

    /// Zero-area quad from a repeated point
    pub fn is_degenerate(&self) -> bool {
        self.size.x == 0.0
    }

    /// Vertex positions after applying `parent * local`.
    pub fn world_positions(&self, parent: Mat4) -> [Vec3; 4] {
        let m = parent * self.transform.matrix();
        self.vertices
            .map(|v| m.transform_point3(Vec3::from_array(v.position)))
    }

    /// Interpolated UV at a local-space point, or `None` outside the quad.
    pub fn local_uv(&self, local: Vec2) -> Option<Vec2> {
        if self.is_degenerate() {
            return None;
        }
        let half = self.size * 0.5;
        if local.x.abs() > half.x || local.y.abs() > half.y {
            return None;
        }
        let s = local.x / self.size.x + 0.5;
        let t = local.y / self.size.y + 0.5;
        Some(Vec2::new(self.uv.lerp(s), t))
    }
}

impl PartialEq for Quad {
    /// Geometric equality; the material handle is not compared.
    fn eq(&self, other: &Self) -> bool {
        self.segment_index == other.segment_index
            && self.vertices == other.vertices
            && self.size == other.size
            && self.uv == other.uv
            && self.transform == other.transform
            && self.frustum_culled == other.frustum_culled
    }
}
