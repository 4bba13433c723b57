//! Segment to quad conversion.

use serde::{Deserialize, Serialize};
use stormlight_shader::Vertex;

use crate::material::{MaterialHandle, WeakMaterialHandle};
use crate::mesh::{Quad, QuadTransform};
use crate::path::{Segment, SegmentedPath};
use crate::util::Vec2;

/// Ribbon dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
    /// Ribbon width across the path, world units
    pub width: f32,
    /// Z offset so the overlay sits above the map plane
    pub elevation: f32,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            width: 10.0,
            elevation: 1.0,
        }
    }
}

/// One quad per segment, all reading `material`.
pub fn build_quads(
    path: &SegmentedPath,
    material: &MaterialHandle,
    settings: &MeshSettings,
) -> Vec<Quad> {
    path.iter()
        .enumerate()
        .map(|(i, segment)| build_quad(i, segment, material.downgrade(), settings))
        .collect()
}

/// Build the quad for a single parameterized segment.
///
/// The plane spans `length x width` centered at the origin with U along +X,
/// then is rotated to the segment direction and moved to its midpoint.
pub fn build_quad(
    index: usize,
    segment: &Segment,
    material: WeakMaterialHandle,
    settings: &MeshSettings,
) -> Quad {
    let size = Vec2::new(segment.length, settings.width);
    let hx = size.x * 0.5;
    let hy = size.y * 0.5;
    let (u0, u1) = (segment.uv.u0, segment.uv.u1);
    let normal = [0.0, 0.0, 1.0];

    let vertices = [
        Vertex { position: [-hx, hy, 0.0], normal, uv: [u0, 1.0] },
        Vertex { position: [hx, hy, 0.0], normal, uv: [u1, 1.0] },
        Vertex { position: [-hx, -hy, 0.0], normal, uv: [u0, 0.0] },
        Vertex { position: [hx, -hy, 0.0], normal, uv: [u1, 0.0] },
    ];

    let mid = segment.midpoint();
    Quad {
        segment_index: index,
        vertices,
        size,
        uv: segment.uv,
        transform: QuadTransform {
            position: mid.extend(settings.elevation),
            rotation: segment.angle,
        },
        frustum_culled: false,
        material,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{parameterize, segment_path};
    use crate::util::{Mat4, Vec3};
    use stormlight_shader::GlowParams;

    fn build(points: &[(f32, f32)]) -> (Vec<Quad>, MaterialHandle, SegmentedPath) {
        let points: Vec<Vec2> = points.iter().map(|&(x, y)| Vec2::new(x, y)).collect();
        let mut path = segment_path(&points).unwrap();
        parameterize(&mut path).unwrap();
        let material = MaterialHandle::new(GlowParams::for_length(path.total_length));
        let quads = build_quads(&path, &material, &MeshSettings::default());
        (quads, material, path)
    }

    #[test]
    fn test_one_quad_per_segment() {
        let (quads, _, path) = build(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (20.0, 5.0)]);
        assert_eq!(quads.len(), path.len());
        for (i, q) in quads.iter().enumerate() {
            assert_eq!(q.segment_index(), i);
            assert_eq!(q.indices().len(), 6);
        }
    }

    #[test]
    fn test_rotation_matches_segment_angle() {
        let (quads, _, path) = build(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 0.0)]);
        for (q, s) in quads.iter().zip(path.iter()) {
            assert_eq!(q.transform().rotation, s.angle);
            let d = s.direction();
            let expected = d.y.atan2(d.x).rem_euclid(std::f32::consts::TAU);
            assert!((q.transform().rotation - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn test_position_size_and_uv() {
        let (quads, _, _) = build(&[(0.0, 0.0), (3.0, 4.0)]);
        let q = &quads[0];
        assert_eq!(q.size(), Vec2::new(5.0, 10.0));
        assert_eq!(q.transform().position, Vec3::new(1.5, 2.0, 1.0));
        let uvs: Vec<[f32; 2]> = q.vertices().iter().map(|v| v.uv).collect();
        assert_eq!(uvs, vec![[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]]);
        assert!(!q.frustum_culled());
    }

    #[test]
    fn test_world_corners_follow_segment() {
        let (quads, _, _) = build(&[(0.0, 0.0), (0.0, 10.0)]);
        let w = quads[0].world_positions(Mat4::IDENTITY);
        // rotated 90 degrees: local +X maps to world +Y, local +Y to world -X
        let expect = [
            Vec3::new(-5.0, 0.0, 1.0),
            Vec3::new(-5.0, 10.0, 1.0),
            Vec3::new(5.0, 0.0, 1.0),
            Vec3::new(5.0, 10.0, 1.0),
        ];
        for (a, b) in w.iter().zip(expect.iter()) {
            assert!((*a - *b).length() < 1e-4, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn test_all_quads_share_material() {
        let (quads, material, _) = build(&[(0.0, 0.0), (1.0, 0.0), (2.0, 1.0), (3.0, 3.0)]);
        assert!(quads.iter().all(|q| q.material().refers_to(&material)));
        material.update(|p| p.set_opacity(0.25));
        assert!(quads.iter().all(|q| q.material().params().unwrap().opacity() == 0.25));
    }

    #[test]
    fn test_degenerate_segment_gives_zero_area_quad() {
        let (quads, _, _) = build(&[(0.0, 0.0), (3.0, 4.0), (3.0, 4.0)]);
        assert!(quads[1].is_degenerate());
        assert_eq!(quads[1].size().x, 0.0);
        assert_eq!(quads[1].uv_range().contribution(), 0.0);
        assert!(quads[1].local_uv(Vec2::ZERO).is_none());
    }

    #[test]
    fn test_local_uv_interpolates_path_coordinate() {
        let (quads, _, _) = build(&[(0.0, 0.0), (30.0, 0.0), (30.0, 10.0)]);
        let q = &quads[0];
        // quad 0 covers u in [0, 0.75]
        let uv = q.local_uv(Vec2::new(0.0, 0.0)).unwrap();
        assert!((uv.x - 0.375).abs() < 1e-6);
        assert!((uv.y - 0.5).abs() < 1e-6);
        assert!(q.local_uv(Vec2::new(16.0, 0.0)).is_none());
        assert!(q.local_uv(Vec2::new(0.0, 6.0)).is_none());
    }
}
