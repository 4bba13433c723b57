//! Software preview renderer.
//!
//! Rasterizes a scene's quads on the CPU with the reference port of the glow
//! shader and the same premultiplied additive blend the GPU pipeline uses.
//! Slow, but needs no device, which makes it handy for the CLI and tests.

use std::path::Path;

use image::RgbaImage;
use rayon::prelude::*;
use stormlight_shader::{reference, GlowParams};

use crate::mesh::Quad;
use crate::scene::{GlowPath, Scene, SceneNode};
use crate::util::{Bounds2, Error, Mat4, Result, Vec3, Vec4};

/// Output framing.
#[derive(Debug, Clone)]
pub struct PreviewOptions {
    pub width: u32,
    pub height: u32,
    /// World-space window. `None` fits every quad with a small margin.
    pub bounds: Option<Bounds2>,
    /// Linear rgb background, drawn opaque.
    pub background: Vec3,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            width: 512,
            height: 256,
            bounds: None,
            background: Vec3::ZERO,
        }
    }
}

struct Sample<'a> {
    inverse: Mat4,
    /// World z of the quad plane
    z: f32,
    quad: &'a Quad,
    params: GlowParams,
}

fn fit_bounds(quads: &[(Mat4, &Quad)]) -> Bounds2 {
    let mut b = Bounds2::EMPTY;
    for (world, q) in quads {
        if q.is_degenerate() {
            continue;
        }
        for p in q.world_positions(*world) {
            b.expand_by_point(p.truncate());
        }
    }
    if b.is_empty() {
        return b;
    }
    b.inflate(b.size().max_element() * 0.02 + 1.0)
}

#[inline]
fn linear_to_srgb(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[inline]
fn to_u8(c: f32) -> u8 {
    (linear_to_srgb(c) * 255.0 + 0.5) as u8
}

/// Render every quad in `scene`.
#[tracing::instrument(skip_all, fields(width = options.width, height = options.height))]
pub fn render_scene(scene: &Scene, options: &PreviewOptions) -> Result<RgbaImage> {
    let quads: Vec<(Mat4, &Quad)> = scene.world_quads().collect();
    render_quads(&quads, options)
}

/// Render a single path with its own transform.
pub fn render_path(path: &GlowPath, options: &PreviewOptions) -> Result<RgbaImage> {
    let parent = path.transform();
    let quads: Vec<(Mat4, &Quad)> = path
        .quads()
        .iter()
        .map(|q| (parent * q.transform().matrix(), q))
        .collect();
    render_quads(&quads, options)
}

fn render_quads(quads: &[(Mat4, &Quad)], options: &PreviewOptions) -> Result<RgbaImage> {
    let (w, h) = (options.width, options.height);
    if w == 0 || h == 0 {
        return Err(Error::other(format!("preview size must be non-zero, got {w}x{h}")));
    }
    let bounds = options.bounds.unwrap_or_else(|| fit_bounds(quads));
    if bounds.is_empty() {
        return Err(Error::other("nothing to render"));
    }

    // Quads whose material is gone or that have no area draw nothing.
    let samples: Vec<Sample> = quads
        .iter()
        .filter(|(_, q)| !q.is_degenerate())
        .filter_map(|(world, q)| {
            Some(Sample {
                inverse: world.inverse(),
                z: world.w_axis.z,
                quad: q,
                params: q.material().params()?,
            })
        })
        .collect();
    tracing::debug!(quads = samples.len(), ?bounds, "rasterize");

    let size = bounds.size();
    let stride = w as usize * 4;
    let mut buf = vec![0u8; stride * h as usize];

    buf.par_chunks_mut(stride).enumerate().for_each(|(row, line)| {
        let y = bounds.max.y - (row as f32 + 0.5) / h as f32 * size.y;
        for (col, px) in line.chunks_exact_mut(4).enumerate() {
            let x = bounds.min.x + (col as f32 + 0.5) / w as f32 * size.x;
            let mut acc = Vec4::ZERO;
            for s in &samples {
                let local = s.inverse.transform_point3(Vec3::new(x, y, s.z)).truncate();
                if let Some(uv) = s.quad.local_uv(local) {
                    acc += reference::fragment(&s.params, uv);
                }
            }
            let rgb = options.background + acc.truncate();
            px.copy_from_slice(&[to_u8(rgb.x), to_u8(rgb.y), to_u8(rgb.z), 255]);
        }
    });

    RgbaImage::from_raw(w, h, buf).ok_or_else(|| Error::other("preview buffer size mismatch"))
}

/// Encode as PNG.
pub fn save_png(image: &RgbaImage, path: impl AsRef<Path>) -> Result<()> {
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Parse "WxH".
pub fn parse_size(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.split_once(['x', 'X'])?;
    let size = (w.trim().parse().ok()?, h.trim().parse().ok()?);
    (size.0 > 0 && size.1 > 0).then_some(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Vec2;

    fn ribbon() -> GlowPath {
        let p = GlowPath::new(&[Vec2::new(0.0, 0.0), Vec2::new(200.0, 0.0)]).unwrap();
        // ring only: deterministic, centered, never zero on the midline
        p.material().update(|m| m.set_amplitude(0.0));
        p
    }

    fn options() -> PreviewOptions {
        PreviewOptions {
            width: 220,
            height: 40,
            bounds: Some(Bounds2::new(Vec2::new(-10.0, -20.0), Vec2::new(210.0, 20.0))),
            background: Vec3::ZERO,
        }
    }

    #[test]
    fn test_ribbon_lights_midline_only() {
        let img = render_path(&ribbon(), &options()).unwrap();
        assert_eq!(img.dimensions(), (220, 40));
        let mid = img.get_pixel(110, 20);
        assert!(mid[1] > 0, "midline should glow: {mid:?}");
        assert!(mid[1] > mid[0] && mid[1] > mid[2]);
        // outside the ribbon width
        assert_eq!(img.get_pixel(110, 0).0, [0, 0, 0, 255]);
        // before the path start
        assert_eq!(img.get_pixel(2, 20).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_scene_matches_path() {
        let mut scene = Scene::new();
        scene.add_node(ribbon());
        let a = render_scene(&scene, &options()).unwrap();
        let b = render_path(&ribbon(), &options()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_auto_bounds() {
        let img = render_path(&ribbon(), &PreviewOptions::default()).unwrap();
        assert_eq!(img.dimensions(), (512, 256));
    }

    #[test]
    fn test_rejects_empty() {
        let scene = Scene::new();
        assert!(render_scene(&scene, &PreviewOptions::default()).is_err());
        let opts = PreviewOptions {
            width: 0,
            ..options()
        };
        assert!(render_path(&ribbon(), &opts).is_err());
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("640x480"), Some((640, 480)));
        assert_eq!(parse_size("8X4"), Some((8, 4)));
        assert_eq!(parse_size("0x4"), None);
        assert_eq!(parse_size("wide"), None);
    }
}
