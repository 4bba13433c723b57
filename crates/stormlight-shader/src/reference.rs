//! CPU port of the stormlight fragment shader.
//!
//! Mirrors `shaders/stormlight.wgsl` in f32, function for function. Used by
//! the software preview and as the tested description of what the GPU does.

use glam::{Vec2, Vec3, Vec4};

use crate::params::GlowParams;

const PI: f32 = 3.141592653;

/// Width of the travelling highlight band, in world units.
pub const GLOW_BAND_WORLD: f32 = 50.0;

/// Width of the fade at each end of the path, in world units.
pub const END_FADE_WORLD: f32 = 5.0;

/// GLSL-style fract (x - floor(x)), always in [0, 1).
#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// smoothstep with defined behaviour for reversed and zero-width edges.
#[inline]
pub fn smooth_edge(e0: f32, e1: f32, x: f32) -> f32 {
    if e0 == e1 {
        return if x >= e0 { 1.0 } else { 0.0 };
    }
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn floor_mod(x: Vec3, y: f32) -> Vec3 {
    x - y * (x / y).floor()
}

fn hash4(v: Vec4) -> Vec4 {
    let h = |x: f32| fract((x * 0.1).sin() * 1000.0);
    Vec4::new(h(v.x), h(v.y), h(v.z), h(v.w))
}

/// Tileable 3D value noise in [-1, 1].
pub fn value_noise(p: Vec3, res: f32) -> f32 {
    let s = Vec3::new(1.0, 100.0, 1000.0);
    let uv = p * res;

    let uv0 = floor_mod(uv, res).floor() * s;
    let uv1 = floor_mod(uv + Vec3::ONE, res).floor() * s;

    let f = uv - uv.floor();
    let f = f * f * (Vec3::splat(3.0) - 2.0 * f);

    let v = Vec4::new(
        uv0.x + uv0.y + uv0.z,
        uv1.x + uv0.y + uv0.z,
        uv0.x + uv1.y + uv0.z,
        uv1.x + uv1.y + uv0.z,
    );

    let r = hash4(v);
    let r0 = mix(mix(r.x, r.y, f.x), mix(r.z, r.w, f.x), f.y);

    let r = hash4(v + Vec4::splat(uv1.z - uv0.z));
    let r1 = mix(mix(r.x, r.y, f.x), mix(r.z, r.w, f.x), f.y);

    mix(r0, r1, f.z) * 2.0 - 1.0
}

/// Inner ring intensity at distance `l` from the ribbon center.
///
/// Full up to `ring`, falling to zero at `2 * ring`. A non-positive
/// thickness means no ring.
#[inline]
pub fn inner_ring(l: f32, ring: f32) -> f32 {
    if ring <= 0.0 {
        return 0.0;
    }
    smooth_edge(ring, 0.0, l - ring)
}

/// Phase of the travelling band at path coordinate `u`.
///
/// The band advances `0.01 * sqrt(length)` of the path per second, which
/// keeps its on-screen speed comparable between short and long paths.
pub fn glow_param(u: f32, time: f32, length: f32) -> f32 {
    fract(u - time * 0.01 * length.sqrt())
}

/// Unfaded glow at centered coordinate `p` (x along, y across, both in
/// [-1, 1]). Returns straight (non-premultiplied) color and intensity.
pub fn stormlight(params: &GlowParams, p: Vec2, u: f32) -> Vec4 {
    let time = params.time();
    let length = params.length();

    let l = p.y.abs();
    let mut a = (1.0 - l) * 3.0;

    let glow_range = GLOW_BAND_WORLD / length;
    a += 0.8 * ((1.0 - smooth_edge(0.0, glow_range, glow_param(u, time, length))) * PI).sin();

    a -= params.bias();

    let coord = Vec3::new(p.x, p.y * 0.2, 0.5);
    let t = time * params.temporal_frequency() + params.seed() * 200.0;
    let mut power = 1.0;
    for _ in 1..=3 {
        power *= 2.0;
        a += value_noise(coord + Vec3::new(0.0, -t, t * 0.2), power * params.frequency()) / power;
    }
    a = (a * params.amplitude()).max(0.0);

    a += inner_ring(l, params.inner_ring_thickness()) * 0.25;

    a *= params.brightness();

    let c = params.color().lerp(Vec3::ONE, smooth_edge(1.0, params.white_point(), a));
    c.extend(a)
}

/// Longitudinal alpha multiplier: end fades and the opacity reveal.
pub fn path_fade(params: &GlowParams, u: f32) -> f32 {
    let fade = END_FADE_WORLD / params.length();
    smooth_edge(0.0, fade, u)
        * smooth_edge(1.0, 1.0 - fade, u)
        * smooth_edge(0.0, u, params.opacity())
}

/// Full fragment: premultiplied rgba for a quad-local `uv`.
pub fn fragment(params: &GlowParams, uv: Vec2) -> Vec4 {
    let c = stormlight(params, uv * 2.0 - Vec2::ONE, uv.x);
    let alpha = c.w * path_fade(params, uv.x);
    (c.truncate() * alpha).extend(alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn params(length: f32) -> GlowParams {
        GlowParams::for_length(length)
    }

    #[test]
    fn test_smooth_edge() {
        assert_eq!(smooth_edge(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smooth_edge(0.0, 1.0, 2.0), 1.0);
        assert!((smooth_edge(0.0, 1.0, 0.5) - 0.5).abs() < EPS);
        // reversed edges fall instead of rise
        assert_eq!(smooth_edge(1.0, 0.0, 0.0), 1.0);
        assert_eq!(smooth_edge(1.0, 0.0, 1.0), 0.0);
        // zero width degrades to a step
        assert_eq!(smooth_edge(0.0, 0.0, 0.0), 1.0);
        assert_eq!(smooth_edge(0.5, 0.5, 0.2), 0.0);
    }

    #[test]
    fn test_fract_negative() {
        assert!((fract(-0.25) - 0.75).abs() < EPS);
        assert!((fract(2.5) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_noise_range_and_determinism() {
        for i in 0..50 {
            let p = Vec3::new(i as f32 * 0.37 - 9.0, i as f32 * 0.11, 0.5);
            let n = value_noise(p, 8.0);
            assert!((-1.0..=1.0).contains(&n), "noise {n} out of range");
            assert_eq!(n, value_noise(p, 8.0));
        }
    }

    #[test]
    fn test_glow_band_travel() {
        let length: f32 = 400.0;
        assert!((glow_param(0.3, 0.0, length) - 0.3).abs() < EPS);
        // after dt seconds the band has moved 0.01*sqrt(L)*dt along the path
        let dt: f32 = 2.0;
        let shift = 0.01 * length.sqrt() * dt;
        let a = glow_param(0.3, 0.0, length);
        let b = glow_param(0.3 + shift, dt, length);
        assert!((a - b).abs() < 1e-4);
    }

    #[test]
    fn test_ends_are_transparent() {
        let p = params(200.0);
        for v in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert_eq!(fragment(&p, Vec2::new(0.0, v)).w, 0.0);
            assert!(fragment(&p, Vec2::new(1.0, v)).w.abs() < EPS);
        }
    }

    #[test]
    fn test_zero_opacity_hides_path() {
        let p = params(200.0).with_opacity(0.0);
        for u in [0.1, 0.4, 0.9] {
            assert_eq!(fragment(&p, Vec2::new(u, 0.5)), Vec4::ZERO);
        }
    }

    #[test]
    fn test_inner_ring_only() {
        // amplitude 0 removes base, band and noise: only the ring remains
        let mut p = params(100.0);
        p.set_amplitude(0.0);
        let center = fragment(&p, Vec2::new(0.5, 0.5));
        assert!((center.w - 0.25).abs() < EPS);
        let edge = fragment(&p, Vec2::new(0.5, 1.0));
        assert_eq!(edge.w, 0.0);
    }

    /// Ring-only alpha at distance `l` from the center, mid-path.
    fn ring_alpha(thickness: f32, l: f32) -> f32 {
        let mut p = params(100.0);
        p.set_amplitude(0.0);
        p.set_inner_ring_thickness(thickness);
        fragment(&p, Vec2::new(0.5, (l + 1.0) * 0.5)).w
    }

    #[test]
    fn test_zero_ring_thickness_removes_ring() {
        for l in [0.0, 0.1, 0.5, 0.9] {
            assert_eq!(ring_alpha(0.0, l), 0.0, "l = {l}");
        }
        assert_eq!(inner_ring(0.0, 0.0), 0.0);
        assert_eq!(inner_ring(0.3, -1.0), 0.0);
    }

    #[test]
    fn test_ring_extent_follows_thickness() {
        // thin ring: full at the center, half way down at 1.5x, gone by 2x
        assert!((ring_alpha(0.1, 0.0) - 0.25).abs() < EPS);
        assert!((ring_alpha(0.1, 0.15) - 0.125).abs() < 1e-3);
        assert_eq!(ring_alpha(0.1, 0.5), 0.0);

        // wide ring still full where the thin one has faded
        assert!((ring_alpha(0.3, 0.15) - 0.25).abs() < EPS);
        assert!(ring_alpha(0.3, 0.5) > 0.0);
        assert_eq!(ring_alpha(0.3, 0.7), 0.0);
    }

    #[test]
    fn test_partial_opacity_reveal() {
        let mut p = params(200.0);
        p.set_opacity(0.5);
        // fully kept up to u == Opacity
        for u in [0.1, 0.3, 0.5] {
            assert!((path_fade(&p, u) - 1.0).abs() < EPS, "u = {u}");
        }
        // falls off beyond it
        let a = path_fade(&p, 0.75);
        let b = path_fade(&p, 0.9);
        assert!(a < 1.0 && a > 0.0);
        assert!(b < a && b > 0.0);

        let full = params(200.0);
        let uv = Vec2::new(0.3, 0.5);
        assert!((fragment(&p, uv).w - fragment(&full, uv).w).abs() < EPS);
        let uv = Vec2::new(0.9, 0.5);
        assert!(fragment(&p, uv).w < fragment(&full, uv).w);
    }

    #[test]
    fn test_premultiplied_output() {
        let p = params(300.0);
        for i in 1..20 {
            let uv = Vec2::new(i as f32 / 20.0, (i % 7) as f32 / 6.0);
            let c = fragment(&p, uv);
            assert!(c.w >= 0.0);
            // color channels never exceed 1 before premultiplication
            assert!(c.x <= c.w + EPS && c.y <= c.w + EPS && c.z <= c.w + EPS);
        }
    }

    #[test]
    fn test_saturates_to_white() {
        let mut p = params(100.0);
        p.set_brightness(50.0);
        let c = fragment(&p, Vec2::new(0.5, 0.5));
        assert!(c.w > 3.0);
        let straight = c.truncate() / c.w;
        assert!((straight - Vec3::ONE).abs().max_element() < 1e-4);
    }

    #[test]
    fn test_output_depends_only_on_uv() {
        let p = params(120.0);
        let uv = Vec2::new(0.4167, 0.3);
        assert_eq!(fragment(&p, uv), fragment(&p, uv));
    }
}
