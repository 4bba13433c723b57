//! Glow uniform blocks
//!
//! Layouts mirror the WGSL structs in `shaders/stormlight.wgsl`.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

use crate::schema::UNIFORM_SCHEMA;

/// Stormlight material parameters
///
/// Maps directly to the WGSL `GlowParams` uniform buffer.
/// Scalars are packed into vec4s for GPU alignment:
/// - `color_time`: rgb = Color, a = Time (seconds)
/// - `params0`: x=Length, y=Opacity, z=Frequency, w=TemporalFrequency
/// - `params1`: x=Bias, y=Amplitude, z=InnerRingThickness, w=Brightness
/// - `params2`: x=WhitePoint, y=Seed, zw unused
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GlowParams {
    pub color_time: Vec4,
    pub params0: Vec4,
    pub params1: Vec4,
    pub params2: Vec4,
}

impl Default for GlowParams {
    /// Parameters initialized from the schema defaults.
    fn default() -> Self {
        let mut p = Self::zeroed();
        for decl in UNIFORM_SCHEMA {
            p.store(decl, decl.default);
        }
        p
    }
}

impl GlowParams {
    /// Defaults for a path of the given total length.
    ///
    /// The seed starts out equal to the length so that paths of different
    /// lengths do not flicker in lockstep.
    pub fn for_length(length: f32) -> Self {
        let mut p = Self::default();
        p.set_length(length);
        p.set_seed(length);
        p
    }

    /// Set base color
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.set_color(color);
        self
    }

    /// Set opacity
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.set_opacity(opacity);
        self
    }

    pub fn color(&self) -> Vec3 {
        self.color_time.truncate()
    }

    pub fn set_color(&mut self, color: Vec3) {
        self.color_time.x = color.x;
        self.color_time.y = color.y;
        self.color_time.z = color.z;
    }

    /// Animation time in seconds
    pub fn time(&self) -> f32 {
        self.color_time.w
    }

    pub fn set_time(&mut self, seconds: f32) {
        self.color_time.w = seconds;
    }

    /// Total path length in world units
    pub fn length(&self) -> f32 {
        self.params0.x
    }

    pub fn set_length(&mut self, length: f32) {
        self.params0.x = length;
    }

    pub fn opacity(&self) -> f32 {
        self.params0.y
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.params0.y = opacity;
    }

    pub fn frequency(&self) -> f32 {
        self.params0.z
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.params0.z = frequency;
    }

    pub fn temporal_frequency(&self) -> f32 {
        self.params0.w
    }

    pub fn set_temporal_frequency(&mut self, frequency: f32) {
        self.params0.w = frequency;
    }

    pub fn bias(&self) -> f32 {
        self.params1.x
    }

    pub fn set_bias(&mut self, bias: f32) {
        self.params1.x = bias;
    }

    pub fn amplitude(&self) -> f32 {
        self.params1.y
    }

    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.params1.y = amplitude;
    }

    pub fn inner_ring_thickness(&self) -> f32 {
        self.params1.z
    }

    pub fn set_inner_ring_thickness(&mut self, thickness: f32) {
        self.params1.z = thickness;
    }

    pub fn brightness(&self) -> f32 {
        self.params1.w
    }

    pub fn set_brightness(&mut self, brightness: f32) {
        self.params1.w = brightness;
    }

    pub fn white_point(&self) -> f32 {
        self.params2.x
    }

    pub fn set_white_point(&mut self, white_point: f32) {
        self.params2.x = white_point;
    }

    pub fn seed(&self) -> f32 {
        self.params2.y
    }

    pub fn set_seed(&mut self, seed: f32) {
        self.params2.y = seed;
    }
}

/// Camera uniform data
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    /// Combined view-projection matrix
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new(view_proj: Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
        }
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY)
    }
}

/// Per-quad transform uniform
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ModelUniform {
    /// Model matrix (world transform)
    pub model: [[f32; 4]; 4],
}

impl ModelUniform {
    pub fn new(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
        }
    }
}

impl Default for ModelUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY)
    }
}
