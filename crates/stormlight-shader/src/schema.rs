//! Static uniform schema for the glow shader.
//!
//! Every named uniform of `GlowParams` is declared here with its type,
//! default and byte offset inside the 64-byte block. Hosts that bind the
//! shader through their own tooling can check the layout with
//! [`validate_layout`] before issuing draws, and tuning UIs can enumerate
//! [`UNIFORM_SCHEMA`] instead of hard-coding names.

use std::fmt;

use glam::Vec3;
use thiserror::Error;

use crate::params::GlowParams;

/// Errors raised when reading or writing uniforms by name.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// Name is not part of the schema
    #[error("Unknown uniform: {0}")]
    UnknownUniform(String),

    /// Uniform is driven internally (Time, Length)
    #[error("Uniform {0} is read-only")]
    ReadOnly(&'static str),

    /// Value type does not match the declaration
    #[error("Uniform {name}: expected {expected}, got {actual}")]
    TypeMismatch {
        name: &'static str,
        expected: UniformType,
        actual: UniformType,
    },

    /// Host-side binding disagrees with the declared block
    #[error("Invalid uniform layout: {0}")]
    Layout(String),
}

/// Uniform value types used by the shader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniformType {
    F32,
    Vec3,
}

impl UniformType {
    /// Size in bytes
    pub const fn size(self) -> usize {
        match self {
            Self::F32 => 4,
            Self::Vec3 => 12,
        }
    }

    /// WGSL spelling of the type
    pub const fn wgsl_name(self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::Vec3 => "vec3<f32>",
        }
    }
}

impl fmt::Display for UniformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wgsl_name())
    }
}

/// A typed uniform value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    F32(f32),
    Vec3(Vec3),
}

impl UniformValue {
    pub fn ty(&self) -> UniformType {
        match self {
            Self::F32(_) => UniformType::F32,
            Self::Vec3(_) => UniformType::Vec3,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            Self::F32(v) => Some(v),
            Self::Vec3(_) => None,
        }
    }

    pub fn as_vec3(&self) -> Option<Vec3> {
        match *self {
            Self::Vec3(v) => Some(v),
            Self::F32(_) => None,
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        Self::F32(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v)
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from(v: [f32; 3]) -> Self {
        Self::Vec3(Vec3::from_array(v))
    }
}

/// One uniform declaration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformDecl {
    pub name: &'static str,
    pub ty: UniformType,
    pub default: UniformValue,
    /// Byte offset inside `GlowParams`
    pub offset: usize,
    /// False for uniforms written by the path itself
    pub tunable: bool,
}

const fn decl(name: &'static str, default: f32, offset: usize, tunable: bool) -> UniformDecl {
    UniformDecl {
        name,
        ty: UniformType::F32,
        default: UniformValue::F32(default),
        offset,
        tunable,
    }
}

/// Default ribbon color (dark green)
pub const DEFAULT_COLOR: Vec3 = Vec3::new(23.0 / 255.0, 98.0 / 255.0, 15.0 / 255.0);

/// Declared uniforms, ordered by offset.
pub const UNIFORM_SCHEMA: &[UniformDecl] = &[
    UniformDecl {
        name: "Color",
        ty: UniformType::Vec3,
        default: UniformValue::Vec3(DEFAULT_COLOR),
        offset: 0,
        tunable: true,
    },
    decl("Time", 0.0, 12, false),
    // Length and Seed are filled in from the path at construction.
    decl("Length", 0.0, 16, false),
    decl("Opacity", 1.0, 20, true),
    decl("Frequency", 4.0, 24, true),
    decl("TemporalFrequency", 0.25, 28, true),
    decl("Bias", 0.4, 32, true),
    decl("Amplitude", 0.6, 36, true),
    decl("InnerRingThickness", 0.1, 40, true),
    decl("Brightness", 1.0, 44, true),
    decl("WhitePoint", 3.0, 48, true),
    decl("Seed", 0.0, 52, true),
];

/// Size of the uniform block in bytes.
pub const UNIFORM_BLOCK_SIZE: usize = std::mem::size_of::<GlowParams>();

/// Find a uniform declaration by name.
pub fn find_uniform(name: &str) -> Option<&'static UniformDecl> {
    UNIFORM_SCHEMA.iter().find(|d| d.name == name)
}

/// Check a host-reported binding size against the declared block.
///
/// Also verifies the schema itself: aligned, in bounds, no overlaps and no
/// vec3 crossing a 16-byte row.
pub fn validate_layout(binding_size: u64) -> Result<(), SchemaError> {
    if binding_size != UNIFORM_BLOCK_SIZE as u64 {
        return Err(SchemaError::Layout(format!(
            "binding size {} does not match GlowParams ({} bytes)",
            binding_size, UNIFORM_BLOCK_SIZE
        )));
    }

    let mut end = 0usize;
    for d in UNIFORM_SCHEMA {
        if d.offset % 4 != 0 {
            return Err(SchemaError::Layout(format!("{} is not 4-byte aligned", d.name)));
        }
        if d.offset < end {
            return Err(SchemaError::Layout(format!("{} overlaps previous uniform", d.name)));
        }
        if d.ty == UniformType::Vec3 && d.offset / 16 != (d.offset + 11) / 16 {
            return Err(SchemaError::Layout(format!("{} crosses a vec4 row", d.name)));
        }
        if d.default.ty() != d.ty {
            return Err(SchemaError::Layout(format!("{} default has wrong type", d.name)));
        }
        end = d.offset + d.ty.size();
        if end > UNIFORM_BLOCK_SIZE {
            return Err(SchemaError::Layout(format!("{} is out of bounds", d.name)));
        }
    }
    Ok(())
}

impl GlowParams {
    fn floats(&self) -> &[f32; 16] {
        bytemuck::cast_ref(self)
    }

    fn floats_mut(&mut self) -> &mut [f32; 16] {
        bytemuck::cast_mut(self)
    }

    /// Read a uniform through its declaration.
    pub fn uniform(&self, decl: &UniformDecl) -> UniformValue {
        let f = self.floats();
        let i = decl.offset / 4;
        match decl.ty {
            UniformType::F32 => UniformValue::F32(f[i]),
            UniformType::Vec3 => UniformValue::Vec3(Vec3::new(f[i], f[i + 1], f[i + 2])),
        }
    }

    /// Read a uniform by name.
    pub fn uniform_by_name(&self, name: &str) -> Result<UniformValue, SchemaError> {
        let decl = find_uniform(name).ok_or_else(|| SchemaError::UnknownUniform(name.to_string()))?;
        Ok(self.uniform(decl))
    }

    /// Write a tunable uniform by name.
    pub fn set_uniform(&mut self, name: &str, value: UniformValue) -> Result<(), SchemaError> {
        let decl = find_uniform(name).ok_or_else(|| SchemaError::UnknownUniform(name.to_string()))?;
        if !decl.tunable {
            return Err(SchemaError::ReadOnly(decl.name));
        }
        if decl.ty != value.ty() {
            return Err(SchemaError::TypeMismatch {
                name: decl.name,
                expected: decl.ty,
                actual: value.ty(),
            });
        }
        self.store(decl, value);
        Ok(())
    }

    /// Unchecked write; the value type is assumed to match.
    pub(crate) fn store(&mut self, decl: &UniformDecl, value: UniformValue) {
        let i = decl.offset / 4;
        let f = self.floats_mut();
        match value {
            UniformValue::F32(v) => f[i] = v,
            UniformValue::Vec3(v) => f[i..i + 3].copy_from_slice(&v.to_array()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::Zeroable;

    #[test]
    fn test_schema_layout_valid() {
        validate_layout(64).unwrap();
        assert_eq!(UNIFORM_BLOCK_SIZE, 64);
    }

    #[test]
    fn test_wrong_binding_size() {
        let err = validate_layout(48).unwrap_err();
        assert!(matches!(err, SchemaError::Layout(_)));
    }

    #[test]
    fn test_schema_names_unique() {
        for (i, a) in UNIFORM_SCHEMA.iter().enumerate() {
            for b in &UNIFORM_SCHEMA[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
        assert_eq!(UNIFORM_SCHEMA.len(), 12);
    }

    #[test]
    fn test_offsets_match_typed_setters() {
        let mut p = GlowParams::zeroed();
        p.set_color(Vec3::new(0.1, 0.2, 0.3));
        p.set_time(1.0);
        p.set_length(2.0);
        p.set_opacity(3.0);
        p.set_frequency(4.0);
        p.set_temporal_frequency(5.0);
        p.set_bias(6.0);
        p.set_amplitude(7.0);
        p.set_inner_ring_thickness(8.0);
        p.set_brightness(9.0);
        p.set_white_point(10.0);
        p.set_seed(11.0);

        let expected = [
            ("Time", 1.0),
            ("Length", 2.0),
            ("Opacity", 3.0),
            ("Frequency", 4.0),
            ("TemporalFrequency", 5.0),
            ("Bias", 6.0),
            ("Amplitude", 7.0),
            ("InnerRingThickness", 8.0),
            ("Brightness", 9.0),
            ("WhitePoint", 10.0),
            ("Seed", 11.0),
        ];
        for (name, v) in expected {
            assert_eq!(p.uniform_by_name(name).unwrap(), UniformValue::F32(v), "{name}");
        }
        assert_eq!(
            p.uniform_by_name("Color").unwrap(),
            UniformValue::Vec3(Vec3::new(0.1, 0.2, 0.3))
        );
    }

    #[test]
    fn test_set_uniform_by_name() {
        let mut p = GlowParams::default();
        p.set_uniform("Opacity", 0.5f32.into()).unwrap();
        assert_eq!(p.opacity(), 0.5);
        p.set_uniform("Color", [1.0f32, 0.0, 0.0].into()).unwrap();
        assert_eq!(p.color(), Vec3::X);
    }

    #[test]
    fn test_read_only_uniforms() {
        let mut p = GlowParams::default();
        assert_eq!(p.set_uniform("Time", 1.0f32.into()), Err(SchemaError::ReadOnly("Time")));
        assert_eq!(p.set_uniform("Length", 1.0f32.into()), Err(SchemaError::ReadOnly("Length")));
        assert_eq!(p.time(), 0.0);
    }

    #[test]
    fn test_unknown_and_mismatched() {
        let mut p = GlowParams::default();
        assert!(matches!(
            p.set_uniform("Glow", 1.0f32.into()),
            Err(SchemaError::UnknownUniform(_))
        ));
        let err = p.set_uniform("Bias", Vec3::ONE.into()).unwrap_err();
        assert!(err.to_string().contains("expected f32"));
    }
}
