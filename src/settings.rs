//! Persistent glow settings

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stormlight_shader::GlowParams;

use crate::mesh::MeshSettings;
use crate::util::{Error, Result, Vec3};

/// Initial values of the tunable uniforms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlowTuning {
    pub opacity: f32,
    pub frequency: f32,
    pub temporal_frequency: f32,
    pub bias: f32,
    pub amplitude: f32,
    pub inner_ring_thickness: f32,
    pub brightness: f32,
    pub white_point: f32,
    /// Linear RGB
    pub color: [f32; 3],
    /// None = use the path's total length
    pub seed: Option<f32>,
}

impl Default for GlowTuning {
    fn default() -> Self {
        let p = GlowParams::default();
        Self {
            opacity: p.opacity(),
            frequency: p.frequency(),
            temporal_frequency: p.temporal_frequency(),
            bias: p.bias(),
            amplitude: p.amplitude(),
            inner_ring_thickness: p.inner_ring_thickness(),
            brightness: p.brightness(),
            white_point: p.white_point(),
            color: p.color().to_array(),
            seed: None,
        }
    }
}

impl GlowTuning {
    /// Parameters for a path of `total_length` with this tuning applied.
    pub fn params_for_length(&self, total_length: f32) -> GlowParams {
        let mut p = GlowParams::for_length(total_length);
        p.set_opacity(self.opacity);
        p.set_frequency(self.frequency);
        p.set_temporal_frequency(self.temporal_frequency);
        p.set_bias(self.bias);
        p.set_amplitude(self.amplitude);
        p.set_inner_ring_thickness(self.inner_ring_thickness);
        p.set_brightness(self.brightness);
        p.set_white_point(self.white_point);
        p.set_color(Vec3::from_array(self.color));
        if let Some(seed) = self.seed {
            p.set_seed(seed);
        }
        p
    }
}

/// Settings applied when a glow path is constructed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlowSettings {
    /// Scene node name
    pub name: String,
    pub mesh: MeshSettings,
    pub tuning: GlowTuning,
}

impl Default for GlowSettings {
    fn default() -> Self {
        Self {
            name: "line".to_string(),
            mesh: MeshSettings::default(),
            tuning: GlowTuning::default(),
        }
    }
}

impl GlowSettings {
    /// Default settings file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("stormlight");
            p.push("settings.json");
            p
        })
    }

    /// Load from the default location, falling back to defaults
    pub fn load_default() -> Self {
        Self::default_path()
            .filter(|p| p.exists())
            .and_then(|p| match Self::load(&p) {
                Ok(s) => Some(s),
                Err(e) => {
                    tracing::warn!("ignoring {}: {}", p.display(), e);
                    None
                }
            })
            .unwrap_or_default()
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Save settings to a JSON file, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would produce invisible or NaN geometry
    pub fn validate(&self) -> Result<()> {
        let w = self.mesh.width;
        if !w.is_finite() || w <= 0.0 {
            return Err(Error::settings(format!("mesh.width must be positive, got {w}")));
        }
        if !self.mesh.elevation.is_finite() {
            return Err(Error::settings("mesh.elevation must be finite"));
        }
        let t = &self.tuning;
        let scalars = [
            ("opacity", t.opacity),
            ("frequency", t.frequency),
            ("temporal_frequency", t.temporal_frequency),
            ("bias", t.bias),
            ("amplitude", t.amplitude),
            ("inner_ring_thickness", t.inner_ring_thickness),
            ("brightness", t.brightness),
            ("white_point", t.white_point),
        ];
        for (name, v) in scalars {
            if !v.is_finite() {
                return Err(Error::settings(format!("tuning.{name} must be finite")));
            }
        }
        if t.color.iter().any(|c| !c.is_finite()) {
            return Err(Error::settings("tuning.color must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shader_schema() {
        let t = GlowTuning::default();
        assert_eq!(t.frequency, 4.0);
        assert_eq!(t.bias, 0.4);
        assert_eq!(t.seed, None);
        let p = t.params_for_length(250.0);
        assert_eq!(p.seed(), 250.0);
        assert_eq!(p, GlowParams::for_length(250.0));
    }

    #[test]
    fn test_explicit_seed() {
        let t = GlowTuning {
            seed: Some(7.0),
            ..Default::default()
        };
        assert_eq!(t.params_for_length(100.0).seed(), 7.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{ "mesh": { "width": 4.0 }, "tuning": { "opacity": 0.5 } }"#;
        let s = GlowSettings::from_json(json).unwrap();
        assert_eq!(s.mesh.width, 4.0);
        assert_eq!(s.mesh.elevation, 1.0);
        assert_eq!(s.tuning.opacity, 0.5);
        assert_eq!(s.tuning.white_point, 3.0);
        assert_eq!(s.name, "line");
    }

    #[test]
    fn test_invalid_width_rejected() {
        let err = GlowSettings::from_json(r#"{ "mesh": { "width": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, Error::Settings(_)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(GlowSettings::from_json("{ nope"), Err(Error::Json(_))));
    }
}
