//! # Stormlight
//!
//! Animated "stormlight" glow ribbons drawn along 2D polylines, for map and
//! overlay layers rendered with wgpu.
//!
//! A polyline is split into segments, each segment gets a slice of a single
//! path-wide U coordinate, and one flat quad per segment samples a shared
//! procedural glow material. The host ticks the path once per frame with its
//! own timestamp.
//!
//! ## Modules
//!
//! - [`util`] - Errors and math helpers
//! - [`path`] - Polyline segmentation and U parameterization
//! - [`material`] - Shared, revisioned glow parameter block
//! - [`mesh`] - Per-segment quad construction
//! - [`animation`] - Frame timestamp to `Time` uniform
//! - [`scene`] - Scene node trait, glow path node, minimal scene
//! - [`gpu`] - wgpu buffers and draw recording
//! - [`settings`] - JSON-backed construction settings
//! - `preview` - CPU rasterizer using the reference shader (feature `preview`)
//!
//! ## Example
//!
//! ```ignore
//! use stormlight::prelude::*;
//!
//! let points = [Vec2::new(0.0, 0.0), Vec2::new(120.0, 40.0), Vec2::new(200.0, 10.0)];
//! let mut scene = Scene::new();
//! let id = scene.add_node(GlowPath::new(&points)?);
//!
//! // every frame
//! scene.advance(timestamp_millis);
//!
//! // on removal
//! scene.remove(id);
//! ```

pub mod util;
pub mod path;
pub mod material;
pub mod mesh;
pub mod animation;
pub mod scene;
pub mod gpu;
pub mod settings;

#[cfg(feature = "preview")]
pub mod preview;

pub use util::{Error, InvalidPathError, Result};
pub use material::{GlowMaterial, MaterialHandle, WeakMaterialHandle};
pub use mesh::{MeshSettings, Quad};
pub use animation::AnimationDriver;
pub use scene::{GlowPath, NodeId, Scene, SceneNode};
pub use settings::{GlowSettings, GlowTuning};
pub use stormlight_shader::{GlowParams, UniformValue, SHADER_SOURCE, SHADER_VERSION};

/// Shader crate, for callers that build their own pipelines.
pub use stormlight_shader as shader;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result, Mat4, Vec2, Vec3};
    pub use crate::scene::{GlowPath, NodeId, Scene, SceneNode};
    pub use crate::material::MaterialHandle;
    pub use crate::settings::{GlowSettings, GlowTuning};
    pub use stormlight_shader::{GlowParams, UniformValue};
}
