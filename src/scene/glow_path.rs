//! The glow path scene node.

use crate::animation::AnimationDriver;
use crate::material::MaterialHandle;
use crate::mesh::{build_quads, Quad};
use crate::path::{parameterize, segment_path, SegmentedPath};
use crate::scene::{NodeId, SceneNode};
use crate::settings::GlowSettings;
use crate::util::{Mat4, Result, Vec2};

/// An animated glow ribbon along a polyline.
///
/// Owns one quad per segment and the single material they all read. The
/// geometry never changes after construction; only the material does.
#[derive(Debug)]
pub struct GlowPath {
    name: String,
    points: Vec<Vec2>,
    path: SegmentedPath,
    quads: Vec<Quad>,
    material: MaterialHandle,
    driver: AnimationDriver,
    transform: Mat4,
    parent: Option<NodeId>,
    released: bool,
}

impl GlowPath {
    /// Build a path with default settings.
    pub fn new(points: &[Vec2]) -> Result<Self> {
        Self::with_settings(points, &GlowSettings::default())
    }

    /// Build a path.
    ///
    /// Fails with [`InvalidPathError`](crate::InvalidPathError) for fewer
    /// than two points, non-finite coordinates, or zero total length.
    #[tracing::instrument(skip_all, fields(points = points.len()))]
    pub fn with_settings(points: &[Vec2], settings: &GlowSettings) -> Result<Self> {
        let mut path = segment_path(points)?;
        parameterize(&mut path)?;

        let degenerate = path.degenerate_count();
        if degenerate > 0 {
            tracing::warn!(degenerate, "path has zero-length segments");
        }

        let material = MaterialHandle::new(settings.tuning.params_for_length(path.total_length));
        let quads = build_quads(&path, &material, &settings.mesh);
        let driver = AnimationDriver::new(material.share());

        tracing::debug!(
            segments = path.len(),
            total_length = path.total_length,
            "built glow path"
        );

        Ok(Self {
            name: settings.name.clone(),
            points: points.to_vec(),
            path,
            quads,
            material,
            driver,
            transform: Mat4::IDENTITY,
            parent: None,
            released: false,
        })
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Input points as given at construction.
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn segments(&self) -> &SegmentedPath {
        &self.path
    }

    pub fn total_length(&self) -> f32 {
        self.path.total_length
    }

    /// Shared parameter block; tune the glow through this handle.
    pub fn material(&self) -> &MaterialHandle {
        &self.material
    }

    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl SceneNode for GlowPath {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self) -> Mat4 {
        self.transform
    }

    fn quads(&self) -> &[Quad] {
        &self.quads
    }

    fn material(&self) -> Option<&MaterialHandle> {
        Some(&self.material)
    }

    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn attach_to_scene(&mut self, parent: NodeId) {
        tracing::debug!(name = %self.name, ?parent, "attach");
        self.parent = Some(parent);
    }

    fn detach_from_scene(&mut self) {
        self.parent = None;
    }

    fn advance(&mut self, timestamp_millis: f64) {
        self.driver.advance(timestamp_millis);
    }

    /// Drop CPU geometry. GPU mirrors release their own buffers.
    fn release_resources(&mut self) {
        if self.released {
            return;
        }
        tracing::debug!(name = %self.name, quads = self.quads.len(), "release");
        self.quads = Vec::new();
        self.released = true;
    }
}
