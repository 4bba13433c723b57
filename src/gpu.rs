//! GPU mirror of a glow path.
//!
//! [`GpuGlowPath`] uploads a path's quads once and keeps one uniform buffer
//! for the shared material, re-uploaded only when the material revision
//! moves. The compiled pipeline lives in [`GlowPipeline`] and is shared by
//! every path drawn into the same kind of target.

use std::sync::Arc;

use stormlight_shader::wgpu;
use stormlight_shader::{
    create_bind_group_layouts, create_pipeline, create_uniform_bind_group, create_uniform_buffer,
    BindGroupLayouts, CameraUniform, GlowParams, ModelUniform, PipelineConfig,
};
use wgpu::util::DeviceExt;

use crate::material::WeakMaterialHandle;
use crate::scene::{GlowPath, SceneNode};
use crate::util::Mat4;

/// Compiled glow pipeline plus its bind group layouts.
///
/// The shader is stateless apart from per-path uniforms, so one pipeline
/// serves any number of paths. It is freed when the last `Arc` drops.
pub struct GlowPipeline {
    layouts: BindGroupLayouts,
    pipeline: wgpu::RenderPipeline,
    config: PipelineConfig,
}

impl GlowPipeline {
    pub fn new(device: &wgpu::Device, config: PipelineConfig) -> Arc<Self> {
        let _span = tracing::info_span!("glow_pipeline_new").entered();
        let layouts = create_bind_group_layouts(device);
        let pipeline = create_pipeline(device, &layouts, &config);
        Arc::new(Self {
            layouts,
            pipeline,
            config,
        })
    }

    pub fn layouts(&self) -> &BindGroupLayouts {
        &self.layouts
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Camera uniform buffer and its group-0 bind group.
    pub fn create_camera(
        &self,
        device: &wgpu::Device,
        view_proj: Mat4,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let camera = CameraUniform::new(view_proj);
        let buffer = create_uniform_buffer(device, "stormlight_camera", &camera);
        let bind_group =
            create_uniform_bind_group(device, "stormlight_camera", &self.layouts.camera, &buffer);
        (buffer, bind_group)
    }
}

/// Params and revision to write, if the material moved past `uploaded`.
///
/// Nothing is pending once the mirror is released or the owning path has
/// dropped the material.
fn pending_upload(
    released: bool,
    uploaded: u64,
    material: &WeakMaterialHandle,
) -> Option<(GlowParams, u64)> {
    if released {
        return None;
    }
    let (params, revision) = material.snapshot()?;
    (revision != uploaded).then_some((params, revision))
}

struct GpuQuad {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    local: Mat4,
}

/// Per-path GPU buffers.
pub struct GpuGlowPath {
    pipeline: Arc<GlowPipeline>,
    material: WeakMaterialHandle,
    material_buffer: wgpu::Buffer,
    material_bind_group: wgpu::BindGroup,
    uploaded_revision: u64,
    quads: Vec<GpuQuad>,
    released: bool,
}

impl GpuGlowPath {
    /// Upload geometry and the current material of `path`.
    pub fn upload(device: &wgpu::Device, pipeline: &Arc<GlowPipeline>, path: &GlowPath) -> Self {
        let _span = tracing::info_span!("glow_path_upload", quads = path.quads().len()).entered();

        let (params, revision) = path.material().snapshot();
        let material_buffer = create_uniform_buffer(device, "stormlight_material", &params);
        let material_bind_group = create_uniform_bind_group(
            device,
            "stormlight_material",
            &pipeline.layouts.material,
            &material_buffer,
        );

        let parent = path.transform();
        let quads = path
            .quads()
            .iter()
            .map(|q| {
                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("stormlight_quad_vertices"),
                    contents: bytemuck::cast_slice(q.vertices()),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("stormlight_quad_indices"),
                    contents: bytemuck::cast_slice(q.indices()),
                    usage: wgpu::BufferUsages::INDEX,
                });
                let local = q.transform().matrix();
                let model = ModelUniform::new(parent * local);
                let model_buffer = create_uniform_buffer(device, "stormlight_model", &model);
                let model_bind_group = create_uniform_bind_group(
                    device,
                    "stormlight_model",
                    &pipeline.layouts.model,
                    &model_buffer,
                );
                GpuQuad {
                    vertex_buffer,
                    index_buffer,
                    model_buffer,
                    model_bind_group,
                    local,
                }
            })
            .collect();

        Self {
            pipeline: Arc::clone(pipeline),
            material: path.material().downgrade(),
            material_buffer,
            material_bind_group,
            uploaded_revision: revision,
            quads,
            released: false,
        }
    }

    /// Upload the material if it changed since the last sync.
    ///
    /// Returns true if a write was queued. Call once per frame after
    /// `advance`.
    pub fn sync(&mut self, queue: &wgpu::Queue) -> bool {
        let Some((params, revision)) =
            pending_upload(self.released, self.uploaded_revision, &self.material)
        else {
            return false;
        };
        self.write_params(queue, &params);
        self.uploaded_revision = revision;
        true
    }

    fn write_params(&self, queue: &wgpu::Queue, params: &GlowParams) {
        queue.write_buffer(&self.material_buffer, 0, bytemuck::bytes_of(params));
    }

    /// Re-upload every quad's model matrix for a new parent transform.
    pub fn set_parent_transform(&self, queue: &wgpu::Queue, parent: Mat4) {
        for q in &self.quads {
            let model = ModelUniform::new(parent * q.local);
            queue.write_buffer(&q.model_buffer, 0, bytemuck::bytes_of(&model));
        }
    }

    /// Record draws for every quad. The caller binds nothing else.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, camera: &wgpu::BindGroup) {
        if self.released {
            return;
        }
        pass.set_pipeline(&self.pipeline.pipeline);
        pass.set_bind_group(0, camera, &[]);
        pass.set_bind_group(1, &self.material_bind_group, &[]);
        for q in &self.quads {
            pass.set_bind_group(2, &q.model_bind_group, &[]);
            pass.set_vertex_buffer(0, q.vertex_buffer.slice(..));
            pass.set_index_buffer(q.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..6, 0, 0..1);
        }
    }

    /// Destroy all per-path buffers. The shared pipeline is left alone.
    pub fn release_resources(&mut self) {
        if self.released {
            return;
        }
        tracing::debug!(quads = self.quads.len(), "release gpu path");
        for q in self.quads.drain(..) {
            q.vertex_buffer.destroy();
            q.index_buffer.destroy();
            q.model_buffer.destroy();
        }
        self.material_buffer.destroy();
        self.released = true;
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn quad_count(&self) -> usize {
        self.quads.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::MaterialHandle;

    #[test]
    fn test_unchanged_material_is_not_uploaded() {
        let owner = MaterialHandle::new(GlowParams::default());
        let weak = owner.downgrade();
        let revision = owner.revision();
        assert!(pending_upload(false, revision, &weak).is_none());
    }

    #[test]
    fn test_update_triggers_upload() {
        let owner = MaterialHandle::new(GlowParams::default());
        let weak = owner.downgrade();
        let uploaded = owner.revision();

        owner.update(|p| p.set_brightness(3.0));
        let (params, revision) = pending_upload(false, uploaded, &weak).unwrap();
        assert_eq!(params.brightness(), 3.0);
        assert_ne!(revision, uploaded);

        // once written, the same revision is not pending again
        assert!(pending_upload(false, revision, &weak).is_none());
    }

    #[test]
    fn test_released_mirror_never_uploads() {
        let owner = MaterialHandle::new(GlowParams::default());
        let weak = owner.downgrade();
        let uploaded = owner.revision();
        owner.update(|p| p.set_time(1.0));
        assert!(pending_upload(true, uploaded, &weak).is_none());
    }

    #[test]
    fn test_dropped_material_never_uploads() {
        let owner = MaterialHandle::new(GlowParams::default());
        let weak = owner.downgrade();
        let uploaded = owner.revision();
        owner.update(|p| p.set_time(1.0));
        drop(owner);
        assert!(pending_upload(false, uploaded, &weak).is_none());
    }
}
