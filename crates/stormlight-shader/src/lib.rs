//! Stormlight glow shader for wgpu
//!
//! A procedural, noise-driven glow drawn along polyline ribbons. The shader
//! is shipped as a versioned WGSL resource together with a static uniform
//! schema and a CPU reference implementation.
//!
//! ## Usage
//!
//! ```ignore
//! use stormlight_shader::{GlowParams, PipelineConfig, create_bind_group_layouts, create_pipeline};
//!
//! let layouts = create_bind_group_layouts(&device);
//! let pipeline = create_pipeline(&device, &layouts, &PipelineConfig {
//!     format: surface_format,
//!     ..Default::default()
//! });
//! let params = GlowParams::for_length(total_length);
//! ```

mod params;
pub mod reference;
pub mod schema;

pub use params::{CameraUniform, GlowParams, ModelUniform};
pub use schema::{
    find_uniform, validate_layout, SchemaError, UniformDecl, UniformType, UniformValue,
    DEFAULT_COLOR, UNIFORM_BLOCK_SIZE, UNIFORM_SCHEMA,
};

pub use wgpu;

/// Embedded shader source
pub const SHADER_SOURCE: &str = include_str!("shaders/stormlight.wgsl");

/// Version tag of [`SHADER_SOURCE`] and its uniform layout.
///
/// Bumped whenever the WGSL structs or the meaning of a uniform change.
pub const SHADER_VERSION: &str = "stormlight-glow/1";

/// Additive blending for premultiplied color: dst += src.
pub const PREMULTIPLIED_ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

/// Vertex buffer layout for ribbon quads
pub fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // normal
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    }
}

/// Ribbon vertex format
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

fn uniform_entry(visibility: wgpu::ShaderStages, size: usize) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: std::num::NonZeroU64::new(size as u64),
        },
        count: None,
    }
}

/// Create bind group layouts for the glow pipeline
pub fn create_bind_group_layouts(device: &wgpu::Device) -> BindGroupLayouts {
    // Group 0: Camera
    let camera = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("stormlight_camera"),
        entries: &[uniform_entry(
            wgpu::ShaderStages::VERTEX,
            std::mem::size_of::<CameraUniform>(),
        )],
    });

    // Group 1: Glow parameters, shared by every quad of a path
    let material = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("stormlight_material"),
        entries: &[uniform_entry(wgpu::ShaderStages::FRAGMENT, UNIFORM_BLOCK_SIZE)],
    });

    // Group 2: Quad transform
    let model = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("stormlight_model"),
        entries: &[uniform_entry(
            wgpu::ShaderStages::VERTEX,
            std::mem::size_of::<ModelUniform>(),
        )],
    });

    BindGroupLayouts { camera, material, model }
}

/// Bind group layouts for the glow pipeline
pub struct BindGroupLayouts {
    /// Group 0: Camera uniform
    pub camera: wgpu::BindGroupLayout,
    /// Group 1: Glow parameters
    pub material: wgpu::BindGroupLayout,
    /// Group 2: Quad transform
    pub model: wgpu::BindGroupLayout,
}

/// Pipeline configuration
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Debug label for the pipeline (defaults to "stormlight_pipeline")
    pub label: Option<&'static str>,
    /// Surface texture format
    pub format: wgpu::TextureFormat,
    /// Depth format of the host pass, if it has one. The glow never tests
    /// or writes depth; this only makes the pipeline compatible.
    pub depth_format: Option<wgpu::TextureFormat>,
    /// MSAA sample count of the host pass
    pub sample_count: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: None,
            format: wgpu::TextureFormat::Bgra8UnormSrgb,
            depth_format: None,
            sample_count: 1,
        }
    }
}

/// Create the glow render pipeline
///
/// Additive premultiplied blending, no depth test, no face culling.
pub fn create_pipeline(
    device: &wgpu::Device,
    layouts: &BindGroupLayouts,
    config: &PipelineConfig,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("stormlight_shader"),
        source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("stormlight_pipeline_layout"),
        bind_group_layouts: &[&layouts.camera, &layouts.material, &layouts.model],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(config.label.unwrap_or("stormlight_pipeline")),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[vertex_buffer_layout()],
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None, // rotated quads may face either way
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: config.depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::Always,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: config.sample_count,
            ..Default::default()
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: config.format,
                blend: Some(PREMULTIPLIED_ADDITIVE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        multiview: None,
        cache: None,
    })
}

/// Create a uniform buffer initialized with `data`
pub fn create_uniform_buffer<T: bytemuck::Pod>(
    device: &wgpu::Device,
    label: &str,
    data: &T,
) -> wgpu::Buffer {
    use wgpu::util::DeviceExt;
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(data),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

/// Create a single-buffer bind group
pub fn create_uniform_bind_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    })
}
