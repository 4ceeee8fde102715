use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use bytemuck::{bytes_of, Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::{Window, WindowId};

use super::common::{CameraParams, LightParams, SceneView};
use super::shared::{
    wireframe_indices, wireframe_vertices, DEFAULT_CUBE_INDICES, DEFAULT_CUBE_VERTICES, SHADER,
};

/// GPU renderer backed by wgpu: a lit solid cube and a flat wireframe target.
pub struct Renderer {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    depth: DepthBuffer,
    solid_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    global_buffer: wgpu::Buffer,
    global_bind_group: wgpu::BindGroup,
    cube: DrawObject,
    target: DrawObject,
}

impl Renderer {
    /// Initializes the GPU renderer for the provided window.
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Err(anyhow!("window has zero area"));
        }

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance
            .create_surface(Arc::clone(&window))
            .context("failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to acquire GPU adapter")?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("renderer-device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .context("failed to create GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|format| format.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no texture formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let depth = DepthBuffer::create(&device, config.width, config.height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("renderer-shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });

        let global_layout = uniform_layout::<GlobalUniform>(&device, "global-bind-layout");
        let object_layout = uniform_layout::<ObjectConstants>(&device, "object-bind-layout");

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("renderer-pipeline-layout"),
            bind_group_layouts: &[&global_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let global_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("global-uniform"),
            size: std::mem::size_of::<GlobalUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let global_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("global-bind-group"),
            layout: &global_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: global_buffer.as_entire_binding(),
            }],
        });

        let solid_pipeline = build_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            surface_format,
            PipelineKind::Solid,
        );
        let line_pipeline = build_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            surface_format,
            PipelineKind::Wireframe,
        );

        let cube = DrawObject::new(
            &device,
            &object_layout,
            MeshBuffers::from_slices(&device, DEFAULT_CUBE_VERTICES, DEFAULT_CUBE_INDICES, "cube"),
            "cube",
        );
        let target = DrawObject::new(
            &device,
            &object_layout,
            MeshBuffers::from_slices(
                &device,
                &wireframe_vertices(),
                &wireframe_indices(),
                "target",
            ),
            "target",
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            size,
            depth,
            solid_pipeline,
            line_pipeline,
            global_buffer,
            global_bind_group,
            cube,
            target,
        })
    }

    /// Returns the identifier of the window owned by the renderer.
    pub fn window_id(&self) -> WindowId {
        self.window.id()
    }

    /// Exposes the inner window for event handling.
    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn aspect(&self) -> f32 {
        super::common::aspect_ratio(self.size.width, self.size.height)
    }

    /// Resizes the swap chain to match the new dimensions.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth = DepthBuffer::create(&self.device, new_size.width, new_size.height);
    }

    fn update_globals(&self, camera: &CameraParams, light: &LightParams) {
        let uniform = GlobalUniform {
            view_proj: camera.view_proj.to_cols_array_2d(),
            camera_position: camera.position.extend(1.0).into(),
            light_position: light.position.extend(1.0).into(),
            light_color: light.color.extend(light.intensity).into(),
        };
        self.queue
            .write_buffer(&self.global_buffer, 0, bytes_of(&uniform));
    }

    /// Draws the cube and the target outline.
    pub fn render(&mut self, scene: &SceneView) -> Result<(), wgpu::SurfaceError> {
        self.update_globals(&scene.camera, &scene.light);
        self.cube
            .write(&self.queue, scene.cube_model, scene.cube_color);
        self.target
            .write(&self.queue, scene.target_model, scene.target_color);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("renderer-encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.03,
                            g: 0.03,
                            b: 0.05,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &self.global_bind_group, &[]);
            pass.set_pipeline(&self.solid_pipeline);
            self.cube.draw(&mut pass);
            pass.set_pipeline(&self.line_pipeline);
            self.target.draw(&mut pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum PipelineKind {
    Solid,
    Wireframe,
}

fn build_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    kind: PipelineKind,
) -> wgpu::RenderPipeline {
    let (label, topology, vertex_entry, fragment_entry) = match kind {
        PipelineKind::Solid => (
            "solid-pipeline",
            wgpu::PrimitiveTopology::TriangleList,
            "vs_main",
            "fs_main",
        ),
        PipelineKind::Wireframe => (
            "wireframe-pipeline",
            wgpu::PrimitiveTopology::LineList,
            "vs_flat",
            "fs_flat",
        ),
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: vertex_entry,
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: (6 * std::mem::size_of::<f32>()) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &VERTEX_ATTRIBUTES,
            }],
        },
        primitive: wgpu::PrimitiveState {
            topology,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DepthBuffer::FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: fragment_entry,
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        multiview: None,
    })
}

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

fn uniform_layout<T>(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<T>() as u64),
            },
            count: None,
        }],
    })
}

fn normal_matrix(model: Mat4) -> [[f32; 4]; 3] {
    let cols = Mat3::from_mat4(model).inverse().transpose().to_cols_array();
    [
        [cols[0], cols[1], cols[2], 0.0],
        [cols[3], cols[4], cols[5], 0.0],
        [cols[6], cols[7], cols[8], 0.0],
    ]
}

/// Mesh plus its own uniform buffer, rewritten every frame.
struct DrawObject {
    mesh: MeshBuffers,
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl DrawObject {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        mesh: MeshBuffers,
        label: &str,
    ) -> Self {
        let uniform = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label}-uniform")),
            size: std::mem::size_of::<ObjectConstants>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}-bind-group")),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            }],
        });
        Self {
            mesh,
            uniform,
            bind_group,
        }
    }

    fn write(&self, queue: &wgpu::Queue, model: Mat4, color: Vec3) {
        let constants = ObjectConstants {
            model: model.to_cols_array_2d(),
            normal: normal_matrix(model),
            color: color.extend(1.0).into(),
        };
        queue.write_buffer(&self.uniform, 0, bytes_of(&constants));
    }

    fn draw<'pass>(&'pass self, pass: &mut wgpu::RenderPass<'pass>) {
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.mesh.vertex.slice(..));
        pass.set_index_buffer(self.mesh.index.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.mesh.index_count, 0, 0..1);
    }
}

struct MeshBuffers {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    fn from_slices(device: &wgpu::Device, vertices: &[f32], indices: &[u32], label: &str) -> Self {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex,
            index,
            index_count: indices.len() as u32,
        }
    }
}

struct DepthBuffer {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthBuffer {
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

    fn create(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth-texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct GlobalUniform {
    view_proj: [[f32; 4]; 4],
    camera_position: [f32; 4],
    light_position: [f32; 4],
    light_color: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ObjectConstants {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 3],
    color: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_structs_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<GlobalUniform>(), 112);
        assert_eq!(std::mem::size_of::<ObjectConstants>(), 128);
    }

    #[test]
    fn normal_matrix_of_uniform_scale_keeps_axes() {
        let normal = normal_matrix(Mat4::from_scale(Vec3::splat(2.0)));
        assert!((normal[0][0] - 0.5).abs() < 1e-6);
        assert_eq!(normal[0][3], 0.0);
        assert_eq!(normal[1][0], 0.0);
    }
}
