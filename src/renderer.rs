use anyhow::Result;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::core::GpuContext;
use crate::scene::container::SceneContainer;
use crate::scene::node::{MeshVisual, PointsVisual, VisualRef};
use crate::types::{MeshUniform, ParticleInstance, PointsUniform, SceneUniform, Vertex};

/// Dark backdrop the scenes float on (matches the page the originals sat on)
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.003,
    g: 0.004,
    b: 0.008,
    a: 1.0,
};

/// Forward renderer for a scene container
///
/// GPU buffers are built once at mount from the container's visuals; each
/// frame only rewrites the small uniform buffers and re-records the passes.
/// Dropping the renderer releases every GPU-resident buffer.
pub struct Renderer {
    gpu: GpuContext,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    mesh_pipeline: wgpu::RenderPipeline,
    points_pipeline: wgpu::RenderPipeline,
    visuals: Vec<VisualBuffers>,
    overlay: Option<Overlay>,
}

/// GPU-side counterpart of one scene visual
enum VisualBuffers {
    Mesh {
        vertex_buffer: wgpu::Buffer,
        index_buffer: wgpu::Buffer,
        index_count: u32,
        uniform_buffer: wgpu::Buffer,
        bind_group: wgpu::BindGroup,
    },
    Points {
        instance_buffer: wgpu::Buffer,
        instance_count: u32,
        uniform_buffer: wgpu::Buffer,
        bind_group: wgpu::BindGroup,
    },
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        container: &SceneContainer,
        show_overlay: bool,
    ) -> Result<Self> {
        let size = window.inner_size();
        let (gpu, surface) = GpuContext::for_window(window.clone()).await?;

        let surface_config = gpu.surface_config(&surface, size.width.max(1), size.height.max(1));
        surface.configure(gpu.device(), &surface_config);

        let device = gpu.device();

        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene uniform"),
            size: std::mem::size_of::<SceneUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let scene_layout = Self::uniform_layout(device, "scene bind group layout");
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
            label: Some("scene bind group"),
        });

        let visual_layout = Self::uniform_layout(device, "visual bind group layout");

        let mesh_pipeline = Self::create_mesh_pipeline(
            device,
            &scene_layout,
            &visual_layout,
            surface_config.format,
        );
        let points_pipeline = Self::create_points_pipeline(
            device,
            &scene_layout,
            &visual_layout,
            surface_config.format,
        );

        let visuals = container
            .visuals()
            .map(|visual| Self::create_visual_buffers(device, &visual_layout, visual))
            .collect();

        let overlay = if show_overlay {
            Some(Overlay::new(device, surface_config.format, &window))
        } else {
            None
        };

        log::info!(
            "renderer mounted: {} visual(s), {}x{} surface",
            container.actor_count(),
            surface_config.width,
            surface_config.height
        );

        Ok(Self {
            gpu,
            surface,
            surface_config,
            size,
            scene_buffer,
            scene_bind_group,
            mesh_pipeline,
            points_pipeline,
            visuals,
            overlay,
        })
    }

    fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some(label),
        })
    }

    fn create_mesh_pipeline(
        device: &wgpu::Device,
        scene_layout: &wgpu::BindGroupLayout,
        visual_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("mesh.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh pipeline layout"),
            bind_group_layouts: &[scene_layout, visual_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Convex geometry: back-face culling stands in for depth
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })
    }

    fn create_points_pipeline(
        device: &wgpu::Device,
        scene_layout: &wgpu::BindGroupLayout,
        visual_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("particles shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("particles.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("particles pipeline layout"),
            bind_group_layouts: &[scene_layout, visual_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("particles pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[ParticleInstance::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })
    }

    fn create_visual_buffers(
        device: &wgpu::Device,
        visual_layout: &wgpu::BindGroupLayout,
        visual: VisualRef<'_>,
    ) -> VisualBuffers {
        match visual {
            VisualRef::Mesh(mesh) => Self::create_mesh_buffers(device, visual_layout, mesh),
            VisualRef::Points(points) => Self::create_points_buffers(device, visual_layout, points),
        }
    }

    fn create_mesh_buffers(
        device: &wgpu::Device,
        visual_layout: &wgpu::BindGroupLayout,
        mesh: &MeshVisual,
    ) -> VisualBuffers {
        let vertices: Vec<Vertex> = mesh
            .geometry
            .positions
            .iter()
            .zip(&mesh.geometry.normals)
            .map(|(position, normal)| Vertex {
                position: *position,
                normal: *normal,
            })
            .collect();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh indices"),
            contents: bytemuck::cast_slice(&mesh.geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mesh uniform"),
            size: std::mem::size_of::<MeshUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: visual_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("mesh bind group"),
        });

        VisualBuffers::Mesh {
            vertex_buffer,
            index_buffer,
            index_count: mesh.geometry.index_count() as u32,
            uniform_buffer,
            bind_group,
        }
    }

    fn create_points_buffers(
        device: &wgpu::Device,
        visual_layout: &wgpu::BindGroupLayout,
        points: &PointsVisual,
    ) -> VisualBuffers {
        let instances: Vec<ParticleInstance> = points
            .positions
            .chunks_exact(3)
            .map(|xyz| ParticleInstance {
                position: [xyz[0], xyz[1], xyz[2]],
            })
            .collect();

        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("particle instances"),
            contents: bytemuck::cast_slice(&instances),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("particle uniform"),
            size: std::mem::size_of::<PointsUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: visual_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("particle bind group"),
        });

        VisualBuffers::Points {
            instance_buffer,
            instance_count: instances.len() as u32,
            uniform_buffer,
            bind_group,
        }
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.surface_config.width = new_size.width;
            self.surface_config.height = new_size.height;
            self.surface.configure(self.gpu.device(), &self.surface_config);
        }
    }

    /// Let the overlay inspect a window event; returns true if consumed
    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        match &mut self.overlay {
            Some(overlay) => overlay.state.on_window_event(window, event).consumed,
            None => false,
        }
    }

    /// Draw one frame of the container's current state
    pub fn render(
        &mut self,
        container: &SceneContainer,
        window: &Window,
        elapsed: f32,
        fps: f32,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let aspect = self.size.width as f32 / self.size.height.max(1) as f32;
        let scene_uniform = SceneUniform::new(
            &container.camera,
            aspect,
            &container.ambient,
            &container.directional,
            &container.environment.lighting(),
            elapsed,
        );
        self.gpu
            .queue()
            .write_buffer(&self.scene_buffer, 0, bytemuck::cast_slice(&[scene_uniform]));

        for (visual, buffers) in container.visuals().zip(&self.visuals) {
            match (visual, buffers) {
                (VisualRef::Mesh(mesh), VisualBuffers::Mesh { uniform_buffer, .. }) => {
                    let uniform = MeshUniform::new(mesh.model_matrix(), &mesh.material);
                    self.gpu
                        .queue()
                        .write_buffer(uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
                }
                (VisualRef::Points(points), VisualBuffers::Points { uniform_buffer, .. }) => {
                    let uniform = PointsUniform::new(points.model_matrix(), &points.material);
                    self.gpu
                        .queue()
                        .write_buffer(uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
                }
                // Visual kinds are fixed at mount; a mismatch cannot happen
                _ => {}
            }
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, &self.scene_bind_group, &[]);

            for buffers in &self.visuals {
                match buffers {
                    VisualBuffers::Mesh {
                        vertex_buffer,
                        index_buffer,
                        index_count,
                        bind_group,
                        ..
                    } => {
                        render_pass.set_pipeline(&self.mesh_pipeline);
                        render_pass.set_bind_group(1, bind_group, &[]);
                        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
                        render_pass
                            .set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                        render_pass.draw_indexed(0..*index_count, 0, 0..1);
                    }
                    VisualBuffers::Points {
                        instance_buffer,
                        instance_count,
                        bind_group,
                        ..
                    } => {
                        render_pass.set_pipeline(&self.points_pipeline);
                        render_pass.set_bind_group(1, bind_group, &[]);
                        render_pass.set_vertex_buffer(0, instance_buffer.slice(..));
                        render_pass.draw(0..6, 0..*instance_count);
                    }
                }
            }
        }

        if self.overlay.is_some() {
            self.draw_overlay(window, &mut encoder, &view, fps);
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn draw_overlay(
        &mut self,
        window: &Window,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        fps: f32,
    ) {
        let Some(overlay) = &mut self.overlay else {
            return;
        };

        let raw_input = overlay.state.take_egui_input(window);
        let full_output = overlay.ctx.run(raw_input, |ctx| {
            egui::Window::new("FPS")
                .title_bar(false)
                .resizable(false)
                .fixed_pos(egui::pos2(10.0, 10.0))
                .frame(egui::Frame::NONE)
                .show(ctx, |ui| {
                    ui.label(
                        egui::RichText::new(format!("{:.0}", fps))
                            .size(32.0)
                            .color(egui::Color32::from_rgb(94, 234, 212)),
                    );
                    ui.label(
                        egui::RichText::new("FPS")
                            .size(12.0)
                            .color(egui::Color32::GRAY),
                    );
                });
        });

        overlay
            .state
            .handle_platform_output(window, full_output.platform_output);

        let tris = overlay
            .ctx
            .tessellate(full_output.shapes, overlay.ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            overlay
                .renderer
                .update_texture(self.gpu.device(), self.gpu.queue(), *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.size.width, self.size.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        overlay.renderer.update_buffers(
            self.gpu.device(),
            self.gpu.queue(),
            encoder,
            &tris,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("overlay pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            // SAFETY: The render pass lifetime is actually tied to the encoder,
            // but egui-wgpu requires 'static. This is safe because we drop the
            // render pass before using the encoder again.
            let render_pass_static = unsafe {
                std::mem::transmute::<&mut wgpu::RenderPass<'_>, &mut wgpu::RenderPass<'static>>(
                    &mut render_pass,
                )
            };

            overlay
                .renderer
                .render(render_pass_static, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            overlay.renderer.free_texture(id);
        }
    }
}

/// egui FPS overlay state
struct Overlay {
    renderer: egui_wgpu::Renderer,
    state: egui_winit::State,
    ctx: egui::Context,
}

impl Overlay {
    fn new(device: &wgpu::Device, format: wgpu::TextureFormat, window: &Window) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());

        Self {
            renderer,
            state,
            ctx,
        }
    }
}
