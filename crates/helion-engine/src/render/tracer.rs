use crate::render::sync::GpuMirror;
use crate::render::target::{OutputTarget, compute_target_size};
use crate::render::uniforms::{FrameUniforms, TracerCamera};
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{PointLightData, Scene, SphereData};

/// Kernel thread-group edge; must match `@workgroup_size` in trace.wgsl.
const WORKGROUP_SIZE: u32 = 8;

/// Tunables of the frame driver.
#[derive(Debug, Clone)]
pub struct TracerSettings {
    /// Cap on the output height in pixels; the effective height is this
    /// value clamped to the surface height.
    pub max_resolution: u32,
    /// Secondary bounces per ray. The kernel always gets this plus one for
    /// the primary ray.
    pub max_bounces: u32,
    /// Bump exact power-of-two heights up one pixel. See
    /// [`compute_target_size`](crate::render::compute_target_size).
    pub nudge_pow2_height: bool,
}

impl Default for TracerSettings {
    fn default() -> Self {
        Self {
            max_resolution: 1440,
            max_bounces: 4,
            nudge_pow2_height: false,
        }
    }
}

/// The ray tracing frame driver.
///
/// Owns the compute and composite pipelines, the per-frame uniform block,
/// both registry mirrors, and the output target. Per rendered frame it:
///
/// 1. recomputes output dimensions from the resolution cap and surface
///    aspect, reallocating the storage target only on change
/// 2. resynchronizes the sphere and light mirrors (no-ops while clean)
/// 3. pushes camera/environment uniforms and the live element counts
/// 4. dispatches `ceil(w/8) × ceil(h/8)` thread groups
/// 5. composites the target onto the swapchain
///
/// All GPU resources are created lazily on first render, keyed to the
/// surface format where relevant.
pub struct RayTracer {
    settings: TracerSettings,

    compute_pipeline: Option<wgpu::ComputePipeline>,
    compute_layout: Option<wgpu::BindGroupLayout>,
    compute_bind_group: Option<wgpu::BindGroup>,

    blit_format: Option<wgpu::TextureFormat>,
    blit_pipeline: Option<wgpu::RenderPipeline>,
    blit_layout: Option<wgpu::BindGroupLayout>,
    blit_bind_group: Option<wgpu::BindGroup>,
    blit_sampler: Option<wgpu::Sampler>,

    uniform_buffer: Option<wgpu::Buffer>,
    spheres: GpuMirror<SphereData>,
    lights: GpuMirror<PointLightData>,
    // Bound in place of an unpublished mirror; never read because the
    // element-count uniform is zero.
    sphere_placeholder: Option<wgpu::Buffer>,
    light_placeholder: Option<wgpu::Buffer>,

    target: Option<OutputTarget>,
}

impl RayTracer {
    pub fn new(settings: TracerSettings) -> Self {
        Self {
            settings,
            compute_pipeline: None,
            compute_layout: None,
            compute_bind_group: None,
            blit_format: None,
            blit_pipeline: None,
            blit_layout: None,
            blit_bind_group: None,
            blit_sampler: None,
            uniform_buffer: None,
            spheres: GpuMirror::new("helion sphere buffer"),
            lights: GpuMirror::new("helion light buffer"),
            sphere_placeholder: None,
            light_placeholder: None,
            target: None,
        }
    }

    pub fn settings(&self) -> &TracerSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut TracerSettings {
        &mut self.settings
    }

    /// Renders one frame: traces into the output target and composites it
    /// onto `target`.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        scene: &mut Scene,
        camera: &TracerCamera,
    ) {
        self.ensure_pipelines(ctx);
        self.ensure_static_resources(ctx);

        // Output sizing follows the surface aspect and the resolution cap.
        let (width, height) = compute_target_size(
            self.settings.max_resolution,
            ctx.surface_size.height,
            ctx.aspect_ratio(),
            self.settings.nudge_pow2_height,
        );
        if OutputTarget::ensure(&mut self.target, ctx.device, width, height) {
            self.compute_bind_group = None;
            self.blit_bind_group = None;
        }

        // Buffer synchronization, gated per kind by the registry dirty flag.
        let spheres_changed = self.spheres.sync(ctx.device, &mut scene.spheres, |s| s.pack());
        let lights_changed = self.lights.sync(ctx.device, &mut scene.lights, |l| l.pack());
        if spheres_changed || lights_changed {
            self.compute_bind_group = None;
        }

        // Uniforms are pushed every frame; counts reflect the mirrors just
        // synchronized above.
        let uniforms = FrameUniforms::compose(
            camera,
            &scene.environment,
            self.settings.max_bounces,
            self.spheres.len(),
            self.lights.len(),
        );
        let Some(uniform_buffer) = self.uniform_buffer.as_ref() else { return };
        ctx.queue
            .write_buffer(uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        self.ensure_bind_groups(ctx);

        let Some(compute_pipeline) = self.compute_pipeline.as_ref() else { return };
        let Some(compute_bind_group) = self.compute_bind_group.as_ref() else { return };
        let Some(blit_pipeline) = self.blit_pipeline.as_ref() else { return };
        let Some(blit_bind_group) = self.blit_bind_group.as_ref() else { return };

        {
            let mut cpass = target
                .encoder
                .begin_compute_pass(&wgpu::ComputePassDescriptor {
                    label: Some("helion trace pass"),
                    timestamp_writes: None,
                });
            cpass.set_pipeline(compute_pipeline);
            cpass.set_bind_group(0, compute_bind_group, &[]);
            cpass.dispatch_workgroups(
                width.div_ceil(WORKGROUP_SIZE),
                height.div_ceil(WORKGROUP_SIZE),
                1,
            );
        }

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("helion composite pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        rpass.set_pipeline(blit_pipeline);
        rpass.set_bind_group(0, blit_bind_group, &[]);
        rpass.draw(0..3, 0..1);
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        self.ensure_compute_pipeline(ctx);
        self.ensure_blit_pipeline(ctx);
    }

    fn ensure_compute_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.compute_pipeline.is_some() {
            return;
        }

        let shader = ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("helion trace shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/trace.wgsl").into()),
            });

        let layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("helion trace bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: wgpu::BufferSize::new(
                                std::mem::size_of::<FrameUniforms>() as u64,
                            ),
                        },
                        count: None,
                    },
                    storage_entry(1),
                    storage_entry(2),
                    wgpu::BindGroupLayoutEntry {
                        binding: 3,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::StorageTexture {
                            access: wgpu::StorageTextureAccess::WriteOnly,
                            format: OutputTarget::FORMAT,
                            view_dimension: wgpu::TextureViewDimension::D2,
                        },
                        count: None,
                    },
                ],
            });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("helion trace pipeline layout"),
                bind_group_layouts: &[&layout],
                immediate_size: 0,
            });

        let pipeline = ctx
            .device
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("helion trace pipeline"),
                layout: Some(&pipeline_layout),
                module: &shader,
                entry_point: Some("trace"),
                compilation_options: Default::default(),
                cache: None,
            });

        self.compute_layout = Some(layout);
        self.compute_pipeline = Some(pipeline);
        self.compute_bind_group = None;
    }

    fn ensure_blit_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.blit_format == Some(ctx.surface_format) && self.blit_pipeline.is_some() {
            return;
        }

        let shader = ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("helion blit shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/blit.wgsl").into()),
            });

        let layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("helion blit bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("helion blit pipeline layout"),
                bind_group_layouts: &[&layout],
                immediate_size: 0,
            });

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("helion blit pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
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
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        self.blit_format = Some(ctx.surface_format);
        self.blit_pipeline = Some(pipeline);
        self.blit_layout = Some(layout);
        self.blit_bind_group = None;
    }

    fn ensure_static_resources(&mut self, ctx: &RenderCtx<'_>) {
        if self.uniform_buffer.is_none() {
            self.uniform_buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("helion frame uniforms"),
                size: std::mem::size_of::<FrameUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
        }
        if self.sphere_placeholder.is_none() {
            self.sphere_placeholder = Some(placeholder_buffer(
                ctx.device,
                "helion sphere placeholder",
                std::mem::size_of::<SphereData>() as u64,
            ));
        }
        if self.light_placeholder.is_none() {
            self.light_placeholder = Some(placeholder_buffer(
                ctx.device,
                "helion light placeholder",
                std::mem::size_of::<PointLightData>() as u64,
            ));
        }
    }

    fn ensure_bind_groups(&mut self, ctx: &RenderCtx<'_>) {
        let Some(target) = self.target.as_ref() else { return };

        if self.compute_bind_group.is_none() {
            let (Some(layout), Some(uniforms)) =
                (self.compute_layout.as_ref(), self.uniform_buffer.as_ref())
            else {
                return;
            };
            let (Some(sphere_fallback), Some(light_fallback)) = (
                self.sphere_placeholder.as_ref(),
                self.light_placeholder.as_ref(),
            ) else {
                return;
            };

            let sphere_buffer = self.spheres.buffer().unwrap_or(sphere_fallback);
            let light_buffer = self.lights.buffer().unwrap_or(light_fallback);

            self.compute_bind_group =
                Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("helion trace bind group"),
                    layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: uniforms.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: sphere_buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: light_buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 3,
                            resource: wgpu::BindingResource::TextureView(target.view()),
                        },
                    ],
                }));
        }

        if self.blit_bind_group.is_none() {
            let Some(layout) = self.blit_layout.as_ref() else { return };
            let sampler = self.blit_sampler.get_or_insert_with(|| {
                ctx.device.create_sampler(&wgpu::SamplerDescriptor {
                    label: Some("helion blit sampler"),
                    mag_filter: wgpu::FilterMode::Linear,
                    min_filter: wgpu::FilterMode::Linear,
                    ..Default::default()
                })
            });

            self.blit_bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("helion blit bind group"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(target.view()),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            }));
        }
    }
}

fn storage_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: true },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn placeholder_buffer(device: &wgpu::Device, label: &str, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: wgpu::BufferUsages::STORAGE,
        mapped_at_creation: false,
    })
}
