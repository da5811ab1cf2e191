use winit::dpi::PhysicalSize;

/// Renderer-facing context (device/queue + surface format and size).
///
/// Intentionally small and stable.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Swapchain size in physical pixels; the tracer derives its aspect
    /// ratio and resolution clamp from this.
    pub surface_size: PhysicalSize<u32>,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        surface_size: PhysicalSize<u32>,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            surface_size,
        }
    }

    /// Width over height of the surface. Falls back to 1.0 on a degenerate
    /// (zero-height) surface.
    pub fn aspect_ratio(&self) -> f32 {
        if self.surface_size.height == 0 {
            return 1.0;
        }
        self.surface_size.width as f32 / self.surface_size.height as f32
    }
}

/// Target for drawing (encoder + swapchain color view).
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }
}
