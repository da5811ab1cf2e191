/// Computes the tracer's output dimensions.
///
/// Height is the configured resolution cap clamped to `[1, surface_height]`;
/// width follows the camera aspect ratio, rounded.
///
/// `nudge_pow2` works around a display artifact seen with exact
/// power-of-two target heights by bumping such heights up one pixel. Off by
/// default; purely cosmetic.
pub fn compute_target_size(
    max_resolution: u32,
    surface_height: u32,
    aspect: f32,
    nudge_pow2: bool,
) -> (u32, u32) {
    let mut height = max_resolution.clamp(1, surface_height.max(1));
    if nudge_pow2 && height > 1 && height.is_power_of_two() {
        height += 1;
    }
    let width = ((height as f32 * aspect).round() as u32).max(1);
    (width, height)
}

/// The tracer's output: a storage texture the kernel writes in arbitrary
/// order, later composited onto the swapchain.
///
/// Reallocated lazily, only when the computed dimensions change.
pub struct OutputTarget {
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl OutputTarget {
    /// Half-float RGBA, linear; matches what the kernel accumulates in.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

    fn create(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("helion trace target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            view,
            width,
            height,
        }
    }

    /// Makes sure `slot` holds a target of exactly `width` × `height`,
    /// replacing (and thereby releasing) any mismatched one.
    ///
    /// Returns `true` if a new target was allocated.
    pub fn ensure(
        slot: &mut Option<OutputTarget>,
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> bool {
        if let Some(target) = slot
            && target.width == width
            && target.height == height
        {
            return false;
        }

        log::debug!("trace target reallocated at {width}x{height}");
        *slot = Some(Self::create(device, width, height));
        true
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── height clamp ──────────────────────────────────────────────────────

    #[test]
    fn cap_above_surface_is_clamped_down() {
        let (_, h) = compute_target_size(1440, 900, 16.0 / 9.0, false);
        assert_eq!(h, 900);
    }

    #[test]
    fn cap_below_surface_wins() {
        let (_, h) = compute_target_size(1440, 2000, 16.0 / 9.0, false);
        assert_eq!(h, 1440);
    }

    #[test]
    fn degenerate_surface_still_yields_a_pixel() {
        let (w, h) = compute_target_size(1440, 0, 1.0, false);
        assert_eq!((w, h), (1, 1));
    }

    // ── width from aspect ─────────────────────────────────────────────────

    #[test]
    fn width_rounds_from_aspect() {
        let (w, h) = compute_target_size(1080, 1080, 16.0 / 9.0, false);
        assert_eq!(h, 1080);
        assert_eq!(w, 1920);
    }

    #[test]
    fn narrow_aspect_keeps_width_positive() {
        let (w, _) = compute_target_size(100, 100, 0.001, false);
        assert_eq!(w, 1);
    }

    // ── power-of-two nudge ────────────────────────────────────────────────

    #[test]
    fn pow2_height_nudges_up_when_enabled() {
        let (_, h) = compute_target_size(1024, 2000, 1.0, true);
        assert_eq!(h, 1025);
    }

    #[test]
    fn pow2_nudge_ignores_non_pow2_heights() {
        let (_, h) = compute_target_size(1440, 2000, 1.0, true);
        assert_eq!(h, 1440);
    }

    #[test]
    fn pow2_nudge_leaves_height_one_alone() {
        let (_, h) = compute_target_size(1, 2000, 1.0, true);
        assert_eq!(h, 1);
    }
}
