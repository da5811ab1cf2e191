use glam::Vec3;

/// Lighting and atmosphere parameters pushed to the kernel every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    /// Flat ambient term applied on miss and in shadow.
    pub ambient_color: Vec3,
    /// Distance fog color.
    pub fog_color: Vec3,
    /// Exponential fog density.
    pub fog_density: f32,
    /// Directional (sun) light direction, normalized, pointing away from the
    /// light source.
    pub sun_direction: Vec3,
    pub sun_color: Vec3,
    pub sun_intensity: f32,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            ambient_color: Vec3::ZERO,
            fog_color: Vec3::splat(0.5),
            fog_density: 0.001,
            sun_direction: Vec3::new(-0.3, -1.0, -0.2).normalize(),
            sun_color: Vec3::ONE,
            sun_intensity: 1.0,
        }
    }
}
