use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::scene::Environment;

/// Camera state sampled once per rendered frame.
#[derive(Debug, Clone)]
pub struct TracerCamera {
    pub position: Vec3,
    /// Camera-local → world transform.
    pub camera_to_world: Mat4,
    /// Forward projection; the kernel receives its inverse.
    pub projection: Mat4,
}

/// Per-frame uniform block shared by the kernel.
///
/// Element counts ride here because empty collections are left unpublished:
/// the kernel must consult the counts, never the bound array lengths (a
/// placeholder is bound while a mirror is empty).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct FrameUniforms {
    pub camera_to_world: [[f32; 4]; 4],
    pub inv_projection: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    /// rgb + alpha fixed at 1.
    pub ambient_color: [f32; 4],
    /// rgb + density in .w.
    pub fog_params: [f32; 4],
    pub sun_direction: [f32; 4],
    /// rgb + intensity in .w.
    pub sun_color: [f32; 4],
    /// Always ≥ 1: configured bounce count plus the primary ray.
    pub max_bounces: u32,
    pub sphere_count: u32,
    pub light_count: u32,
    pub _pad: u32,
}

impl FrameUniforms {
    pub fn compose(
        camera: &TracerCamera,
        environment: &Environment,
        max_bounces: u32,
        sphere_count: u32,
        light_count: u32,
    ) -> Self {
        let e = environment;
        Self {
            camera_to_world: camera.camera_to_world.to_cols_array_2d(),
            inv_projection: camera.projection.inverse().to_cols_array_2d(),
            camera_position: camera.position.extend(1.0).to_array(),
            ambient_color: e.ambient_color.extend(1.0).to_array(),
            fog_params: e.fog_color.extend(e.fog_density).to_array(),
            sun_direction: e.sun_direction.extend(0.0).to_array(),
            sun_color: e.sun_color.extend(e.sun_intensity).to_array(),
            max_bounces: max_bounces + 1,
            sphere_count,
            light_count,
            _pad: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> TracerCamera {
        TracerCamera {
            position: Vec3::new(0.0, 1.0, -5.0),
            camera_to_world: Mat4::IDENTITY,
            projection: Mat4::perspective_rh(1.0, 1.5, 0.1, 100.0),
        }
    }

    #[test]
    fn block_size_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<FrameUniforms>() % 16, 0);
    }

    #[test]
    fn bounce_uniform_counts_the_primary_ray() {
        let u = FrameUniforms::compose(&camera(), &Environment::default(), 0, 0, 0);
        assert_eq!(u.max_bounces, 1);

        let u = FrameUniforms::compose(&camera(), &Environment::default(), 4, 0, 0);
        assert_eq!(u.max_bounces, 5);
    }

    #[test]
    fn fog_density_rides_in_w() {
        let env = Environment {
            fog_density: 0.25,
            ..Environment::default()
        };
        let u = FrameUniforms::compose(&camera(), &env, 1, 0, 0);
        assert_eq!(u.fog_params[3], 0.25);
        assert_eq!(u.ambient_color[3], 1.0);
    }
}
