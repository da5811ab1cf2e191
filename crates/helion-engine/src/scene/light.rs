use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// A point light with a finite range.
///
/// `range` and `intensity` are the two per-tick observable properties beyond
/// the transform: changing either flags the light registry for
/// resynchronization on the next probe.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub range: f32,
    pub color: Vec3,
    pub intensity: f32,
}

impl PointLight {
    pub fn new(position: Vec3, range: f32, color: Vec3, intensity: f32) -> Self {
        Self {
            position,
            range,
            color,
            intensity,
        }
    }

    /// Packs the record into its wire layout (intensity rides in color.w).
    #[inline]
    pub fn pack(&self) -> PointLightData {
        PointLightData {
            position: self.position.to_array(),
            radius: self.range,
            color: [self.color.x, self.color.y, self.color.z, self.intensity],
        }
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            range: 10.0,
            color: Vec3::ONE,
            intensity: 1.0,
        }
    }
}

/// GPU layout of a point light record (32-byte stride):
///
///  offset  0  position  [f32; 3]
///  offset 12  radius    f32        (light range)
///  offset 16  color     [f32; 4]   (.w = intensity)
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct PointLightData {
    pub position: [f32; 3],
    pub radius: f32,
    pub color: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_stride_is_32_bytes() {
        assert_eq!(std::mem::size_of::<PointLightData>(), 32);
    }

    #[test]
    fn pack_folds_intensity_into_color_w() {
        let l = PointLight::new(Vec3::new(0.0, 4.0, 0.0), 8.0, Vec3::new(1.0, 0.5, 0.25), 3.0);
        let d = l.pack();
        assert_eq!(d.position, [0.0, 4.0, 0.0]);
        assert_eq!(d.radius, 8.0);
        assert_eq!(d.color, [1.0, 0.5, 0.25, 3.0]);
    }
}
