use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// A renderable sphere primitive.
///
/// One record per active scene object; lifetime is bound to its slot in the
/// sphere registry.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sphere {
    pub position: Vec3,
    pub radius: f32,
    pub albedo: Vec3,
    pub specular: Vec3,
}

impl Sphere {
    pub fn new(position: Vec3, radius: f32, albedo: Vec3, specular: Vec3) -> Self {
        Self {
            position,
            radius,
            albedo,
            specular,
        }
    }

    /// Packs the record into its wire layout.
    #[inline]
    pub fn pack(&self) -> SphereData {
        SphereData {
            position: self.position.to_array(),
            radius: self.radius,
            albedo: self.albedo.to_array(),
            specular: self.specular.to_array(),
        }
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            radius: 0.5,
            albedo: Vec3::ONE,
            specular: Vec3::splat(0.5),
        }
    }
}

/// GPU layout of a sphere record (40-byte stride):
///
///  offset  0  position  [f32; 3]
///  offset 12  radius    f32
///  offset 16  albedo    [f32; 3]
///  offset 28  specular  [f32; 3]
///
/// The kernel declares matching scalar fields, so the stride is exact on
/// both sides. The layout carries no slot id: consumers see only the packed
/// live records, in ascending slot order.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct SphereData {
    pub position: [f32; 3],
    pub radius: f32,
    pub albedo: [f32; 3],
    pub specular: [f32; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_stride_is_40_bytes() {
        assert_eq!(std::mem::size_of::<SphereData>(), 40);
    }

    #[test]
    fn pack_preserves_fields() {
        let s = Sphere::new(
            Vec3::new(1.0, 2.0, 3.0),
            0.75,
            Vec3::new(0.9, 0.1, 0.1),
            Vec3::splat(0.2),
        );
        let d = s.pack();
        assert_eq!(d.position, [1.0, 2.0, 3.0]);
        assert_eq!(d.radius, 0.75);
        assert_eq!(d.albedo, [0.9, 0.1, 0.1]);
        assert_eq!(d.specular, [0.2, 0.2, 0.2]);
    }
}
