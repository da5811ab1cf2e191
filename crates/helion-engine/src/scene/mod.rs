//! Scene-object registries and per-tick change tracking.
//!
//! Responsibilities:
//! - index-stable storage of sphere primitives and point lights
//! - dirty flags consumed by the GPU buffer synchronizer
//! - cached-baseline diffing so in-place mutations get picked up once per
//!   logical update tick

mod environment;
mod light;
mod registry;
mod sphere;
mod tracker;

pub use environment::Environment;
pub use light::{PointLight, PointLightData};
pub use registry::{Slot, SlotId, SlotRegistry};
pub use sphere::{Sphere, SphereData};
pub use tracker::ChangeTracker;

/// The renderable scene: both registries, their change trackers, and the
/// frame-constant environment.
///
/// Owned plainly by the application and handed to the tracer by reference;
/// registrants hold `SlotId` values, nothing global.
#[derive(Debug, Default)]
pub struct Scene {
    pub(crate) spheres: SlotRegistry<Sphere>,
    pub(crate) lights: SlotRegistry<PointLight>,
    sphere_tracker: ChangeTracker<Sphere>,
    light_tracker: ChangeTracker<PointLight>,
    pub environment: Environment,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    // ── spheres ───────────────────────────────────────────────────────────

    pub fn add_sphere(&mut self, sphere: Sphere) -> SlotId {
        self.spheres.register(sphere)
    }

    pub fn remove_sphere(&mut self, id: SlotId) {
        self.spheres.deregister(id);
    }

    pub fn sphere(&self, id: SlotId) -> Option<&Sphere> {
        self.spheres.get(id)
    }

    /// In-place mutation point. Changes are detected by the next
    /// [`tick`](Self::tick); call [`mark_spheres_dirty`](Self::mark_spheres_dirty)
    /// to flag them immediately instead.
    pub fn sphere_mut(&mut self, id: SlotId) -> Option<&mut Sphere> {
        self.spheres.get_mut(id)
    }

    pub fn mark_spheres_dirty(&mut self) {
        self.spheres.mark_dirty();
    }

    pub fn sphere_count(&self) -> usize {
        self.spheres.active_count()
    }

    // ── point lights ──────────────────────────────────────────────────────

    pub fn add_light(&mut self, light: PointLight) -> SlotId {
        self.lights.register(light)
    }

    pub fn remove_light(&mut self, id: SlotId) {
        self.lights.deregister(id);
    }

    pub fn light(&self, id: SlotId) -> Option<&PointLight> {
        self.lights.get(id)
    }

    pub fn light_mut(&mut self, id: SlotId) -> Option<&mut PointLight> {
        self.lights.get_mut(id)
    }

    pub fn mark_lights_dirty(&mut self) {
        self.lights.mark_dirty();
    }

    pub fn light_count(&self) -> usize {
        self.lights.active_count()
    }

    // ── per-tick update ───────────────────────────────────────────────────

    /// Runs change detection for both registries.
    ///
    /// Call once per logical update tick, before rendering.
    pub fn tick(&mut self) {
        self.sphere_tracker.probe(&mut self.spheres);
        self.light_tracker.probe(&mut self.lights);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn light_property_change_is_dirty_by_next_tick() {
        let mut scene = Scene::new();
        let id = scene.add_light(PointLight {
            range: 5.0,
            ..PointLight::default()
        });
        scene.tick();
        scene.lights.clear_dirty();

        scene.light_mut(id).unwrap().range = 8.0;
        scene.tick();
        assert!(scene.lights.is_dirty());
        assert_eq!(scene.light(id).unwrap().range, 8.0);
    }

    #[test]
    fn sphere_transform_change_is_dirty_by_next_tick() {
        let mut scene = Scene::new();
        let id = scene.add_sphere(Sphere::default());
        scene.tick();
        scene.spheres.clear_dirty();

        scene.sphere_mut(id).unwrap().position = Vec3::new(0.0, 1.0, 0.0);
        scene.tick();
        assert!(scene.spheres.is_dirty());
    }

    #[test]
    fn registries_dirty_independently() {
        let mut scene = Scene::new();
        scene.add_sphere(Sphere::default());
        scene.spheres.clear_dirty();
        scene.lights.clear_dirty();

        scene.add_light(PointLight::default());
        assert!(scene.lights.is_dirty());
        assert!(!scene.spheres.is_dirty());
    }
}
