use glam::{EulerRot, Mat4, Quat, Vec3};
use helion_engine::input::{InputState, KeyCode};
use helion_engine::render::TracerCamera;

/// Fly camera: WASD in the camera's horizontal plane, mouse look while the
/// cursor is captured, pitch clamped to straight up/down.
pub struct FreeCamera {
    pub position: Vec3,
    /// Heading around +Y, radians.
    yaw: f32,
    /// Tilt around the camera's X axis, radians.
    pitch: f32,
    pub move_speed: f32,
    pub look_sensitivity: f32,
    pub fov_y: f32,
}

impl FreeCamera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            yaw,
            pitch,
            move_speed: 5.0,
            look_sensitivity: 0.0025,
            fov_y: 60f32.to_radians(),
        }
    }

    /// Applies one tick of input. Movement and rotation only respond while
    /// the cursor is captured, mirroring the usual fly-camera convention.
    pub fn update(&mut self, input: &InputState, dt: f32) {
        if !input.cursor_captured() {
            return;
        }

        let (dx, dy) = input.pointer_delta();
        self.yaw -= dx * self.look_sensitivity;
        self.pitch -= dy * self.look_sensitivity;
        self.pitch = self
            .pitch
            .clamp(-std::f32::consts::FRAC_PI_2, std::f32::consts::FRAC_PI_2);

        let mut wish = Vec3::ZERO;
        if input.key_held(KeyCode::KeyW) {
            wish.z -= 1.0;
        }
        if input.key_held(KeyCode::KeyS) {
            wish.z += 1.0;
        }
        if input.key_held(KeyCode::KeyA) {
            wish.x -= 1.0;
        }
        if input.key_held(KeyCode::KeyD) {
            wish.x += 1.0;
        }
        if wish != Vec3::ZERO {
            let dir = self.rotation() * wish.normalize();
            self.position += dir * self.move_speed * dt;
        }
    }

    fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Camera state for the tracer, for the given surface aspect.
    pub fn tracer_camera(&self, aspect: f32) -> TracerCamera {
        TracerCamera {
            position: self.position,
            camera_to_world: Mat4::from_rotation_translation(self.rotation(), self.position),
            projection: Mat4::perspective_rh(self.fov_y, aspect.max(0.01), 0.1, 1000.0),
        }
    }
}
