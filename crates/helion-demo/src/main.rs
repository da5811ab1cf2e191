mod camera;

use anyhow::Result;
use glam::Vec3;
use winit::event::WindowEvent;
use winit::keyboard::{KeyCode, PhysicalKey};

use helion_engine::core::{App, AppControl, FrameCtx};
use helion_engine::logging::{LoggingConfig, init_logging};
use helion_engine::render::{RayTracer, TracerSettings};
use helion_engine::scene::{PointLight, Scene, SlotId, Sphere};
use helion_engine::time::FpsCounter;
use helion_engine::window::{Runtime, RuntimeConfig};

use camera::FreeCamera;

/// An animated light: orbits the scene center, exercising the per-tick
/// change tracker rather than re-registering every frame.
struct OrbitLight {
    id: SlotId,
    radius: f32,
    height: f32,
    speed: f32,
    phase: f32,
}

struct DemoApp {
    scene: Scene,
    tracer: RayTracer,
    camera: FreeCamera,
    orbit_lights: Vec<OrbitLight>,
    fps: FpsCounter,
    elapsed: f32,
}

impl DemoApp {
    fn new() -> Self {
        let mut scene = Scene::new();
        scene.environment.ambient_color = Vec3::splat(0.08);
        scene.environment.fog_color = Vec3::new(0.45, 0.5, 0.55);
        scene.environment.fog_density = 0.015;
        scene.environment.sun_direction = Vec3::new(-0.4, -1.0, -0.3).normalize();
        scene.environment.sun_intensity = 1.2;

        // A loose grid of spheres with varying size and shininess, plus a
        // big matte "floor" sphere underneath.
        scene.add_sphere(Sphere::new(
            Vec3::new(0.0, -100.5, 0.0),
            100.0,
            Vec3::splat(0.55),
            Vec3::splat(0.04),
        ));
        for ix in -2..=2i32 {
            for iz in -2..=2i32 {
                let u = (ix + 2) as f32 / 4.0;
                let v = (iz + 2) as f32 / 4.0;
                let radius = 0.3 + 0.15 * ((ix * 5 + iz).rem_euclid(3)) as f32 / 2.0;
                scene.add_sphere(Sphere::new(
                    Vec3::new(ix as f32 * 1.6, radius, iz as f32 * 1.6),
                    radius,
                    Vec3::new(0.9 - 0.6 * u, 0.3 + 0.5 * v, 0.4 + 0.5 * u),
                    Vec3::splat(0.08 + 0.3 * u * v),
                ));
            }
        }

        let orbit_lights = vec![
            OrbitLight {
                id: scene.add_light(PointLight::new(
                    Vec3::new(4.0, 3.0, 0.0),
                    12.0,
                    Vec3::new(1.0, 0.6, 0.3),
                    2.5,
                )),
                radius: 4.0,
                height: 3.0,
                speed: 0.7,
                phase: 0.0,
            },
            OrbitLight {
                id: scene.add_light(PointLight::new(
                    Vec3::new(-4.0, 2.0, 0.0),
                    10.0,
                    Vec3::new(0.3, 0.5, 1.0),
                    2.0,
                )),
                radius: 5.0,
                height: 2.0,
                speed: -0.45,
                phase: std::f32::consts::PI,
            },
        ];

        Self {
            scene,
            tracer: RayTracer::new(TracerSettings::default()),
            camera: FreeCamera::new(Vec3::new(0.0, 2.0, 7.0), 0.0, -0.2),
            orbit_lights,
            fps: FpsCounter::new(),
            elapsed: 0.0,
        }
    }

    fn animate_lights(&mut self) {
        for orbit in &self.orbit_lights {
            let angle = self.elapsed * orbit.speed + orbit.phase;
            if let Some(light) = self.scene.light_mut(orbit.id) {
                light.position =
                    Vec3::new(angle.cos() * orbit.radius, orbit.height, angle.sin() * orbit.radius);
            }
        }
    }
}

impl App for DemoApp {
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        if let WindowEvent::KeyboardInput { event, .. } = event
            && event.state.is_pressed()
            && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
        {
            return AppControl::Exit;
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        // Click to grab the cursor for mouse-look; Escape exits.
        if ctx.input.clicked() && !ctx.input.cursor_captured() {
            ctx.runtime.capture_cursor(true);
        }

        let dt = ctx.time.dt;
        self.elapsed += dt;

        self.camera.update(ctx.input, dt);
        self.animate_lights();

        // Change detection runs before the render so any mutation above is
        // visible to this frame's buffer synchronization.
        self.scene.tick();

        if let Some(fps) = self.fps.tick(dt) {
            log::info!("{fps} FPS");
        }

        let surface = ctx.gpu.size();
        let aspect = if surface.height > 0 {
            surface.width as f32 / surface.height as f32
        } else {
            1.0
        };
        let camera = self.camera.tracer_camera(aspect);

        let scene = &mut self.scene;
        let tracer = &mut self.tracer;
        ctx.render(|rctx, target| {
            tracer.render(rctx, target, scene, &camera);
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    log::info!("helion demo starting (click to look around, Escape to quit)");

    Runtime::run(
        RuntimeConfig {
            title: "helion ray tracer".to_string(),
            ..RuntimeConfig::default()
        },
        DemoApp::new(),
    )
}
