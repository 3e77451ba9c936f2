//! The explicit application context.
//!
//! An [`Experience`] is built once at start-up and owns every component.
//! The host calls [`Experience::tick`] from its animation callback; all
//! simulation and rendering happens synchronously inside that call.

use std::rc::Rc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::api::types::{BodyId, WorldEvent};
use crate::assets::manifest::AssetManifest;
use crate::assets::resources::Resources;
use crate::camera::controller::{CameraConfig, CameraController};
use crate::core::events::EventBus;
use crate::core::scene::SceneGraph;
use crate::core::time::Clock;
use crate::error::EngineError;
use crate::input::queue::{DragTracker, InputEvent, InputQueue};
use crate::renderer::bloom::{BloomParams, SelectiveBloom};
use crate::renderer::lighting::LightState;
use crate::renderer::material::MaterialLibrary;
use crate::renderer::traits::RenderBackend;
use crate::ui::markers::{compute_markers, MarkerState};
use crate::world::appearance::{build_visual, sync_visual};
use crate::world::body::BodyState;
use crate::world::config::SystemConfig;
use crate::world::environment::EnvironmentConfig;
use crate::world::navigator::Navigator;
use crate::world::orbit::OrbitEngine;
use crate::world::registry::BodyRegistry;

/// Upper bound on the device pixel ratio used for rendering.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Start-up configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceConfig {
    /// Viewport width in CSS pixels.
    pub width: u32,
    /// Viewport height in CSS pixels.
    pub height: u32,
    pub device_pixel_ratio: f32,
    pub bloom_enabled: bool,
    pub bloom: BloomParams,
    pub camera: CameraConfig,
    pub environment: EnvironmentConfig,
    pub system: SystemConfig,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            device_pixel_ratio: 1.0,
            bloom_enabled: true,
            bloom: BloomParams::default(),
            camera: CameraConfig::default(),
            environment: EnvironmentConfig::default(),
            system: SystemConfig::default(),
        }
    }
}

impl ExperienceConfig {
    pub fn with_system(mut self, system: SystemConfig) -> Self {
        self.system = system;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32, device_pixel_ratio: f32) -> Self {
        self.width = width;
        self.height = height;
        self.device_pixel_ratio = device_pixel_ratio;
        self
    }
}

/// Viewport size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sizes {
    pub width: u32,
    pub height: u32,
    /// Device pixel ratio capped at [`MAX_PIXEL_RATIO`].
    pub pixel_ratio: f32,
}

impl Sizes {
    pub fn new(width: u32, height: u32, device_pixel_ratio: f32) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::MissingRenderContext { width, height });
        }
        let pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(MAX_PIXEL_RATIO)
        } else {
            1.0
        };
        Ok(Self {
            width,
            height,
            pixel_ratio,
        })
    }
}

pub struct Experience {
    bus: Rc<EventBus>,
    clock: Clock,
    sizes: Sizes,
    backend_stale: bool,
    input: InputQueue,
    drag: DragTracker,
    resources: Resources,
    registry: BodyRegistry,
    orbits: OrbitEngine,
    navigator: Navigator,
    camera: CameraController,
    scene: SceneGraph,
    materials: MaterialLibrary,
    bloom: SelectiveBloom,
    lights: LightState,
    star_position: Vec3,
    background: Option<String>,
}

impl Experience {
    pub fn new(config: ExperienceConfig, manifest: &AssetManifest) -> Result<Self, EngineError> {
        let sizes = Sizes::new(config.width, config.height, config.device_pixel_ratio)?;
        let bus = Rc::new(EventBus::new());
        let registry = BodyRegistry::from_config(&config.system, manifest)?;

        let mut resources = Resources::new(bus.clone());
        for body in registry.iter() {
            for path in &body.textures {
                resources.request(path);
            }
        }
        let background = config.environment.background.as_deref().and_then(|key| {
            let path = manifest.path_of(key);
            if path.is_none() {
                log::warn!("Background texture `{key}` is not in the manifest");
            }
            path.map(str::to_string)
        });
        if let Some(path) = &background {
            resources.request(path);
        }

        let star_position = registry
            .iter()
            .find(|b| b.is_anchor())
            .map_or(Vec3::ZERO, |b| b.position);
        let lights = config.environment.build_lights(star_position);

        let mut materials = MaterialLibrary::new();
        let bloom = SelectiveBloom::new(config.bloom, config.bloom_enabled, &mut materials);
        let camera = CameraController::new(config.camera.clone(), sizes.width, sizes.height, bus.clone());
        let navigator = Navigator::new(&registry);

        log::info!(
            "Experience ready: {} bodies, {} textures, {}x{} @{}x",
            registry.len(),
            resources.len(),
            sizes.width,
            sizes.height,
            sizes.pixel_ratio
        );

        Ok(Self {
            bus,
            clock: Clock::new(),
            sizes,
            backend_stale: true,
            input: InputQueue::new(),
            drag: DragTracker::default(),
            resources,
            registry,
            orbits: OrbitEngine::new(config.system.angular_scale),
            navigator,
            camera,
            scene: SceneGraph::new(),
            materials,
            bloom,
            lights,
            star_position,
            background,
        })
    }

    /// Run one frame and return the events delivered during it.
    pub fn tick(&mut self, dt: f32, backend: &mut dyn RenderBackend) -> Vec<WorldEvent> {
        self.clock.tick(dt);
        let dt = self.clock.delta();
        let elapsed = self.clock.elapsed();

        if self.backend_stale {
            backend.resize(self.sizes.width, self.sizes.height, self.sizes.pixel_ratio);
            self.backend_stale = false;
        }

        self.apply_input();
        let events = self.bus.dispatch();
        self.build_settled_bodies();

        self.orbits.update(&mut self.registry, elapsed);
        for body in self.registry.iter() {
            sync_visual(body, elapsed, dt, self.star_position, &mut self.scene, &mut self.materials);
        }
        self.camera.advance(dt, &self.registry);

        self.bloom.render(
            backend,
            &mut self.scene,
            &self.materials,
            self.camera.camera(),
            &self.lights,
        );
        events
    }

    fn apply_input(&mut self) {
        for event in self.input.drain() {
            if let Some((dx, dy)) = self.drag.feed(&event) {
                self.camera.rotate(dx, dy);
            }
            if let InputEvent::Wheel { delta } = event {
                self.camera.dolly(delta);
            }
        }
    }

    /// Build meshes for every pending body whose textures have all settled.
    fn build_settled_bodies(&mut self) {
        for body in self.registry.iter_mut() {
            if body.state != BodyState::Pending {
                continue;
            }
            let Some(textures) = self.resources.settled(&body.textures) else {
                continue;
            };
            let visual = build_visual(body, &textures, self.star_position, &mut self.scene, &mut self.materials);
            body.visual = Some(visual);
            body.state = BodyState::Ready;
            log::info!("{} ready", body.name);
            self.bus.emit(WorldEvent::BodyReady(body.id));
        }

        if self.scene.background().is_none() {
            if let Some(path) = &self.background {
                if let Some(texture) = self.resources.texture(path) {
                    self.scene.set_background(Some(texture));
                }
            }
        }
    }

    /// Fly the camera to the navigable body called `name`.
    /// Returns false for unknown names and while a flight is in progress.
    pub fn navigate_to(&mut self, name: &str) -> bool {
        let Some(body) = self.navigator.find(name).and_then(|entry| self.registry.get(entry.id)) else {
            log::warn!("No navigable body named {name}");
            return false;
        };
        self.navigator.navigate_to(&mut self.camera, body)
    }

    /// Resize the viewport. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f32) {
        match Sizes::new(width, height, device_pixel_ratio) {
            Ok(sizes) => {
                self.sizes = sizes;
                self.backend_stale = true;
                self.camera.resize(width, height);
                self.bus.emit(WorldEvent::Resize { width, height });
            }
            Err(err) => log::warn!("Ignoring resize: {err}"),
        }
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Marker placement for the current camera.
    pub fn markers(&self) -> Vec<MarkerState> {
        compute_markers(
            &self.navigator,
            &self.registry,
            self.camera.camera(),
            self.sizes.width as f32,
            self.sizes.height as f32,
        )
    }

    pub fn set_bloom_params(&mut self, params: BloomParams) {
        self.bloom.set_params(params);
    }

    pub fn set_bloom_enabled(&mut self, enabled: bool) {
        self.bloom.set_enabled(enabled);
    }

    pub fn bloom(&self) -> &SelectiveBloom {
        &self.bloom
    }

    /// Subscribe to engine events outside the tick return value.
    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Hosts resolve texture loads through this.
    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn materials(&self) -> &MaterialLibrary {
        &self.materials
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn sizes(&self) -> Sizes {
        self.sizes
    }

    pub fn body_id(&self, name: &str) -> Option<BodyId> {
        self.registry.id_of(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Color;
    use crate::assets::resources::TextureLoader;
    use crate::bridge::protocol::RenderCommand;
    use crate::camera::controller::NavigationState;
    use crate::error::ConfigError;
    use crate::renderer::material::Material;
    use crate::renderer::recorder::CommandRecorder;
    use crate::world::body::BodyKind;
    use crate::world::config::BodyConfig;

    struct Loader {
        fail: Option<&'static str>,
    }

    impl TextureLoader for Loader {
        fn load(&mut self, path: &str) -> Result<(), String> {
            match self.fail {
                Some(bad) if bad == path => Err("not found".into()),
                _ => Ok(()),
            }
        }
    }

    fn manifest() -> AssetManifest {
        AssetManifest::default()
            .with_texture("sunLava", "sun/lava.jpg")
            .with_texture("mars", "mars.jpg")
            .with_texture("environmentMap", "stars.jpg")
    }

    fn config() -> ExperienceConfig {
        let marker = Color::from_rgb_u8(255, 255, 0);
        let system = SystemConfig::default()
            .with_body(
                BodyConfig::anchor("Sun", 20.0, BodyKind::Star)
                    .with_textures(&["sunLava"])
                    .with_marker(marker),
            )
            .with_body(
                BodyConfig::orbiting("Mars", 0.53, BodyKind::Planet, 650.0)
                    .with_speed(0.05)
                    .with_offset(0.0)
                    .with_textures(&["mars"])
                    .with_marker(marker),
            )
            .with_body(
                BodyConfig::orbiting("Venus", 0.94, BodyKind::Planet, 450.0)
                    .with_speed(0.02)
                    .with_marker(marker),
            );
        ExperienceConfig::default().with_system(system)
    }

    #[test]
    fn zero_viewport_is_fatal() {
        let result = Experience::new(config().with_size(0, 600, 1.0), &manifest());
        assert!(matches!(result, Err(EngineError::MissingRenderContext { width: 0, .. })));
    }

    #[test]
    fn negative_angular_scale_is_rejected() {
        let mut config = config();
        config.system.angular_scale = -0.5;
        let result = Experience::new(config, &manifest());
        assert!(matches!(
            result,
            Err(EngineError::Config(ConfigError::InvalidSystem { field: "angular_scale", .. }))
        ));
    }

    #[test]
    fn pixel_ratio_is_capped() {
        assert_eq!(Sizes::new(10, 10, 3.0).unwrap().pixel_ratio, 2.0);
        assert_eq!(Sizes::new(10, 10, 1.5).unwrap().pixel_ratio, 1.5);
    }

    #[test]
    fn bodies_become_ready_after_textures_settle() {
        let mut exp = Experience::new(config(), &manifest()).unwrap();
        let mut backend = CommandRecorder::new();

        // Venus needs no textures and is built on the first frame.
        exp.tick(1.0 / 60.0, &mut backend);
        let ready: Vec<_> = exp.registry().iter().filter(|b| b.is_ready()).map(|b| b.name.clone()).collect();
        assert_eq!(ready, vec!["Venus".to_string()]);

        exp.resources_mut().pump(&mut Loader { fail: Some("mars.jpg") });
        let events = exp.tick(1.0 / 60.0, &mut backend);
        assert!(events.contains(&WorldEvent::ResourcesReady));
        assert!(exp.registry().iter().all(|b| b.is_ready()));
        assert!(exp.scene().background().is_some());

        let events = exp.tick(1.0 / 60.0, &mut backend);
        let sun = exp.body_id("Sun").unwrap();
        assert!(events.contains(&WorldEvent::BodyReady(sun)));

        // Failed map falls back to no texture.
        let mars = exp.registry().by_name("Mars").unwrap();
        let mesh = exp.scene().get(mars.visual.as_ref().unwrap().surface.unwrap()).unwrap();
        assert!(matches!(exp.materials().get(mesh.material), Some(Material::Standard { map: None, .. })));
        assert_eq!(mesh.position, mars.position);
    }

    #[test]
    fn first_tick_resizes_backend_then_renders_bloom_chain() {
        let mut exp = Experience::new(config(), &manifest()).unwrap();
        let mut backend = CommandRecorder::new();
        exp.tick(0.016, &mut backend);
        let commands = backend.take_commands();
        assert!(matches!(commands[0], RenderCommand::Resize { width: 800, height: 600, .. }));
        assert_eq!(commands.len(), 6);

        exp.set_bloom_enabled(false);
        exp.tick(0.016, &mut backend);
        assert_eq!(backend.take_commands().len(), 1);
    }

    #[test]
    fn navigation_flow() {
        let mut exp = Experience::new(config(), &manifest()).unwrap();
        let mut backend = CommandRecorder::new();
        assert!(!exp.navigate_to("Pluto"));
        assert!(exp.navigate_to("Mars"));
        assert!(!exp.navigate_to("Venus"));

        let mut events = Vec::new();
        for _ in 0..200 {
            events.extend(exp.tick(1.0 / 60.0, &mut backend));
        }
        let mars = exp.body_id("Mars").unwrap();
        assert_eq!(exp.camera().state(), NavigationState::Following);
        assert_eq!(exp.camera().followed(), Some(mars));
        assert!(events.contains(&WorldEvent::TransitionStarted(mars)));
        assert!(events.contains(&WorldEvent::TransitionFinished(mars)));
        assert_eq!(exp.camera().camera().look_at, exp.registry().position_of(mars));
    }

    #[test]
    fn input_drives_controls_when_idle() {
        let mut exp = Experience::new(config(), &manifest()).unwrap();
        let mut backend = CommandRecorder::new();
        let start = exp.camera().camera().position;
        exp.push_input(InputEvent::Wheel { delta: 1.0 });
        exp.tick(0.016, &mut backend);
        assert!(exp.camera().camera().position.length() > start.length());

        let moved = exp.camera().camera().position;
        exp.push_input(InputEvent::PointerDown { x: 100.0, y: 100.0 });
        exp.push_input(InputEvent::PointerMove { x: 160.0, y: 100.0 });
        exp.tick(0.016, &mut backend);
        assert_ne!(exp.camera().camera().position, moved);
    }

    #[test]
    fn resize_emits_event_and_ignores_zero() {
        let mut exp = Experience::new(config(), &manifest()).unwrap();
        let mut backend = CommandRecorder::new();
        exp.resize(1024, 768, 3.0);
        exp.resize(0, 0, 1.0);
        assert_eq!(exp.sizes().width, 1024);
        assert_eq!(exp.sizes().pixel_ratio, 2.0);
        let events = exp.tick(0.016, &mut backend);
        assert!(events.contains(&WorldEvent::Resize { width: 1024, height: 768 }));
        assert!(matches!(
            backend.commands()[0],
            RenderCommand::Resize { width: 1024, height: 768, pixel_ratio } if pixel_ratio == 2.0
        ));
    }

    #[test]
    fn markers_cover_navigable_bodies() {
        let mut exp = Experience::new(config(), &manifest()).unwrap();
        let mut backend = CommandRecorder::new();
        exp.tick(0.016, &mut backend);
        let names: Vec<_> = exp.markers().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["Sun", "Mars", "Venus"]);
    }
}
