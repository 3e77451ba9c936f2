//! Camera navigation state machine.
//!
//! ```text
//! Idle ──follow_object──▶ Transitioning ──alpha = 1──▶ Following
//!                              ▲                           │
//!                              └──────follow_object────────┘
//! ```
//!
//! Requests made while a flight is in progress are dropped. There is no
//! cancellation and no terminal state.

use std::rc::Rc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::api::types::{BodyId, WorldEvent};
use crate::camera::controls::OrbitControls;
use crate::camera::perspective::PerspectiveCamera;
use crate::camera::transition::Transition;
use crate::core::events::EventBus;
use crate::extensions::easing::{lerp_vec3, Easing};
use crate::world::body::Body;
use crate::world::registry::BodyRegistry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub initial_position: Vec3,
    /// Seconds per flight.
    pub transition_duration: f32,
    pub easing: Easing,
    /// Standoff distance as a multiple of the body radius.
    pub standoff_factor: f32,
    /// Max follow distance as a multiple of the distance on arrival.
    pub max_distance_factor: f32,
    pub damping: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 50.0,
            near: 0.1,
            far: 100_000.0,
            initial_position: Vec3::new(0.0, 0.0, 200.0),
            transition_duration: 3.0,
            easing: Easing::QuartInOut,
            standoff_factor: 5.0,
            max_distance_factor: 10.0,
            damping: true,
        }
    }
}

/// Public view of the controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationState {
    Idle,
    Transitioning,
    Following,
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Transitioning(Transition),
    Following(BodyId),
}

pub struct CameraController {
    camera: PerspectiveCamera,
    controls: OrbitControls,
    phase: Phase,
    config: CameraConfig,
    viewport_height: f32,
    bus: Rc<EventBus>,
}

impl CameraController {
    pub fn new(config: CameraConfig, width: u32, height: u32, bus: Rc<EventBus>) -> Self {
        let mut camera = PerspectiveCamera::new(config.fov_degrees, 1.0, config.near, config.far)
            .with_position(config.initial_position);
        camera.resize(width, height);
        let controls = OrbitControls::new().with_damping(config.damping);
        camera.look_at = controls.target;
        Self {
            camera,
            controls,
            phase: Phase::Idle,
            config,
            viewport_height: height as f32,
            bus,
        }
    }

    /// Start flying toward `body`. Returns false, changing nothing, while a
    /// flight is already in progress.
    pub fn follow_object(&mut self, body: &Body) -> bool {
        if let Phase::Transitioning(t) = &self.phase {
            log::debug!("Ignoring navigation to {}: still flying to {:?}", body.name, t.target);
            return false;
        }
        // Clamps belong to the previous follow target.
        self.controls.reset_limits();
        self.controls.set_enabled(false);
        let transition = Transition::new(self.camera.position, body.id, body.radius, self.config.transition_duration)
            .with_easing(self.config.easing);
        self.phase = Phase::Transitioning(transition);
        log::info!("Camera flying to {}", body.name);
        self.bus.emit(WorldEvent::TransitionStarted(body.id));
        true
    }

    /// Per-frame update. Reads live body positions, so run it after the orbit update.
    pub fn advance(&mut self, dt: f32, registry: &BodyRegistry) {
        match &mut self.phase {
            Phase::Idle => {
                self.controls.update(&mut self.camera);
            }
            Phase::Transitioning(transition) => {
                let Some(body) = registry.get(transition.target) else {
                    log::error!("Transition target {:?} no longer exists", transition.target);
                    self.abandon();
                    return;
                };
                let alpha = transition.advance(dt);
                let destination = body.position + standoff_offset(transition.radius, self.config.standoff_factor);
                self.camera.position = lerp_vec3(transition.from_position, destination, alpha);
                self.controls.target = lerp_vec3(self.controls.target, body.position, alpha);
                self.camera.look_at = self.controls.target;

                if transition.is_complete() {
                    let (id, radius) = (transition.target, transition.radius);
                    self.arrive(id, radius);
                }
            }
            Phase::Following(id) => {
                let id = *id;
                let Some(body) = registry.get(id) else {
                    log::error!("Followed body {:?} no longer exists", id);
                    self.abandon();
                    return;
                };
                self.controls.target = body.position;
                self.controls.update(&mut self.camera);
            }
        }
    }

    fn arrive(&mut self, id: BodyId, radius: f32) {
        let distance = self.camera.position.distance(self.controls.target);
        self.controls
            .set_limits(radius + 1.0, distance * self.config.max_distance_factor);
        self.controls.set_enabled(true);
        self.phase = Phase::Following(id);
        self.bus.emit(WorldEvent::TransitionFinished(id));
    }

    fn abandon(&mut self) {
        self.controls.reset_limits();
        self.controls.set_enabled(true);
        self.phase = Phase::Idle;
    }

    pub fn state(&self) -> NavigationState {
        match self.phase {
            Phase::Idle => NavigationState::Idle,
            Phase::Transitioning(_) => NavigationState::Transitioning,
            Phase::Following(_) => NavigationState::Following,
        }
    }

    /// Body the camera currently follows. `None` while idle or in flight.
    pub fn followed(&self) -> Option<BodyId> {
        match self.phase {
            Phase::Following(id) => Some(id),
            _ => None,
        }
    }

    /// Body the camera is flying toward, if a flight is in progress.
    pub fn transition_target(&self) -> Option<BodyId> {
        match &self.phase {
            Phase::Transitioning(t) => Some(t.target),
            _ => None,
        }
    }

    /// Camera offset from a followed body of `radius` at the end of a flight.
    pub fn standoff_offset(&self, radius: f32) -> Vec3 {
        standoff_offset(radius, self.config.standoff_factor)
    }

    /// Drag input in pixels. Ignored while the controls are disabled.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.controls.rotate(dx, dy, self.viewport_height);
    }

    /// Wheel input. Ignored while the controls are disabled.
    pub fn dolly(&mut self, delta: f32) {
        self.controls.dolly(delta);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
        if height > 0 {
            self.viewport_height = height as f32;
        }
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }
}

fn standoff_offset(radius: f32, factor: f32) -> Vec3 {
    Vec3::new(0.0, 0.0, radius * factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::manifest::AssetManifest;
    use crate::camera::controls::{DEFAULT_MAX_DISTANCE, DEFAULT_MIN_DISTANCE};
    use crate::world::body::BodyKind;
    use crate::world::config::{BodyConfig, SystemConfig};
    use crate::world::orbit::OrbitEngine;

    fn registry() -> BodyRegistry {
        let config = SystemConfig::default()
            .with_body(BodyConfig::anchor("Sun", 20.0, BodyKind::Star))
            .with_body(BodyConfig::orbiting("Earth", 1.0, BodyKind::Earth, 500.0).with_speed(0.0).with_offset(0.0))
            .with_body(
                BodyConfig::orbiting("Mars", 0.53, BodyKind::Planet, 650.0)
                    .with_speed(0.0)
                    .with_offset(std::f64::consts::PI),
            );
        let mut reg = BodyRegistry::from_config(&config, &AssetManifest::default()).unwrap();
        OrbitEngine::default().update(&mut reg, 0.0);
        reg
    }

    fn controller() -> (Rc<EventBus>, CameraController) {
        let bus = Rc::new(EventBus::new());
        let ctl = CameraController::new(CameraConfig::default(), 800, 600, bus.clone());
        (bus, ctl)
    }

    fn run(ctl: &mut CameraController, reg: &BodyRegistry, seconds: f32) {
        let steps = (seconds * 60.0).ceil() as usize;
        for _ in 0..steps {
            ctl.advance(1.0 / 60.0, reg);
        }
    }

    #[test]
    fn arrives_at_exact_standoff() {
        let reg = registry();
        let (bus, mut ctl) = controller();
        let earth = reg.by_name("Earth").unwrap();

        assert!(ctl.follow_object(earth));
        assert_eq!(ctl.state(), NavigationState::Transitioning);
        assert!(!ctl.controls().is_enabled());

        run(&mut ctl, &reg, 3.1);
        assert_eq!(ctl.state(), NavigationState::Following);
        assert_eq!(ctl.followed(), Some(earth.id));
        assert_eq!(ctl.camera().position, earth.position + Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(ctl.camera().look_at, earth.position);
        assert!(ctl.controls().is_enabled());
        assert!((ctl.controls().min_distance() - 2.0).abs() < 1e-6);
        assert!((ctl.controls().max_distance() - 50.0).abs() < 1e-3);

        // Another idle frame must not nudge the camera.
        ctl.advance(1.0 / 60.0, &reg);
        assert_eq!(ctl.camera().position, earth.position + Vec3::new(0.0, 0.0, 5.0));

        assert_eq!(
            bus.dispatch(),
            vec![
                WorldEvent::TransitionStarted(earth.id),
                WorldEvent::TransitionFinished(earth.id)
            ]
        );
    }

    #[test]
    fn second_request_during_flight_is_dropped() {
        let reg = registry();
        let (_, mut ctl) = controller();
        let earth = reg.by_name("Earth").unwrap();
        let mars = reg.by_name("Mars").unwrap();

        assert!(ctl.follow_object(earth));
        ctl.advance(0.5, &reg);
        let before = (ctl.camera().position, ctl.transition_target());
        assert!(!ctl.follow_object(mars));
        assert_eq!((ctl.camera().position, ctl.transition_target()), before);

        run(&mut ctl, &reg, 3.0);
        assert_eq!(ctl.followed(), Some(earth.id));
    }

    #[test]
    fn retargeting_from_following_resets_limits() {
        let reg = registry();
        let (_, mut ctl) = controller();
        let earth = reg.by_name("Earth").unwrap();
        let mars = reg.by_name("Mars").unwrap();

        ctl.follow_object(earth);
        run(&mut ctl, &reg, 3.1);
        assert!(ctl.follow_object(mars));
        assert_eq!(ctl.followed(), None);
        assert_eq!(ctl.controls().min_distance(), DEFAULT_MIN_DISTANCE);
        assert_eq!(ctl.controls().max_distance(), DEFAULT_MAX_DISTANCE);

        run(&mut ctl, &reg, 3.1);
        assert_eq!(ctl.followed(), Some(mars.id));
        let expected = mars.position + ctl.standoff_offset(mars.radius);
        assert!((ctl.camera().position - expected).length() < 1e-3);
    }

    #[test]
    fn following_tracks_moving_body() {
        let config = SystemConfig::default()
            .with_body(BodyConfig::anchor("Sun", 20.0, BodyKind::Star))
            .with_body(BodyConfig::orbiting("Earth", 1.0, BodyKind::Earth, 500.0).with_speed(1.0).with_offset(0.0));
        let mut reg = BodyRegistry::from_config(&config, &AssetManifest::default()).unwrap();
        let engine = OrbitEngine::new(0.01);
        let (_, mut ctl) = controller();
        let id = reg.id_of("Earth").unwrap();

        let mut elapsed = 0.0;
        engine.update(&mut reg, elapsed);
        ctl.follow_object(reg.get(id).unwrap());
        for _ in 0..400 {
            elapsed += 1.0 / 60.0;
            engine.update(&mut reg, elapsed);
            ctl.advance(1.0 / 60.0, &reg);
        }
        assert_eq!(ctl.state(), NavigationState::Following);
        assert_eq!(ctl.camera().look_at, reg.position_of(id));
        let distance = ctl.camera().position.distance(reg.position_of(id));
        assert!(distance <= ctl.controls().max_distance() + 1e-3);
        assert!(distance >= ctl.controls().min_distance() - 1e-3);
    }

    #[test]
    fn user_input_ignored_during_flight() {
        let reg = registry();
        let (_, mut ctl) = controller();
        ctl.follow_object(reg.by_name("Earth").unwrap());
        ctl.rotate(200.0, 0.0);
        ctl.dolly(1.0);
        assert!(!ctl.controls().has_pending());
    }
}
