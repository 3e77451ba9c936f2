use helios_engine::{
    AssetManifest, BloomParams, CommandRecorder, EngineError, Experience, ExperienceConfig,
    HostEvent, InputEvent,
};
use serde_json::json;

/// Supplies the start-up data for one scene.
pub trait Scenario {
    fn config(&self) -> ExperienceConfig;
    fn manifest(&self) -> AssetManifest;
}

/// Drives an [`Experience`] for the browser host.
///
/// Each demo creates a `thread_local!` ExperienceRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct ExperienceRunner<S: Scenario> {
    scenario: S,
    experience: Option<Experience>,
    recorder: CommandRecorder,
    /// Encoded render commands of the last tick.
    commands: Vec<f32>,
    /// Events delivered during the last tick.
    events: Vec<HostEvent>,
}

impl<S: Scenario> ExperienceRunner<S> {
    pub fn new(scenario: S) -> Self {
        Self {
            scenario,
            experience: None,
            recorder: CommandRecorder::new(),
            commands: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Build the experience for a viewport. Call once the canvas exists.
    pub fn init(&mut self, width: u32, height: u32, device_pixel_ratio: f32) -> Result<(), EngineError> {
        let config = self.scenario.config().with_size(width, height, device_pixel_ratio);
        let manifest = self.scenario.manifest();
        self.experience = Some(Experience::new(config, &manifest)?);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.experience.is_some()
    }

    pub fn experience(&self) -> Option<&Experience> {
        self.experience.as_ref()
    }

    /// Run one frame and encode its render commands and events.
    pub fn tick(&mut self, dt: f32) {
        let Some(experience) = self.experience.as_mut() else {
            return;
        };
        let delivered = experience.tick(dt, &mut self.recorder);
        self.recorder.flush_into(&mut self.commands);
        self.events.clear();
        self.events.extend(delivered.iter().map(HostEvent::from));
    }

    pub fn push_input(&mut self, event: InputEvent) {
        if let Some(experience) = self.experience.as_mut() {
            experience.push_input(event);
        }
    }

    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f32) {
        if let Some(experience) = self.experience.as_mut() {
            experience.resize(width, height, device_pixel_ratio);
        }
    }

    pub fn navigate_to(&mut self, name: &str) -> bool {
        self.experience
            .as_mut()
            .is_some_and(|experience| experience.navigate_to(name))
    }

    /// Textures the host should start loading, as `[{"id", "path"}]`.
    pub fn texture_requests_json(&mut self) -> String {
        let Some(experience) = self.experience.as_mut() else {
            return "[]".to_string();
        };
        let requests: Vec<_> = experience
            .resources_mut()
            .drain_requests()
            .into_iter()
            .map(|(id, path)| json!({ "id": id.0, "path": path }))
            .collect();
        json!(requests).to_string()
    }

    pub fn texture_loaded(&mut self, path: &str) {
        if let Some(experience) = self.experience.as_mut() {
            experience.resources_mut().resolve(path, Ok(()));
        }
    }

    pub fn texture_failed(&mut self, path: &str, reason: &str) {
        if let Some(experience) = self.experience.as_mut() {
            experience.resources_mut().resolve(path, Err(reason.to_string()));
        }
    }

    pub fn loading_progress(&self) -> f32 {
        self.experience
            .as_ref()
            .map_or(0.0, |experience| experience.resources().progress())
    }

    pub fn set_bloom(&mut self, threshold: f32, strength: f32, radius: f32) {
        if let Some(experience) = self.experience.as_mut() {
            experience.set_bloom_params(BloomParams { threshold, strength, radius });
        }
    }

    pub fn set_bloom_enabled(&mut self, enabled: bool) {
        if let Some(experience) = self.experience.as_mut() {
            experience.set_bloom_enabled(enabled);
        }
    }

    // ---- JSON accessors ----

    pub fn navigable_json(&self) -> String {
        self.json_or_empty(|experience| experience.navigator().to_json(), "[]")
    }

    pub fn markers_json(&self) -> String {
        self.json_or_empty(|experience| serde_json::to_string(&experience.markers()), "[]")
    }

    /// Material table; the host rebuilds its GPU materials when the revision changes.
    pub fn materials_json(&self) -> String {
        self.json_or_empty(|experience| experience.materials().to_json(), "[]")
    }

    pub fn navigation_state_json(&self) -> String {
        self.json_or_empty(|experience| serde_json::to_string(&experience.camera().state()), "null")
    }

    fn json_or_empty(
        &self,
        f: impl FnOnce(&Experience) -> Result<String, serde_json::Error>,
        empty: &str,
    ) -> String {
        let Some(experience) = self.experience.as_ref() else {
            return empty.to_string();
        };
        f(experience).unwrap_or_else(|err| {
            log::error!("JSON export failed: {err}");
            empty.to_string()
        })
    }

    // ---- Pointer accessors for linear-memory reads ----

    pub fn commands_ptr(&self) -> *const f32 {
        self.commands.as_ptr()
    }

    pub fn commands_len(&self) -> u32 {
        self.commands.len() as u32
    }

    pub fn events_ptr(&self) -> *const f32 {
        bytemuck::cast_slice::<HostEvent, f32>(&self.events).as_ptr()
    }

    /// Number of events, each [`HostEvent::FLOATS`] floats wide.
    pub fn events_len(&self) -> u32 {
        self.events.len() as u32
    }

    pub fn material_revision(&self) -> f64 {
        self.experience
            .as_ref()
            .map_or(0.0, |experience| experience.materials().revision() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helios_engine::bridge::protocol::{OP_OUTPUT, OP_RESIZE};
    use helios_engine::{BodyConfig, BodyKind, Color, SystemConfig};

    struct TwoBodies;

    impl Scenario for TwoBodies {
        fn config(&self) -> ExperienceConfig {
            let marker = Color::rgb(1.0, 1.0, 1.0);
            let system = SystemConfig::default()
                .with_body(
                    BodyConfig::anchor("Sun", 20.0, BodyKind::Star)
                        .with_textures(&["sunLava"])
                        .with_marker(marker),
                )
                .with_body(BodyConfig::orbiting("Mars", 0.53, BodyKind::Planet, 650.0).with_marker(marker));
            ExperienceConfig::default().with_system(system)
        }

        fn manifest(&self) -> AssetManifest {
            AssetManifest::default().with_texture("sunLava", "sun/lava.jpg")
        }
    }

    fn runner() -> ExperienceRunner<TwoBodies> {
        let mut runner = ExperienceRunner::new(TwoBodies);
        runner.init(640, 480, 1.0).unwrap();
        runner
    }

    #[test]
    fn calls_before_init_are_harmless() {
        let mut runner = ExperienceRunner::new(TwoBodies);
        runner.tick(0.016);
        assert!(!runner.navigate_to("Mars"));
        assert_eq!(runner.commands_len(), 0);
        assert_eq!(runner.markers_json(), "[]");
    }

    #[test]
    fn zero_viewport_fails_init() {
        let mut runner = ExperienceRunner::new(TwoBodies);
        assert!(runner.init(0, 0, 1.0).is_err());
        assert!(!runner.is_initialized());
    }

    #[test]
    fn tick_encodes_commands() {
        let mut runner = runner();
        runner.tick(0.016);
        let len = runner.commands_len() as usize;
        let stream = unsafe { std::slice::from_raw_parts(runner.commands_ptr(), len) };
        assert_eq!(stream[0], OP_RESIZE);
        let mut offset = 0;
        let mut last = 0.0;
        while offset < stream.len() {
            last = stream[offset];
            offset += 2 + stream[offset + 1] as usize;
        }
        assert_eq!(offset, stream.len());
        assert_eq!(last, OP_OUTPUT);
    }

    #[test]
    fn texture_round_trip_reports_events() {
        let mut runner = runner();
        let requests: serde_json::Value = serde_json::from_str(&runner.texture_requests_json()).unwrap();
        assert_eq!(requests[0]["path"], "sun/lava.jpg");
        assert_eq!(runner.texture_requests_json(), "[]");

        runner.texture_loaded("sun/lava.jpg");
        assert_eq!(runner.loading_progress(), 1.0);
        runner.tick(0.016);
        let events = unsafe {
            std::slice::from_raw_parts(runner.events_ptr(), runner.events_len() as usize * HostEvent::FLOATS)
        };
        let kinds: Vec<f32> = events.chunks(HostEvent::FLOATS).map(|e| e[0]).collect();
        assert!(kinds.contains(&HostEvent::LOADING_PROGRESS));
        assert!(kinds.contains(&HostEvent::RESOURCES_READY));
    }

    #[test]
    fn navigation_exports() {
        let mut runner = runner();
        let navigable: serde_json::Value = serde_json::from_str(&runner.navigable_json()).unwrap();
        assert_eq!(navigable.as_array().unwrap().len(), 2);
        assert!(runner.navigate_to("Mars"));
        assert_eq!(runner.navigation_state_json(), "\"transitioning\"");
    }
}
