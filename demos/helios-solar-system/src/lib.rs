use wasm_bindgen::prelude::*;
use helios_engine::*;

mod bodies;
mod sources;

use helios_web::Scenario;

/// The scaled solar system: the Sun and five textured planets.
#[derive(Debug, Default)]
pub struct SolarSystem;

impl Scenario for SolarSystem {
    fn config(&self) -> ExperienceConfig {
        ExperienceConfig::default().with_system(bodies::system_config())
    }

    fn manifest(&self) -> AssetManifest {
        sources::manifest()
    }
}

helios_web::export_experience!(SolarSystem, "helios-solar-system");
