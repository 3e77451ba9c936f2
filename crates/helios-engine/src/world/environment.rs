use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::api::types::Color;
use crate::renderer::lighting::{LightState, PointLight};

/// Scene lighting and backdrop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Intensity of the light placed at the anchor.
    pub light_intensity: f32,
    /// Range of that light; 0 means unlimited.
    pub light_distance: f32,
    pub light_decay: f32,
    pub ambient: f32,
    /// Manifest key of the star-field background.
    pub background: Option<String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            light_intensity: 5.0,
            light_distance: 1000.0,
            light_decay: 0.0,
            ambient: 0.05,
            background: Some("environmentMap".to_string()),
        }
    }
}

impl EnvironmentConfig {
    /// Lights for a system whose star sits at `star_position`.
    pub fn build_lights(&self, star_position: Vec3) -> LightState {
        let mut lights = LightState::new();
        lights.set_ambient(self.ambient);
        lights.add(
            PointLight::new(star_position, Color::WHITE, self.light_intensity)
                .with_distance(self.light_distance)
                .with_decay(self.light_decay),
        );
        lights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_light_defaults() {
        let lights = EnvironmentConfig::default().build_lights(Vec3::ZERO);
        assert_eq!(lights.count(), 1);
        assert_eq!(lights.ambient(), Color::rgb(0.05, 0.05, 0.05));
        let light = lights.iter().next().unwrap();
        assert_eq!(light.intensity, 5.0);
        assert_eq!(light.attenuation(900.0), 5.0);
        assert_eq!(light.attenuation(1100.0), 0.0);
    }
}
