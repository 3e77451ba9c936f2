/// Point lights and ambient term for the lit materials.
///
/// Lights are persistent: they stay until explicitly removed. The star's light
/// is added once when the environment is built.

use glam::Vec3;
use serde::Serialize;

use crate::api::types::Color;

/// A 3D point light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
    /// Cutoff distance in world units; 0 means unlimited.
    pub distance: f32,
    /// Falloff exponent; 0 keeps full intensity up to `distance`.
    pub decay: f32,
}

impl PointLight {
    pub fn new(position: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            position,
            color,
            intensity,
            distance: 0.0,
            decay: 2.0,
        }
    }

    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = distance;
        self
    }

    pub fn with_decay(mut self, decay: f32) -> Self {
        self.decay = decay;
        self
    }

    /// Light reaching a point `d` units away, before the angular term.
    pub fn attenuation(&self, d: f32) -> f32 {
        if self.distance > 0.0 && d > self.distance {
            return 0.0;
        }
        let falloff = if self.decay > 0.0 { d.max(1.0).powf(-self.decay) } else { 1.0 };
        self.intensity * falloff
    }
}

/// Active lights plus ambient intensity.
#[derive(Debug, Clone, Serialize)]
pub struct LightState {
    lights: Vec<PointLight>,
    ambient: Color,
}

impl LightState {
    pub fn new() -> Self {
        Self {
            lights: Vec::new(),
            ambient: Color::BLACK,
        }
    }

    pub fn add(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    pub fn clear(&mut self) {
        self.lights.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &PointLight> {
        self.lights.iter()
    }

    pub fn count(&self) -> usize {
        self.lights.len()
    }

    /// White ambient light of the given intensity.
    pub fn set_ambient(&mut self, intensity: f32) {
        self.ambient = Color::rgb(intensity, intensity, intensity);
    }

    pub fn ambient(&self) -> Color {
        self.ambient
    }

    /// Diffuse irradiance at `point` with surface normal `normal`.
    pub fn irradiance(&self, point: Vec3, normal: Vec3) -> Vec3 {
        let mut total = self.ambient.to_vec3();
        for light in &self.lights {
            let to_light = light.position - point;
            let d = to_light.length();
            if d <= f32::EPSILON {
                continue;
            }
            let lambert = normal.dot(to_light / d).max(0.0);
            total += light.color.to_vec3() * light.attenuation(d) * lambert;
        }
        total
    }
}

impl Default for LightState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_cutoff_without_decay() {
        let light = PointLight::new(Vec3::ZERO, Color::WHITE, 5.0)
            .with_distance(1000.0)
            .with_decay(0.0);
        assert_eq!(light.attenuation(10.0), 5.0);
        assert_eq!(light.attenuation(999.0), 5.0);
        assert_eq!(light.attenuation(1001.0), 0.0);
    }

    #[test]
    fn irradiance_faces_the_light() {
        let mut state = LightState::new();
        state.set_ambient(0.05);
        state.add(PointLight::new(Vec3::ZERO, Color::WHITE, 5.0).with_decay(0.0));
        let p = Vec3::new(10.0, 0.0, 0.0);
        let lit = state.irradiance(p, Vec3::NEG_X);
        let dark = state.irradiance(p, Vec3::X);
        assert!((lit.x - 5.05).abs() < 1e-5);
        assert!((dark.x - 0.05).abs() < 1e-6);
    }
}
