use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::api::types::Color;
use crate::error::ConfigError;
use crate::world::body::BodyKind;

/// Declarative description of one body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    pub name: String,
    pub radius: f32,
    #[serde(default)]
    pub kind: BodyKind,
    /// Fixed body at the center of the system. Anchors take no orbit fields.
    #[serde(default)]
    pub anchor: bool,
    /// Anchor position; defaults to the origin.
    #[serde(default)]
    pub position: Option<Vec3>,
    #[serde(default)]
    pub orbit_radius: Option<f32>,
    /// Drawn at random when unset.
    #[serde(default)]
    pub orbit_speed: Option<f64>,
    /// Drawn at random in [0, 2π) when unset.
    #[serde(default)]
    pub offset_angle: Option<f64>,
    /// Name of the orbited body; defaults to the system's anchor.
    #[serde(default)]
    pub parent: Option<String>,
    /// Texture keys from the asset manifest, in the order the kind expects.
    #[serde(default)]
    pub textures: Vec<String>,
    #[serde(default)]
    pub marker_color: Option<Color>,
    /// Defaults to true for stars.
    #[serde(default)]
    pub glow: Option<bool>,
}

impl BodyConfig {
    /// Fixed body at the origin.
    pub fn anchor(name: impl Into<String>, radius: f32, kind: BodyKind) -> Self {
        Self {
            name: name.into(),
            radius,
            kind,
            anchor: true,
            position: None,
            orbit_radius: None,
            orbit_speed: None,
            offset_angle: None,
            parent: None,
            textures: Vec::new(),
            marker_color: None,
            glow: None,
        }
    }

    /// Body on a circular orbit around the anchor.
    pub fn orbiting(name: impl Into<String>, radius: f32, kind: BodyKind, orbit_radius: f32) -> Self {
        Self {
            anchor: false,
            orbit_radius: Some(orbit_radius),
            ..Self::anchor(name, radius, kind)
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.orbit_speed = Some(speed);
        self
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset_angle = Some(offset);
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_textures(mut self, keys: &[&str]) -> Self {
        self.textures = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn with_marker(mut self, color: Color) -> Self {
        self.marker_color = Some(color);
        self
    }

    pub fn with_glow(mut self, glow: bool) -> Self {
        self.glow = Some(glow);
        self
    }

    pub fn glows(&self) -> bool {
        self.glow.unwrap_or(self.kind == BodyKind::Star)
    }
}

/// The whole simulated system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Seed for orbit parameters left unset.
    pub seed: u64,
    /// Radians per second for an orbit speed of 1.
    pub angular_scale: f64,
    /// Upper bound of randomly drawn orbit speeds.
    pub max_random_speed: f64,
    pub bodies: Vec<BodyConfig>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            angular_scale: 0.01,
            max_random_speed: 0.1,
            bodies: Vec::new(),
        }
    }
}

impl SystemConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Parse)
    }

    pub fn with_body(mut self, body: BodyConfig) -> Self {
        self.bodies.push(body);
        self
    }
}
