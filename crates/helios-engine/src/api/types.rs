use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Handle to a body in the [`BodyRegistry`](crate::world::registry::BodyRegistry).
/// Non-owning: holding one never keeps a body alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Unique identifier for a mesh in the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshId(pub u32);

/// Reference to a material in the [`MaterialLibrary`](crate::renderer::material::MaterialLibrary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub u32);

/// Reference to a texture slot tracked by [`Resources`](crate::assets::resources::Resources).
/// The host uploads the image for a slot under the same index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// Linear RGBA color. Deserializes from `"#rrggbb"` strings.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Result<Self, ConfigError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ConfigError::InvalidColor(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| ConfigError::InvalidColor(hex.to_string()))
        };
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", to_byte(self.r), to_byte(self.g), to_byte(self.b))
    }

    pub fn to_vec3(self) -> glam::Vec3 {
        glam::Vec3::new(self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Notifications published on the [`EventBus`](crate::core::events::EventBus).
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    /// Fraction of requested textures that have settled (loaded or failed).
    LoadingProgress(f32),
    /// Every requested texture has settled.
    ResourcesReady,
    /// A body finished constructing its meshes and is now drawn.
    BodyReady(BodyId),
    /// Viewport changed size.
    Resize { width: u32, height: u32 },
    /// The camera began flying toward a body.
    TransitionStarted(BodyId),
    /// The camera arrived and now follows the body.
    TransitionFinished(BodyId),
}

/// A world event flattened for the host bridge.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct HostEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl HostEvent {
    pub const FLOATS: usize = 4;

    pub const LOADING_PROGRESS: f32 = 1.0;
    pub const RESOURCES_READY: f32 = 2.0;
    pub const BODY_READY: f32 = 3.0;
    pub const RESIZE: f32 = 4.0;
    pub const TRANSITION_STARTED: f32 = 5.0;
    pub const TRANSITION_FINISHED: f32 = 6.0;
}

impl From<&WorldEvent> for HostEvent {
    fn from(event: &WorldEvent) -> Self {
        let (kind, a, b) = match *event {
            WorldEvent::LoadingProgress(fraction) => (Self::LOADING_PROGRESS, fraction, 0.0),
            WorldEvent::ResourcesReady => (Self::RESOURCES_READY, 0.0, 0.0),
            WorldEvent::BodyReady(id) => (Self::BODY_READY, id.0 as f32, 0.0),
            WorldEvent::Resize { width, height } => (Self::RESIZE, width as f32, height as f32),
            WorldEvent::TransitionStarted(id) => (Self::TRANSITION_STARTED, id.0 as f32, 0.0),
            WorldEvent::TransitionFinished(id) => (Self::TRANSITION_FINISHED, id.0 as f32, 0.0),
        };
        Self { kind, a, b, c: 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        let c = Color::from_hex("#ffff00").unwrap();
        assert_eq!(c, Color::rgb(1.0, 1.0, 0.0));
        let c = Color::from_hex("2e6faf").unwrap();
        assert_eq!(c.to_hex(), "#2e6faf");
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!(Color::from_hex("#fff").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
    }

    #[test]
    fn color_serde_uses_hex_strings() {
        let c: Color = serde_json::from_str("\"#d3613f\"").unwrap();
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"#d3613f\"");
    }

    #[test]
    fn host_event_is_four_floats() {
        assert_eq!(std::mem::size_of::<HostEvent>(), HostEvent::FLOATS * 4);
        let e = HostEvent::from(&WorldEvent::TransitionFinished(BodyId(3)));
        assert_eq!(e.kind, HostEvent::TRANSITION_FINISHED);
        assert_eq!(e.a, 3.0);
    }
}
