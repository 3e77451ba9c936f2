use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::api::types::{BodyId, Color, MeshId};

/// Appearance strategy of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    /// Emissive shader sphere on the glow layer.
    Star,
    /// Lit sphere with an optional color map.
    #[default]
    Planet,
    /// Day/night surface shader plus an atmosphere shell.
    Earth,
}

/// Circular path around a parent body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalComponent {
    /// Distance from the parent's center. Always > 0.
    pub orbit_radius: f32,
    /// Angular speed multiplier. Always >= 0.
    pub orbit_speed: f64,
    /// Phase at t = 0, in radians.
    pub offset_angle: f64,
    /// Non-owning link to the body being orbited.
    pub parent: BodyId,
}

/// Two-phase lifecycle: bodies are simulated immediately but only drawn once
/// their textures have settled and meshes were built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyState {
    #[default]
    Pending,
    Ready,
}

/// Meshes created for a body by its appearance strategy.
#[derive(Debug, Clone, Default)]
pub struct BodyVisual {
    /// Primary surface mesh.
    pub surface: Option<MeshId>,
    /// Extra shells (atmosphere) that follow the surface.
    pub shells: Vec<MeshId>,
}

impl BodyVisual {
    pub fn meshes(&self) -> impl Iterator<Item = MeshId> + '_ {
        self.surface.into_iter().chain(self.shells.iter().copied())
    }
}

#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    /// Unique display name.
    pub name: String,
    pub radius: f32,
    /// Present for bodies shown in navigation UIs.
    pub marker_color: Option<Color>,
    /// Rendered through the glow pass.
    pub glow_source: bool,
    pub kind: BodyKind,
    /// `None` for the anchor.
    pub orbit: Option<OrbitalComponent>,
    /// Current world position. Derived each frame for orbital bodies.
    pub position: Vec3,
    pub state: BodyState,
    /// Resolved texture paths, in the order the appearance strategy expects.
    pub textures: Vec<String>,
    pub visual: Option<BodyVisual>,
}

impl Body {
    pub fn is_anchor(&self) -> bool {
        self.orbit.is_none()
    }

    pub fn is_ready(&self) -> bool {
        self.state == BodyState::Ready
    }

    pub fn is_navigable(&self) -> bool {
        self.marker_color.is_some() && !self.name.is_empty()
    }
}
