use glam::Vec3;
use serde::Serialize;

use crate::api::types::{Color, MaterialId, TextureId};

/// Which faces a material draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    Front,
    Back,
}

/// Custom shader programs the host implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaderProgram {
    /// Scrolling lava with a noise cloud layer. Textures: [lava, cloud].
    Sun,
    /// Day/night blend with specular clouds. Textures: [day, night, specular_clouds].
    EarthSurface,
    /// Fresnel shell tinted by the sun direction.
    Atmosphere,
}

/// Parameters of a [`ShaderProgram`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShaderMaterial {
    pub program: ShaderProgram,
    /// Texture slots in program order; `None` where loading failed.
    pub textures: Vec<Option<TextureId>>,
    /// Flat color used when a texture is missing and by the software backend.
    pub base_color: Color,
    /// HDR multiplier on `base_color`.
    pub emissive: f32,
    pub time: f32,
    pub uv_scale: [f32; 2],
    pub fog_density: f32,
    pub sun_position: Vec3,
    pub atmosphere_day: Color,
    pub atmosphere_twilight: Color,
    pub clouds_intensity: f32,
    pub side: Side,
    pub transparent: bool,
}

impl ShaderMaterial {
    pub fn new(program: ShaderProgram, textures: Vec<Option<TextureId>>) -> Self {
        Self {
            program,
            textures,
            base_color: Color::WHITE,
            emissive: 0.0,
            time: 0.0,
            uv_scale: [1.0, 1.0],
            fog_density: 0.0,
            sun_position: Vec3::ZERO,
            atmosphere_day: Color::from_rgb_u8(0x00, 0xaa, 0xff),
            atmosphere_twilight: Color::from_rgb_u8(0xff, 0x66, 0x00),
            clouds_intensity: 0.0,
            side: Side::Front,
            transparent: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Material {
    /// Unlit flat color.
    Basic { color: Color },
    /// Lit by the scene lights, with an optional color map.
    Standard {
        color: Color,
        map: Option<TextureId>,
        emissive: f32,
    },
    Shader(ShaderMaterial),
}

impl Material {
    pub fn basic(color: Color) -> Self {
        Material::Basic { color }
    }

    pub fn standard(map: Option<TextureId>) -> Self {
        Material::Standard {
            color: Color::WHITE,
            map,
            emissive: 0.0,
        }
    }

    /// Whether scene lights affect this material.
    pub fn is_lit(&self) -> bool {
        matches!(self, Material::Standard { .. })
    }

    /// Flat linear color, including emissive boost, for backends without textures.
    pub fn flat_color(&self) -> Vec3 {
        match self {
            Material::Basic { color } => color.to_vec3(),
            Material::Standard { color, emissive, .. } => color.to_vec3() * (1.0 + emissive),
            Material::Shader(shader) => shader.base_color.to_vec3() * (1.0 + shader.emissive),
        }
    }
}

/// Owns every material; meshes refer to entries by [`MaterialId`].
#[derive(Debug, Default)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
    /// Bumped whenever an entry is added or mutably borrowed.
    revision: u64,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(material);
        self.revision += 1;
        id
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.revision += 1;
        self.materials.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Material table as JSON; array index equals `MaterialId`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.materials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_indices() {
        let mut lib = MaterialLibrary::new();
        let a = lib.add(Material::basic(Color::BLACK));
        let b = lib.add(Material::standard(None));
        assert_eq!(a, MaterialId(0));
        assert_eq!(b, MaterialId(1));
        assert!(lib.get(b).unwrap().is_lit());
        assert!(lib.get(MaterialId(9)).is_none());
    }

    #[test]
    fn revision_tracks_changes() {
        let mut lib = MaterialLibrary::new();
        let id = lib.add(Material::Shader(ShaderMaterial::new(ShaderProgram::Sun, vec![None, None])));
        let before = lib.revision();
        if let Some(Material::Shader(s)) = lib.get_mut(id) {
            s.time += 1.0;
        }
        assert!(lib.revision() > before);
    }

    #[test]
    fn serializes_tagged_json() {
        let mut lib = MaterialLibrary::new();
        lib.add(Material::basic(Color::BLACK));
        lib.add(Material::Shader(ShaderMaterial::new(ShaderProgram::Atmosphere, vec![])));
        let json = lib.to_json().unwrap();
        assert!(json.contains(r##""type":"basic","color":"#000000""##));
        assert!(json.contains(r#""program":"atmosphere""#));
    }
}
