//! Mesh and material construction per [`BodyKind`], and per-frame visual sync.

use glam::Vec3;

use crate::api::types::{Color, TextureId};
use crate::core::scene::{Mesh, SceneGraph, BLOOM_LAYER};
use crate::renderer::material::{Material, MaterialLibrary, ShaderMaterial, ShaderProgram, Side};
use crate::world::body::{Body, BodyKind, BodyVisual};

pub const STAR_SEGMENTS: u32 = 32;
pub const PLANET_SEGMENTS: u32 = 64;
/// Atmosphere shell radius relative to the surface.
pub const ATMOSPHERE_SCALE: f32 = 1.04;
/// Planet spin about y, radians per second.
pub const SPIN_RATE: f32 = 0.1;
/// Star shader time advance per second.
pub const STAR_TIME_RATE: f32 = 0.5;

const STAR_COLOR: Color = Color::rgb(1.0, 0.6, 0.2);
const STAR_EMISSIVE: f32 = 1.5;
const EARTH_COLOR: Color = Color::rgb(0.18, 0.43, 0.69);

fn slot(textures: &[Option<TextureId>], i: usize) -> Option<TextureId> {
    textures.get(i).copied().flatten()
}

/// Create the meshes for `body`. `textures` follows the body's texture list;
/// failed loads are `None` and the material falls back to a flat color.
pub fn build_visual(
    body: &Body,
    textures: &[Option<TextureId>],
    sun_position: Vec3,
    scene: &mut SceneGraph,
    materials: &mut MaterialLibrary,
) -> BodyVisual {
    let mut visual = BodyVisual::default();
    let surface = match body.kind {
        BodyKind::Star => {
            let mut shader = ShaderMaterial::new(ShaderProgram::Sun, vec![slot(textures, 0), slot(textures, 1)]);
            shader.base_color = STAR_COLOR;
            shader.emissive = STAR_EMISSIVE;
            shader.uv_scale = [3.0, 1.0];
            shader.fog_density = 0.45;
            let material = materials.add(Material::Shader(shader));
            Mesh::sphere(body.radius, STAR_SEGMENTS, material)
        }
        BodyKind::Planet => {
            let map = slot(textures, 0);
            let color = match (map, body.marker_color) {
                (None, Some(marker)) => marker,
                _ => Color::WHITE,
            };
            let material = materials.add(Material::Standard {
                color,
                map,
                emissive: 0.0,
            });
            Mesh::sphere(body.radius, PLANET_SEGMENTS, material)
        }
        BodyKind::Earth => {
            let mut surface = ShaderMaterial::new(
                ShaderProgram::EarthSurface,
                vec![slot(textures, 0), slot(textures, 1), slot(textures, 2)],
            );
            surface.base_color = body.marker_color.unwrap_or(EARTH_COLOR);
            surface.sun_position = sun_position;
            surface.clouds_intensity = 0.5;
            let surface_material = materials.add(Material::Shader(surface));

            let mut atmosphere = ShaderMaterial::new(ShaderProgram::Atmosphere, Vec::new());
            atmosphere.base_color = atmosphere.atmosphere_day;
            atmosphere.sun_position = sun_position;
            atmosphere.side = Side::Back;
            atmosphere.transparent = true;
            let atmosphere_material = materials.add(Material::Shader(atmosphere));

            let mut shell = Mesh::sphere(body.radius, PLANET_SEGMENTS, atmosphere_material)
                .with_body(body.id)
                .with_scale(ATMOSPHERE_SCALE);
            shell.position = body.position;
            visual.shells.push(scene.spawn(shell));

            Mesh::sphere(body.radius, PLANET_SEGMENTS, surface_material)
        }
    };

    let mut surface = surface.with_body(body.id);
    surface.position = body.position;
    if body.glow_source {
        surface = surface.with_layer(BLOOM_LAYER);
    }
    visual.surface = Some(scene.spawn(surface));
    log::debug!("Built {:?} visual for {}", body.kind, body.name);
    visual
}

/// Copy the body's state onto its meshes and advance animated uniforms.
pub fn sync_visual(
    body: &Body,
    elapsed: f64,
    dt: f32,
    sun_position: Vec3,
    scene: &mut SceneGraph,
    materials: &mut MaterialLibrary,
) {
    let Some(visual) = &body.visual else {
        return;
    };
    let spin = if body.kind == BodyKind::Star {
        0.0
    } else {
        (elapsed * SPIN_RATE as f64 % std::f64::consts::TAU) as f32
    };
    for id in visual.meshes() {
        let Some(mesh) = scene.get_mut(id) else {
            continue;
        };
        mesh.position = body.position;
        mesh.rotation_y = spin;
        let material = mesh.material;

        match body.kind {
            BodyKind::Star => {
                if let Some(Material::Shader(shader)) = materials.get_mut(material) {
                    shader.time += STAR_TIME_RATE * dt;
                }
            }
            BodyKind::Earth => {
                let stale = matches!(materials.get(material), Some(Material::Shader(s)) if s.sun_position != sun_position);
                if stale {
                    if let Some(Material::Shader(shader)) = materials.get_mut(material) {
                        shader.sun_position = sun_position;
                    }
                }
            }
            BodyKind::Planet => {}
        }
    }
}
